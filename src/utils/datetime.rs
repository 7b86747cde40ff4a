use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as seconds since the unix epoch.
pub fn now_unix() -> i64 {
    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(dur) => dur.as_secs() as i64,
        Err(_) => 0,
    }
}

/// Format a unix timestamp (seconds) into a relative age string like
/// "2 days ago", "1 hour ago" or "just now".
///
/// Posts scraped from HTML carry the site's own pre-rendered age string;
/// this exists for the search API, which only returns a creation timestamp.
pub fn relative_age(timestamp: i64) -> String {
    let now = now_unix();
    if now <= timestamp {
        return "just now".to_string();
    }

    let delta = now - timestamp;
    let units: [(i64, &str); 5] = [
        (31_536_000, "year"),
        (2_592_000, "month"),
        (86_400, "day"),
        (3_600, "hour"),
        (60, "minute"),
    ];

    for (seconds, name) in units {
        let count = delta / seconds;
        if count > 0 {
            let plural = if count == 1 { "" } else { "s" };
            return format!("{} {}{} ago", count, name, plural);
        }
    }

    "just now".to_string()
}
