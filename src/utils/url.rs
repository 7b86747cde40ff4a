use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that already starts with a URI scheme ("https:", "mailto:", ...).
static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*:").unwrap());

/// Resolve a possibly site-relative href against a base URL.
///
/// Vote and item links on the site are relative paths like
/// `vote?id=1&how=up`; they must be joined onto the base before use as a
/// request target. Hrefs that already carry a scheme pass through untouched.
pub fn resolve(base: &str, href: &str) -> String {
    if SCHEME_REGEX.is_match(href) {
        return href.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// True when the href already names an absolute target.
pub fn has_scheme(href: &str) -> bool {
    SCHEME_REGEX.is_match(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_absolute_urls_through() {
        assert_eq!(
            resolve("https://news.ycombinator.com", "https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn joins_relative_paths() {
        assert_eq!(
            resolve("https://news.ycombinator.com", "vote?id=1&how=up"),
            "https://news.ycombinator.com/vote?id=1&how=up"
        );
        assert_eq!(
            resolve("https://news.ycombinator.com/", "/item?id=2"),
            "https://news.ycombinator.com/item?id=2"
        );
    }

    #[test]
    fn leaves_mailto_alone() {
        assert_eq!(
            resolve("https://news.ycombinator.com", "mailto:hn@ycombinator.com"),
            "mailto:hn@ycombinator.com"
        );
        assert!(has_scheme("mailto:hn@ycombinator.com"));
        assert!(!has_scheme("item?id=1"));
    }
}
