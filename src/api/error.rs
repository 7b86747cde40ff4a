use std::fmt;

/// Client and scraping errors.
#[derive(Debug)]
pub enum HnError {
    /// Network-level failure (connection, timeout, DNS, bad status).
    Request(String),
    /// The page structure no longer matches the selectors. Only raised when
    /// a required anchor element is missing; a malformed row within a list
    /// is skipped instead.
    Scraper(&'static str),
    /// The action needs a logged-in session and none is present.
    Unauthenticated,
    /// Login was rejected for the supplied credentials.
    BadCredentials,
}

impl fmt::Display for HnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(details) => write!(f, "request failed: {details}"),
            Self::Scraper(details) => write!(f, "unexpected page structure: {details}"),
            Self::Unauthenticated => write!(f, "not logged in"),
            Self::BadCredentials => write!(f, "login rejected"),
        }
    }
}

impl std::error::Error for HnError {}

impl From<reqwest::Error> for HnError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}
