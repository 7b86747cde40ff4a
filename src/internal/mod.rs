pub mod cache;
pub mod models;
pub mod richtext;
pub mod scrape;
pub mod search;
pub mod thread;
