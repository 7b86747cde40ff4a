//! Scraping kit for Hacker News.
//!
//! Converts the site's HTML into typed [`Post`] and [`Comment`] records,
//! tracks collapse/expand state over a flat comment sequence via
//! [`CommentThread`], and renders the restricted comment-HTML dialect into
//! styled text runs. [`HnClient`] wraps the HTTP transport: listings, single
//! items with comment pagination, voting, login and Algolia search.
//!
//! Parsing is forgiving by design: a malformed row inside a listing or a
//! comment list is dropped, never fatal. Only a fully unparseable single
//! item surfaces as an error.

pub mod api;
pub mod config;
pub mod internal;
pub mod utils;

pub use api::{HnClient, HnError};
pub use config::HnConfig;
pub use internal::models::{Comment, CommentVisibility, Post, PostType, VoteLinks};
pub use internal::richtext::{RunStyle, StyledRun};
pub use internal::thread::{CommentThread, ToggleOutcome};
