use once_cell::sync::OnceCell;
use strum_macros::Display;

use crate::internal::richtext::{self, StyledRun};

pub const HACKER_NEWS_BASE_URL: &str = "https://news.ycombinator.com";
pub const HACKER_NEWS_HOST: &str = "news.ycombinator.com";

/// The listing feeds the site serves. The `Display` form doubles as the URL
/// path segment (`/news`, `/ask`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PostType {
    News,
    Ask,
    Show,
    Jobs,
    Newest,
    Best,
    Active,
}

impl PostType {
    /// Human-readable feed title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::News => "Top",
            Self::Ask => "Ask",
            Self::Show => "Show",
            Self::Jobs => "Jobs",
            Self::Newest => "New",
            Self::Best => "Best",
            Self::Active => "Active",
        }
    }
}

/// A pair of vote action URLs, absolute or site-relative.
///
/// At most one is usually actionable in the markup, but both may be present
/// when the user has already voted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteLinks {
    pub upvote: Option<String>,
    pub unvote: Option<String>,
}

/// Display state of a comment row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentVisibility {
    /// Full body shown, children shown.
    #[default]
    Visible,
    /// Collapsed to a one-line placeholder, children hidden.
    Compact,
    /// Not rendered at all, excluded from visible traversal.
    Hidden,
}

/// One story/job/ask item, scraped from a listing row pair or a full-item
/// table.
///
/// Score, comment count, upvoted flag, vote links and comments are mutated
/// in place after a vote action or once comments are fetched; the rest is
/// fixed at parse time.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: u32,
    pub url: String,
    pub title: String,
    /// The site's own pre-rendered absolute-time string, not a timestamp.
    pub age: String,
    pub comments_count: u32,
    pub by: String,
    pub score: u32,
    pub post_type: PostType,
    pub upvoted: bool,
    pub vote_links: Option<VoteLinks>,
    /// Self-text for Ask/Show-style posts, raw HTML.
    pub text: Option<String>,
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    /// The discussion page for this post on the site itself.
    pub fn hacker_news_url(&self) -> String {
        format!("{}/item?id={}", HACKER_NEWS_BASE_URL, self.id)
    }
}

/// One comment row.
///
/// Comments are not a linked tree: they live in a single ordered sequence
/// where a comment's descendants are the maximal contiguous run of
/// following entries with a strictly greater `level`. Order is the tree
/// encoding and must never be re-sorted.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u32,
    pub age: String,
    /// Post-processed body HTML: reply markup removed, anchor text
    /// rewritten to the href target.
    pub text: String,
    pub by: String,
    /// Tree depth, 0 = top-level reply to the post.
    pub level: usize,
    pub upvoted: bool,
    pub vote_links: Option<VoteLinks>,
    pub visibility: CommentVisibility,
    rendered: OnceCell<Vec<StyledRun>>,
}

impl Comment {
    pub fn new(
        id: u32,
        age: impl Into<String>,
        text: impl Into<String>,
        by: impl Into<String>,
        level: usize,
        upvoted: bool,
    ) -> Self {
        Self {
            id,
            age: age.into(),
            text: text.into(),
            by: by.into(),
            level,
            upvoted,
            vote_links: None,
            visibility: CommentVisibility::Visible,
            rendered: OnceCell::new(),
        }
    }

    /// Rich-text runs for the body, rendered lazily on first access and
    /// cached for the comment's lifetime.
    pub fn rendered(&self) -> &[StyledRun] {
        self.rendered.get_or_init(|| richtext::render(&self.text))
    }

    /// Permalink for this comment on the site.
    pub fn hacker_news_url(&self) -> String {
        format!("{}/item?id={}", HACKER_NEWS_BASE_URL, self.id)
    }
}

/// Comments are identified by the site's item id.
impl PartialEq for Comment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Comment {}
