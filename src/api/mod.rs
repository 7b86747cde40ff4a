//! Blocking HTTP client for the site.
//!
//! All page fetches go through a shared `reqwest` client with a cookie jar
//! for the login session. Redirects are disabled globally: login and vote
//! endpoints answer with redirects whose bodies and cookies carry the
//! actual outcome.

mod error;

pub use error::HnError;

use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use reqwest::blocking::Client;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::redirect;
use scraper::{Html, Selector};

use crate::config::HnConfig;
use crate::internal::cache::Cache;
use crate::internal::models::{Comment, Post, PostType, VoteLinks};
use crate::internal::scrape::{comments, posts};
use crate::internal::search;
use crate::utils::url;

static MORE_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.morelink").unwrap());

/// A logged-out page served in place of an action that needs a session.
fn is_login_page(body: &str) -> bool {
    body.contains(r#"<form action="/login"#) || body.contains("You have to be logged in")
}

#[derive(Clone)]
pub struct HnClient {
    client: Client,
    jar: Arc<Jar>,
    base_url: String,
    search_endpoint: String,
    list_cache: Cache<String, Vec<Post>>,
    post_cache: Cache<u32, Post>,
}

impl HnClient {
    pub fn new() -> Self {
        Self::with_config(&HnConfig::default())
    }

    pub fn with_config(config: &HnConfig) -> Self {
        let jar = Arc::new(Jar::default());
        let client = build_client(&jar, Duration::from_secs(config.timeout_secs));
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        Self {
            client,
            jar,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            search_endpoint: config.search_endpoint.clone(),
            list_cache: Cache::new(ttl),
            post_cache: Cache::new(ttl),
        }
    }

    /// Client pointed at a different site root. Used against local test
    /// servers.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_config(&HnConfig {
            base_url: base_url.into(),
            ..HnConfig::default()
        })
    }

    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<String, HnError> {
        let response = self.client.get(url).query(query).send()?;
        Ok(response.text()?)
    }

    /// Fetch one page of a listing feed.
    ///
    /// Date-ordered feeds (`newest`, `jobs`) paginate by the id of the
    /// first item on the next page; the ranked feeds paginate by page
    /// number. Parsed pages are cached briefly.
    pub fn get_posts(
        &self,
        post_type: PostType,
        page: usize,
        next_id: Option<u32>,
    ) -> Result<Vec<Post>, HnError> {
        let cache_key = format!("{post_type}:{page}:{next_id:?}");
        if let Some(posts) = self.list_cache.get(&cache_key) {
            return Ok(posts);
        }

        let url = format!("{}/{post_type}", self.base_url);
        let query = match (post_type, next_id) {
            (PostType::Newest | PostType::Jobs, Some(next)) => {
                vec![("next", next.to_string())]
            }
            _ => vec![("p", page.to_string())],
        };

        let html = self.get(&url, &query)?;
        let posts = posts::parse_post_list(&html, post_type);
        self.list_cache.set(cache_key, posts.clone());
        Ok(posts)
    }

    /// Fetch a single post together with its full comment thread.
    ///
    /// Threads longer than one page end in a "more" link; pages are fetched
    /// sequentially until it disappears and their comments concatenated in
    /// order.
    pub fn get_post(&self, id: u32) -> Result<Post, HnError> {
        if let Some(post) = self.post_cache.get(&id) {
            return Ok(post);
        }

        let url = format!("{}/item", self.base_url);
        let mut pages: Vec<String> = Vec::new();
        let mut page = 1usize;
        loop {
            let html = self.get(
                &url,
                &[("id", id.to_string()), ("p", page.to_string())],
            )?;
            let has_more = Html::parse_document(&html).select(&MORE_LINK).next().is_some();
            pages.push(html);
            if !has_more {
                break;
            }
            page += 1;
            tracing::debug!(id, page, "fetching additional comment page");
        }

        let mut post = posts::parse_post(&pages[0], PostType::News)?;
        let mut thread = comments::parse_comments(&pages[0], Some(&post));
        for extra in &pages[1..] {
            thread.extend(comments::parse_comments(extra, None));
        }
        post.comments = Some(thread);

        self.post_cache.set(id, post.clone());
        Ok(post)
    }

    pub fn upvote_post(&self, post: &mut Post) -> Result<(), HnError> {
        let href = action_href(&post.vote_links, VoteAction::Upvote)?;
        self.vote(&href)?;
        post.upvoted = true;
        post.score += 1;
        self.post_cache.invalidate(&post.id);
        self.list_cache.clear();
        Ok(())
    }

    pub fn unvote_post(&self, post: &mut Post) -> Result<(), HnError> {
        let href = action_href(&post.vote_links, VoteAction::Unvote)?;
        self.vote(&href)?;
        post.upvoted = false;
        post.score = post.score.saturating_sub(1);
        self.post_cache.invalidate(&post.id);
        self.list_cache.clear();
        Ok(())
    }

    pub fn upvote_comment(&self, comment: &mut Comment) -> Result<(), HnError> {
        let href = action_href(&comment.vote_links, VoteAction::Upvote)?;
        self.vote(&href)?;
        comment.upvoted = true;
        Ok(())
    }

    pub fn unvote_comment(&self, comment: &mut Comment) -> Result<(), HnError> {
        let href = action_href(&comment.vote_links, VoteAction::Unvote)?;
        self.vote(&href)?;
        comment.upvoted = false;
        Ok(())
    }

    /// Issue a vote GET. The endpoint returns a success page either way; a
    /// login form in the body means the session is gone.
    fn vote(&self, href: &str) -> Result<(), HnError> {
        let target = url::resolve(&self.base_url, href);
        let body = self.get(&target, &[])?;
        if is_login_page(&body) {
            return Err(HnError::Unauthenticated);
        }
        Ok(())
    }

    /// Log in and keep the session cookie in the shared jar.
    pub fn login(&self, username: &str, password: &str) -> Result<(), HnError> {
        let url = format!("{}/login", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[("acct", username), ("pw", password), ("goto", "news")])
            .send()?;
        let body = response.text()?;

        // success is a redirect that sets the user cookie; the error page
        // comes back inline
        if body.contains("Bad login") || !self.is_authenticated() {
            return Err(HnError::BadCredentials);
        }

        // logged-in pages render vote state, stale caches would hide it
        self.list_cache.clear();
        self.post_cache.clear();
        tracing::info!(username, "logged in");
        Ok(())
    }

    /// Drop the session by replacing the cookie jar and the client bound
    /// to it.
    pub fn logout(&mut self) {
        let timeout = Duration::from_secs(HnConfig::default().timeout_secs);
        self.jar = Arc::new(Jar::default());
        self.client = build_client(&self.jar, timeout);
        self.list_cache.clear();
        self.post_cache.clear();
        tracing::info!("logged out");
    }

    /// Whether the jar currently holds any cookie for the site.
    pub fn is_authenticated(&self) -> bool {
        let Ok(url) = reqwest::Url::parse(&self.base_url) else {
            return false;
        };
        self.jar.cookies(&url).is_some()
    }

    /// Full-text story search via the search API.
    pub fn search(&self, query: &str) -> Result<Vec<Post>, HnError> {
        let body = self.get(
            &self.search_endpoint,
            &[("query", query.to_string()), ("tags", "story".to_string())],
        )?;
        search::parse_search_response(&body)
    }
}

impl Default for HnClient {
    fn default() -> Self {
        Self::new()
    }
}

fn build_client(jar: &Arc<Jar>, timeout: Duration) -> Client {
    Client::builder()
        .cookie_provider(Arc::clone(jar))
        .redirect(redirect::Policy::none())
        .timeout(timeout)
        .build()
        .expect("failed to construct HTTP client")
}

#[derive(Clone, Copy)]
enum VoteAction {
    Upvote,
    Unvote,
}

/// Pick the href for a vote action.
///
/// No links at all means the page was rendered logged-out. Links present
/// but missing the requested direction means the markup changed or the
/// action does not apply.
fn action_href(links: &Option<VoteLinks>, action: VoteAction) -> Result<String, HnError> {
    let links = links.as_ref().ok_or(HnError::Unauthenticated)?;
    let href = match action {
        VoteAction::Upvote => links.upvote.as_ref(),
        VoteAction::Unvote => links.unvote.as_ref(),
    };
    match href {
        Some(href) => Ok(href.clone()),
        None if links.upvote.is_none() && links.unvote.is_none() => {
            Err(HnError::Unauthenticated)
        }
        None => Err(HnError::Scraper("missing vote link for action")),
    }
}
