//! Full-text story search via the Algolia HN API.
//!
//! The only JSON surface in the crate; everything else is scraped HTML.
//! Hits are mapped into the same `Post` model the scrapers produce so
//! callers never see a second story type.

use serde::Deserialize;

use crate::api::HnError;
use crate::internal::models::{HACKER_NEWS_BASE_URL, Post, PostType};
use crate::utils::datetime;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "objectID")]
    pub object_id: String,
    pub title: Option<String>,
    pub url: Option<String>,
    pub points: Option<u32>,
    pub author: Option<String>,
    pub num_comments: Option<u32>,
    pub created_at_i: Option<i64>,
    pub story_text: Option<String>,
}

/// Parse an Algolia search response body into posts.
///
/// Hits whose id does not parse are dropped; a malformed body is a hard
/// failure.
pub fn parse_search_response(json: &str) -> Result<Vec<Post>, HnError> {
    let response: SearchResponse = serde_json::from_str(json)
        .map_err(|_| HnError::Scraper("malformed search response"))?;
    Ok(response.hits.iter().filter_map(hit_to_post).collect())
}

fn hit_to_post(hit: &SearchHit) -> Option<Post> {
    let id: u32 = hit.object_id.parse().ok()?;

    // self posts carry no external URL, link to the discussion instead
    let url = match hit.url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("{HACKER_NEWS_BASE_URL}/item?id={id}"),
    };

    let age = datetime::relative_age(hit.created_at_i.unwrap_or_else(datetime::now_unix));

    Some(Post {
        id,
        url,
        title: hit.title.clone().unwrap_or_else(|| "(no title)".to_string()),
        age,
        comments_count: hit.num_comments.unwrap_or(0),
        by: hit.author.clone().unwrap_or_else(|| "unknown".to_string()),
        score: hit.points.unwrap_or(0),
        post_type: PostType::News,
        upvoted: false,
        vote_links: None,
        text: hit.story_text.clone(),
        comments: None,
    })
}
