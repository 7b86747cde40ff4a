//! Comment parsing and flat tree building.
//!
//! Comment rows are accumulated in document order; order is the tree
//! encoding, so the sequence is never re-sorted. Depth comes from the
//! rendered indentation spacer, 40px per level.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::internal::models::{Comment, Post};
use crate::internal::scrape::{collect_text, votes};

static COMMENT_ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse(".comtr").unwrap());
static COMMENT_TEXT: Lazy<Selector> = Lazy::new(|| Selector::parse(".commtext").unwrap());
static AGE: Lazy<Selector> = Lazy::new(|| Selector::parse(".age").unwrap());
static USER_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(".hnuser").unwrap());
static INDENT_IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse(".ind img").unwrap());

/// Inline reply-action markup embedded in some comment bodies.
static REPLY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<div class="reply">.*?</div>"#).unwrap());

/// Anchors get their inner HTML rewritten to the href target, because the
/// site truncates long link text with an ellipsis.
static ANCHOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)<a\s+[^>]*href=["']([^"']*)["'][^>]*>.*?</a>"#).unwrap());

/// Indentation spacer width per tree level, in pixels.
const INDENT_WIDTH_PER_LEVEL: u32 = 40;

/// Parse every comment row in the document, in document order.
///
/// Rows that fail to parse (deleted comments, markup drift) are excluded
/// from the sequence, never errors. When a post with non-empty self-text is
/// given, a level-0 pseudo-comment for it is prepended so it renders at the
/// top of the thread.
pub fn parse_comments(html: &str, post: Option<&Post>) -> Vec<Comment> {
    let document = Html::parse_document(html);
    let mut comments: Vec<Comment> = Vec::new();

    for row in document.select(&COMMENT_ROWS) {
        match parse_comment(row) {
            Ok(mut comment) => {
                // Levels may only grow by one between adjacent rows. The
                // markup never promises that, so deeper jumps are clamped
                // rather than rejected.
                if let Some(previous) = comments.last()
                    && comment.level > previous.level + 1
                {
                    comment.level = previous.level + 1;
                }
                comments.push(comment);
            }
            Err(reason) => tracing::debug!(reason, "skipping comment row"),
        }
    }

    if let Some(post) = post
        && let Some(pseudo) = self_text_comment(post)
    {
        comments.insert(0, pseudo);
    }

    comments
}

/// Parse one `.comtr` row. The error is only a skip reason; row failures
/// never propagate past the enclosing list.
fn parse_comment(row: ElementRef<'_>) -> Result<Comment, &'static str> {
    let text_element = row
        .select(&COMMENT_TEXT)
        .next()
        .ok_or("missing comment text container")?;
    let text = comment_text(text_element);
    if text.trim().is_empty() {
        return Err("empty comment text");
    }

    let age = row.select(&AGE).next().map(collect_text).unwrap_or_default();
    let by = row
        .select(&USER_LINK)
        .next()
        .map(collect_text)
        .unwrap_or_default();

    let id = row
        .value()
        .attr("id")
        .and_then(|value| value.parse().ok())
        .ok_or("unparseable comment id")?;

    let indent_width: u32 = row
        .select(&INDENT_IMAGE)
        .next()
        .and_then(|el| el.value().attr("width"))
        .and_then(|width| width.parse().ok())
        .ok_or("unparseable indent width")?;
    let level = (indent_width / INDENT_WIDTH_PER_LEVEL) as usize;

    let votes = votes::vote_links(row, None);
    let mut comment = Comment::new(id, age, text, by, level, votes.upvoted);
    comment.vote_links =
        (votes.upvote.is_some() || votes.unvote.is_some()).then(|| {
            crate::internal::models::VoteLinks {
                upvote: votes.upvote,
                unvote: votes.unvote,
            }
        });
    Ok(comment)
}

/// Post-processed body HTML of a comment: reply markup deleted and every
/// anchor's inner HTML replaced by its href, applied before the text is
/// stored.
fn comment_text(element: ElementRef<'_>) -> String {
    let html = element.inner_html();
    let without_reply = REPLY_REGEX.replace_all(&html, "");
    ANCHOR_REGEX
        .replace_all(&without_reply, r#"<a href="$1">$1</a>"#)
        .into_owned()
}

/// Synthesize the "original post" pseudo-comment for self-text posts.
fn self_text_comment(post: &Post) -> Option<Comment> {
    let text = post.text.as_deref()?.trim();
    if text.is_empty() {
        return None;
    }
    Some(Comment::new(
        post.id,
        post.age.clone(),
        text,
        post.by.clone(),
        0,
        post.upvoted,
    ))
}
