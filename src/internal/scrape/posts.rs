//! Post parsing: listing tables and single "full item" tables.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::api::HnError;
use crate::internal::models::{HACKER_NEWS_BASE_URL, Post, PostType, VoteLinks};
use crate::internal::scrape::{collect_text, next_element_sibling, votes};

static TITLE_ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr.athing").unwrap());
static FATITEM: Lazy<Selector> = Lazy::new(|| Selector::parse("table.fatitem").unwrap());
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.titleline > a").unwrap());
static SCORE: Lazy<Selector> = Lazy::new(|| Selector::parse("span.score").unwrap());
static AGE: Lazy<Selector> = Lazy::new(|| Selector::parse("span.age").unwrap());
static USER_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a.hnuser").unwrap());
static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static SUBTEXT_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td.subtext").unwrap());
static FORM: Lazy<Selector> = Lazy::new(|| Selector::parse("form").unwrap());

/// Parse a listing page into posts.
///
/// Rows alternate a title row and a metadata row. A pair that fails to
/// parse is dropped silently; one malformed row among hundreds must not
/// lose the rest of the page.
pub fn parse_post_list(html: &str, post_type: PostType) -> Vec<Post> {
    let document = Html::parse_document(html);
    let mut posts = Vec::new();

    for title_row in document.select(&TITLE_ROWS) {
        let Some(metadata_row) = next_element_sibling(title_row) else {
            tracing::debug!("listing row without metadata sibling, skipping");
            continue;
        };
        match parse_post_rows(title_row, metadata_row, post_type) {
            Ok(post) => posts.push(post),
            Err(err) => tracing::debug!(%err, "skipping malformed listing row"),
        }
    }

    posts
}

/// Parse a single-item page into one post.
///
/// Unlike listing mode this is a required-success call: with no other rows
/// to fall back on, a missing title or table is a hard failure.
pub fn parse_post(html: &str, post_type: PostType) -> Result<Post, HnError> {
    let document = Html::parse_document(html);
    let fatitem = document
        .select(&FATITEM)
        .next()
        .ok_or(HnError::Scraper("missing full-item table"))?;

    let mut rows = fatitem.select(&ROWS);
    let title_row = rows
        .next()
        .ok_or(HnError::Scraper("missing item title row"))?;
    let metadata_row = rows
        .next()
        .ok_or(HnError::Scraper("missing item metadata row"))?;

    let mut post = parse_post_rows(title_row, metadata_row, post_type)?;
    post.text = post_text(fatitem);
    Ok(post)
}

/// Parse one title-row/metadata-row pair.
fn parse_post_rows(
    title_row: ElementRef<'_>,
    metadata_row: ElementRef<'_>,
    post_type: PostType,
) -> Result<Post, HnError> {
    // A bad id must not abort the page; callers drop id 0 items if they care.
    let id = title_row
        .value()
        .attr("id")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);

    let title_link = title_row
        .select(&TITLE_LINK)
        .next()
        .ok_or(HnError::Scraper("missing title link"))?;
    let title = collect_text(title_link);
    let url = match title_link.value().attr("href") {
        Some(href) if !href.is_empty() => href.to_string(),
        _ => HACKER_NEWS_BASE_URL.to_string(),
    };

    // Jobs posts carry no score and no author.
    let score = metadata_row
        .select(&SCORE)
        .next()
        .map(collect_text)
        .and_then(|text| leading_int(&text))
        .unwrap_or(0);

    // The age element's visible text is relative ("2 hours ago"); the title
    // attribute holds the absolute time string the site renders it from.
    let age = metadata_row
        .select(&AGE)
        .next()
        .and_then(|el| el.value().attr("title"))
        .unwrap_or_default()
        .to_string();

    let by = metadata_row
        .select(&USER_LINK)
        .next()
        .map(collect_text)
        .unwrap_or_default();

    let comments_count = comments_count(metadata_row);

    let votes = votes::vote_links(title_row, Some(metadata_row));
    let vote_links = (votes.upvote.is_some() || votes.unvote.is_some()).then(|| VoteLinks {
        upvote: votes.upvote,
        unvote: votes.unvote,
    });

    Ok(Post {
        id,
        url,
        title,
        age,
        comments_count,
        by,
        score,
        post_type,
        upvoted: votes.upvoted,
        vote_links,
        text: None,
        comments: None,
    })
}

/// Comment count from the metadata anchor whose text contains "comment".
/// "discuss"-style anchors without a number yield 0.
fn comments_count(metadata_row: ElementRef<'_>) -> u32 {
    metadata_row
        .select(&ANCHORS)
        .map(collect_text)
        .find(|text| text.contains("comment"))
        .and_then(|text| leading_int(&text))
        .unwrap_or(0)
}

fn leading_int(text: &str) -> Option<u32> {
    text.split_whitespace().next()?.parse().ok()
}

/// Self-text of an Ask/Show-style item, if any.
///
/// Walks up from the bottom row of the full-item table: the logged-in view
/// appends a comment form, in which case the text row sits three rows from
/// the end. A row carrying the subtext cell means there is no self-text.
fn post_text(fatitem: ElementRef<'_>) -> Option<String> {
    let rows: Vec<ElementRef<'_>> = fatitem.select(&ROWS).collect();
    let mut row = *rows.last()?;

    if row.select(&FORM).next().is_some() {
        row = *rows.get(rows.len().checked_sub(3)?)?;
    }

    if row.select(&SUBTEXT_CELL).next().is_some() {
        return None;
    }

    let html = row.inner_html();
    let trimmed = html.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
