//! Heuristic extraction of vote affordances.
//!
//! The site renders vote controls inconsistently across logged-in states
//! and markup revisions, so this is a cascade of fallbacks over anchor ids,
//! anchor text and a CSS marker class. Extraction never fails: absence of
//! links is the only signal.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static VOTELINK_ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td.votelinks a").unwrap());
static ANCHORS: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());

/// Marker class on an upvote anchor meaning the action was already used and
/// is visually suppressed. Strongest available "already upvoted" signal
/// when no unvote anchor is rendered.
const USED_MARKER_CLASS: &str = "nosee";

#[derive(Debug, Clone, Default)]
pub struct VoteLinkInfo {
    pub upvote: Option<String>,
    pub unvote: Option<String>,
    pub upvoted: bool,
}

/// Extract vote links from a title/comment row, optionally widening the
/// unvote scan to the metadata row.
///
/// Scan order, each step a fallback for the previous:
/// 1. anchors inside the dedicated `td.votelinks` container,
/// 2. anchors in the metadata row (unvote only),
/// 3. all descendant anchors of the row.
/// Upvote anchors are matched by the `up_` id prefix; unvote anchors by the
/// `un_` prefix, then by literal "unvote" text. When only a used upvote
/// anchor is visible, its unvote URL is synthesized by swapping `how=up`
/// for `how=un`.
pub fn vote_links(row: ElementRef<'_>, metadata: Option<ElementRef<'_>>) -> VoteLinkInfo {
    let vote_anchors: Vec<ElementRef<'_>> = row.select(&VOTELINK_ANCHORS).collect();
    let row_anchors: Vec<ElementRef<'_>> = row.select(&ANCHORS).collect();
    let metadata_anchors: Vec<ElementRef<'_>> = metadata
        .map(|el| el.select(&ANCHORS).collect())
        .unwrap_or_default();

    let upvote = anchor_with_id_prefix("up_", &vote_anchors)
        .or_else(|| anchor_with_id_prefix("up_", &row_anchors));

    let unvote_candidates: Vec<ElementRef<'_>> = vote_anchors
        .iter()
        .chain(metadata_anchors.iter())
        .chain(row_anchors.iter())
        .copied()
        .collect();
    let unvote = anchor_with_id_prefix("un_", &unvote_candidates)
        .or_else(|| anchor_with_text("unvote", &unvote_candidates));

    let upvote_href = upvote
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);
    let mut unvote_href = unvote
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    let upvote_used = upvote
        .is_some_and(|el| el.value().classes().any(|class| class == USED_MARKER_CLASS));

    if unvote_href.is_none()
        && upvote_used
        && let Some(href) = &upvote_href
    {
        unvote_href = Some(href.replace("how=up", "how=un"));
    }

    let upvoted = unvote_href.is_some() || upvote_used;

    VoteLinkInfo {
        upvote: upvote_href,
        unvote: unvote_href,
        upvoted,
    }
}

fn anchor_with_id_prefix<'a>(
    prefix: &str,
    anchors: &[ElementRef<'a>],
) -> Option<ElementRef<'a>> {
    anchors
        .iter()
        .find(|el| el.value().attr("id").is_some_and(|id| id.starts_with(prefix)))
        .copied()
}

fn anchor_with_text<'a>(text: &str, anchors: &[ElementRef<'a>]) -> Option<ElementRef<'a>> {
    anchors
        .iter()
        .find(|el| {
            el.text()
                .collect::<String>()
                .trim()
                .eq_ignore_ascii_case(text)
        })
        .copied()
}
