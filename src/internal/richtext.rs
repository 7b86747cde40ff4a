//! Regex-driven rendering of comment body HTML into styled text runs.
//!
//! The body markup is a small, known dialect (paragraphs, links, a handful
//! of inline format tags and `<pre><code>` blocks), so rendering is a
//! cascade of regex passes rather than a DOM walk. Entities are decoded
//! before any pass so offsets always refer to the decoded text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::internal::models::HACKER_NEWS_BASE_URL;
use crate::utils::html::{decode_entities, strip_tags, strip_tags_normalized};
use crate::utils::url;

static CODE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<pre[^>]*>\s*<code[^>]*>(.*?)</code>\s*</pre>").unwrap());

static PARAGRAPH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p>").unwrap());

static LINK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a\s+[^>]*href=["']([^"']*)["'][^>]*>(.*?)</a>"#).unwrap()
});

/// Empty format tags render as nothing and would otherwise produce
/// zero-width spans.
static EMPTY_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(b|i|em|strong|code)\b[^>]*>\s*</(b|i|em|strong|code)>").unwrap()
});

static FORMAT_PATTERNS: Lazy<Vec<(Regex, RunStyle)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"(?is)<b\b[^>]*>(.*?)</b>").unwrap(),
            RunStyle::Bold,
        ),
        (
            Regex::new(r"(?is)<strong\b[^>]*>(.*?)</strong>").unwrap(),
            RunStyle::Bold,
        ),
        (
            Regex::new(r"(?is)<i\b[^>]*>(.*?)</i>").unwrap(),
            RunStyle::Italic,
        ),
        (
            Regex::new(r"(?is)<em\b[^>]*>(.*?)</em>").unwrap(),
            RunStyle::Italic,
        ),
        (
            Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").unwrap(),
            RunStyle::Code,
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    Code,
}

/// One contiguous span of text sharing a style and an optional link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
    /// Absolute link target, resolved against the site base URL.
    pub link: Option<String>,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::Plain,
            link: None,
        }
    }

    pub fn styled(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }
}

/// Concatenated text of a run sequence, styles discarded.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Render body HTML into styled runs.
///
/// Structure is dispatched in priority order: code blocks first, then
/// paragraph splitting, then a single inline block. An empty or
/// whitespace-only body renders to no runs.
pub fn render(body: &str) -> Vec<StyledRun> {
    let decoded = decode_entities(body);
    if CODE_BLOCK_REGEX.is_match(&decoded) {
        return render_code_blocks(&decoded);
    }
    render_prose(&decoded)
}

fn render_prose(segment: &str) -> Vec<StyledRun> {
    if PARAGRAPH_REGEX.is_match(segment) {
        render_paragraphs(segment)
    } else {
        render_links(segment.trim())
    }
}

/// Split around `<pre><code>` blocks. Code content keeps its internal
/// whitespace verbatim; block boundaries get blank-line separators, with
/// nothing appended after a final block.
fn render_code_blocks(decoded: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in CODE_BLOCK_REGEX.captures_iter(decoded) {
        let matched = caps.get(0).unwrap();
        let before = render_prose(&decoded[last..matched.start()]);
        if !before.is_empty() {
            if !runs.is_empty() {
                runs.push(StyledRun::plain("\n"));
            }
            runs.extend(before);
        }

        let code = strip_tags(caps.get(1).unwrap().as_str());
        let code = code.trim_matches('\n');
        if !code.is_empty() {
            if !runs.is_empty() {
                runs.push(StyledRun::plain("\n\n"));
            }
            runs.push(StyledRun::styled(code, RunStyle::Code));
        }
        last = matched.end();
    }

    let tail = render_prose(&decoded[last..]);
    if !tail.is_empty() {
        runs.push(StyledRun::plain("\n"));
        runs.extend(tail);
    }
    runs
}

/// Paragraph-split rendering. The body's leading text arrives bare, with
/// only subsequent paragraphs wrapped in `<p>`, so the text before the
/// first tag is the first paragraph.
fn render_paragraphs(segment: &str) -> Vec<StyledRun> {
    let mut paragraphs: Vec<&str> = Vec::new();
    let mut last = 0;

    for caps in PARAGRAPH_REGEX.captures_iter(segment) {
        let matched = caps.get(0).unwrap();
        paragraphs.push(&segment[last..matched.start()]);
        paragraphs.push(caps.get(1).unwrap().as_str());
        last = matched.end();
    }
    paragraphs.push(&segment[last..]);

    let mut runs = Vec::new();
    for paragraph in paragraphs {
        let paragraph = paragraph.trim();
        if strip_tags_normalized(paragraph).trim().is_empty() {
            continue;
        }
        if !runs.is_empty() {
            runs.push(StyledRun::plain("\n\n"));
        }
        runs.extend(render_links(paragraph));
    }
    runs
}

/// Split a paragraph around anchors, tag each anchor's inner runs with the
/// resolved href, and format everything between them.
fn render_links(segment: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in LINK_REGEX.captures_iter(segment) {
        let matched = caps.get(0).unwrap();
        runs.extend(render_formatting(&segment[last..matched.start()]));

        let href = caps.get(1).unwrap().as_str();
        let inner = caps.get(2).unwrap().as_str();
        // anchors with no visible text render as nothing
        if !strip_tags_normalized(inner).trim().is_empty() {
            let target = url::resolve(HACKER_NEWS_BASE_URL, href);
            for mut run in render_formatting(inner) {
                run.link = Some(target.clone());
                runs.push(run);
            }
        }
        last = matched.end();
    }

    runs.extend(render_formatting(&segment[last..]));
    runs
}

/// Inline bold/italic/code spans within link-free text.
///
/// Spans must be disjoint; overlapping or nested format tags fall back to
/// a single plain run of the stripped text rather than guessing at intent.
fn render_formatting(segment: &str) -> Vec<StyledRun> {
    let cleaned = EMPTY_TAG_REGEX.replace_all(segment, "");

    let mut spans: Vec<(usize, usize, &str, RunStyle)> = Vec::new();
    for (regex, style) in FORMAT_PATTERNS.iter() {
        for caps in regex.captures_iter(&cleaned) {
            let matched = caps.get(0).unwrap();
            spans.push((
                matched.start(),
                matched.end(),
                caps.get(1).unwrap().as_str(),
                *style,
            ));
        }
    }
    spans.sort_by_key(|span| span.0);

    if spans.windows(2).any(|pair| pair[1].0 < pair[0].1) {
        let plain = strip_tags_normalized(&cleaned);
        if plain.trim().is_empty() {
            return Vec::new();
        }
        return vec![StyledRun::plain(plain)];
    }

    let mut runs = Vec::new();
    let mut last = 0;
    for (start, end, inner, style) in spans {
        let between = strip_tags_normalized(&cleaned[last..start]);
        if !between.is_empty() {
            runs.push(StyledRun::plain(between));
        }
        let content = strip_tags(inner);
        if !content.is_empty() {
            runs.push(StyledRun::styled(content, style));
        }
        last = end;
    }
    let tail = strip_tags_normalized(&cleaned[last..]);
    if !tail.is_empty() {
        runs.push(StyledRun::plain(tail));
    }
    runs
}
