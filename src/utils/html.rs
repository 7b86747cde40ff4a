use once_cell::sync::Lazy;
use regex::Regex;

/// Matches real HTML tags (opening, closing or self-closing) without
/// swallowing stray `<` / `>` characters in prose.
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z][a-zA-Z0-9]*[^<>]*>").unwrap());

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// The fixed entity set the site emits. `&amp;` must decode last so that
/// `&amp;lt;` ends up as `&lt;` rather than `<`.
const ORDERED_ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#x27;", "'"),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Decodes the fixed set of HTML entities found in comment bodies.
///
/// `&nbsp;` is collapsed together with an adjacent space so decoding never
/// produces double spaces.
pub fn decode_entities(html: &str) -> String {
    let mut result = html.replace(" &nbsp;", " ");
    result = result.replace("&nbsp; ", " ");
    result = result.replace("&nbsp;", " ");

    for (entity, replacement) in ORDERED_ENTITIES {
        result = result.replace(entity, replacement);
    }

    result
}

/// Removes HTML tags, leaving text content untouched.
pub fn strip_tags(text: &str) -> String {
    TAG_REGEX.replace_all(text, "").into_owned()
}

/// Removes HTML tags and collapses whitespace runs (including newlines) to
/// single spaces. For non-paragraph content where newlines carry no meaning.
pub fn strip_tags_normalized(text: &str) -> String {
    let stripped = strip_tags(text);
    WHITESPACE_REGEX.replace_all(&stripped, " ").into_owned()
}
