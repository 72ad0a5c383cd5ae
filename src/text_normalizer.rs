use once_cell::sync::Lazy;
use regex::Regex;

// @module: Whitespace and entity normalization for extracted verse text

// @const: Any run of whitespace, including former line breaks and NBSP
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("whitespace pattern is valid")
});

/// Entity text that occasionally survives HTML decoding
const NBSP_ENTITY: &str = "&nbsp;";

/// Mid-line caesura marker used by the source edition
const CAESURA_MARKER: &str = "--";

/// Normalize raw extracted text to a single line.
///
/// Literal `&nbsp;` entities and the `--` caesura marker become spaces, every
/// whitespace run collapses to one space and the ends are trimmed. The caesura
/// replacement happens before collapsing, which keeps the function idempotent.
pub fn normalize_text(text: &str) -> String {
    let text = text.replace(NBSP_ENTITY, " ");
    let text = text.replace(CAESURA_MARKER, " ");
    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

/// Whether `text` is already in normalized form
pub fn is_normalized(text: &str) -> bool {
    normalize_text(text) == text
}
