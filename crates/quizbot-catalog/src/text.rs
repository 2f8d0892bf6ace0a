//! Text normalisation shared by parsing, lookup and answer matching.

/// Trims `text` and collapses every run of whitespace to a single space.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
