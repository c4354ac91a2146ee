//! Text normalization applied before keyword matching.

/// Lowercases `text` and strips ASCII punctuation.
///
/// Whitespace and non-ASCII characters pass through untouched, so word
/// boundaries survive and "Reality!" matches the keyword "reality".
/// Total over arbitrary input and idempotent.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}
