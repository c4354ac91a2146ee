//! Decides whether an item's text warrants a reply.

use crate::normalize::normalize;

/// Keyword trigger with an opt-out escape hatch.
///
/// The opt-out marker is matched against the raw lowercased text, because
/// normalization would strip the punctuation the marker relies on. A marker
/// found in any field vetoes the item outright. Keywords are matched as
/// plain substrings of the normalized text, so "lifestyle" triggers the
/// keyword "life".
#[derive(Debug, Clone)]
pub struct TriggerPolicy {
    keywords: Vec<String>,
    opt_out_marker: String,
}

impl TriggerPolicy {
    pub fn new(keywords: Vec<String>, opt_out_marker: impl Into<String>) -> Self {
        let keywords = keywords.into_iter().map(|k| k.to_lowercase()).collect();
        let opt_out_marker = opt_out_marker.into().to_lowercase();
        Self {
            keywords,
            opt_out_marker,
        }
    }

    /// Returns true when any field contains a keyword and no field carries
    /// the opt-out marker.
    pub fn should_respond(&self, fields: &[&str]) -> bool {
        for field in fields {
            if field.to_lowercase().contains(&self.opt_out_marker) {
                return false;
            }
        }

        fields
            .iter()
            .any(|field| self.matches_keyword(&normalize(field)))
    }

    fn matches_keyword(&self, normalized: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| normalized.contains(keyword.as_str()))
    }
}
