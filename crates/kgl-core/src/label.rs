//! Normalized string labels used as node identity and hash key throughout the store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters stripped during normalization, mirroring Python's `string.punctuation`.
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// A normalized, trimmed, lowercased, punctuation-stripped string.
///
/// Two labels are equal iff their normalized forms are equal; all hashing and
/// comparison goes through the normalized form, never the original input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    /// Normalize raw text into a `Label`: strip ASCII punctuation, lowercase, trim.
    pub fn normalize(raw: &str) -> Self {
        let stripped: String = raw.chars().filter(|c| !PUNCTUATION.contains(*c)).collect();
        Label(stripped.to_lowercase().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::normalize(s)
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::normalize(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_punctuation() {
        assert_eq!(Label::normalize("  Coffee!  "), Label::normalize("coffee"));
        assert_eq!(Label::from("James's Tea").as_str(), "jamess tea");
    }

    #[test]
    fn comparisons_use_normalized_form() {
        let a: Label = "Taylor Swift".into();
        let b: Label = "taylor swift".into();
        assert_eq!(a, b);
    }
}
