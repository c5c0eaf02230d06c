//! Text normalization helpers.

use regex::Regex;

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-insensitive identity of a heading text.
pub fn heading_key(text: &str) -> String {
    normalize_whitespace(text).to_lowercase()
}

/// Whether the text consists only of numeric characters.
pub fn is_numeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_numeric)
}

/// Builds repetition keys: lowercase, digit runs replaced by `#`,
/// whitespace collapsed.
///
/// "Page 3 of 10" and "page 7 of 10" share the key `page # of #`.
#[derive(Debug, Clone)]
pub struct RepetitionKey {
    digit_runs: Regex,
}

impl RepetitionKey {
    /// Create a new key builder.
    pub fn new() -> Self {
        Self {
            digit_runs: Regex::new(r"\d+").unwrap(),
        }
    }

    /// Repetition key of a line text.
    pub fn key(&self, text: &str) -> String {
        let lowered = text.trim().to_lowercase();
        let masked = self.digit_runs.replace_all(&lowered, "#");
        normalize_whitespace(&masked)
    }
}

impl Default for RepetitionKey {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  1.1\t Background \n"), "1.1 Background");
        assert_eq!(normalize_whitespace("   "), "");
        assert_eq!(heading_key("Executive   SUMMARY"), "executive summary");
    }

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("2024"));
        assert!(!is_numeric("12a"));
        assert!(!is_numeric("1.5"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn test_repetition_key() {
        let keys = RepetitionKey::new();
        assert_eq!(keys.key("Page 3"), "page #");
        assert_eq!(keys.key("  PAGE   12 "), "page #");
        assert_eq!(keys.key("Page 3 of 10"), keys.key("page 7 of 10"));
        assert_eq!(keys.key("ACME Corp. 2023 Annual Report"), "acme corp. # annual report");
    }
}
