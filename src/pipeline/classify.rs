//! Heading level classification.
//!
//! A [`HeadingClassifier`] receives the ordered heading candidates and
//! returns exactly one [`HeadingLevel`] per candidate, in the same order.
//! [`RuleClassifier`] is the default implementation; [`TextClassifier`]
//! adapts any text-only labeller (e.g. a learned model) to the same
//! contract.

use std::collections::{BTreeSet, HashMap};

use regex::Regex;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{HeadingLevel, TextLine};

use super::order::descending_size;
use super::text::is_numeric;

/// Trait for heading level classifiers.
///
/// Implementations must return a label vector of the same length and order
/// as `candidates`; [`HeadingLevel::Other`] rejects a candidate.
pub trait HeadingClassifier: Send + Sync {
    /// Get the name of this classifier.
    fn name(&self) -> &str;

    /// Label every candidate.
    fn classify(&self, candidates: &[TextLine]) -> Result<Vec<HeadingLevel>>;
}

/// A candidate accepted as a heading.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedLine {
    /// The candidate line
    pub line: TextLine,
    /// Its heading level (never `Other`)
    pub level: HeadingLevel,
}

/// Run `classifier` over `candidates` and keep the accepted headings.
///
/// Fails with [`Error::LabelCount`] if the classifier breaks the
/// one-label-per-candidate contract.
pub fn apply_classifier(
    classifier: &dyn HeadingClassifier,
    candidates: Vec<TextLine>,
) -> Result<Vec<ClassifiedLine>> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let labels = classifier.classify(&candidates)?;
    if labels.len() != candidates.len() {
        return Err(Error::LabelCount {
            expected: candidates.len(),
            actual: labels.len(),
        });
    }

    Ok(keep_headings(candidates, labels))
}

fn keep_headings(candidates: Vec<TextLine>, labels: Vec<HeadingLevel>) -> Vec<ClassifiedLine> {
    candidates
        .into_iter()
        .zip(labels)
        .filter(|(_, level)| level.is_heading())
        .map(|(line, level)| ClassifiedLine { line, level })
        .collect()
}

/// Rule-based classifier: section numbering first, font size rank second.
///
/// * `"2.1.1 Data Preprocessing"` is `H3` whatever its font size: the level
///   is one more than the number of dots in the leading numeral.
/// * Otherwise the largest `style_levels` distinct candidate font sizes map
///   to `H1`, `H2`, ... provided the text does not end with a period, is
///   shorter than `style_max_words` words and is not a bare number.
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    numbering: Regex,
    style_levels: usize,
    style_max_words: usize,
}

impl RuleClassifier {
    /// Create a classifier from the config.
    pub fn new(config: &Config) -> Self {
        Self {
            numbering: Regex::new(r"(?s)^(\d+(?:\.\d+)*)\.?\s*(.*)$").unwrap(),
            style_levels: config.style_levels,
            style_max_words: config.style_max_words,
        }
    }

    /// Level implied by a leading section number, if any.
    pub fn numbering_level(&self, text: &str) -> Option<HeadingLevel> {
        let caps = self.numbering.captures(text.trim())?;
        let rest = caps.get(2).map_or("", |m| m.as_str());
        if rest.trim().is_empty() {
            return None;
        }

        let depth = caps[1].matches('.').count();
        Some(HeadingLevel::from_depth(depth))
    }

    /// Map from font size key to style level for a candidate set.
    pub fn style_map(&self, candidates: &[TextLine]) -> HashMap<i32, HeadingLevel> {
        let distinct: BTreeSet<i32> = candidates.iter().map(TextLine::font_key).collect();
        let mut sizes: Vec<i32> = distinct.into_iter().collect();
        sizes.sort_by(descending_size);

        sizes
            .into_iter()
            .take(self.style_levels)
            .enumerate()
            .map(|(rank, size)| (size, HeadingLevel::from_depth(rank)))
            .collect()
    }

    /// Label candidates. Never fails.
    pub fn label(&self, candidates: &[TextLine]) -> Vec<HeadingLevel> {
        let style_map = self.style_map(candidates);
        candidates
            .iter()
            .map(|line| self.label_line(line, &style_map))
            .collect()
    }

    /// Label candidates and keep the accepted headings.
    pub fn classify_lines(&self, candidates: Vec<TextLine>) -> Vec<ClassifiedLine> {
        let labels = self.label(&candidates);
        keep_headings(candidates, labels)
    }

    fn label_line(&self, line: &TextLine, style_map: &HashMap<i32, HeadingLevel>) -> HeadingLevel {
        if let Some(level) = self.numbering_level(&line.text) {
            return level;
        }

        let text = line.text.trim();
        let looks_like_heading = !text.ends_with('.')
            && text.split_whitespace().count() < self.style_max_words
            && !is_numeric(text);

        match style_map.get(&line.font_key()) {
            Some(level) if looks_like_heading => *level,
            _ => HeadingLevel::Other,
        }
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl HeadingClassifier for RuleClassifier {
    fn name(&self) -> &str {
        "rules"
    }

    fn classify(&self, candidates: &[TextLine]) -> Result<Vec<HeadingLevel>> {
        Ok(self.label(candidates))
    }
}

/// Adapter for classifiers that only look at candidate texts.
///
/// # Example
///
/// ```
/// use pdf_headings::pipeline::{HeadingClassifier, TextClassifier};
/// use pdf_headings::{BBox, HeadingLevel, TextLine};
///
/// let shouty = TextClassifier::new("shouty", |texts: &[&str]| {
///     Ok(texts
///         .iter()
///         .map(|t| if t.chars().any(char::is_lowercase) { HeadingLevel::Other } else { HeadingLevel::H1 })
///         .collect())
/// });
///
/// let lines = vec![TextLine::new("SUMMARY", 12.0, "Arial", 1, BBox::default())];
/// assert_eq!(shouty.classify(&lines).unwrap(), vec![HeadingLevel::H1]);
/// ```
pub struct TextClassifier<F> {
    name: String,
    labeller: F,
}

impl<F> TextClassifier<F>
where
    F: Fn(&[&str]) -> Result<Vec<HeadingLevel>> + Send + Sync,
{
    /// Wrap a text labelling function.
    pub fn new(name: impl Into<String>, labeller: F) -> Self {
        Self {
            name: name.into(),
            labeller,
        }
    }
}

impl<F> HeadingClassifier for TextClassifier<F>
where
    F: Fn(&[&str]) -> Result<Vec<HeadingLevel>> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, candidates: &[TextLine]) -> Result<Vec<HeadingLevel>> {
        let texts: Vec<&str> = candidates.iter().map(|line| line.text.as_str()).collect();
        (self.labeller)(&texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn candidate(text: &str, size: f32) -> TextLine {
        TextLine::new(text, size, "Arial", 1, BBox::new(0.0, 0.0, 100.0, size))
    }

    #[test]
    fn test_numbering_levels() {
        let rules = RuleClassifier::default();
        assert_eq!(rules.numbering_level("1. Introduction"), Some(HeadingLevel::H1));
        assert_eq!(rules.numbering_level("2 Methods"), Some(HeadingLevel::H1));
        assert_eq!(rules.numbering_level("2.1 Foo"), Some(HeadingLevel::H2));
        assert_eq!(
            rules.numbering_level("2.1.1 Data Preprocessing"),
            Some(HeadingLevel::H3)
        );
        assert_eq!(rules.numbering_level("4.2.1.3 Limits"), Some(HeadingLevel::H4));
        assert_eq!(rules.numbering_level("  3.2. Results "), Some(HeadingLevel::H2));
    }

    #[test]
    fn test_numbering_requires_remaining_text() {
        let rules = RuleClassifier::default();
        assert_eq!(rules.numbering_level("42"), None);
        assert_eq!(rules.numbering_level("1.2"), None);
        assert_eq!(rules.numbering_level("3. "), None);
        assert_eq!(rules.numbering_level("Chapter 3"), None);
    }

    #[test]
    fn test_numbering_beats_style() {
        let rules = RuleClassifier::default();
        let candidates = vec![
            candidate("2.1.1 Data Preprocessing", 24.0),
            candidate("Overview", 14.0),
        ];

        let labels = rules.label(&candidates);
        assert_eq!(labels, vec![HeadingLevel::H3, HeadingLevel::H2]);
    }

    #[test]
    fn test_style_map_top_three() {
        let rules = RuleClassifier::default();
        let candidates = vec![
            candidate("a", 12.0),
            candidate("b", 20.0),
            candidate("c", 16.0),
            candidate("d", 20.0),
            candidate("e", 10.0),
        ];

        let map = rules.style_map(&candidates);
        assert_eq!(map.len(), 3);
        assert_eq!(map[&2000], HeadingLevel::H1);
        assert_eq!(map[&1600], HeadingLevel::H2);
        assert_eq!(map[&1200], HeadingLevel::H3);
        assert!(!map.contains_key(&1000));
    }

    #[test]
    fn test_style_rejections() {
        let rules = RuleClassifier::default();
        let sentence = "This sentence has a lot of words but is set in a large font so it \
                        passes every other check we have in place";
        let candidates = vec![
            candidate("Key Findings", 18.0),
            candidate("A sentence that ends with a period.", 18.0),
            candidate("2024", 18.0),
            candidate(sentence, 18.0),
            candidate("Appendix", 8.0),
            candidate("Glossary", 9.0),
            candidate("Index", 10.0),
            candidate("Notes", 12.0),
        ];

        let labels = rules.label(&candidates);
        assert_eq!(
            labels,
            vec![
                HeadingLevel::H1,
                HeadingLevel::Other,
                HeadingLevel::Other,
                HeadingLevel::Other,
                HeadingLevel::Other,
                HeadingLevel::Other,
                HeadingLevel::H3,
                HeadingLevel::H2,
            ]
        );
    }

    #[test]
    fn test_classify_lines_drops_rejected() {
        let rules = RuleClassifier::default();
        let candidates = vec![candidate("Scope", 16.0), candidate("17", 16.0)];

        let classified = rules.classify_lines(candidates);
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].line.text, "Scope");
        assert_eq!(classified[0].level, HeadingLevel::H1);
    }

    #[test]
    fn test_apply_classifier_checks_label_count() {
        let broken = TextClassifier::new("broken", |_: &[&str]| Ok(vec![HeadingLevel::H1]));
        let candidates = vec![candidate("a", 12.0), candidate("b", 12.0)];

        let result = apply_classifier(&broken, candidates);
        assert!(matches!(
            result,
            Err(Error::LabelCount {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_apply_classifier_skips_empty_input() {
        let failing = TextClassifier::new("failing", |_: &[&str]| {
            Err(Error::Classifier {
                name: "failing".to_string(),
                message: "model not loaded".to_string(),
            })
        });

        assert!(apply_classifier(&failing, Vec::new()).unwrap().is_empty());
        assert!(apply_classifier(&failing, vec![candidate("a", 12.0)]).is_err());
    }

    #[test]
    fn test_text_classifier_sees_texts_in_order() {
        let echo = TextClassifier::new("echo", |texts: &[&str]| {
            Ok(texts
                .iter()
                .map(|t| t.parse::<HeadingLevel>().unwrap_or(HeadingLevel::Other))
                .collect())
        });
        let candidates = vec![candidate("H2", 10.0), candidate("x", 10.0), candidate("H1", 10.0)];

        let classified = apply_classifier(&echo, candidates).unwrap();
        let levels: Vec<HeadingLevel> = classified.iter().map(|c| c.level).collect();
        assert_eq!(levels, vec![HeadingLevel::H2, HeadingLevel::H1]);
        assert_eq!(echo.name(), "echo");
    }
}
