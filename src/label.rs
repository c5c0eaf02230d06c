//! Annotation records and the labeled-example classifier.
//!
//! [`label_template`] exports merged lines with an empty `label` field for
//! manual annotation (`H1`, `H2`, ..., or `O`). Annotated records are read
//! back with [`parse_labeled`] and turned into a [`LabeledClassifier`].

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::model::{HeadingLevel, TextLine};
use crate::pipeline::{heading_key, HeadingClassifier, RuleClassifier};
use crate::render::{to_json_value, JsonFormat};

/// One line prepared for (or carrying) a manual heading label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    /// Line text
    pub text: String,
    /// Font size in points
    #[serde(default)]
    pub font_size: f32,
    /// Whether the font is bold
    #[serde(default)]
    pub bold: bool,
    /// Page number (1-indexed)
    #[serde(default)]
    pub page: u32,
    /// Annotated level; empty until labeled
    #[serde(default)]
    pub label: String,
}

impl LabelRecord {
    /// Unlabeled record for a line.
    pub fn from_line(line: &TextLine) -> Self {
        Self {
            text: line.text.clone(),
            font_size: line.font_size,
            bold: line.bold,
            page: line.page,
            label: String::new(),
        }
    }

    /// Parsed label, or `None` if empty or unparseable.
    pub fn level(&self) -> Option<HeadingLevel> {
        if self.label.trim().is_empty() {
            return None;
        }
        self.label.parse().ok()
    }
}

/// Unlabeled records for every line, in input order.
pub fn label_template(lines: &[TextLine]) -> Vec<LabelRecord> {
    lines.iter().map(LabelRecord::from_line).collect()
}

/// Serialize records as one JSON array.
pub fn to_json(records: &[LabelRecord], format: JsonFormat) -> Result<String> {
    to_json_value(records, format)
}

/// Serialize records as JSON Lines.
pub fn to_jsonl(records: &[LabelRecord]) -> Result<String> {
    let mut output = String::new();
    for record in records {
        output.push_str(&to_json_value(record, JsonFormat::Compact)?);
        output.push('\n');
    }
    Ok(output)
}

/// Parse annotated records from a JSON array or JSON Lines.
pub fn parse_labeled(input: &str) -> Result<Vec<LabelRecord>> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut records = Vec::new();
    for line in trimmed.lines().map(str::trim).filter(|l| !l.is_empty()) {
        records.push(serde_json::from_str(line)?);
    }
    Ok(records)
}

/// Read annotated records from a file.
pub fn read_labeled_file<P: AsRef<Path>>(path: P) -> Result<Vec<LabelRecord>> {
    let input = std::fs::read_to_string(path)?;
    parse_labeled(&input)
}

/// Classifier that replays manual annotations.
///
/// Candidates whose normalized text (whitespace collapsed, case folded)
/// matches an annotated record get that record's label. The remaining
/// candidates go, in order and in one batch, to the fallback classifier.
pub struct LabeledClassifier {
    labels: HashMap<String, HeadingLevel>,
    fallback: Box<dyn HeadingClassifier>,
}

impl LabeledClassifier {
    /// Build from annotated records, falling back to the default rules.
    ///
    /// Records without a valid label are skipped. When the same text is
    /// labeled more than once, the last record wins.
    pub fn from_records(records: &[LabelRecord]) -> Self {
        Self::from_records_with_config(records, &Config::default())
    }

    /// Build from annotated records, falling back to rules tuned by `config`.
    pub fn from_records_with_config(records: &[LabelRecord], config: &Config) -> Self {
        let mut labels = HashMap::new();
        for record in records {
            match record.level() {
                Some(level) => {
                    labels.insert(heading_key(&record.text), level);
                }
                None => {
                    if !record.label.trim().is_empty() {
                        log::warn!(
                            "Ignoring invalid label {:?} for {:?}",
                            record.label,
                            record.text
                        );
                    }
                }
            }
        }

        Self {
            labels,
            fallback: Box::new(RuleClassifier::new(config)),
        }
    }

    /// Replace the fallback classifier.
    pub fn with_fallback(mut self, fallback: Box<dyn HeadingClassifier>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Number of distinct labeled texts.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Check if no labels were loaded.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl HeadingClassifier for LabeledClassifier {
    fn name(&self) -> &str {
        "labeled"
    }

    fn classify(&self, candidates: &[TextLine]) -> Result<Vec<HeadingLevel>> {
        let known: Vec<Option<HeadingLevel>> = candidates
            .iter()
            .map(|line| self.labels.get(&heading_key(&line.text)).copied())
            .collect();

        let unknown: Vec<TextLine> = candidates
            .iter()
            .zip(&known)
            .filter(|(_, level)| level.is_none())
            .map(|(line, _)| line.clone())
            .collect();

        let mut fallback_labels = if unknown.is_empty() {
            Vec::new()
        } else {
            let labels = self.fallback.classify(&unknown)?;
            if labels.len() != unknown.len() {
                return Err(crate::Error::LabelCount {
                    expected: unknown.len(),
                    actual: labels.len(),
                });
            }
            labels
        }
        .into_iter();

        Ok(known
            .into_iter()
            .map(|level| {
                level
                    .or_else(|| fallback_labels.next())
                    .unwrap_or(HeadingLevel::Other)
            })
            .collect())
    }
}
