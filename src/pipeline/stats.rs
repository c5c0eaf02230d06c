//! Per-document pipeline statistics.

use serde::{Deserialize, Serialize};

/// How many lines survived each pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStats {
    /// Raw fragments handed to the pipeline
    pub raw_lines: usize,

    /// Number of distinct pages carrying text
    pub page_count: usize,

    /// Lines after fragment merging
    pub merged_lines: usize,

    /// Number of running header/footer keys detected
    pub repeating_keys: usize,

    /// Lines left after header/footer removal
    pub after_repetition: usize,

    /// Lines left after the length filter
    pub after_length: usize,

    /// Heading candidates after the prominence filter
    pub candidates: usize,

    /// Candidates the classifier accepted as headings
    pub classified: usize,

    /// Entries in the final outline
    pub outline_entries: usize,
}

impl PipelineStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of merged lines that ended up in the outline.
    pub fn outline_ratio(&self) -> f64 {
        if self.merged_lines == 0 {
            0.0
        } else {
            self.outline_entries as f64 / self.merged_lines as f64
        }
    }
}
