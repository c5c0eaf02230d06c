//! # pdf-headings
//!
//! Heading outline extraction from positioned PDF text lines.
//!
//! An upstream reader turns each page into text fragments carrying font
//! size, font name, page number and bounding box. This library turns those
//! fragments into a document title plus an ordered outline of `H1`, `H2`,
//! ... headings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_headings::{process, read_lines_file, render, JsonFormat};
//!
//! fn main() -> pdf_headings::Result<()> {
//!     let lines = read_lines_file("report.lines.json")?;
//!     let hierarchy = process(&lines);
//!
//!     println!("{}", render::to_json(&hierarchy, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Line merging**: fragments on the same visual line are joined
//! - **Candidate selection**: running headers/footers, long lines and
//!   non-prominent fonts are dropped
//! - **Classification**: section numbering and font size rank decide levels,
//!   or a custom [`HeadingClassifier`]
//! - **Hierarchy**: title detection, title exclusion and de-duplication

pub mod config;
pub mod error;
pub mod label;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;

pub use config::Config;
pub use error::{Error, Result};
pub use label::{LabelRecord, LabeledClassifier};
pub use model::{BBox, HeadingLevel, Hierarchy, OutlineEntry, TextLine, UNTITLED};
pub use parser::{ErrorMode, LineReader, ReadOptions};
pub use pipeline::{
    HeadingClassifier, HierarchyBuilder, LineMerger, PipelineStats, RuleClassifier,
    TextClassifier,
};
pub use render::JsonFormat;

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use pipeline::{apply_classifier, CandidateSelector, ClassifiedLine};

/// Run the full pipeline with the default configuration.
///
/// # Example
///
/// ```
/// use pdf_headings::{process, BBox, TextLine, UNTITLED};
///
/// let hierarchy = process(&[]);
/// assert_eq!(hierarchy.title, UNTITLED);
/// assert!(hierarchy.outline.is_empty());
///
/// let lines = vec![TextLine::new("Annual Report", 24.0, "Arial-Bold", 1, BBox::new(72.0, 60.0, 400.0, 84.0))];
/// assert_eq!(process(&lines).title, "Annual Report");
/// ```
pub fn process(lines: &[TextLine]) -> Hierarchy {
    process_with_config(lines, &Config::default())
}

/// Run the full pipeline with the rule-based classifier.
///
/// Never fails: malformed documents degrade to an empty outline, and a
/// document without page 1 text is titled [`UNTITLED`].
pub fn process_with_config(lines: &[TextLine], config: &Config) -> Hierarchy {
    let merged = LineMerger::new(config).merge(lines);
    let candidates = CandidateSelector::new(config).select(&merged);
    let headings = RuleClassifier::new(config).classify_lines(candidates);
    HierarchyBuilder::new().build(&merged, &headings)
}

/// Read line records from a JSON or JSON Lines file.
///
/// # Example
///
/// ```no_run
/// use pdf_headings::read_lines_file;
///
/// let lines = read_lines_file("report.lines.jsonl").unwrap();
/// println!("{} lines", lines.len());
/// ```
pub fn read_lines_file<P: AsRef<Path>>(path: P) -> Result<Vec<TextLine>> {
    LineReader::open(path)?.read()
}

/// Parse line records from a string.
pub fn parse_lines(input: &str) -> Result<Vec<TextLine>> {
    LineReader::from_str_with_options(input, ReadOptions::default()).read()
}

/// Builder for running the outline pipeline.
///
/// # Example
///
/// ```no_run
/// use pdf_headings::{read_lines_file, Config, OutlineExtractor};
///
/// let extractor = OutlineExtractor::new()
///     .with_config(Config::new().with_per_page_top_k(6))
///     .sequential();
///
/// let lines = read_lines_file("report.lines.json")?;
/// let (hierarchy, stats) = extractor.extract_with_stats(&lines)?;
/// println!("{}: {} headings from {} lines", hierarchy.title, hierarchy.len(), stats.merged_lines);
/// # Ok::<(), pdf_headings::Error>(())
/// ```
pub struct OutlineExtractor {
    config: Config,
    merger: LineMerger,
    selector: CandidateSelector,
    classifier: Arc<dyn HeadingClassifier>,
    builder: HierarchyBuilder,
    custom_classifier: bool,
    parallel: bool,
}

impl OutlineExtractor {
    /// Create an extractor with the default configuration and rules.
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            merger: LineMerger::new(&config),
            selector: CandidateSelector::new(&config),
            classifier: Arc::new(RuleClassifier::new(&config)),
            builder: HierarchyBuilder::new(),
            config,
            custom_classifier: false,
            parallel: true,
        }
    }

    /// Use a custom configuration.
    ///
    /// Rebuilds the default rule classifier unless a custom classifier
    /// was already installed.
    pub fn with_config(mut self, config: Config) -> Self {
        self.merger = LineMerger::new(&config);
        self.selector = CandidateSelector::new(&config);
        if !self.custom_classifier {
            self.classifier = Arc::new(RuleClassifier::new(&config));
        }
        self.config = config;
        self
    }

    /// Use a custom heading classifier.
    pub fn with_classifier<C: HeadingClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Arc::new(classifier);
        self.custom_classifier = true;
        self
    }

    /// Use a shared heading classifier.
    pub fn with_shared_classifier(mut self, classifier: Arc<dyn HeadingClassifier>) -> Self {
        self.classifier = classifier;
        self.custom_classifier = true;
        self
    }

    /// Disable parallel processing in [`extract_many`](Self::extract_many).
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Get the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the classifier name.
    pub fn classifier_name(&self) -> &str {
        self.classifier.name()
    }

    /// Extract the title and outline of one document.
    pub fn extract(&self, lines: &[TextLine]) -> Result<Hierarchy> {
        self.extract_with_stats(lines).map(|(hierarchy, _)| hierarchy)
    }

    /// Extract the title and outline along with per-stage counts.
    pub fn extract_with_stats(&self, lines: &[TextLine]) -> Result<(Hierarchy, PipelineStats)> {
        let mut stats = PipelineStats::new();
        stats.raw_lines = lines.len();
        stats.page_count = lines.iter().map(|l| l.page).collect::<BTreeSet<_>>().len();

        let merged = self.merger.merge(lines);
        stats.merged_lines = merged.len();

        let candidates = self.selector.select_with_stats(&merged, &mut stats);
        let headings: Vec<ClassifiedLine> =
            apply_classifier(self.classifier.as_ref(), candidates).map_err(|e| match e {
                Error::LabelCount { .. } | Error::Classifier { .. } => e,
                other => Error::Classifier {
                    name: self.classifier.name().to_string(),
                    message: other.to_string(),
                },
            })?;
        stats.classified = headings.len();

        let hierarchy = self.builder.build(&merged, &headings);
        stats.outline_entries = hierarchy.len();

        log::debug!(
            "OutlineExtractor[{}]: {} raw lines -> {} outline entries",
            self.classifier.name(),
            stats.raw_lines,
            stats.outline_entries
        );

        Ok((hierarchy, stats))
    }

    /// Extract many documents, in parallel unless [`sequential`](Self::sequential).
    ///
    /// Results are returned in input order; one failing document does not
    /// affect the others.
    pub fn extract_many(&self, documents: &[Vec<TextLine>]) -> Vec<Result<Hierarchy>> {
        if self.parallel {
            documents.par_iter().map(|lines| self.extract(lines)).collect()
        } else {
            documents.iter().map(|lines| self.extract(lines)).collect()
        }
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}
