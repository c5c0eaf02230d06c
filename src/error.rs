//! Error types for pdf-headings.

use std::io;
use thiserror::Error;

/// Result type alias for pdf-headings operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur around the outline pipeline.
///
/// The rule-based pipeline itself never fails; these errors come from the
/// surfaces around it: reading line records, loading configuration,
/// pluggable classifiers and serialization.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration value is out of its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A line record violates the input contract.
    #[error("Invalid line record #{index}: {reason}")]
    InvalidLine {
        /// Zero-based position of the record in its source
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A heading level label could not be parsed.
    #[error("Invalid heading level: {0:?}")]
    InvalidLevel(String),

    /// A pluggable classifier failed.
    #[error("Classifier '{name}' failed: {message}")]
    Classifier {
        /// Classifier name
        name: String,
        /// Failure description
        message: String,
    },

    /// A classifier returned a label sequence of the wrong length.
    #[error("Classifier returned {actual} labels for {expected} candidates")]
    LabelCount {
        /// Number of candidates handed to the classifier
        expected: usize,
        /// Number of labels it returned
        actual: usize,
    },

    /// Error during rendering (JSON, Markdown).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
