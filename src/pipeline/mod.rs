//! The outline pipeline.
//!
//! Stages run strictly in order, each producing a new sequence:
//!
//! ```text
//! raw fragments -> LineMerger -> CandidateSelector -> HeadingClassifier -> HierarchyBuilder
//! ```

mod classify;
mod hierarchy;
mod merge;
mod order;
mod percentile;
mod select;
mod stats;
mod text;

pub use classify::{
    apply_classifier, ClassifiedLine, HeadingClassifier, RuleClassifier, TextClassifier,
};
pub use hierarchy::HierarchyBuilder;
pub use merge::LineMerger;
pub use order::{descending_size, reading_order, title_order};
pub use percentile::percentile;
pub use select::CandidateSelector;
pub use stats::PipelineStats;
pub use text::{heading_key, is_numeric, normalize_whitespace, RepetitionKey};
