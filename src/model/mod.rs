//! Data model shared by the pipeline stages.
//!
//! Lines come in from the document reader as [`TextLine`]s; the pipeline
//! hands back a [`Hierarchy`] of [`OutlineEntry`] values.

mod line;
mod outline;

pub use line::{font_key, is_bold_font, BBox, TextLine};
pub use outline::{HeadingLevel, Hierarchy, OutlineEntry, UNTITLED};
