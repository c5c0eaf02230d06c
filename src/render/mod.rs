//! Rendering module for converting outlines to output formats.

mod json;
mod markdown;

pub(crate) use json::to_json_value;
pub use json::{to_json, JsonFormat};
pub use markdown::to_markdown;
