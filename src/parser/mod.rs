//! Line record parsing.

mod line_reader;
mod options;

pub use line_reader::{check_line, LineReader};
pub use options::{ErrorMode, ReadOptions};
