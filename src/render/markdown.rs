//! Markdown rendering for outlines.
//!
//! The title becomes a level-1 heading and the outline a nested bullet
//! list, indented two spaces per level below `H1`:
//!
//! ```text
//! # Annual Report
//!
//! - 1. Introduction (p. 1)
//!   - 1.1 Background (p. 2)
//! ```

use crate::model::Hierarchy;

/// Convert a hierarchy to Markdown.
pub fn to_markdown(hierarchy: &Hierarchy) -> String {
    let mut output = format!("# {}\n", escape_markdown(&hierarchy.title));

    if !hierarchy.outline.is_empty() {
        output.push('\n');
    }

    for entry in &hierarchy.outline {
        let depth = entry.level.number().unwrap_or(1).saturating_sub(1) as usize;
        output.push_str(&"  ".repeat(depth));
        output.push_str("- ");
        output.push_str(&escape_markdown(&entry.text));
        output.push_str(&format!(" (p. {})\n", entry.page));
    }

    output
}

/// Escape characters that would change inline Markdown formatting.
fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
