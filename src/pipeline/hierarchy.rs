//! Title detection and outline assembly.

use std::collections::HashSet;

use crate::model::{Hierarchy, OutlineEntry, TextLine, UNTITLED};

use super::classify::ClassifiedLine;
use super::order::title_order;
use super::text::{heading_key, normalize_whitespace};

/// Builds the final title + outline from classified headings.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Pick the title: the largest, then topmost, line on page 1.
    pub fn detect_title(&self, lines: &[TextLine]) -> String {
        lines
            .iter()
            .filter(|line| line.page == 1)
            .min_by(|a, b| title_order(a, b))
            .map(|line| normalize_whitespace(&line.text))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Assemble the hierarchy.
    ///
    /// `lines` are all merged lines of the document (used for the title);
    /// `headings` are the classified candidates in reading order.
    pub fn build(&self, lines: &[TextLine], headings: &[ClassifiedLine]) -> Hierarchy {
        let title = self.detect_title(lines);
        let title_key = title.to_lowercase();

        let mut seen: HashSet<(String, u32)> = HashSet::new();
        let mut outline = Vec::new();

        for heading in headings {
            let text = normalize_whitespace(&heading.line.text);
            if text.is_empty() {
                continue;
            }

            let key = heading_key(&text);
            if key == title_key {
                continue;
            }
            if !seen.insert((key, heading.line.page)) {
                continue;
            }

            outline.push(OutlineEntry::new(heading.level, text, heading.line.page));
        }

        log::debug!(
            "HierarchyBuilder: title {:?}, {} of {} headings kept",
            title,
            outline.len(),
            headings.len()
        );

        Hierarchy { title, outline }
    }
}
