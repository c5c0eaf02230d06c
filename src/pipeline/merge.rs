//! Joining line fragments that belong to one visual line.
//!
//! Readers often emit a single visual line as several fragments (one per
//! span or per font change). Headings split this way would otherwise be
//! classified piecemeal.

use crate::config::Config;
use crate::model::TextLine;

use super::order::reading_order;

/// Merges adjacent fragments on the same page, baseline and style.
#[derive(Debug, Clone)]
pub struct LineMerger {
    y_tolerance: f32,
}

impl LineMerger {
    /// Create a merger using the config's vertical tolerance.
    pub fn new(config: &Config) -> Self {
        Self {
            y_tolerance: config.line_merge_y_tolerance,
        }
    }

    /// Sort fragments into reading order and merge same-line neighbours.
    ///
    /// The output is in reading order. Each output line keeps the style of
    /// the first fragment it absorbed.
    pub fn merge(&self, fragments: &[TextLine]) -> Vec<TextLine> {
        let mut sorted = fragments.to_vec();
        sorted.sort_by(reading_order);

        let mut sorted = sorted.into_iter();
        let Some(mut current) = sorted.next() else {
            return Vec::new();
        };

        let mut merged = Vec::new();
        for fragment in sorted {
            if self.same_visual_line(&current, &fragment) {
                current.text.push(' ');
                current.text.push_str(&fragment.text);
                current.bbox = current.bbox.union(&fragment.bbox);
            } else {
                merged.push(std::mem::replace(&mut current, fragment));
            }
        }
        merged.push(current);

        log::debug!(
            "LineMerger: {} fragments -> {} lines",
            fragments.len(),
            merged.len()
        );

        merged
    }

    /// Whether `fragment` continues the line accumulated in `current`.
    fn same_visual_line(&self, current: &TextLine, fragment: &TextLine) -> bool {
        current.page == fragment.page
            && (current.bbox.y0 - fragment.bbox.y0).abs() < self.y_tolerance
            && current.font_key() == fragment.font_key()
            && current.bold == fragment.bold
    }
}

impl Default for LineMerger {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn fragment(text: &str, page: u32, x0: f32, y0: f32, size: f32, font: &str) -> TextLine {
        let width = text.len() as f32 * size * 0.5;
        TextLine::new(text, size, font, page, BBox::new(x0, y0, x0 + width, y0 + size))
    }

    #[test]
    fn test_empty_input() {
        assert!(LineMerger::default().merge(&[]).is_empty());
    }

    #[test]
    fn test_merges_fragments_on_one_line() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("Overview", 1, 200.0, 101.5, 16.0, "Arial-Bold"),
            fragment("Project", 1, 100.0, 100.0, 16.0, "Arial-Bold"),
        ];

        let merged = merger.merge(&lines);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "Project Overview");
        assert_eq!(merged[0].bbox.x0, 100.0);
        assert_eq!(merged[0].bbox.y0, 100.0);
        assert_eq!(merged[0].bbox.y1, 117.5);
        assert!(merged[0].bold);
    }

    #[test]
    fn test_style_or_position_change_splits() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("Heading", 1, 50.0, 100.0, 16.0, "Arial-Bold"),
            fragment("regular", 1, 150.0, 100.0, 16.0, "Arial"),
            fragment("smaller", 1, 250.0, 100.0, 12.0, "Arial"),
            fragment("next row", 1, 50.0, 104.0, 12.0, "Arial"),
            fragment("next page", 2, 50.0, 100.0, 12.0, "Arial"),
        ];

        let merged = merger.merge(&lines);
        let texts: Vec<&str> = merged.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Heading", "regular", "smaller", "next row", "next page"]
        );
    }

    #[test]
    fn test_tolerance_is_measured_from_accumulated_top() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("a", 1, 10.0, 100.0, 10.0, "Arial"),
            fragment("b", 1, 20.0, 103.0, 10.0, "Arial"),
            fragment("c", 1, 30.0, 106.0, 10.0, "Arial"),
        ];

        let merged = merger.merge(&lines);
        let texts: Vec<&str> = merged.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a b", "c"]);
    }

    #[test]
    fn test_output_in_reading_order() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("third", 2, 10.0, 50.0, 10.0, "Arial"),
            fragment("second", 1, 10.0, 300.0, 10.0, "Arial"),
            fragment("first", 1, 10.0, 50.0, 10.0, "Arial"),
        ];

        let merged = merger.merge(&lines);
        let texts: Vec<&str> = merged.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("Annual", 1, 72.0, 80.0, 20.0, "Arial-Bold"),
            fragment("Report", 1, 150.0, 81.0, 20.0, "Arial-Bold"),
            fragment("Summary of the", 1, 72.0, 140.0, 11.0, "Arial"),
            fragment("fiscal year", 1, 170.0, 140.5, 11.0, "Arial"),
            fragment("1. Scope", 2, 72.0, 80.0, 16.0, "Arial-Bold"),
        ];

        let once = merger.merge(&lines);
        let twice = merger.merge(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn test_second_pass_only_reorders_widened_lines() {
        let merger = LineMerger::default();
        let lines = vec![
            fragment("D", 1, 30.0, 100.0, 12.0, "Arial"),
            fragment("A", 1, 50.0, 100.0, 10.0, "Arial"),
            fragment("B", 1, 10.0, 101.0, 10.0, "Arial"),
        ];

        let once = merger.merge(&lines);
        let texts: Vec<&str> = once.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["D", "A B"]);
        assert_eq!(once[1].bbox.x0, 10.0);

        let twice = merger.merge(&once);
        let texts: Vec<&str> = twice.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["A B", "D"]);
        assert_eq!(twice[0], once[1]);
        assert_eq!(twice[1], once[0]);
    }
}
