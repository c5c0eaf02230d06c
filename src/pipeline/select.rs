//! Narrowing merged lines down to heading candidates.
//!
//! Three heuristics run in a fixed order:
//!
//! 1. Running headers and footers are removed. They must go first so that
//!    boilerplate does not skew the font-size percentile.
//! 2. Long lines (body paragraphs) are dropped.
//! 3. Only prominent font sizes survive, either globally (percentile) or
//!    within their own page (top-K distinct sizes).

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::config::Config;
use crate::model::TextLine;

use super::order::descending_size;
use super::percentile::percentile;
use super::stats::PipelineStats;
use super::text::RepetitionKey;

/// Applies the repetition, length and prominence heuristics.
#[derive(Debug, Clone)]
pub struct CandidateSelector {
    header_footer_frac: f64,
    header_footer_band: f64,
    min_repetition_pages: usize,
    max_words: usize,
    max_chars: usize,
    global_font_pct: f64,
    per_page_top_k: usize,
    keys: RepetitionKey,
}

impl CandidateSelector {
    /// Create a selector from the config thresholds.
    pub fn new(config: &Config) -> Self {
        Self {
            header_footer_frac: config.header_footer_frac,
            header_footer_band: config.header_footer_band,
            min_repetition_pages: config.min_repetition_pages,
            max_words: config.max_words,
            max_chars: config.max_chars,
            global_font_pct: config.global_font_pct,
            per_page_top_k: config.per_page_top_k,
            keys: RepetitionKey::new(),
        }
    }

    /// Select heading candidates from merged lines, preserving their order.
    pub fn select(&self, lines: &[TextLine]) -> Vec<TextLine> {
        self.select_with_stats(lines, &mut PipelineStats::default())
    }

    /// Like [`select`](Self::select), recording stage counts in `stats`.
    pub fn select_with_stats(&self, lines: &[TextLine], stats: &mut PipelineStats) -> Vec<TextLine> {
        let repeating = self.repeating_keys(lines);
        stats.repeating_keys = repeating.len();

        let lines = self.remove_repeating(lines, &repeating);
        stats.after_repetition = lines.len();
        if lines.is_empty() {
            return lines;
        }

        let lines = self.filter_length(lines);
        stats.after_length = lines.len();
        if lines.is_empty() {
            return lines;
        }

        let candidates = self.filter_prominence(&lines);
        stats.candidates = candidates.len();

        log::debug!(
            "CandidateSelector: {} repeating keys, {} after length, {} candidates",
            repeating.len(),
            stats.after_length,
            candidates.len()
        );

        candidates
    }

    /// Repetition keys of running headers and footers.
    ///
    /// Page height is estimated from the lowest line on each page, and the
    /// page count is the number of distinct pages carrying any line.
    pub fn repeating_keys(&self, lines: &[TextLine]) -> BTreeSet<String> {
        let mut page_heights: BTreeMap<u32, f32> = BTreeMap::new();
        for line in lines {
            let height = page_heights.entry(line.page).or_insert(0.0);
            *height = height.max(line.bbox.y1);
        }

        let total_pages = page_heights.len();
        if total_pages == 0 || total_pages < self.min_repetition_pages {
            return BTreeSet::new();
        }

        let mut pages_by_key: HashMap<String, HashSet<u32>> = HashMap::new();
        for line in lines {
            let page_height = page_heights[&line.page];
            if self.in_band(line, page_height) {
                pages_by_key
                    .entry(self.keys.key(&line.text))
                    .or_default()
                    .insert(line.page);
            }
        }

        pages_by_key
            .into_iter()
            .filter(|(_, pages)| pages.len() as f64 / total_pages as f64 >= self.header_footer_frac)
            .map(|(key, _)| key)
            .collect()
    }

    /// Drop every line whose repetition key is in `repeating`.
    pub fn remove_repeating(&self, lines: &[TextLine], repeating: &BTreeSet<String>) -> Vec<TextLine> {
        if repeating.is_empty() {
            return lines.to_vec();
        }
        lines
            .iter()
            .filter(|line| !repeating.contains(&self.keys.key(&line.text)))
            .cloned()
            .collect()
    }

    /// Drop lines too long to be headings.
    pub fn filter_length(&self, lines: Vec<TextLine>) -> Vec<TextLine> {
        lines
            .into_iter()
            .filter(|line| line.word_count() <= self.max_words && line.char_count() <= self.max_chars)
            .collect()
    }

    /// Keep lines set in a globally or locally prominent font size.
    ///
    /// The output is always a subset of `lines`, in the same order.
    pub fn filter_prominence(&self, lines: &[TextLine]) -> Vec<TextLine> {
        let sizes: Vec<f32> = lines.iter().map(|line| line.font_size).collect();
        let Some(threshold) = percentile(&sizes, self.global_font_pct) else {
            return Vec::new();
        };

        let top_sizes = self.page_top_sizes(lines);
        log::debug!(
            "Prominence: global threshold {:.2}pt over {} lines",
            threshold,
            lines.len()
        );

        lines
            .iter()
            .filter(|line| {
                f64::from(line.font_size) >= threshold
                    || top_sizes
                        .get(&line.page)
                        .is_some_and(|sizes| sizes.contains(&line.font_key()))
            })
            .cloned()
            .collect()
    }

    /// The `per_page_top_k` largest distinct font sizes of each page.
    fn page_top_sizes(&self, lines: &[TextLine]) -> HashMap<u32, HashSet<i32>> {
        let mut page_sizes: HashMap<u32, BTreeSet<i32>> = HashMap::new();
        for line in lines {
            page_sizes.entry(line.page).or_default().insert(line.font_key());
        }

        page_sizes
            .into_iter()
            .map(|(page, sizes)| {
                let mut sizes: Vec<i32> = sizes.into_iter().collect();
                sizes.sort_by(descending_size);
                sizes.truncate(self.per_page_top_k);
                (page, sizes.into_iter().collect())
            })
            .collect()
    }

    /// Whether the line's vertical centre lies in the top or bottom band.
    fn in_band(&self, line: &TextLine, page_height: f32) -> bool {
        let center = f64::from(line.bbox.center_y());
        let height = f64::from(page_height);
        center < height * self.header_footer_band
            || center > height * (1.0 - self.header_footer_band)
    }
}

impl Default for CandidateSelector {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn line(text: &str, page: u32, y0: f32, size: f32) -> TextLine {
        TextLine::new(text, size, "Arial", page, BBox::new(72.0, y0, 400.0, y0 + size))
    }

    /// A page whose last line sits at y = 780, so the bands are
    /// roughly y < 93.6 and y > 686.4.
    fn page(number: u32, heading: &str, footer: &str) -> Vec<TextLine> {
        vec![
            line(heading, number, 120.0, 16.0),
            line("Body text that explains the section.", number, 200.0, 11.0),
            line(footer, number, 768.0, 12.0),
        ]
    }

    #[test]
    fn test_repeating_footer_detected() {
        let selector = CandidateSelector::default();
        let mut lines = Vec::new();
        for n in 1..=4 {
            lines.extend(page(n, &format!("Chapter {}", n * 10), &format!("Page {}", n)));
        }

        let keys = selector.repeating_keys(&lines);
        assert!(keys.contains("page #"));
        assert!(!keys.contains("chapter #"));
    }

    #[test]
    fn test_repeating_key_removed_everywhere() {
        let selector = CandidateSelector::default();
        let mut lines = Vec::new();
        for n in 1..=3 {
            lines.extend(page(n, "Intro", &format!("Page {}", n)));
        }
        // Same key outside the band must go too.
        lines.push(line("Page 9", 2, 400.0, 16.0));

        let keys = selector.repeating_keys(&lines);
        let kept = selector.remove_repeating(&lines, &keys);
        assert!(kept.iter().all(|l| !l.text.starts_with("Page")));
        assert_eq!(kept.len(), 6);
    }

    #[test]
    fn test_rare_band_text_kept() {
        let selector = CandidateSelector::default();
        let mut lines = Vec::new();
        for n in 1..=6 {
            let footer = if n == 1 { "Draft" } else { "Confidential" };
            lines.extend(page(n, "Intro", footer));
        }

        let keys = selector.repeating_keys(&lines);
        assert!(keys.contains("confidential"));
        assert!(!keys.contains("draft"));
    }

    #[test]
    fn test_min_repetition_pages_guard() {
        let config = Config::default().with_min_repetition_pages(3);
        let selector = CandidateSelector::new(&config);
        let mut lines = page(1, "Intro", "Page 1");
        lines.extend(page(2, "Scope", "Page 2"));

        assert!(selector.repeating_keys(&lines).is_empty());
        assert!(!CandidateSelector::default().repeating_keys(&lines).is_empty());
    }

    #[test]
    fn test_length_filter() {
        let selector = CandidateSelector::new(&Config::default().with_length_limits(3, 20));
        let lines = vec![
            line("Short heading", 1, 10.0, 12.0),
            line("Four words are here", 1, 30.0, 12.0),
            line("Averyveryverylongsingleword", 1, 50.0, 12.0),
        ];

        let kept = selector.filter_length(lines);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Short heading");
    }

    #[test]
    fn test_prominence_global_threshold() {
        let selector = CandidateSelector::new(&Config::default().with_per_page_top_k(1));
        let lines = vec![
            line("Title", 1, 10.0, 24.0),
            line("body", 1, 50.0, 10.0),
            line("Section", 2, 10.0, 18.0),
            line("body", 2, 50.0, 10.0),
            line("body", 2, 90.0, 10.0),
        ];

        // sizes 10,10,10,18,24 -> p75 = 18; top-1 per page: {24}, {18}
        let kept = selector.filter_prominence(&lines);
        let texts: Vec<&str> = kept.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Title", "Section"]);
    }

    #[test]
    fn test_prominence_page_top_k() {
        let selector = CandidateSelector::new(&Config::default().with_per_page_top_k(2));
        let lines = vec![
            line("Big", 1, 10.0, 30.0),
            line("Big too", 1, 20.0, 30.0),
            line("Big three", 1, 30.0, 30.0),
            line("Local heading", 2, 10.0, 12.0),
            line("Local small", 2, 20.0, 9.0),
            line("Local tiny", 2, 30.0, 8.0),
        ];

        // p75 = 30; page 2 top-2 sizes are 12 and 9.
        let kept = selector.filter_prominence(&lines);
        let texts: Vec<&str> = kept.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["Big", "Big too", "Big three", "Local heading", "Local small"]
        );
    }

    #[test]
    fn test_prominence_is_subset() {
        let selector = CandidateSelector::default();
        let lines: Vec<TextLine> = (0..40)
            .map(|i| line(&format!("line {}", i), 1 + i / 10, (i % 10) as f32 * 60.0, 8.0 + (i % 7) as f32))
            .collect();

        let kept = selector.filter_prominence(&lines);
        assert!(kept.len() <= lines.len());
        assert!(kept.iter().all(|k| lines.contains(k)));
    }

    #[test]
    fn test_select_empty_after_length() {
        let selector = CandidateSelector::new(&Config::default().with_length_limits(1, 250));
        let lines = vec![line("two words", 1, 10.0, 12.0)];

        let mut stats = PipelineStats::default();
        assert!(selector.select_with_stats(&lines, &mut stats).is_empty());
        assert_eq!(stats.after_repetition, 1);
        assert_eq!(stats.after_length, 0);
        assert_eq!(stats.candidates, 0);
    }
}
