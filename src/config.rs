//! Pipeline thresholds and configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable thresholds shared by every pipeline stage.
///
/// A `Config` is never mutated by the pipeline; stages borrow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fraction of pages a band line must repeat on to count as a header/footer
    pub header_footer_frac: f64,

    /// Height of the top and bottom page bands, as a fraction of page height
    pub header_footer_band: f64,

    /// Percentile (0-100) of font sizes used as the global prominence threshold
    pub global_font_pct: f64,

    /// Number of largest distinct font sizes kept per page
    pub per_page_top_k: usize,

    /// Lines with more words than this are treated as body text
    pub max_words: usize,

    /// Lines with more characters than this are treated as body text
    pub max_chars: usize,

    /// Maximum y0 distance for two fragments to be on one visual line
    pub line_merge_y_tolerance: f32,

    /// Number of distinct font sizes mapped to style levels (H1, H2, ...)
    pub style_levels: usize,

    /// Style levels only apply to texts with fewer words than this
    pub style_max_words: usize,

    /// Skip header/footer detection for documents with fewer pages (0 = never skip)
    pub min_repetition_pages: usize,
}

impl Config {
    /// Create a config with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) config from JSON. Missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the header/footer page fraction.
    pub fn with_header_footer_frac(mut self, frac: f64) -> Self {
        self.header_footer_frac = frac;
        self
    }

    /// Set the header/footer band height fraction.
    pub fn with_header_footer_band(mut self, band: f64) -> Self {
        self.header_footer_band = band;
        self
    }

    /// Set the global font-size percentile.
    pub fn with_global_font_pct(mut self, pct: f64) -> Self {
        self.global_font_pct = pct;
        self
    }

    /// Set how many distinct sizes per page count as prominent.
    pub fn with_per_page_top_k(mut self, k: usize) -> Self {
        self.per_page_top_k = k;
        self
    }

    /// Set word and character limits for heading candidates.
    pub fn with_length_limits(mut self, max_words: usize, max_chars: usize) -> Self {
        self.max_words = max_words;
        self.max_chars = max_chars;
        self
    }

    /// Set the line merge vertical tolerance.
    pub fn with_line_merge_y_tolerance(mut self, tolerance: f32) -> Self {
        self.line_merge_y_tolerance = tolerance;
        self
    }

    /// Set how many font sizes map to style levels.
    pub fn with_style_levels(mut self, levels: usize) -> Self {
        self.style_levels = levels;
        self
    }

    /// Set the word limit for style-based headings.
    pub fn with_style_max_words(mut self, words: usize) -> Self {
        self.style_max_words = words;
        self
    }

    /// Set the minimum page count for header/footer detection.
    pub fn with_min_repetition_pages(mut self, pages: usize) -> Self {
        self.min_repetition_pages = pages;
        self
    }

    /// Check that every threshold is within its meaningful range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.header_footer_frac) {
            return Err(Error::InvalidConfig(format!(
                "header_footer_frac must be within 0..=1, got {}",
                self.header_footer_frac
            )));
        }
        if !(0.0..=1.0).contains(&self.header_footer_band) {
            return Err(Error::InvalidConfig(format!(
                "header_footer_band must be within 0..=1, got {}",
                self.header_footer_band
            )));
        }
        if !(0.0..=100.0).contains(&self.global_font_pct) {
            return Err(Error::InvalidConfig(format!(
                "global_font_pct must be within 0..=100, got {}",
                self.global_font_pct
            )));
        }
        if self.line_merge_y_tolerance.is_nan() || self.line_merge_y_tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "line_merge_y_tolerance must be non-negative, got {}",
                self.line_merge_y_tolerance
            )));
        }

        let counts = [
            ("per_page_top_k", self.per_page_top_k),
            ("max_words", self.max_words),
            ("max_chars", self.max_chars),
            ("style_levels", self.style_levels),
            ("style_max_words", self.style_max_words),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{} must be at least 1", name)));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_footer_frac: 0.35,
            header_footer_band: 0.12,
            global_font_pct: 75.0,
            per_page_top_k: 4,
            max_words: 30,
            max_chars: 250,
            line_merge_y_tolerance: 4.0,
            style_levels: 3,
            style_max_words: 20,
            min_repetition_pages: 0,
        }
    }
}
