//! Positioned text lines produced by the document reader.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in page space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Vertical centre.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<[f32; 4]> for BBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BBox> for [f32; 4] {
    fn from(bbox: BBox) -> Self {
        [bbox.x0, bbox.y0, bbox.x1, bbox.y1]
    }
}

/// One line (or line fragment) of text with its style and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LineRecord")]
pub struct TextLine {
    /// The text content
    pub text: String,
    /// Font size in points, rounded to two decimals
    pub font_size: f32,
    /// Font name (e.g., "Helvetica-Bold")
    pub font_name: String,
    /// Whether the font is bold
    pub bold: bool,
    /// Page number (1-indexed)
    pub page: u32,
    /// Bounding box on the page
    pub bbox: BBox,
}

impl TextLine {
    /// Create a new text line. Boldness is derived from the font name.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_name: impl Into<String>,
        page: u32,
        bbox: BBox,
    ) -> Self {
        let font_name = font_name.into();
        Self {
            text: text.into(),
            font_size: round_font_size(font_size),
            bold: is_bold_font(&font_name),
            font_name,
            page,
            bbox,
        }
    }

    /// Override the bold flag.
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Integer key for exact font size comparisons.
    pub fn font_key(&self) -> i32 {
        font_key(self.font_size)
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Wire form of a line record; `bold` may be omitted.
#[derive(Debug, Clone, Deserialize)]
struct LineRecord {
    text: String,
    font_size: f32,
    #[serde(default)]
    font_name: String,
    #[serde(default)]
    bold: Option<bool>,
    page: u32,
    bbox: BBox,
}

impl From<LineRecord> for TextLine {
    fn from(record: LineRecord) -> Self {
        let bold = record
            .bold
            .unwrap_or_else(|| is_bold_font(&record.font_name));
        Self {
            text: record.text,
            font_size: round_font_size(record.font_size),
            font_name: record.font_name,
            bold,
            page: record.page,
            bbox: record.bbox,
        }
    }
}

/// Check whether a font name denotes a bold face.
pub fn is_bold_font(font_name: &str) -> bool {
    font_name.to_lowercase().contains("bold")
}

/// Integer key of a font size at two-decimal precision.
pub fn font_key(size: f32) -> i32 {
    (size * 100.0).round() as i32
}

fn round_font_size(size: f32) -> f32 {
    (size * 100.0).round() / 100.0
}
