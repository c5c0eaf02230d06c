//! Heading levels and the document outline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Title used when no title line can be found.
pub const UNTITLED: &str = "Untitled";

/// Heading level of a line: `H1`, `H2`, ... or `O` for non-headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HeadingLevel {
    /// A heading at the given level (1 = top level)
    Heading(u8),
    /// Not a heading
    Other,
}

impl HeadingLevel {
    /// Top-level heading.
    pub const H1: HeadingLevel = HeadingLevel::Heading(1);
    /// Second-level heading.
    pub const H2: HeadingLevel = HeadingLevel::Heading(2);
    /// Third-level heading.
    pub const H3: HeadingLevel = HeadingLevel::Heading(3);
    /// Fourth-level heading.
    pub const H4: HeadingLevel = HeadingLevel::Heading(4);

    /// Heading level for a zero-based nesting depth (depth 0 is `H1`).
    pub fn from_depth(depth: usize) -> Self {
        let level = depth.saturating_add(1).min(u8::MAX as usize);
        HeadingLevel::Heading(level as u8)
    }

    /// Whether this level denotes a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, HeadingLevel::Heading(_))
    }

    /// Numeric level (1 for `H1`), or `None` for `O`.
    pub fn number(&self) -> Option<u8> {
        match self {
            HeadingLevel::Heading(n) => Some(*n),
            HeadingLevel::Other => None,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeadingLevel::Heading(n) => write!(f, "H{}", n),
            HeadingLevel::Other => f.write_str("O"),
        }
    }
}

impl FromStr for HeadingLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("o") {
            return Ok(HeadingLevel::Other);
        }

        s.strip_prefix(['H', 'h'])
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| *n >= 1)
            .map(HeadingLevel::Heading)
            .ok_or_else(|| Error::InvalidLevel(s.to_string()))
    }
}

impl TryFrom<String> for HeadingLevel {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HeadingLevel> for String {
    fn from(level: HeadingLevel) -> Self {
        level.to_string()
    }
}

/// A single heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Whitespace-normalized heading text
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}

/// Document title plus its ordered heading outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    /// Document title
    pub title: String,
    /// Headings in reading order
    pub outline: Vec<OutlineEntry>,
}

impl Hierarchy {
    /// Hierarchy of a document with no usable text.
    pub fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            outline: Vec::new(),
        }
    }

    /// Check if the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.outline.is_empty()
    }

    /// Number of outline entries.
    pub fn len(&self) -> usize {
        self.outline.len()
    }

    /// Entries at the given level.
    pub fn entries_at(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.outline.iter().filter(move |e| e.level == level)
    }
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::untitled()
    }
}
