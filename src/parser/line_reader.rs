//! Reader for line records produced by an upstream document reader.
//!
//! Records are JSON objects of the form
//! `{"text", "font_size", "font_name", "bold"?, "page", "bbox": [x0, y0, x1, y1]}`,
//! stored either as one JSON array or as JSON Lines.

use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::TextLine;

use super::options::{ErrorMode, ReadOptions};

/// Reads and validates line records.
pub struct LineReader {
    input: String,
    options: ReadOptions,
}

impl LineReader {
    /// Open a record file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ReadOptions::default())
    }

    /// Open a record file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ReadOptions) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self { input, options })
    }

    /// Read records from a string.
    pub fn from_str_with_options(input: impl Into<String>, options: ReadOptions) -> Self {
        Self {
            input: input.into(),
            options,
        }
    }

    /// Read records from a reader.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ReadOptions) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Ok(Self { input, options })
    }

    /// Decode and validate all records.
    pub fn read(&self) -> Result<Vec<TextLine>> {
        let records = self.raw_records()?;

        let mut lines = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match decode_record(record) {
                Ok(line) => {
                    if self.options.max_page.is_some_and(|max| line.page > max) {
                        continue;
                    }
                    lines.push(line);
                }
                Err(reason) => {
                    if self.options.error_mode == ErrorMode::Strict {
                        return Err(Error::InvalidLine { index, reason });
                    }
                    log::warn!("Skipping line record #{}: {}", index, reason);
                }
            }
        }

        log::debug!("LineReader: {} valid records", lines.len());
        Ok(lines)
    }

    /// Split the input into raw JSON values.
    ///
    /// Input starting with `[` is one JSON array, anything else is JSON Lines.
    fn raw_records(&self) -> Result<Vec<RawRecord>> {
        let trimmed = self.input.trim_start();
        if trimmed.starts_with('[') {
            let values: Vec<Value> = serde_json::from_str(trimmed)?;
            return Ok(values.into_iter().map(RawRecord::Value).collect());
        }

        Ok(trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match serde_json::from_str::<Value>(line) {
                Ok(value) => RawRecord::Value(value),
                Err(e) => RawRecord::Malformed(e.to_string()),
            })
            .collect())
    }
}

enum RawRecord {
    Value(Value),
    Malformed(String),
}

fn decode_record(record: RawRecord) -> std::result::Result<TextLine, String> {
    let value = match record {
        RawRecord::Value(value) => value,
        RawRecord::Malformed(reason) => return Err(reason),
    };

    let line: TextLine = serde_json::from_value(value).map_err(|e| e.to_string())?;
    check_line(&line)?;
    Ok(line)
}

/// Check a line against the input contract.
pub fn check_line(line: &TextLine) -> std::result::Result<(), String> {
    if line.text.trim().is_empty() {
        return Err("empty text".to_string());
    }
    if !line.font_size.is_finite() || line.font_size <= 0.0 {
        return Err(format!("font size must be positive, got {}", line.font_size));
    }
    if line.page == 0 {
        return Err("page numbers start at 1".to_string());
    }

    let b = &line.bbox;
    if ![b.x0, b.y0, b.x1, b.y1].iter().all(|v| v.is_finite()) {
        return Err("bounding box has non-finite coordinates".to_string());
    }
    if b.x0 > b.x1 || b.y0 > b.y1 {
        return Err(format!(
            "inverted bounding box [{}, {}, {}, {}]",
            b.x0, b.y0, b.x1, b.y1
        ));
    }

    Ok(())
}
