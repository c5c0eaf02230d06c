//! Options for reading line records.

/// Options for reading line records.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Only keep lines on pages up to this number (None = all pages)
    pub max_page: Option<u32>,
}

impl ReadOptions {
    /// Create new read options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip invalid records).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Only keep the first `pages` pages.
    pub fn with_max_page(mut self, pages: u32) -> Self {
        self.max_page = Some(pages);
        self
    }
}

/// Error handling mode while reading records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first invalid record
    #[default]
    Strict,
    /// Skip invalid records and continue
    Lenient,
}
