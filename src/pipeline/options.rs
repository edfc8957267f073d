//! Filtering options and configuration.

use crate::model::{FilterMode, DEFAULT_OUTPUT_NAME};

/// Options for a filtering run.
#[derive(Debug, Clone)]
pub struct FilterOptions {
    /// Which keyword policy decides the kept pages
    pub mode: FilterMode,

    /// Suggested file name reported for the filtered PDF
    pub output_name: String,
}

impl FilterOptions {
    /// Create new filter options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set filter mode.
    pub fn with_mode(mut self, mode: FilterMode) -> Self {
        self.mode = mode;
        self
    }

    /// Keep band pages only.
    pub fn band_only(self) -> Self {
        self.with_mode(FilterMode::BandOnly)
    }

    /// Keep orchestra pages only.
    pub fn orchestra_only(self) -> Self {
        self.with_mode(FilterMode::OrchestraOnly)
    }

    /// Set the reported output file name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::Both,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
        }
    }
}
