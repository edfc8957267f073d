//! Run summary presented to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FilterMode, RunTally};
use crate::error::{Error, Result};

/// Conventional file name for the filtered PDF.
pub const DEFAULT_OUTPUT_NAME: &str = "band_orchestra_students.pdf";

/// Message shown when a run keeps no pages.
pub const NO_MATCHES_MESSAGE: &str = "No students found with band or orchestra in their schedule.";

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Structured summary of one filtering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterReport {
    /// Filter mode the run used
    pub mode: FilterMode,

    /// Pages scanned in the source document
    pub total_pages: u32,

    /// Counters and kept pages
    pub tally: RunTally,

    /// Suggested file name for the filtered PDF
    pub output_name: String,

    /// When the run finished
    pub generated_at: DateTime<Utc>,
}

impl FilterReport {
    /// Create a report for a finished run.
    pub fn new(mode: FilterMode, total_pages: u32, tally: RunTally) -> Self {
        Self {
            mode,
            total_pages,
            tally,
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Override the suggested output file name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = name.into();
        self
    }

    /// Number of pages in the filtered PDF.
    pub fn kept_count(&self) -> u32 {
        self.tally.kept_count()
    }

    /// Human-readable summary, worded per filter mode.
    pub fn summary(&self) -> String {
        if self.tally.is_empty() {
            return NO_MATCHES_MESSAGE.to_string();
        }

        match self.mode {
            FilterMode::Both => format!(
                "Found approximately {} students currently in band or orchestra.\n\
                 - {} student page(s) with \"BAND\" in their schedule\n\
                 - {} student page(s) with \"ORCHESTRA\" in their schedule",
                self.tally.student_estimate(),
                self.tally.band_count,
                self.tally.orchestra_count
            ),
            FilterMode::BandOnly => format!(
                "Found approximately {} students currently in band.",
                self.tally.band_count
            ),
            FilterMode::OrchestraOnly => format!(
                "Found approximately {} students currently in orchestra.",
                self.tally.orchestra_count
            ),
        }
    }

    /// Serialize the report to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        let result = match format {
            JsonFormat::Pretty => serde_json::to_string_pretty(self),
            JsonFormat::Compact => serde_json::to_string(self),
        };

        result.map_err(|e| Error::Processing(format!("JSON serialization error: {}", e)))
    }
}
