//! Run counters.

use serde::{Deserialize, Serialize};

use super::PageVerdict;

/// Aggregate counters and kept pages for one run.
///
/// Counters only move forward, and only kept pages are counted: a page that
/// mentions orchestra under [`FilterMode::BandOnly`](super::FilterMode)
/// bumps `orchestra_count` only if it was kept for its band match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    /// Kept pages containing "BAND"
    pub band_count: u32,
    /// Kept pages containing "ORCHESTRA"
    pub orchestra_count: u32,
    /// Kept page indices (0-based), strictly ascending
    pub kept_page_indices: Vec<u32>,
}

impl RunTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict. Discarded pages leave the tally untouched.
    ///
    /// Verdicts must arrive in ascending page order; an out-of-order or
    /// repeated index is ignored.
    pub fn record(&mut self, verdict: &PageVerdict) -> bool {
        if !verdict.keep {
            return false;
        }
        if let Some(&last) = self.kept_page_indices.last() {
            if verdict.page_index <= last {
                log::warn!(
                    "ignoring out-of-order verdict for page index {} (last kept {})",
                    verdict.page_index,
                    last
                );
                return false;
            }
        }

        self.kept_page_indices.push(verdict.page_index);
        if verdict.matches_band {
            self.band_count += 1;
        }
        if verdict.matches_orchestra {
            self.orchestra_count += 1;
        }
        true
    }

    /// Number of kept pages.
    pub fn kept_count(&self) -> u32 {
        self.kept_page_indices.len() as u32
    }

    /// Whether no page was kept.
    pub fn is_empty(&self) -> bool {
        self.kept_page_indices.is_empty()
    }

    /// Rough number of students: the larger of the two keyword counts.
    pub fn student_estimate(&self) -> u32 {
        self.band_count.max(self.orchestra_count)
    }
}
