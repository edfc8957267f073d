//! Page classification.
//!
//! Matching is plain substring containment on the uppercased page text, so
//! "DISBAND" counts as band and "ORCHESTRATED" as orchestra.

use crate::model::{FilterMode, PageVerdict};

/// Keyword marking a band enrollment.
pub const BAND_KEYWORD: &str = "BAND";

/// Keyword marking an orchestra enrollment.
pub const ORCHESTRA_KEYWORD: &str = "ORCHESTRA";

/// Classify one page's text under a filter mode.
///
/// Never fails: empty text matches nothing and is discarded.
pub fn classify(page_index: u32, page_text: &str, mode: FilterMode) -> PageVerdict {
    let text = page_text.to_uppercase();
    let matches_band = text.contains(BAND_KEYWORD);
    let matches_orchestra = text.contains(ORCHESTRA_KEYWORD);

    PageVerdict {
        page_index,
        matches_band,
        matches_orchestra,
        keep: mode.keeps(matches_band, matches_orchestra),
    }
}
