//! Data model for a filtering run.
//!
//! These types are independent of any PDF library: they describe what the
//! classifier decided and what the pipeline accumulated.

mod mode;
mod report;
mod tally;
mod verdict;

pub use mode::FilterMode;
pub use report::{FilterReport, JsonFormat, DEFAULT_OUTPUT_NAME, NO_MATCHES_MESSAGE};
pub use tally::RunTally;
pub use verdict::PageVerdict;
