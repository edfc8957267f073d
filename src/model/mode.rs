//! Filter mode selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Keyword policy deciding which pages are retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Keep pages mentioning band or orchestra
    #[default]
    Both,
    /// Keep pages mentioning band
    BandOnly,
    /// Keep pages mentioning orchestra
    OrchestraOnly,
}

impl FilterMode {
    /// All modes, in presentation order.
    pub const ALL: [FilterMode; 3] = [
        FilterMode::Both,
        FilterMode::BandOnly,
        FilterMode::OrchestraOnly,
    ];

    /// Decide whether a page with the given keyword hits is kept.
    pub fn keeps(self, matches_band: bool, matches_orchestra: bool) -> bool {
        match self {
            FilterMode::Both => matches_band || matches_orchestra,
            FilterMode::BandOnly => matches_band,
            FilterMode::OrchestraOnly => matches_orchestra,
        }
    }

    /// The short name accepted by [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::Both => "both",
            FilterMode::BandOnly => "band",
            FilterMode::OrchestraOnly => "orchestra",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" => Ok(FilterMode::Both),
            "band" => Ok(FilterMode::BandOnly),
            "orchestra" => Ok(FilterMode::OrchestraOnly),
            other => Err(Error::Validation(format!(
                "unknown filter mode '{}' (expected both, band or orchestra)",
                other
            ))),
        }
    }
}
