//! Per-page classification result.

use serde::{Deserialize, Serialize};

/// Keep/discard decision for one page, with its keyword hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageVerdict {
    /// Page index (0-based)
    pub page_index: u32,
    /// Page text contains "BAND"
    pub matches_band: bool,
    /// Page text contains "ORCHESTRA"
    pub matches_orchestra: bool,
    /// Page is retained under the active filter mode
    pub keep: bool,
}

impl PageVerdict {
    /// 1-indexed page number, as shown to users.
    pub fn page_number(&self) -> u32 {
        self.page_index + 1
    }

    /// Whether any keyword appeared, regardless of the filter mode.
    pub fn has_any_match(&self) -> bool {
        self.matches_band || self.matches_orchestra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_any_match_ignores_keep() {
        let v = PageVerdict {
            page_index: 2,
            matches_band: false,
            matches_orchestra: true,
            keep: false,
        };
        assert!(v.has_any_match());
        assert_eq!(v.page_number(), 3);

        let none = PageVerdict {
            matches_orchestra: false,
            ..v
        };
        assert!(!none.has_any_match());
    }
}
