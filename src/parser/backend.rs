//! PDF backend abstraction layer.
//!
//! The pipeline talks to two separate ports: one that yields page text and
//! one that copies pages into a new document. Each port owns its own view of
//! the source bytes, so the concrete PDF library (lopdf) stays behind these
//! traits and the pipeline can be driven by test doubles.

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};

/// Text side of a loaded document.
pub trait TextExtractor {
    /// Number of pages available.
    fn page_count(&self) -> u32;

    /// Plain text of the page at `index` (0-based).
    ///
    /// Text runs are concatenated in content-stream order, which need not
    /// match visual reading order.
    fn page_text(&self, index: u32) -> Result<String>;
}

/// Page-copy side of a loaded document.
pub trait PageAssembler {
    /// Document under construction.
    type Output;

    /// Number of pages available for copying.
    fn page_count(&self) -> u32;

    /// Start a new, empty output document.
    fn create_empty(&self) -> Self::Output;

    /// Append a copy of the page at `index` (0-based) to `dest`.
    fn copy_page(&self, dest: &mut Self::Output, index: u32) -> Result<()>;

    /// Write `doc` out as a complete, standalone PDF.
    fn serialize(&self, doc: Self::Output) -> Result<Vec<u8>>;
}

/// Load a lopdf document from memory, rejecting encrypted input.
pub(crate) fn load_lopdf(data: &[u8]) -> Result<LopdfDocument> {
    let doc = LopdfDocument::load_mem(data)?;

    if doc.is_encrypted() {
        return Err(Error::Encrypted);
    }

    Ok(doc)
}
