//! Source document handle.

use std::fs;
use std::path::Path;

use crate::assemble::LopdfAssembler;
use crate::detect::{detect_format_from_bytes, PdfFormat};
use crate::error::{Error, Result};
use crate::parser::{LopdfTextExtractor, PageAssembler, TextExtractor};

/// The original PDF, loaded once per run.
///
/// Holds two independent views of the same bytes: one for text extraction
/// and one for page copying. Neither is mutated after loading.
pub struct SourceDocument {
    text: LopdfTextExtractor,
    pages: LopdfAssembler,
}

impl SourceDocument {
    /// Load a document from bytes.
    ///
    /// Fails with [`Error::MalformedDocument`] when the bytes are not a
    /// loadable PDF, and [`Error::Encrypted`] for encrypted input.
    pub fn load(data: &[u8]) -> Result<Self> {
        let text = LopdfTextExtractor::load_bytes(data)?;
        let pages = LopdfAssembler::load_bytes(data)?;

        if text.page_count() != pages.page_count() {
            return Err(Error::MalformedDocument(format!(
                "page count mismatch ({} text pages, {} copyable pages)",
                text.page_count(),
                pages.page_count()
            )));
        }

        log::debug!(
            "loaded PDF {} with {} pages ({} bytes)",
            pages.version(),
            pages.page_count(),
            data.len()
        );
        Ok(Self { text, pages })
    }

    /// Validate the header, then load.
    ///
    /// Fails with [`Error::Validation`] before any parsing when the bytes do
    /// not start with a PDF header.
    pub fn load_validated(data: &[u8]) -> Result<(PdfFormat, Self)> {
        let format = detect_format_from_bytes(data)?;
        Ok((format, Self::load(data)?))
    }

    /// Read, validate and load a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::load_validated(&data).map(|(_, source)| source)
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.text.page_count()
    }

    /// Text of the page at `index` (0-based).
    pub fn page_text(&self, index: u32) -> Result<String> {
        self.text.page_text(index)
    }

    /// The text extraction view.
    pub fn text(&self) -> &LopdfTextExtractor {
        &self.text
    }

    /// The page copying view.
    pub fn pages(&self) -> &LopdfAssembler {
        &self.pages
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("version", &self.pages.version())
            .field("page_count", &self.page_count())
            .finish()
    }
}
