//! Page text extraction backed by lopdf.

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};

use super::backend::{load_lopdf, TextExtractor};

/// [`TextExtractor`] backed by its own `lopdf::Document`.
pub struct LopdfTextExtractor {
    doc: LopdfDocument,
    /// lopdf page numbers (1-indexed), in page-tree order
    page_numbers: Vec<u32>,
}

impl LopdfTextExtractor {
    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::from_document(load_lopdf(data)?))
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Self {
        let page_numbers = doc.get_pages().keys().copied().collect();
        Self { doc, page_numbers }
    }
}

impl TextExtractor for LopdfTextExtractor {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_text(&self, index: u32) -> Result<String> {
        let page_number = *self
            .page_numbers
            .get(index as usize)
            .ok_or(Error::PageOutOfRange(index, self.page_count()))?;

        self.doc
            .extract_text(&[page_number])
            .map_err(|e| Error::Extraction {
                page: index + 1,
                message: e.to_string(),
            })
    }
}
