//! Error types for bandfilter.

use std::io;
use thiserror::Error;

/// Result type alias for bandfilter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while filtering a PDF.
///
/// A run that completes but keeps no pages is not an error; see
/// [`RunOutcome::NoMatches`](crate::RunOutcome::NoMatches).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input rejected before any processing (not a PDF, unknown filter mode).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The document could not be loaded or its page tree is unusable.
    #[error("Malformed PDF: {0}")]
    MalformedDocument(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Text extraction failed for a page.
    #[error("Text extraction failed on page {page}: {message}")]
    Extraction {
        /// 1-indexed page number
        page: u32,
        /// Cause reported by the extractor
        message: String,
    },

    /// Page index is out of range.
    #[error("Page index {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Unexpected failure while copying or writing pages.
    #[error("Error processing PDF: {0}")]
    Processing(String),

    /// The caller cancelled the run.
    #[error("Run cancelled")]
    Cancelled,
}

impl Error {
    /// Whether the input was rejected before a document was opened.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::MalformedDocument(err.to_string()),
        }
    }
}
