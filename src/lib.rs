//! # bandfilter
//!
//! Pull the band and orchestra pages out of a PDF of student schedules.
//!
//! Every page is scanned for the keywords `BAND` and `ORCHESTRA`; pages that
//! match the chosen [`FilterMode`] are copied, in their original order, into
//! a new PDF, and the run reports how many kept pages mention each keyword.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bandfilter::{filter_file, FilterMode, RunOutcome};
//!
//! fn main() -> bandfilter::Result<()> {
//!     match filter_file("schedules.pdf", FilterMode::Both)? {
//!         RunOutcome::Filtered(pdf) => {
//!             pdf.write_to(&pdf.report.output_name)?;
//!             println!("{}", pdf.report.summary());
//!         }
//!         RunOutcome::NoMatches(report) => println!("{}", report.summary()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Matching rules
//!
//! - Page text is uppercased, then searched for `BAND` and `ORCHESTRA` as
//!   plain substrings ("DISBAND" counts as band).
//! - Counters only include kept pages.
//! - A run that keeps nothing is [`RunOutcome::NoMatches`], not an error.

pub mod assemble;
pub mod classify;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod source;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-export commonly used types
pub use assemble::{LopdfAssembler, OutputDocument};
pub use classify::classify;
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_pdf_bytes, PdfFormat};
pub use error::{Error, Result};
pub use model::{
    FilterMode, FilterReport, JsonFormat, PageVerdict, RunTally, DEFAULT_OUTPUT_NAME,
    NO_MATCHES_MESSAGE,
};
pub use parser::{LopdfTextExtractor, PageAssembler, TextExtractor};
pub use pipeline::{
    CancelToken, FilterOptions, FilteredPdf, Progress, ProgressSink, RunContext, RunOutcome,
};
pub use source::SourceDocument;

use std::fs;
use std::path::Path;

/// Filter a PDF held in memory.
///
/// The header is checked first; non-PDF data fails with
/// [`Error::Validation`] without being parsed.
///
/// # Example
///
/// ```no_run
/// use bandfilter::{filter_bytes, FilterMode};
///
/// let data = std::fs::read("schedules.pdf").unwrap();
/// let outcome = filter_bytes(&data, FilterMode::BandOnly).unwrap();
/// println!("{}", outcome.report().summary());
/// ```
pub fn filter_bytes(data: &[u8], mode: FilterMode) -> Result<RunOutcome> {
    BandFilter::new().mode(mode).filter_bytes(data)
}

/// Filter a PDF file.
pub fn filter_file<P: AsRef<Path>>(path: P, mode: FilterMode) -> Result<RunOutcome> {
    BandFilter::new().mode(mode).filter_file(path)
}

/// Classify every page of a PDF without building an output.
pub fn scan_bytes(data: &[u8], mode: FilterMode) -> Result<Vec<PageVerdict>> {
    detect_format_from_bytes(data)?;
    let text = LopdfTextExtractor::load_bytes(data)?;
    pipeline::scan(&text, mode)
}

/// Filter a PDF file without blocking the async runtime.
///
/// The file is read with `tokio::fs` and the run happens on a blocking
/// thread.
#[cfg(feature = "async")]
pub async fn filter_file_async<P: AsRef<Path>>(path: P, mode: FilterMode) -> Result<RunOutcome> {
    let data = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || filter_bytes(&data, mode))
        .await
        .map_err(|e| Error::Processing(format!("filter task failed: {}", e)))?
}

/// Builder for a filtering run.
///
/// # Example
///
/// ```no_run
/// use bandfilter::{BandFilter, FilterMode};
///
/// let outcome = BandFilter::new()
///     .mode(FilterMode::OrchestraOnly)
///     .output_name("orchestra_students.pdf")
///     .on_progress(|p| eprintln!("{}", p))
///     .filter_file("schedules.pdf")?;
/// # Ok::<(), bandfilter::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct BandFilter {
    context: RunContext,
}

impl BandFilter {
    /// Create a new builder (mode: both).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter mode.
    pub fn mode(mut self, mode: FilterMode) -> Self {
        self.context.options.mode = mode;
        self
    }

    /// Set the filter mode from its name (`both`, `band`, `orchestra`).
    pub fn mode_name(self, name: &str) -> Result<Self> {
        Ok(self.mode(name.parse()?))
    }

    /// Set the reported output file name.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.context.options.output_name = name.into();
        self
    }

    /// Report progress to a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Progress) + Send + 'static,
    {
        self.context = self.context.on_progress(callback);
        self
    }

    /// Report progress on a channel.
    pub fn progress_channel(mut self, sender: crossbeam_channel::Sender<Progress>) -> Self {
        self.context = self.context.with_progress_channel(sender);
        self
    }

    /// Abort the run when `token` is cancelled.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.context = self.context.with_cancel_token(token);
        self
    }

    /// Validate, load and filter a PDF held in memory.
    pub fn filter_bytes(mut self, data: &[u8]) -> Result<RunOutcome> {
        let (format, source) = SourceDocument::load_validated(data)?;
        log::debug!("input is {}", format);
        pipeline::run(&source, &mut self.context)
    }

    /// Filter an upload whose declared MIME type came with the data.
    ///
    /// A MIME type other than `application/pdf` fails with
    /// [`Error::Validation`] before the bytes are looked at.
    pub fn filter_upload(self, data: &[u8], mime_type: &str) -> Result<RunOutcome> {
        detect::check_mime_type(mime_type)?;
        self.filter_bytes(data)
    }

    /// Read, validate, load and filter a PDF file.
    pub fn filter_file<P: AsRef<Path>>(self, path: P) -> Result<RunOutcome> {
        let data = fs::read(path)?;
        self.filter_bytes(&data)
    }
}
