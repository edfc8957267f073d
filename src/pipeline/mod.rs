//! The page filtering pipeline.
//!
//! A run walks the source pages in order. For each page it reports progress,
//! extracts the text, classifies it and, when kept, copies the page into the
//! output document. Nothing from a failed or cancelled run escapes: the
//! partially built output is dropped with the error.
//!
//! # Example
//!
//! ```no_run
//! use bandfilter::pipeline::{self, RunContext, RunOutcome};
//! use bandfilter::{FilterMode, SourceDocument};
//!
//! fn main() -> bandfilter::Result<()> {
//!     let source = SourceDocument::open("schedules.pdf")?;
//!     let mut ctx = RunContext::new(FilterMode::BandOnly)
//!         .on_progress(|p| eprintln!("{}", p));
//!
//!     match pipeline::run(&source, &mut ctx)? {
//!         RunOutcome::Filtered(pdf) => pdf.write_to("band.pdf")?,
//!         RunOutcome::NoMatches(report) => println!("{}", report.summary()),
//!     }
//!     Ok(())
//! }
//! ```

mod context;
mod options;

pub use context::{CancelToken, Progress, ProgressSink, RunContext};
pub use options::FilterOptions;

use std::fs;
use std::path::Path;

use crate::classify::classify;
use crate::error::{Error, Result};
use crate::model::{FilterMode, FilterReport, PageVerdict, RunTally};
use crate::parser::{PageAssembler, TextExtractor};
use crate::source::SourceDocument;

/// The filtered PDF and its report.
#[derive(Debug, Clone)]
pub struct FilteredPdf {
    /// Serialized output document
    pub bytes: Vec<u8>,
    /// Run summary
    pub report: FilterReport,
}

impl FilteredPdf {
    /// Write the PDF bytes to a file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, &self.bytes)?;
        Ok(())
    }
}

/// Terminal result of a successful run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// At least one page was kept.
    Filtered(FilteredPdf),
    /// The run finished but no page matched the filter.
    NoMatches(FilterReport),
}

impl RunOutcome {
    /// The run summary.
    pub fn report(&self) -> &FilterReport {
        match self {
            RunOutcome::Filtered(pdf) => &pdf.report,
            RunOutcome::NoMatches(report) => report,
        }
    }

    /// Whether the run kept no pages.
    pub fn is_no_matches(&self) -> bool {
        matches!(self, RunOutcome::NoMatches(_))
    }

    /// The output PDF bytes, if any page was kept.
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            RunOutcome::Filtered(pdf) => Some(&pdf.bytes),
            RunOutcome::NoMatches(_) => None,
        }
    }

    /// Take the filtered PDF, if any page was kept.
    pub fn into_filtered(self) -> Option<FilteredPdf> {
        match self {
            RunOutcome::Filtered(pdf) => Some(pdf),
            RunOutcome::NoMatches(_) => None,
        }
    }
}

/// Run the pipeline over a loaded source document.
pub fn run(source: &SourceDocument, ctx: &mut RunContext) -> Result<RunOutcome> {
    run_with(source.text(), source.pages(), ctx)
}

/// Run the pipeline over explicit text and page-copy ports.
///
/// Both ports must describe the same document.
pub fn run_with<T, A>(text: &T, pages: &A, ctx: &mut RunContext) -> Result<RunOutcome>
where
    T: TextExtractor + ?Sized,
    A: PageAssembler + ?Sized,
{
    let total = text.page_count();
    if pages.page_count() != total {
        return Err(Error::MalformedDocument(format!(
            "page count mismatch ({} text pages, {} copyable pages)",
            total,
            pages.page_count()
        )));
    }

    let mode = ctx.mode();
    log::info!("filtering {} pages (mode: {})", total, mode);

    let mut output = pages.create_empty();
    let mut tally = RunTally::new();

    for index in 0..total {
        ctx.check_cancelled()?;
        ctx.report(Progress::Page {
            current: index + 1,
            total,
        });

        let verdict = classify(index, &text.page_text(index)?, mode);
        log::debug!(
            "page {}: band={} orchestra={} keep={}",
            verdict.page_number(),
            verdict.matches_band,
            verdict.matches_orchestra,
            verdict.keep
        );

        // Only pages the tally accepts reach the output.
        if tally.record(&verdict) {
            pages.copy_page(&mut output, index)?;
        }
    }

    let report = FilterReport::new(mode, total, tally).with_output_name(&ctx.options.output_name);

    if report.tally.is_empty() {
        log::warn!("no pages matched (mode: {}, {} pages scanned)", mode, total);
        return Ok(RunOutcome::NoMatches(report));
    }

    ctx.check_cancelled()?;
    ctx.report(Progress::Assembling {
        kept: report.kept_count(),
    });
    let bytes = pages.serialize(output)?;
    ctx.check_cancelled()?;

    log::info!(
        "kept {} of {} pages (band: {}, orchestra: {})",
        report.kept_count(),
        total,
        report.tally.band_count,
        report.tally.orchestra_count
    );
    Ok(RunOutcome::Filtered(FilteredPdf { bytes, report }))
}

/// Classify every page without building an output document.
pub fn scan<T>(text: &T, mode: FilterMode) -> Result<Vec<PageVerdict>>
where
    T: TextExtractor + ?Sized,
{
    (0..text.page_count())
        .map(|index| Ok(classify(index, &text.page_text(index)?, mode)))
        .collect()
}
