//! Per-run context: options, progress reporting and cancellation.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;

use crate::error::{Error, Result};
use crate::model::FilterMode;

use super::FilterOptions;

/// Progress notification emitted during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// About to scan a page.
    Page {
        /// 1-indexed page number
        current: u32,
        /// Total pages in the source
        total: u32,
    },

    /// All pages scanned; writing the output document.
    Assembling {
        /// Pages in the output
        kept: u32,
    },
}

impl Progress {
    /// Completion percentage of the scan (0-100).
    pub fn percent(&self) -> u8 {
        match *self {
            Progress::Page { current, total } if total > 0 => {
                ((current as u64 * 100) / total as u64).min(100) as u8
            }
            Progress::Page { .. } => 0,
            Progress::Assembling { .. } => 100,
        }
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Page { current, total } => {
                write!(f, "Scanning page {} of {}...", current, total)
            }
            Progress::Assembling { .. } => f.write_str("Creating student list..."),
        }
    }
}

/// Where progress notifications go.
///
/// Delivery never blocks: a full or disconnected channel drops the event.
#[derive(Default)]
pub enum ProgressSink {
    /// Discard notifications
    #[default]
    None,
    /// Call a closure
    Callback(Box<dyn FnMut(Progress) + Send>),
    /// Send on a channel
    Channel(Sender<Progress>),
}

impl ProgressSink {
    fn report(&mut self, progress: Progress) {
        match self {
            ProgressSink::None => {}
            ProgressSink::Callback(callback) => callback(progress),
            ProgressSink::Channel(sender) => {
                // Receiver gone or full: the run itself does not care.
                let _ = sender.try_send(progress);
            }
        }
    }
}

impl fmt::Debug for ProgressSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressSink::None => f.write_str("None"),
            ProgressSink::Callback(_) => f.write_str("Callback(..)"),
            ProgressSink::Channel(_) => f.write_str("Channel(..)"),
        }
    }
}

/// Shared flag used to abort a run from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a single run needs besides the document itself.
///
/// Owned by the caller; the pipeline keeps no state between runs.
#[derive(Debug, Default)]
pub struct RunContext {
    /// Filter options
    pub options: FilterOptions,
    progress: ProgressSink,
    cancel: CancelToken,
}

impl RunContext {
    /// Create a context for the given mode.
    pub fn new(mode: FilterMode) -> Self {
        Self::with_options(FilterOptions::new().with_mode(mode))
    }

    /// Create a context from full options.
    pub fn with_options(options: FilterOptions) -> Self {
        Self {
            options,
            progress: ProgressSink::None,
            cancel: CancelToken::new(),
        }
    }

    /// Report progress to a closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(Progress) + Send + 'static,
    {
        self.progress = ProgressSink::Callback(Box::new(callback));
        self
    }

    /// Report progress on a channel.
    pub fn with_progress_channel(mut self, sender: Sender<Progress>) -> Self {
        self.progress = ProgressSink::Channel(sender);
        self
    }

    /// Set the progress sink directly.
    pub fn with_progress(mut self, sink: ProgressSink) -> Self {
        self.progress = sink;
        self
    }

    /// Abort the run when `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// The active filter mode.
    pub fn mode(&self) -> FilterMode {
        self.options.mode
    }

    /// A handle that cancels this run.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub(crate) fn report(&mut self, progress: Progress) {
        self.progress.report(progress);
    }

    pub(crate) fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            log::warn!("run cancelled (mode: {})", self.options.mode);
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_display() {
        let p = Progress::Page {
            current: 3,
            total: 10,
        };
        assert_eq!(p.to_string(), "Scanning page 3 of 10...");
        assert_eq!(p.percent(), 30);
        assert_eq!(
            Progress::Assembling { kept: 2 }.to_string(),
            "Creating student list..."
        );
    }

    #[test]
    fn test_progress_percent_zero_total() {
        let p = Progress::Page {
            current: 0,
            total: 0,
        };
        assert_eq!(p.percent(), 0);
    }

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let ctx = RunContext::new(FilterMode::Both).with_cancel_token(token.clone());
        assert!(ctx.check_cancelled().is_ok());
        token.cancel();
        assert!(matches!(ctx.check_cancelled(), Err(Error::Cancelled)));
        assert!(ctx.cancel_token().is_cancelled());
    }

    #[test]
    fn test_channel_sink_does_not_block() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut ctx = RunContext::new(FilterMode::Both).with_progress_channel(tx);
        ctx.report(Progress::Page {
            current: 1,
            total: 2,
        });
        // Channel is full; this one is dropped rather than blocking.
        ctx.report(Progress::Page {
            current: 2,
            total: 2,
        });
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_disconnected_channel_is_ignored() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let mut ctx = RunContext::new(FilterMode::Both).with_progress_channel(tx);
        ctx.report(Progress::Assembling { kept: 1 });
    }
}
