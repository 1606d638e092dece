//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConverterConfigBuilder::progress_callback`] to receive
//! events as the dispatcher works through a batch.
//!
//! # Example
//!
//! ```rust
//! use imgb64::{ConversionOutcome, ConversionProgressCallback, ConverterConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: Arc<AtomicUsize>,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, outcome: &ConversionOutcome) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("[{}/{}] {} ok={}", index + 1, total, outcome.input_name(), outcome.success);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback {
//!     completed: Arc::new(AtomicUsize::new(0)),
//! });
//!
//! let config = ConverterConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{ConversionOutcome, Direction};
use std::path::Path;
use std::sync::Arc;

/// Called by the dispatcher as it processes each file of a batch.
///
/// All methods have default no-op implementations. In concurrent batches
/// `on_file_start` and `on_file_complete` may be called from different
/// threads and out of order, so implementations must synchronise any
/// shared state themselves.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first file.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called before a file is converted.
    ///
    /// # Arguments
    /// * `index`     — 0-based position in the batch
    /// * `total`     — batch size
    /// * `path`      — the input file
    /// * `direction` — `None` when the extension is unsupported
    fn on_file_start(&self, index: usize, total: usize, path: &Path, direction: Option<Direction>) {
        let _ = (index, total, path, direction);
    }

    /// Called after a file is converted, successfully or not.
    fn on_file_complete(&self, index: usize, total: usize, outcome: &ConversionOutcome) {
        let _ = (index, total, outcome);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, total: usize, succeeded: usize) {
        let _ = (total, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConverterConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        failures: AtomicUsize,
        succeeded: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total: usize) {
            self.started_total.store(total, Ordering::SeqCst);
        }

        fn on_file_start(&self, _: usize, _: usize, _: &Path, _: Option<Direction>) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _: usize, _: usize, outcome: &ConversionOutcome) {
            if !outcome.success {
                self.failures.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn on_batch_complete(&self, _total: usize, succeeded: usize) {
            self.succeeded.store(succeeded, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let outcome = ConversionOutcome::failed(
            "x.pdf",
            None,
            &ConvertError::UnsupportedType { path: "x.pdf".into() },
        );
        cb.on_batch_start(1);
        cb.on_file_start(0, 1, Path::new("x.pdf"), None);
        cb.on_file_complete(0, 1, &outcome);
        cb.on_batch_complete(1, 0);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        let failed = ConversionOutcome::failed(
            "x.pdf",
            None,
            &ConvertError::UnsupportedType { path: "x.pdf".into() },
        );

        tracker.on_batch_start(2);
        tracker.on_file_start(0, 2, Path::new("x.pdf"), None);
        tracker.on_file_complete(0, 2, &failed);
        tracker.on_file_start(1, 2, Path::new("y.pdf"), None);
        tracker.on_file_complete(1, 2, &failed);
        tracker.on_batch_complete(2, 0);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.failures.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.succeeded.load(Ordering::SeqCst), 0);
    }
}
