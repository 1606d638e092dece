//! Streaming conversion API: emit outcomes as files finish.
//!
//! [`crate::convert::Converter::convert_batch_concurrent`] returns only
//! after the whole batch is done. [`convert_stream`] instead yields each
//! `(index, outcome)` pair as soon as its conversion completes, so callers
//! can report progress or act on results immediately. Items arrive in
//! completion order; `index` is the position in the input list.
//!
//! Batch-level callbacks (`on_batch_start`, `on_batch_complete`) are not
//! fired here since the stream may be dropped early; per-file callbacks are.

use crate::convert::Converter;
use crate::output::ConversionOutcome;
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of `(input index, outcome)` pairs.
pub type OutcomeStream = Pin<Box<dyn Stream<Item = (usize, ConversionOutcome)> + Send>>;

/// Convert `paths` into `output_dir`, streaming outcomes as they complete.
///
/// At most `config.concurrency` conversions run at once. Every path yields
/// exactly one item; failures are outcomes, never stream errors.
pub fn convert_stream(converter: &Converter, paths: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> OutcomeStream {
    let output_dir = output_dir.into();
    let total = paths.len();
    let concurrency = converter.config().concurrency;
    info!(
        "Streaming {} file(s) (concurrency {}) → {}",
        total,
        concurrency,
        output_dir.display()
    );

    let converter = converter.clone();
    let s = stream::iter(paths.into_iter().enumerate().map(move |(index, path)| {
        let converter = converter.clone();
        let output_dir = output_dir.clone();
        async move {
            let outcome = converter.convert_spawned(index, total, path, output_dir).await;
            (index, outcome)
        }
    }))
    .buffer_unordered(concurrency);

    Box::pin(s)
}
