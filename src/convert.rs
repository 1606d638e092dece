//! The dispatcher: route each file to the encoder or decoder and report an
//! outcome per file.
//!
//! Nothing in here returns `Err` for a conversion failure. Every file yields
//! exactly one [`ConversionOutcome`], in input order, and a failure never
//! stops the rest of the batch. The concurrent variant runs conversions on
//! the blocking pool but still hands outcomes back in input order; use
//! [`crate::stream::convert_stream`] to see them as they finish.

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::output::{ConversionOutcome, ConvertedFile, Direction, ImageInfo, OutcomeDetail};
use crate::pipeline::{decode, dimensions, encode, input, mime, size};
use futures::stream::{self, StreamExt};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Converts files according to a [`ConverterConfig`].
///
/// Cheap to clone; clones share the same configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: Arc<ConverterConfig>,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Which way `path` would be converted, by extension alone.
    pub fn classify(&self, path: &Path) -> Option<Direction> {
        input::classify(path, &self.config)
    }

    /// Encode one image into `<output_dir>/<stem>.txt`.
    pub fn encode_image(&self, image_path: &Path, output_dir: &Path) -> ConversionOutcome {
        let result = self
            .try_encode(image_path, output_dir)
            .map(|(out, detail)| (Direction::Encode, out, detail));
        self.finish(image_path, Some(Direction::Encode), result)
    }

    /// Decode the first data URI in a text file into `<output_dir>/<stem><ext>`.
    pub fn decode_to_image(&self, text_path: &Path, output_dir: &Path) -> ConversionOutcome {
        let result = self
            .try_decode(text_path, output_dir)
            .map(|(out, detail)| (Direction::Decode, out, detail));
        self.finish(text_path, Some(Direction::Decode), result)
    }

    /// Classify `path` and convert it in the matching direction.
    ///
    /// Unsupported extensions fail without touching the file system.
    pub fn convert_one(&self, path: &Path, output_dir: &Path) -> ConversionOutcome {
        self.finish(path, self.classify(path), self.try_convert(path, output_dir))
    }

    /// Convert every path in order, one at a time.
    pub fn convert_batch<P: AsRef<Path>>(&self, paths: &[P], output_dir: &Path) -> Vec<ConversionOutcome> {
        let total = paths.len();
        info!("Starting batch of {} file(s) → {}", total, output_dir.display());
        self.notify_batch_start(total);

        let outcomes: Vec<ConversionOutcome> = paths
            .iter()
            .enumerate()
            .map(|(index, p)| {
                let path = p.as_ref();
                self.notify_file_start(index, total, path);
                let outcome = self.convert_one(path, output_dir);
                self.notify_file_complete(index, total, &outcome);
                outcome
            })
            .collect();

        self.notify_batch_complete(&outcomes);
        outcomes
    }

    /// Convert up to `config.concurrency` files at a time on the blocking
    /// pool. Outcomes come back in input order.
    pub async fn convert_batch_concurrent<P: AsRef<Path>>(
        &self,
        paths: &[P],
        output_dir: &Path,
    ) -> Vec<ConversionOutcome> {
        let total = paths.len();
        info!(
            "Starting concurrent batch of {} file(s) (concurrency {}) → {}",
            total,
            self.config.concurrency,
            output_dir.display()
        );
        self.notify_batch_start(total);

        let outcomes: Vec<ConversionOutcome> = stream::iter(paths.iter().enumerate().map(|(index, p)| {
            self.convert_spawned(index, total, p.as_ref().to_path_buf(), output_dir.to_path_buf())
        }))
        .buffered(self.config.concurrency)
        .collect()
        .await;

        self.notify_batch_complete(&outcomes);
        outcomes
    }

    /// Run one conversion on the blocking pool, firing per-file callbacks.
    ///
    /// A panicking conversion becomes a failed outcome.
    pub(crate) async fn convert_spawned(
        &self,
        index: usize,
        total: usize,
        path: PathBuf,
        output_dir: PathBuf,
    ) -> ConversionOutcome {
        self.notify_file_start(index, total, &path);
        let direction = self.classify(&path);
        let worker = self.clone();
        let input = path.clone();
        let outcome = match tokio::task::spawn_blocking(move || worker.convert_one(&input, &output_dir)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let err = ConvertError::Internal(format!("conversion task failed: {e}"));
                warn!("{}: {}", path.display(), err);
                ConversionOutcome::failed(path, direction, &err)
            }
        };
        self.notify_file_complete(index, total, &outcome);
        outcome
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn try_convert(&self, path: &Path, output_dir: &Path) -> Result<(Direction, PathBuf, OutcomeDetail), ConvertError> {
        match self.classify(path) {
            Some(Direction::Encode) => self
                .try_encode(path, output_dir)
                .map(|(out, d)| (Direction::Encode, out, d)),
            Some(Direction::Decode) => self
                .try_decode(path, output_dir)
                .map(|(out, d)| (Direction::Decode, out, d)),
            None => Err(ConvertError::UnsupportedType {
                path: path.to_path_buf(),
            }),
        }
    }

    fn try_encode(&self, path: &Path, output_dir: &Path) -> Result<(PathBuf, OutcomeDetail), ConvertError> {
        self.ensure_output_dir(output_dir)?;
        let doc = encode::encode_image(path, output_dir)?;
        let detail = OutcomeDetail::Encoded {
            mime_type: doc.mime_type,
            dimensions: doc.dimensions,
            source_size: doc.source_size,
            payload_len: doc.payload.len(),
        };
        Ok((doc.output_path, detail))
    }

    fn try_decode(&self, path: &Path, output_dir: &Path) -> Result<(PathBuf, OutcomeDetail), ConvertError> {
        self.ensure_output_dir(output_dir)?;
        let img = decode::decode_to_image(path, output_dir)?;
        let detail = OutcomeDetail::Decoded {
            mime_type: img.payload.mime_type,
            extension: img.payload.extension.to_string(),
            size: img.bytes.len() as u64,
        };
        Ok((img.output_path, detail))
    }

    fn ensure_output_dir(&self, output_dir: &Path) -> Result<(), ConvertError> {
        if self.config.create_output_dir && !output_dir.is_dir() {
            debug!("Creating output directory {}", output_dir.display());
            std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::OutputWriteFailed {
                path: output_dir.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    fn finish(
        &self,
        path: &Path,
        direction: Option<Direction>,
        result: Result<(Direction, PathBuf, OutcomeDetail), ConvertError>,
    ) -> ConversionOutcome {
        match result {
            Ok((direction, output, detail)) => ConversionOutcome::succeeded(path, direction, output, detail),
            Err(e) => {
                warn!("{}", e);
                ConversionOutcome::failed(path, direction, &e)
            }
        }
    }

    fn notify_batch_start(&self, total: usize) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_start(total);
        }
    }

    fn notify_file_start(&self, index: usize, total: usize, path: &Path) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_start(index, total, path, self.classify(path));
        }
    }

    fn notify_file_complete(&self, index: usize, total: usize, outcome: &ConversionOutcome) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_complete(index, total, outcome);
        }
    }

    fn notify_batch_complete(&self, outcomes: &[ConversionOutcome]) {
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        info!("Batch complete: {}/{} succeeded", succeeded, outcomes.len());
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_batch_complete(outcomes.len(), succeeded);
        }
    }
}

/// Convert one file with the default configuration.
pub fn convert_one(path: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> ConversionOutcome {
    Converter::default().convert_one(path.as_ref(), output_dir.as_ref())
}

/// Convert files in order with the default configuration.
pub fn convert_batch<P: AsRef<Path>>(paths: &[P], output_dir: impl AsRef<Path>) -> Vec<ConversionOutcome> {
    Converter::default().convert_batch(paths, output_dir.as_ref())
}

/// Report MIME type, size and header dimensions of an image without
/// converting it. Only the header is read.
pub fn inspect(path: impl AsRef<Path>) -> Result<ImageInfo, ConvertError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| ConvertError::from_read(path, e))?;
    let size_bytes = file
        .metadata()
        .map_err(|e| ConvertError::from_read(path, e))?
        .len();
    let mime_type = mime::guess_mime(path);
    let dims = dimensions::read_dimensions_from(BufReader::new(file), mime_type);

    Ok(ImageInfo {
        file_name: crate::output::display_name(path),
        mime_type: mime_type.to_string(),
        size_bytes,
        size_human: size::format_size(size_bytes),
        dimensions: dims,
    })
}

/// Convert an in-memory upload and return the produced file's bytes.
///
/// `bytes` is staged under `file_name` in a temporary directory, converted
/// into a second temporary directory, and read back. Both directories are
/// removed before returning. Only the final component of `file_name` is
/// used. The returned outcome names files relative to nothing: `input` is
/// the staged file name and `output` the produced file name.
pub fn convert_bytes(
    file_name: &str,
    bytes: &[u8],
    config: &ConverterConfig,
) -> Result<ConvertedFile, ConvertError> {
    let name = Path::new(file_name)
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| ConvertError::UnsupportedType {
            path: PathBuf::from(file_name),
        })?;

    let converter = Converter::new(config.clone());
    if converter.classify(&name).is_none() {
        return Err(ConvertError::UnsupportedType { path: name });
    }

    let staging = tempfile::Builder::new()
        .prefix("imgb64-in-")
        .tempdir()
        .map_err(|e| ConvertError::Internal(format!("tempdir: {e}")))?;
    let produced = tempfile::Builder::new()
        .prefix("imgb64-out-")
        .tempdir()
        .map_err(|e| ConvertError::Internal(format!("tempdir: {e}")))?;

    let staged = staging.path().join(&name);
    std::fs::write(&staged, bytes).map_err(|e| ConvertError::Internal(format!("staging write: {e}")))?;

    let (direction, output_path, detail) = converter.try_convert(&staged, produced.path())?;
    let data = std::fs::read(&output_path).map_err(|e| ConvertError::from_read(&output_path, e))?;
    let out_name = crate::output::display_name(&output_path);
    debug!("In-memory conversion {} → {} ({} bytes)", name.display(), out_name, data.len());

    Ok(ConvertedFile {
        outcome: ConversionOutcome::succeeded(&name, direction, &out_name, detail),
        file_name: out_name,
        data,
    })
}
