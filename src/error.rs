//! Error types for the imgb64 library.
//!
//! Every failure of a single conversion is a [`ConvertError`]. The encoder
//! and decoder return it as `Err(ConvertError)`; the dispatcher in
//! [`crate::convert`] never lets it escape and folds it into a failed
//! [`crate::output::ConversionOutcome`] instead, so one bad file cannot stop
//! a batch.
//!
//! An unparseable image header is deliberately *not* represented here: the
//! dimension reader degrades to [`crate::output::Dimensions::UNKNOWN`] and
//! encoding carries on.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while converting a single file.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A decode candidate is not valid UTF-8 text.
    #[error("'{path}' is not valid UTF-8 text: {detail}")]
    NotUtf8 { path: PathBuf, detail: String },

    /// The extension is in neither the image nor the text list.
    #[error("Unsupported type: '{path}' (skipping)")]
    UnsupportedType { path: PathBuf },

    // ── Decode errors ─────────────────────────────────────────────────────
    /// No `data:<mime>;base64,<payload>` substring in the text.
    #[error("No valid base64 data found in '{path}'")]
    NoDataUri { path: PathBuf },

    /// The captured payload is not decodable base64.
    #[error("Failed to decode base64 data in '{path}': {detail}")]
    MalformedBase64 { path: PathBuf, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create the output directory or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (worker panic, temp-dir failure).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Map an `io::Error` raised while reading `path` onto the input variants.
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => ConvertError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied { path },
            _ => ConvertError::ReadFailed { path, source },
        }
    }

    /// True for [`ConvertError::UnsupportedType`].
    pub fn is_unsupported_type(&self) -> bool {
        matches!(self, ConvertError::UnsupportedType { .. })
    }
}
