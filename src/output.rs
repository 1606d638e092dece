//! Value types produced by a conversion.
//!
//! Everything here is transient: built inside one call, handed back to the
//! caller, never cached. [`ConversionOutcome`] is the record the dispatcher
//! returns for every file, success or not.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Pixel dimensions read from an image header.
///
/// `width` and `height` are either both known or both unknown; an unknown
/// result is a valid answer, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Dimensions {
    /// Neither dimension could be read.
    pub const UNKNOWN: Dimensions = Dimensions {
        width: None,
        height: None,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// `Some((width, height))` when both are known.
    pub fn known(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn is_known(&self) -> bool {
        self.known().is_some()
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.known() {
            Some((w, h)) => write!(f, "{w}×{h}"),
            None => f.write_str("unknown"),
        }
    }
}

/// An image opened for encoding.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    /// MIME type guessed from the extension (`image/png` when unknown).
    pub mime_type: String,
    pub file_name: String,
}

/// The rendered HTML document for one image.
#[derive(Debug, Clone)]
pub struct ConversionDocument {
    pub mime_type: String,
    /// Base64 of exactly the source bytes.
    pub payload: String,
    pub source_file_name: String,
    pub source_size: u64,
    pub source_path: PathBuf,
    pub dimensions: Dimensions,
    pub output_file_name: String,
    pub output_path: PathBuf,
    /// The full document text written to `output_path`.
    pub html: String,
}

/// The first data URI found in a decode candidate.
///
/// MIME type and payload are taken verbatim from the match; nothing checks
/// that the decoded bytes really are of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPayload {
    pub mime_type: String,
    pub payload: String,
    /// Output extension including the dot, e.g. `.jpg`.
    pub extension: &'static str,
}

/// Which way a file is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Image → base64 HTML document.
    Encode,
    /// Text containing a data URI → image.
    Decode,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Encode => "Image → Base64 HTML",
            Direction::Decode => "Base64 HTML → Image",
        }
    }
}

/// Extra facts about a successful conversion, for status lines and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeDetail {
    Encoded {
        mime_type: String,
        dimensions: Dimensions,
        source_size: u64,
        payload_len: usize,
    },
    Decoded {
        mime_type: String,
        extension: String,
        size: u64,
    },
}

/// The result of converting one file. Always returned by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    /// `None` when the extension was not recognised.
    pub direction: Option<Direction>,
    pub success: bool,
    pub output: Option<PathBuf>,
    pub error: Option<String>,
    /// True when the failure was an unsupported extension (no I/O attempted).
    #[serde(default)]
    pub unsupported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<OutcomeDetail>,
}

impl ConversionOutcome {
    pub fn succeeded(
        input: impl Into<PathBuf>,
        direction: Direction,
        output: impl Into<PathBuf>,
        detail: OutcomeDetail,
    ) -> Self {
        Self {
            input: input.into(),
            direction: Some(direction),
            success: true,
            output: Some(output.into()),
            error: None,
            unsupported: false,
            detail: Some(detail),
        }
    }

    pub fn failed(input: impl Into<PathBuf>, direction: Option<Direction>, err: &ConvertError) -> Self {
        Self {
            input: input.into(),
            direction,
            success: false,
            output: None,
            error: Some(err.to_string()),
            unsupported: err.is_unsupported_type(),
            detail: None,
        }
    }

    /// File name of the input, for status lines.
    pub fn input_name(&self) -> String {
        display_name(&self.input)
    }
}

/// Final path component as a lossy string, or the whole path if it has none.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Counts over a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub encoded: usize,
    pub decoded: usize,
    pub unsupported: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let mut s = BatchSummary {
            total: outcomes.len(),
            ..Default::default()
        };
        for o in outcomes {
            if o.success {
                s.succeeded += 1;
                match o.direction {
                    Some(Direction::Encode) => s.encoded += 1,
                    Some(Direction::Decode) => s.decoded += 1,
                    None => {}
                }
            } else {
                s.failed += 1;
                if o.unsupported {
                    s.unsupported += 1;
                }
            }
        }
        s
    }
}

/// Header-only report for one image, see [`crate::convert::inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub size_human: String,
    pub dimensions: Dimensions,
}

/// A produced file held in memory, see [`crate::convert::convert_bytes`].
#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub file_name: String,
    pub data: Vec<u8>,
    pub outcome: ConversionOutcome,
}
