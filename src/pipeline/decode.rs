//! Image decoding: first `data:<mime>;base64,<payload>` in a text file → image.
//!
//! The input is searched, not parsed: the data URI may sit inside an
//! `<img src>`, a CSS `url()`, a JSON string or plain prose. Only the first
//! match counts. The declared MIME type picks the output extension and is
//! trusted as-is; the decoded bytes are never checked against it.

use crate::error::ConvertError;
use crate::output::ExtractedPayload;
use crate::pipeline::{mime, write_atomic};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static RE_DATA_URI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"data:([^;]+);base64,([A-Za-z0-9+/=]+)").unwrap());

/// Standard alphabet, non-zero trailing bits tolerated. Padding has already
/// been stripped by [`strip_padding`].
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded image ready to be written.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub payload: ExtractedPayload,
    pub bytes: Vec<u8>,
    pub output_path: PathBuf,
}

/// Find the first data URI in `text`.
pub fn extract_payload(text: &str) -> Option<ExtractedPayload> {
    let caps = RE_DATA_URI.captures(text)?;
    let mime_type = caps[1].to_string();
    let extension = mime::extension_for_mime(&mime_type);
    Some(ExtractedPayload {
        mime_type,
        payload: caps[2].to_string(),
        extension,
    })
}

/// Decode a base64 token as captured from a data URI.
///
/// Excess `=` is ignored: a run of `=` that completes the final quantum ends
/// the payload, and `=` anywhere it cannot be padding is skipped. A final
/// partial quantum without its padding is still an error.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    LENIENT.decode(strip_padding(payload)?)
}

/// The data characters of `payload`, up to the padding that closes it.
fn strip_padding(payload: &str) -> Result<String, base64::DecodeError> {
    let mut data = String::with_capacity(payload.len());
    let mut pads = 0;
    let mut closed = false;
    for c in payload.chars() {
        if c != '=' {
            data.push(c);
            pads = 0;
            continue;
        }
        let quad = data.len() % 4;
        if quad >= 2 {
            pads += 1;
            if quad + pads >= 4 {
                closed = true;
                break;
            }
        }
    }
    if !closed && data.len() % 4 != 0 {
        return Err(base64::DecodeError::InvalidPadding);
    }
    Ok(data)
}

/// Extract and decode the image in `text`; `path` names the input in errors
/// and supplies the output stem. Pure: nothing is written.
pub fn decode_text(text: &str, path: &Path, output_dir: &Path) -> Result<DecodedImage, ConvertError> {
    let payload = extract_payload(text).ok_or_else(|| ConvertError::NoDataUri {
        path: path.to_path_buf(),
    })?;
    debug!(
        "Found data URI in {}: {} ({} base64 chars)",
        path.display(),
        payload.mime_type,
        payload.payload.len()
    );

    let bytes = decode_payload(&payload.payload).map_err(|e| ConvertError::MalformedBase64 {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output_path = output_dir.join(format!("{stem}{}", payload.extension));

    Ok(DecodedImage {
        payload,
        bytes,
        output_path,
    })
}

/// Decode the first data URI in `text_path` and write
/// `<output_dir>/<stem><ext>`, replacing any existing file.
pub fn decode_to_image(text_path: &Path, output_dir: &Path) -> Result<DecodedImage, ConvertError> {
    let raw = std::fs::read(text_path).map_err(|e| ConvertError::from_read(text_path, e))?;
    let text = String::from_utf8(raw).map_err(|e| ConvertError::NotUtf8 {
        path: text_path.to_path_buf(),
        detail: e.utf8_error().to_string(),
    })?;

    let decoded = decode_text(&text, text_path, output_dir)?;
    write_atomic(&decoded.output_path, &decoded.bytes)?;
    info!(
        "Decoded '{}' → '{}' ({}, {} bytes)",
        text_path.display(),
        decoded.output_path.display(),
        decoded.payload.mime_type,
        decoded.bytes.len()
    );
    Ok(decoded)
}
