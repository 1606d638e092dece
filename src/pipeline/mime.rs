//! MIME ↔ extension tables shared by the encoder and decoder.
//!
//! Both directions fall back to PNG: an image whose extension is unknown is
//! declared `image/png`, and a data URI with an unknown MIME type is written
//! out as `.png`. Other tooling relies on that fallback, so it stays fixed.

use std::path::Path;

/// MIME type assumed whenever nothing better is known.
pub const DEFAULT_MIME: &str = "image/png";

/// Extension written for unrecognised data-URI MIME types.
pub const DEFAULT_EXTENSION: &str = ".png";

/// Guess a MIME type from a file name's extension alone.
///
/// The file content is never sniffed.
pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/vnd.microsoft.icon",
        "svg" => "image/svg+xml",
        _ => DEFAULT_MIME,
    }
}

/// Output extension (with dot) for a data-URI MIME type.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/gif" => ".gif",
        "image/bmp" => ".bmp",
        _ => DEFAULT_EXTENSION,
    }
}
