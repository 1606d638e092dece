//! Image encoding: image file → base64 data URI wrapped in an HTML document.
//!
//! The output is a `.txt` file holding a complete HTML5 page: a comment
//! block describing the conversion, followed by a single `<img>` whose `src`
//! is a `data:<mime>;base64,<payload>` URI. Downstream tools parse this
//! layout, so [`render_document`] reproduces it byte for byte, including the
//! trailing spaces on a few lines.

use crate::error::ConvertError;
use crate::output::{ConversionDocument, ImageSource};
use crate::pipeline::{dimensions, mime, size, write_atomic};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

/// Extension given to every encoded document.
pub const OUTPUT_EXTENSION: &str = "txt";

/// Read an image from disk and resolve its MIME type from the extension.
pub fn load_image(path: &Path) -> Result<ImageSource, ConvertError> {
    let bytes = std::fs::read(path).map_err(|e| ConvertError::from_read(path, e))?;
    Ok(ImageSource {
        path: path.to_path_buf(),
        mime_type: mime::guess_mime(path).to_string(),
        file_name: crate::output::display_name(path),
        bytes,
    })
}

/// Base64-encode an image and render its document for `output_dir`.
///
/// Pure: nothing is written.
pub fn build_document(source: &ImageSource, output_dir: &Path) -> ConversionDocument {
    let payload = STANDARD.encode(&source.bytes);
    let dims = dimensions::read_dimensions(&source.bytes, &source.mime_type);
    debug!(
        "Encoded {} → {} base64 chars, dimensions {}",
        source.file_name,
        payload.len(),
        dims
    );

    let stem = file_stem(&source.path);
    let output_file_name = format!("{stem}.{OUTPUT_EXTENSION}");
    let output_path = output_dir.join(&output_file_name);

    let mut doc = ConversionDocument {
        mime_type: source.mime_type.clone(),
        payload,
        source_file_name: source.file_name.clone(),
        source_size: source.bytes.len() as u64,
        source_path: source.path.clone(),
        dimensions: dims,
        output_file_name,
        output_path,
        html: String::new(),
    };
    doc.html = render_document(&doc, &alt_text(&source.path));
    doc
}

/// Encode `image_path` and write `<output_dir>/<stem>.txt`.
pub fn encode_image(image_path: &Path, output_dir: &Path) -> Result<ConversionDocument, ConvertError> {
    let source = load_image(image_path)?;
    let doc = build_document(&source, output_dir);
    write_atomic(&doc.output_path, doc.html.as_bytes())?;
    info!(
        "Converted '{}' to Base64 and saved as '{}'",
        doc.source_file_name,
        doc.output_path.display()
    );
    Ok(doc)
}

/// Render the HTML document for an already-encoded image.
pub fn render_document(doc: &ConversionDocument, alt: &str) -> String {
    let mut dimensions_block = String::new();
    let mut size_attrs = String::new();
    if let Some((w, h)) = doc.dimensions.known() {
        dimensions_block = format!(
            "\n               Image file dimensions:\n                    Height: {h}\n                    Width: {w}"
        );
        size_attrs = format!("\n        width=\"{w}\"\n        height=\"{h}\"");
    }

    let payload_len = doc.payload.len();
    let mut out = String::with_capacity(payload_len + 2048);
    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{file_name}</title>
</head>
<body>

    <!-- \n    Source image file has been encoded/converted into a base64 format ready for HTML embedding, with the following conversion information:
        INPUT (source) image file details:     \n            Image file name: {file_name}
            Image file type: {mime}
            Image file size: {source_size}
            Image file location: {source_path}{dimensions_block}
        OUTPUT Encoded Base64 file:
            Base64 file name: {output_file_name}
            Base64 file type: text/plain
            Base64 file location: {output_path}
            Base64 file size: {payload_size:.2} bytes
            Base64 individual string length: {payload_len}
    -->
    \n    <img \n        src=\"data:{mime};base64,{payload}\" \n        alt=\"{alt}\" \n        class=\"{mime}\"
        loading=\"lazy\"
        decoding=\"async\"{size_attrs}
    />

</body>
</html>
",
        file_name = doc.source_file_name,
        mime = doc.mime_type,
        source_size = size::format_size(doc.source_size),
        source_path = doc.source_path.display(),
        output_file_name = doc.output_file_name,
        output_path = doc.output_path.display(),
        payload_size = payload_len as f64,
        payload = doc.payload,
    );
    out
}

/// `alt` text: stem plus the lowercased original extension (`png` if none).
fn alt_text(path: &Path) -> String {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "png".to_string());
    format!("{}.{}", file_stem(path), ext)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
