//! Integration tests for imgb64 against real encoder output.
//!
//! Fixtures are produced with the `image` crate at test time, which also
//! serves as the reference decoder for pixel dimensions. Everything runs in
//! temporary directories; no network, no checked-in binaries.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::StreamExt;
use image::{ImageFormat, RgbImage, RgbaImage};
use imgb64::{
    convert_batch, convert_bytes, convert_one, convert_stream, inspect, read_dimensions, BatchSummary,
    Converter, ConverterConfig, Dimensions, Direction,
};
use std::path::{Path, PathBuf};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Route library logs to the test harness; `RUST_LOG=imgb64=debug` to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Write a `w`×`h` image in `format` to `dir/name` and return its path.
fn write_fixture(dir: &Path, name: &str, w: u32, h: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    match format {
        // GIF frames are RGBA.
        ImageFormat::Gif => RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, 7, 255]))
            .save_with_format(&path, format),
        _ => RgbImage::from_fn(w, h, |x, y| image::Rgb([x as u8 * 9, y as u8 * 5, 128])).save_with_format(&path, format),
    }
    .unwrap();
    path
}

fn fixtures(dir: &Path) -> Vec<PathBuf> {
    vec![
        write_fixture(dir, "pixel.png", 2, 2, ImageFormat::Png),
        write_fixture(dir, "photo.jpg", 17, 9, ImageFormat::Jpeg),
        write_fixture(dir, "photo2.jpeg", 8, 31, ImageFormat::Jpeg),
        write_fixture(dir, "anim.gif", 12, 5, ImageFormat::Gif),
        write_fixture(dir, "bitmap.bmp", 3, 11, ImageFormat::Bmp),
    ]
}

fn src_attr_payload(html: &str) -> &str {
    let start = html.find(";base64,").unwrap() + ";base64,".len();
    let end = start + html[start..].find('"').unwrap();
    &html[start..end]
}

// ── Encoding ─────────────────────────────────────────────────────────────────

#[test]
fn header_dimensions_match_reference_decoder() {
    let dir = tempfile::tempdir().unwrap();
    for path in fixtures(dir.path()) {
        let bytes = std::fs::read(&path).unwrap();
        let mime = match path.extension().unwrap().to_str().unwrap() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            _ => "image/bmp",
        };
        let (w, h) = image::image_dimensions(&path).unwrap();
        assert_eq!(read_dimensions(&bytes, mime), Dimensions::new(w, h), "{}", path.display());
        assert_eq!(inspect(&path).unwrap().dimensions, Dimensions::new(w, h));
    }
}

#[test]
fn two_by_two_png_gets_size_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_fixture(dir.path(), "pixel.png", 2, 2, ImageFormat::Png);
    let out = dir.path().join("Outputs");

    let outcome = convert_one(&img, &out);
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(outcome.direction, Some(Direction::Encode));

    let html = std::fs::read_to_string(out.join("pixel.txt")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">\n"));
    assert!(html.contains("<title>pixel.png</title>"));
    assert!(html.contains("width=\"2\""));
    assert!(html.contains("height=\"2\""));
    assert!(html.contains("Height: 2\n                    Width: 2"));
    assert!(html.contains("alt=\"pixel.png\""));
    assert!(html.contains("class=\"image/png\""));
    assert_eq!(STANDARD.decode(src_attr_payload(&html)).unwrap(), std::fs::read(&img).unwrap());
}

#[test]
fn document_reports_source_and_payload_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_fixture(dir.path(), "bitmap.bmp", 3, 11, ImageFormat::Bmp);
    let size = std::fs::metadata(&img).unwrap().len();
    let out = dir.path().join("out");

    convert_one(&img, &out);
    let html = std::fs::read_to_string(out.join("bitmap.txt")).unwrap();
    let payload_len = src_attr_payload(&html).len();
    assert_eq!(payload_len as u64, (size + 2) / 3 * 4);
    assert!(html.contains(&format!("Image file size: {}", imgb64::format_size(size))));
    assert!(html.contains(&format!("Base64 file size: {payload_len}.00 bytes")));
    assert!(html.contains(&format!("Base64 individual string length: {payload_len}")));
}

// ── Round trip ───────────────────────────────────────────────────────────────

#[test]
fn encode_then_decode_restores_identical_bytes() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let inputs = dir.path().join("Inputs");
    std::fs::create_dir(&inputs).unwrap();
    let images = fixtures(&inputs);
    let encoded_dir = dir.path().join("encoded");
    let decoded_dir = dir.path().join("decoded");

    let encoded = convert_batch(&images, &encoded_dir);
    assert!(encoded.iter().all(|o| o.success));
    let texts: Vec<PathBuf> = encoded.iter().map(|o| o.output.clone().unwrap()).collect();

    let decoded = convert_batch(&texts, &decoded_dir);
    for (img, outcome) in images.iter().zip(&decoded) {
        assert!(outcome.success, "{:?}", outcome.error);
        let restored = outcome.output.as_ref().unwrap();
        assert_eq!(std::fs::read(restored).unwrap(), std::fs::read(img).unwrap());
    }

    // .jpeg round-trips to .jpg since the extension follows the MIME type.
    let names: Vec<String> = decoded
        .iter()
        .map(|o| o.output.as_ref().unwrap().file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["pixel.png", "photo.jpg", "photo2.jpg", "anim.gif", "bitmap.bmp"]);
}

#[test]
fn jpeg_data_uri_in_css_decodes_to_jpg() {
    let dir = tempfile::tempdir().unwrap();
    let jpg = write_fixture(dir.path(), "src.jpg", 4, 4, ImageFormat::Jpeg);
    let bytes = std::fs::read(&jpg).unwrap();
    let css = dir.path().join("styles.txt");
    std::fs::write(
        &css,
        format!(".hero {{ background: url(data:image/jpeg;base64,{}); }}\n", STANDARD.encode(&bytes)),
    )
    .unwrap();

    let out = dir.path().join("out");
    let outcome = convert_one(&css, &out);
    assert!(outcome.success);
    assert_eq!(outcome.output.as_deref(), Some(out.join("styles.jpg").as_path()));
    assert_eq!(std::fs::read(out.join("styles.jpg")).unwrap(), bytes);
    assert_eq!(image::image_dimensions(out.join("styles.jpg")).unwrap(), (4, 4));
}

#[test]
fn text_without_data_uri_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("index.html");
    std::fs::write(&page, "<html><body><img src=\"logo.png\"></body></html>").unwrap();
    let out = dir.path().join("out");

    let outcome = convert_one(&page, &out);
    assert!(!outcome.success);
    assert!(outcome.error.unwrap().contains("No valid base64 data found"));
    assert_eq!(std::fs::read_dir(&out).map(|d| d.count()).unwrap_or(0), 0);
}

// ── Batches ──────────────────────────────────────────────────────────────────

#[test]
fn batch_with_unsupported_files_keeps_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixtures(dir.path());
    for (i, name) in ["report.pdf", "archive.zip", "notes"].iter().enumerate() {
        let p = dir.path().join(name);
        std::fs::write(&p, b"whatever").unwrap();
        paths.insert(i * 2, p);
    }

    let out = dir.path().join("out");
    let outcomes = convert_batch(&paths, &out);
    assert_eq!(outcomes.len(), paths.len());
    for (o, p) in outcomes.iter().zip(&paths) {
        assert_eq!(&o.input, p);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    assert_eq!(summary.total, 8);
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.unsupported, 3);
    assert_eq!(summary.encoded, 5);
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 5);
}

#[tokio::test]
async fn concurrent_and_streaming_batches_agree_with_sequential() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut paths = fixtures(dir.path());
    paths.push(dir.path().join("missing.gif"));
    let converter = Converter::new(ConverterConfig::builder().concurrency(3).build().unwrap());

    let sequential = converter.convert_batch(&paths, &dir.path().join("seq"));
    let concurrent = converter
        .convert_batch_concurrent(&paths, &dir.path().join("conc"))
        .await;
    let mut streamed: Vec<_> = convert_stream(&converter, paths.clone(), dir.path().join("stream"))
        .collect()
        .await;
    streamed.sort_by_key(|(i, _)| *i);

    assert_eq!(concurrent.len(), sequential.len());
    assert_eq!(streamed.len(), sequential.len());
    for ((s, c), (_, st)) in sequential.iter().zip(&concurrent).zip(&streamed) {
        assert_eq!(s.input, c.input);
        assert_eq!(s.input, st.input);
        assert_eq!(s.success, c.success);
        assert_eq!(s.success, st.success);
        assert_eq!(s.detail, c.detail);
    }
    assert!(!concurrent.last().unwrap().success);

    let seq_doc = std::fs::read(dir.path().join("seq").join("anim.txt")).unwrap();
    let conc_doc = std::fs::read(dir.path().join("conc").join("anim.txt")).unwrap();
    // Documents embed their own output location, so compare payloads only.
    let a = String::from_utf8(seq_doc).unwrap();
    let b = String::from_utf8(conc_doc).unwrap();
    assert_eq!(src_attr_payload(&a), src_attr_payload(&b));
}

// ── In-memory ────────────────────────────────────────────────────────────────

#[test]
fn convert_bytes_round_trips_without_touching_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let gif = write_fixture(dir.path(), "upload.gif", 6, 6, ImageFormat::Gif);
    let bytes = std::fs::read(&gif).unwrap();
    let config = ConverterConfig::default();

    let encoded = convert_bytes("upload.gif", &bytes, &config).unwrap();
    assert_eq!(encoded.file_name, "upload.txt");
    let decoded = convert_bytes(&encoded.file_name, &encoded.data, &config).unwrap();
    assert_eq!(decoded.file_name, "upload.gif");
    assert_eq!(decoded.data, bytes);
}

// ── Entry points ─────────────────────────────────────────────────────────────

#[test]
fn converter_methods_report_outcomes_and_stages_return_results() {
    let dir = tempfile::tempdir().unwrap();
    let img = write_fixture(dir.path(), "dot.png", 1, 1, ImageFormat::Png);
    let out = dir.path().join("out");
    let converter = Converter::default();

    let encoded = converter.encode_image(&img, &out);
    assert!(encoded.success);
    let txt = encoded.output.unwrap();
    let decoded = converter.decode_to_image(&txt, &dir.path().join("back"));
    assert!(decoded.success);

    let doc = imgb64::pipeline::encode::encode_image(&img, &out).unwrap();
    assert_eq!(doc.output_path, txt);
    let restored = imgb64::pipeline::decode::decode_to_image(&txt, &out).unwrap();
    assert_eq!(restored.bytes, std::fs::read(&img).unwrap());

    let missing = converter.decode_to_image(&dir.path().join("gone.txt"), &out);
    assert!(!missing.success);
    assert!(missing.error.unwrap().contains("File not found"));
}
