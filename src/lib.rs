//! # imgb64
//!
//! Convert images to self-contained HTML documents carrying a base64 data
//! URI, and convert such documents back into image files.
//!
//! ## Why this crate?
//!
//! Embedding an image as `data:<mime>;base64,...` makes a page portable: one
//! text file, no side assets. Going the other way is just as common when a
//! data URI turns up in an HTML export, a CSS file or a JSON blob and the
//! original image is wanted back. This crate does both, in batches, and
//! annotates the encoded document with the source's size and pixel
//! dimensions read straight from the PNG/JPEG/GIF/BMP header.
//!
//! ## Pipeline Overview
//!
//! ```text
//! paths / Inputs dir
//!  │
//!  ├─ 1. Input     classify by extension (image → encode, text → decode)
//!  ├─ 2a. Encode   bytes → base64 → HTML document (+ size, dimensions) → <stem>.txt
//!  ├─ 2b. Decode   first data URI → base64 decode → <stem>.<ext from MIME>
//!  └─ 3. Outcome   one ConversionOutcome per input, in input order
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgb64::{BatchSummary, Converter, ConverterConfig};
//!
//! let converter = Converter::new(ConverterConfig::default());
//! let outcomes = converter.convert_batch(&["logo.png", "page.html"], "Outputs".as_ref());
//! for o in &outcomes {
//!     match (&o.output, &o.error) {
//!         (Some(out), _) => println!("✓ {} → {}", o.input_name(), out.display()),
//!         (_, Some(err)) => eprintln!("✗ {}", err),
//!         _ => {}
//!     }
//! }
//! let summary = BatchSummary::from_outcomes(&outcomes);
//! println!("{}/{} converted", summary.succeeded, summary.total);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `imgb64` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! imgb64 = { version = "0.1", default-features = false }
//! ```
//!
//! ## Supported Formats
//!
//! | Extension | MIME | Dimensions read from |
//! |-----------|------|----------------------|
//! | `.png` | `image/png` | IHDR |
//! | `.jpg` `.jpeg` | `image/jpeg` | first SOF marker |
//! | `.gif` | `image/gif` | logical screen descriptor |
//! | `.bmp` | `image/bmp` | BITMAPINFOHEADER |
//!
//! Text inputs (`.txt`, `.html`, `.htm`) may hold the data URI anywhere.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use convert::{convert_batch, convert_bytes, convert_one, inspect, Converter};
pub use error::ConvertError;
pub use output::{
    BatchSummary, ConversionOutcome, ConvertedFile, Dimensions, Direction, ImageInfo, OutcomeDetail,
};
pub use pipeline::dimensions::read_dimensions;
pub use pipeline::size::format_size;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{convert_stream, OutcomeStream};
