//! Configuration for the conversion dispatcher.
//!
//! The supported-extension lists and output-directory policy are values on
//! [`ConverterConfig`] rather than module-level constants, so the same core
//! can run behind the CLI, a batch job, or a request handler with different
//! settings and no hidden coupling.

use crate::error::ConvertError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Image extensions routed to the encoder by default.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp"];

/// Text extensions routed to the decoder by default.
pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &["txt", "html", "htm"];

/// Configuration for a [`crate::convert::Converter`].
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use imgb64::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .image_extensions([".PNG", "jpg"])
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.image_extensions, vec!["png", "jpg"]);
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// Lowercase extensions (no dot) sent to the encoder.
    pub image_extensions: Vec<String>,

    /// Lowercase extensions (no dot) sent to the decoder. Their content is
    /// searched for a data URI regardless of which one it is.
    pub text_extensions: Vec<String>,

    /// Create the output directory before writing when it is missing. Default: true.
    pub create_output_dir: bool,

    /// Maximum in-flight conversions for the concurrent batch and stream APIs. Default: 4.
    ///
    /// The sequential [`crate::convert::Converter::convert_batch`] ignores it.
    pub concurrency: usize,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            text_extensions: DEFAULT_TEXT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            create_output_dir: true,
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("image_extensions", &self.image_extensions)
            .field("text_extensions", &self.text_extensions)
            .field("create_output_dir", &self.create_output_dir)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// True when `ext` (any case, with or without dot) is an image extension.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        let ext = normalise_extension(ext);
        self.image_extensions.iter().any(|e| *e == ext)
    }

    /// True when `ext` (any case, with or without dot) is a text extension.
    pub fn is_text_extension(&self, ext: &str) -> bool {
        let ext = normalise_extension(ext);
        self.text_extensions.iter().any(|e| *e == ext)
    }
}

/// Builder for [`ConverterConfig`].
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl fmt::Debug for ConverterConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConverterConfigBuilder {
    pub fn image_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.image_extensions = normalise_list(exts);
        self
    }

    pub fn text_extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.text_extensions = normalise_list(exts);
        self
    }

    pub fn create_output_dir(mut self, v: bool) -> Self {
        self.config.create_output_dir = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, ConvertError> {
        let c = &self.config;
        if c.image_extensions.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "at least one image extension is required".into(),
            ));
        }
        if c.text_extensions.is_empty() {
            return Err(ConvertError::InvalidConfig(
                "at least one text extension is required".into(),
            ));
        }
        if let Some(dup) = c
            .image_extensions
            .iter()
            .find(|e| c.text_extensions.contains(e))
        {
            return Err(ConvertError::InvalidConfig(format!(
                "extension '.{dup}' cannot be both an image and a text extension"
            )));
        }
        if c.concurrency == 0 {
            return Err(ConvertError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}

/// Strip a leading dot and lowercase.
pub(crate) fn normalise_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

fn normalise_list<I, S>(exts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for e in exts {
        let e = normalise_extension(e.as_ref());
        if !e.is_empty() && !out.contains(&e) {
            out.push(e);
        }
    }
    out
}
