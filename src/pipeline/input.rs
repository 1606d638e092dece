//! Input resolution: classify paths by extension and scan input directories.
//!
//! Classification looks at the lowercase extension only. Text candidates
//! are not opened here; whether they really hold a data URI is the
//! decoder's business.

use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::output::Direction;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Route a path to the encoder or decoder, or `None` when unsupported.
pub fn classify(path: &Path, config: &ConverterConfig) -> Option<Direction> {
    let ext = path.extension()?.to_string_lossy();
    if config.is_image_extension(&ext) {
        Some(Direction::Encode)
    } else if config.is_text_extension(&ext) {
        Some(Direction::Decode)
    } else {
        None
    }
}

/// Files found by [`scan_input_dir`], split by direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedInputs {
    pub images: Vec<PathBuf>,
    pub texts: Vec<PathBuf>,
}

impl ScannedInputs {
    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.texts.len()
    }

    /// Images first, then text files.
    pub fn into_paths(self) -> Vec<PathBuf> {
        let mut all = self.images;
        all.extend(self.texts);
        all
    }
}

/// List the convertible files directly inside `dir` (not recursive).
///
/// Each group is sorted by file name. A missing directory yields an empty
/// result so batch mode can fall back; an unreadable one is an error.
pub fn scan_input_dir(dir: &Path, config: &ConverterConfig) -> Result<ScannedInputs, ConvertError> {
    let mut found = ScannedInputs::default();
    if !dir.is_dir() {
        debug!("Input directory {} does not exist", dir.display());
        return Ok(found);
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ConvertError::from_read(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ConvertError::from_read(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match classify(&path, config) {
            Some(Direction::Encode) => found.images.push(path),
            Some(Direction::Decode) => found.texts.push(path),
            None => {}
        }
    }
    found.images.sort();
    found.texts.sort();
    debug!(
        "Scanned {}: {} image(s), {} text file(s)",
        dir.display(),
        found.images.len(),
        found.texts.len()
    );
    Ok(found)
}
