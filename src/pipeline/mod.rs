//! Conversion stages.
//!
//! Each submodule implements exactly one step and is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─ encode ──▶ dimensions + size ──▶ <stem>.txt
//! input ──▶ ─┤
//! (scan)     └─ decode ──▶ mime table ─────────▶ <stem>.<ext>
//! ```
//!
//! 1. [`input`]      — collect convertible files and classify them by extension
//! 2. [`encode`]     — image bytes → base64 → HTML document
//! 3. [`decode`]     — first data URI in a text file → image bytes
//! 4. [`dimensions`] — width/height from PNG/JPEG/GIF/BMP headers
//! 5. [`mime`]       — extension → MIME and MIME → extension tables
//! 6. [`size`]       — human-readable byte counts

pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod input;
pub mod mime;
pub mod size;

use crate::error::ConvertError;
use std::io::Write;
use std::path::Path;

/// Write `data` to `path` via a uniquely named sibling temp file and a
/// rename, so a failed write never leaves a partial output behind and
/// concurrent writers to the same target never share a temp file.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ConvertError> {
    let write_err = |source| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut builder = tempfile::Builder::new();
    builder.prefix(".imgb64-").suffix(".tmp");
    // Temp files default to 0600; give outputs the usual 0666 & !umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    // Dropping the temp file on any error path removes it.
    let mut tmp = builder.tempfile_in(dir).map_err(write_err)?;
    tmp.write_all(data).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
