//! Human-readable byte counts.

const UNITS: [&str; 6] = ["bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary (1024) steps and two decimals.
///
/// `0 → "0.00 bytes"`, `1536 → "1.50 KB"`. Values past the terabyte range
/// stay in `PB` however large they get.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
