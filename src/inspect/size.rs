//! Human-readable byte sizes

use std::fs;
use std::path::Path;

use crate::error::FsError;

/// Largest number of decimals accepted by the formatters
pub const MAX_PRECISION: usize = 16;

const UNITS: [&str; 7] = ["bytes", "KB", "MB", "GB", "TB", "PB", "EB"];

/// Formats a byte count with the largest unit that keeps the value below
/// 1024, e.g. `format_size(1048576, 2) == "1.00 MB"`.
///
/// # Panics
///
/// Panics if `precision` exceeds [`MAX_PRECISION`].
pub fn format_size(bytes: u64, precision: usize) -> String {
    assert!(
        precision <= MAX_PRECISION,
        "precision must be at most {MAX_PRECISION}, got {precision}"
    );

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.*} {}", precision, size, UNITS[unit])
}

/// Formats the size of the file at `path`.
pub fn format_path_size(path: &Path, precision: usize) -> Result<String, FsError> {
    let metadata = fs::metadata(path).map_err(|e| FsError::from_io(path, e))?;
    Ok(format_size(metadata.len(), precision))
}
