//! Input collection for conversion

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, convert, fs as fs_error};

/// Extensions `cjpegli` accepts as input
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "jxl", "ppm", "pnm", "pfm", "pam", "pgx", "png", "apng", "gif",
];

/// Whether `path` has a supported image extension (case-insensitive)
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
}

/// Whether `path` is already a JPEG
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

/// Collect the images to convert from a file or folder
///
/// Folders are read one level deep. The result is sorted and never empty.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let metadata =
        fs::metadata(input).map_err(|_| convert::input_not_found(input.display().to_string()))?;

    let mut files = Vec::new();
    if metadata.is_dir() {
        let entries = fs::read_dir(input).map_err(|e| {
            fs_error::io_error(format!("Failed to read {}: {e}", input.display()))
        })?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                warn!("Skipping subdirectory {}", path.display());
                continue;
            }
            if is_supported_image(&path) {
                files.push(path);
            }
        }
        files.sort();
    } else if is_supported_image(input) {
        files.push(input.to_path_buf());
    }

    if files.is_empty() {
        return Err(convert::no_compatible_files(input.display().to_string()));
    }
    Ok(files)
}
