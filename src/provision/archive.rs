//! Zip archive extraction with path-traversal protection
//!
//! Every entry is joined onto the destination and checked to stay strictly
//! inside it before anything is written for that entry. A single escaping
//! entry aborts the whole archive.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{JpegliError, Result, archive, fs as fs_error};
use crate::path_utils;

/// Permission bits of a zip entry's declared unix mode
const PERMISSION_BITS: u32 = 0o7777;

/// Extract `archive_path` into `destination`
///
/// Returns the number of files written.
pub fn extract_zip(archive_path: &Path, destination: &Path) -> Result<usize> {
    let file = File::open(archive_path)
        .map_err(|e| archive::open_failed(archive_path.display().to_string(), e.to_string()))?;
    let mut zip = ZipArchive::new(file)
        .map_err(|e| archive::open_failed(archive_path.display().to_string(), e.to_string()))?;

    create_dir(destination)?;

    let mut files_written = 0;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| archive::entry_failed(format!("#{index}"), e.to_string()))?;
        let name = entry.name().to_string();

        // Absolute names and `..` climbing above the root have no enclosed name
        let Some(relative) = entry.enclosed_name() else {
            return Err(archive::path_traversal(
                name,
                destination.display().to_string(),
            ));
        };
        let target = destination.join(relative);
        if !path_utils::is_strictly_within(destination, &target) {
            return Err(archive::path_traversal(
                name,
                destination.display().to_string(),
            ));
        }
        let mode = entry.unix_mode().map(|m| m & PERMISSION_BITS);

        if entry.is_dir() {
            create_dir(&target)?;
            apply_mode(&target, mode)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }

        let mut out = create_file(&target, mode)?;
        io::copy(&mut entry, &mut out).map_err(|e| archive::entry_failed(&name, e.to_string()))?;
        drop(out);
        apply_mode(&target, mode)?;

        debug!("Extracted {}", target.display());
        files_written += 1;
    }

    Ok(files_written)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| fs_error::create_dir_failed(path.display().to_string(), e.to_string()))
}

#[cfg(unix)]
fn create_file(path: &Path, mode: Option<u32>) -> Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    if let Some(mode) = mode {
        options.mode(mode);
    }
    options
        .open(path)
        .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
}

#[cfg(not(unix))]
fn create_file(path: &Path, _mode: Option<u32>) -> Result<File> {
    File::create(path)
        .map_err(|e| fs_error::write_failed(path.display().to_string(), e.to_string()))
}

/// Set the declared mode explicitly; the umask applies at creation time
#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let Some(mode) = mode else {
        return Ok(());
    };
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        JpegliError::IoError {
            message: format!("Failed to set mode {mode:o} on {}: {e}", path.display()),
        }
    })
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> Result<()> {
    Ok(())
}
