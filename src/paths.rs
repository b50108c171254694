//! Managed application directory
//!
//! All provisioning artifacts live under a single per-user directory:
//!
//! ```text
//! <user-cache-root>/jpegli-explorer/
//! ├── jpegli-explorer[.exe]      (copy of the running executable)
//! ├── <archive>.zip              (copy of each bundled archive)
//! └── <archive>/...              (extraction tree per archive)
//! ```
//!
//! [`ManagedDirectory::resolve`] is a pure function of the cache root; the
//! environment is only consulted by [`ManagedDirectory::from_env`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{JpegliError, Result};

/// Application name, used for the managed directory and the self-copy
pub const APP_NAME: &str = "jpegli-explorer";

/// Environment variable overriding the user cache root
pub const CACHE_DIR_ENV: &str = "JPEGLI_EXPLORER_CACHE_DIR";

/// Extension of bundled archives
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// The per-user directory owning every provisioned artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedDirectory {
    root: PathBuf,
}

impl ManagedDirectory {
    /// Resolve the managed directory under an explicit cache root
    pub fn resolve(cache_root: &Path) -> Self {
        Self {
            root: cache_root.join(APP_NAME),
        }
    }

    /// Resolve the managed directory from the environment
    ///
    /// Uses `JPEGLI_EXPLORER_CACHE_DIR` when set, otherwise the platform's
    /// standard cache location (XDG on Linux, Library/Caches on macOS,
    /// `%LOCALAPPDATA%` on Windows).
    pub fn from_env() -> Result<Self> {
        if let Ok(cache_root) = std::env::var(CACHE_DIR_ENV) {
            return Ok(Self::resolve(Path::new(&cache_root)));
        }

        let cache_root = dirs::cache_dir().ok_or(JpegliError::CacheDirUnavailable)?;
        Ok(Self::resolve(&cache_root))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Path of the copy of the running executable
    pub fn self_copy_path(&self) -> PathBuf {
        self.root
            .join(format!("{APP_NAME}{}", std::env::consts::EXE_SUFFIX))
    }

    /// Path where a bundled archive's bytes are written before extraction
    pub fn archive_path(&self, archive_name: &str) -> PathBuf {
        self.root.join(archive_name)
    }

    /// Extraction tree for an archive: the archive name without `.zip`
    pub fn extraction_dir(&self, archive_name: &str) -> PathBuf {
        let stem = archive_name
            .strip_suffix(ARCHIVE_EXTENSION)
            .unwrap_or(archive_name);
        self.root.join(stem)
    }

    /// Existing extraction trees, sorted by name
    ///
    /// Returns an empty list when the managed directory does not exist.
    pub fn extraction_trees(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut trees: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        trees.sort();
        trees
    }

    /// Delete the managed directory and everything below it
    ///
    /// A directory that does not exist is not an error.
    pub fn reset_all(&self) -> Result<()> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                debug!("Deleted {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(JpegliError::IoError {
                message: format!("Failed to delete {}: {e}", self.root.display()),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_is_pure() {
        let root = Path::new("/home/user/.cache");
        let first = ManagedDirectory::resolve(root);
        let second = ManagedDirectory::resolve(root);
        assert_eq!(first, second);
        assert_eq!(first.path(), Path::new("/home/user/.cache/jpegli-explorer"));
        assert!(!first.path().exists());
    }

    #[test]
    fn test_layout_paths() {
        let managed = ManagedDirectory::resolve(Path::new("/cache"));
        assert_eq!(
            managed.archive_path("exiftool.zip"),
            PathBuf::from("/cache/jpegli-explorer/exiftool.zip")
        );
        assert_eq!(
            managed.extraction_dir("exiftool.zip"),
            PathBuf::from("/cache/jpegli-explorer/exiftool")
        );
        assert!(
            managed
                .self_copy_path()
                .starts_with("/cache/jpegli-explorer")
        );
        assert!(
            managed
                .self_copy_path()
                .to_string_lossy()
                .contains("jpegli-explorer/jpegli-explorer")
        );
    }

    #[test]
    fn test_extraction_dir_without_zip_extension() {
        let managed = ManagedDirectory::resolve(Path::new("/cache"));
        assert_eq!(
            managed.extraction_dir("tools"),
            PathBuf::from("/cache/jpegli-explorer/tools")
        );
    }

    #[test]
    fn test_reset_all_removes_everything() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());
        fs::create_dir_all(managed.path().join("jpegli/bin")).expect("Failed to create tree");
        fs::write(managed.path().join("jpegli.zip"), b"zip").expect("Failed to write archive");

        managed.reset_all().expect("reset should succeed");

        assert!(!managed.path().exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn test_reset_all_missing_directory_is_ok() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());
        assert!(managed.reset_all().is_ok());
    }

    #[test]
    fn test_extraction_trees_sorted_and_dirs_only() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());
        fs::create_dir_all(managed.path().join("jpegli")).expect("Failed to create dir");
        fs::create_dir_all(managed.path().join("exiftool")).expect("Failed to create dir");
        fs::write(managed.path().join("exiftool.zip"), b"zip").expect("Failed to write");

        let trees = managed.extraction_trees();
        assert_eq!(
            trees,
            vec![
                managed.path().join("exiftool"),
                managed.path().join("jpegli")
            ]
        );
    }

    #[test]
    fn test_extraction_trees_missing_directory() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let managed = ManagedDirectory::resolve(temp.path());
        assert!(managed.extraction_trees().is_empty());
        assert!(!managed.path().exists());
    }

    #[test]
    #[serial]
    fn test_from_env_uses_override() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let original = std::env::var(CACHE_DIR_ENV).ok();
        unsafe {
            std::env::set_var(CACHE_DIR_ENV, temp.path());
        }

        let managed = ManagedDirectory::from_env().expect("should resolve");
        assert_eq!(managed.path(), temp.path().join(APP_NAME));

        unsafe {
            if let Some(o) = original {
                std::env::set_var(CACHE_DIR_ENV, o);
            } else {
                std::env::remove_var(CACHE_DIR_ENV);
            }
        }
    }
}
