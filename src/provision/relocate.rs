//! Copy the running executable into the managed directory
//!
//! The shell integration points at this copy, so the context menu keeps
//! working after the downloaded binary is moved or deleted.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Result, provision};
use crate::paths::ManagedDirectory;

/// Path of the currently running executable
pub fn current_executable() -> Result<PathBuf> {
    std::env::current_exe().map_err(|e| {
        provision::self_relocation_failed("<current executable>", e.to_string())
    })
}

/// Contents of an executable captured in memory
///
/// Reading happens before the managed directory is reset, so a reinstall
/// started from the self-copy still has the bytes after the reset deletes
/// that file.
#[derive(Debug)]
pub struct ExecutableImage {
    source: PathBuf,
    bytes: Vec<u8>,
    permissions: fs::Permissions,
}

impl ExecutableImage {
    /// Read `source` and its permissions
    pub fn read(source: &Path, managed: &ManagedDirectory) -> Result<Self> {
        let fail = |reason: String| {
            provision::self_relocation_failed(managed.self_copy_path().display().to_string(), reason)
        };

        let bytes = fs::read(source)
            .map_err(|e| fail(format!("cannot read {}: {e}", source.display())))?;
        let permissions = fs::metadata(source)
            .map_err(|e| fail(format!("cannot stat {}: {e}", source.display())))?
            .permissions();

        Ok(Self {
            source: source.to_path_buf(),
            bytes,
            permissions,
        })
    }

    /// Write the image to the managed directory's self-copy path
    ///
    /// Creates the managed directory when needed and overwrites a previous copy.
    pub fn write_to(&self, managed: &ManagedDirectory) -> Result<PathBuf> {
        let target = managed.self_copy_path();
        let fail =
            |reason: String| provision::self_relocation_failed(target.display().to_string(), reason);

        fs::create_dir_all(managed.path()).map_err(|e| {
            fail(format!(
                "cannot create {}: {e}",
                managed.path().display()
            ))
        })?;

        // A running image that survived the reset cannot be rewritten on Windows
        if is_same_file(&self.source, &target) {
            info!("Already running from {}", target.display());
            return Ok(target);
        }

        fs::write(&target, &self.bytes).map_err(|e| fail(format!("cannot write file: {e}")))?;
        apply_permissions(&target, &self.permissions)
            .map_err(|e| fail(format!("cannot set permissions: {e}")))?;

        info!("Executable copied to {}", target.display());
        Ok(target)
    }
}

fn is_same_file(source: &Path, target: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(target)) {
        (Ok(source), Ok(target)) => source == target,
        _ => false,
    }
}

#[cfg(unix)]
fn apply_permissions(target: &Path, permissions: &fs::Permissions) -> io::Result<()> {
    fs::set_permissions(target, permissions.clone())
}

#[cfg(not(unix))]
fn apply_permissions(_target: &Path, _permissions: &fs::Permissions) -> io::Result<()> {
    Ok(())
}
