//! Common test utilities for jpegli-explorer integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// An isolated environment: its own cache root and settings file
pub struct TestEnv {
    /// Temporary directory
    pub temp: TempDir,
    /// Value for `JPEGLI_EXPLORER_CACHE_DIR`
    pub cache: PathBuf,
    /// Value for `JPEGLI_EXPLORER_CONFIG`
    pub config: PathBuf,
}

impl TestEnv {
    /// Create a new test environment
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let cache = temp.path().join("cache");
        let config = temp.path().join("config.yaml");
        Self {
            temp,
            cache,
            config,
        }
    }

    /// The binary, pointed at this environment
    // Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("jpegli-explorer").expect("binary should be built");
        cmd.env("JPEGLI_EXPLORER_CACHE_DIR", &self.cache)
            .env("JPEGLI_EXPLORER_CONFIG", &self.config)
            .env_remove("RUST_LOG");
        cmd
    }

    /// Managed directory under the cache root
    pub fn managed_dir(&self) -> PathBuf {
        self.cache.join("jpegli-explorer")
    }

    /// Write a file below the temp root
    pub fn write_file(&self, path: &str, content: &[u8]) -> PathBuf {
        let file_path = self.temp.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Path below the temp root
    pub fn path(&self, path: &str) -> PathBuf {
        self.temp.path().join(path)
    }

    /// Lay out shell-script stand-ins for the two tools the way an install
    /// leaves them, each appending its arguments to `calls.log`
    #[cfg(unix)]
    #[allow(dead_code)]
    pub fn install_fake_tools(&self) -> PathBuf {
        let log = self.path("calls.log");
        let managed = self.managed_dir();
        write_script(
            &managed.join("jpegli").join("bin").join("cjpegli.exe"),
            &format!(
                "echo \"cjpegli $*\" >> '{}'\nhead -c 3 \"$1\" > \"$2\"",
                log.display()
            ),
        );
        write_script(
            &managed.join("exiftool").join("exiftool.exe"),
            &format!("echo \"exiftool $*\" >> '{}'", log.display()),
        );
        log
    }
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to chmod script");
}

#[cfg(not(unix))]
#[allow(dead_code)]
fn write_script(_path: &Path, _body: &str) {}
