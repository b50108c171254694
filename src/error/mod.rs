//! Error types and handling for jpegli-explorer
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`archive`]: Archive extraction errors
//! - [`provision`]: Provisioning errors (managed directory, self-copy, tools)
//! - [`config`]: Settings file errors
//! - [`fs`]: File system errors
//! - [`convert`]: Input collection and conversion errors

pub mod archive;
pub mod config;
pub mod convert;
pub mod fs;
pub mod provision;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for jpegli-explorer operations
#[derive(Error, Diagnostic, Debug)]
pub enum JpegliError {
    // Archive errors
    #[error("Archive entry '{entry}' escapes destination {destination}")]
    #[diagnostic(
        code(jpegli::archive::path_traversal),
        help("The archive is malformed or malicious; nothing outside the destination was written")
    )]
    PathTraversal { entry: String, destination: String },

    #[error("Failed to open archive {path}: {reason}")]
    #[diagnostic(code(jpegli::archive::open_failed))]
    ArchiveOpenFailed { path: String, reason: String },

    #[error("Failed to extract archive entry '{entry}': {reason}")]
    #[diagnostic(code(jpegli::archive::entry_failed))]
    ArchiveEntryFailed { entry: String, reason: String },

    // Provisioning errors
    #[error("Could not determine the user cache directory")]
    #[diagnostic(
        code(jpegli::provision::cache_dir_unavailable),
        help("Set JPEGLI_EXPLORER_CACHE_DIR to choose a location")
    )]
    CacheDirUnavailable,

    #[error("Failed to copy executable to {path}: {reason}")]
    #[diagnostic(code(jpegli::provision::self_relocation_failed))]
    SelfRelocationFailed { path: String, reason: String },

    #[error("{tool} executable not found in {searched}")]
    #[diagnostic(
        code(jpegli::provision::tool_not_found),
        help("Run 'jpegli-explorer install' to provision the bundled tools")
    )]
    ToolNotFound { tool: String, searched: String },

    #[error("Failed to register shell integration at {key}: {reason}")]
    #[diagnostic(code(jpegli::provision::registration_failed))]
    RegistrationFailed { key: String, reason: String },

    // Configuration errors
    #[error("Failed to parse settings file: {path}: {reason}")]
    #[diagnostic(
        code(jpegli::config::parse_failed),
        help("Fix or delete the file to fall back to default settings")
    )]
    ConfigParseFailed { path: String, reason: String },

    #[error("Failed to write settings file: {path}: {reason}")]
    #[diagnostic(code(jpegli::config::write_failed))]
    ConfigWriteFailed { path: String, reason: String },

    #[error("Invalid setting: {message}")]
    #[diagnostic(code(jpegli::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to create directory {path}: {reason}")]
    #[diagnostic(code(jpegli::fs::create_dir_failed))]
    DirectoryCreateFailed { path: String, reason: String },

    #[error("Failed to write file {path}: {reason}")]
    #[diagnostic(code(jpegli::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(jpegli::fs::io_error))]
    IoError { message: String },

    // Conversion errors
    #[error("Input not found: {path}")]
    #[diagnostic(code(jpegli::convert::input_not_found))]
    InputNotFound { path: String },

    #[error("No compatible image files found in {path}")]
    #[diagnostic(
        code(jpegli::convert::no_compatible_files),
        help("Compatible formats: .jpg, .jpeg, .jxl, .ppm, .pnm, .pfm, .pam, .pgx, .png, .apng, .gif")
    )]
    NoCompatibleFiles { path: String },

    #[error("{tool} failed: {reason}")]
    #[diagnostic(code(jpegli::convert::tool_failed))]
    ConversionFailed { tool: String, reason: String },
}

impl From<std::io::Error> for JpegliError {
    fn from(err: std::io::Error) -> Self {
        JpegliError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for JpegliError {
    fn from(err: serde_json::Error) -> Self {
        JpegliError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, JpegliError>;

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_error_contains {
        ($test_name:ident, $err:expr, $($contains:expr),+ $(,)?) => {
            #[test]
            fn $test_name() {
                let err = $err;
                let error_string = err.to_string();
                $(
                    assert!(error_string.contains($contains),
                        "Error message should contain '{}', got: {}",
                        $contains,
                        error_string
                    );
                )+
            }
        };
    }

    #[test]
    fn test_error_code() {
        let err = archive::path_traversal("../evil", "/tmp/dest");
        assert_eq!(
            err.code().map(|c| c.to_string()),
            Some("jpegli::archive::path_traversal".to_string())
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: JpegliError = io_err.into();
        assert!(matches!(err, JpegliError::IoError { .. }));
    }

    test_error_contains!(
        test_path_traversal_names_entry,
        archive::path_traversal("../evil", "/cache/jpegli"),
        "../evil",
        "/cache/jpegli"
    );

    test_error_contains!(
        test_tool_not_found,
        provision::tool_not_found("cjpegli", "/cache/jpegli-explorer"),
        "cjpegli executable not found",
        "/cache/jpegli-explorer"
    );

    test_error_contains!(
        test_self_relocation_failed,
        provision::self_relocation_failed("/cache/app", "permission denied"),
        "Failed to copy executable",
        "permission denied"
    );

    test_error_contains!(
        test_cache_dir_unavailable,
        JpegliError::CacheDirUnavailable,
        "cache directory"
    );

    test_error_contains!(
        test_config_parse_failed,
        config::parse_failed("/cfg/config.yaml", "bad yaml"),
        "Failed to parse settings file",
        "/cfg/config.yaml"
    );

    test_error_contains!(
        test_conversion_failed,
        convert::tool_failed("cjpegli", "exit status: 1"),
        "cjpegli failed",
        "exit status: 1"
    );

    test_error_contains!(
        test_no_compatible_files,
        convert::no_compatible_files("/photos"),
        "No compatible image files found in /photos"
    );

    test_error_contains!(
        test_directory_create_failed,
        fs::create_dir_failed("/readonly/dir", "permission denied"),
        "Failed to create directory /readonly/dir"
    );
}
