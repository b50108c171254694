//! File system errors

use super::JpegliError;

/// Creates a directory creation failed error
pub fn create_dir_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::DirectoryCreateFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a file write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::FileWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> JpegliError {
    JpegliError::IoError {
        message: message.into(),
    }
}
