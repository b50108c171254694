//! Archive extraction errors

use super::JpegliError;

/// Creates a path traversal (zip-slip) error
pub fn path_traversal(entry: impl Into<String>, destination: impl Into<String>) -> JpegliError {
    JpegliError::PathTraversal {
        entry: entry.into(),
        destination: destination.into(),
    }
}

/// Creates an archive open failed error
pub fn open_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::ArchiveOpenFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an archive entry failed error
pub fn entry_failed(entry: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::ArchiveEntryFailed {
        entry: entry.into(),
        reason: reason.into(),
    }
}
