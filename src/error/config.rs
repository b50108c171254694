//! Settings file errors

use super::JpegliError;

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config write failed error
pub fn write_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::ConfigWriteFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> JpegliError {
    JpegliError::ConfigInvalid {
        message: message.into(),
    }
}
