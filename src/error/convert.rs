//! Input collection and conversion errors

use super::JpegliError;

/// Creates an input not found error
pub fn input_not_found(path: impl Into<String>) -> JpegliError {
    JpegliError::InputNotFound { path: path.into() }
}

/// Creates a no compatible files error
pub fn no_compatible_files(path: impl Into<String>) -> JpegliError {
    JpegliError::NoCompatibleFiles { path: path.into() }
}

/// Creates an external tool failure error
pub fn tool_failed(tool: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::ConversionFailed {
        tool: tool.into(),
        reason: reason.into(),
    }
}
