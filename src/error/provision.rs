//! Provisioning errors

use super::JpegliError;

/// Creates a self relocation failed error
pub fn self_relocation_failed(path: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::SelfRelocationFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a tool not found error
pub fn tool_not_found(tool: impl Into<String>, searched: impl Into<String>) -> JpegliError {
    JpegliError::ToolNotFound {
        tool: tool.into(),
        searched: searched.into(),
    }
}

/// Creates a shell registration failed error
#[cfg_attr(not(windows), allow(dead_code))]
pub fn registration_failed(key: impl Into<String>, reason: impl Into<String>) -> JpegliError {
    JpegliError::RegistrationFailed {
        key: key.into(),
        reason: reason.into(),
    }
}
