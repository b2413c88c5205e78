//! Error types for the OneDrive source

use thiserror::Error;

/// OneDrive source errors.
///
/// Internal taxonomy only: at the `MediaSource` boundary every variant is
/// flattened into a displayable `MediaResult::Error` message.
#[derive(Error, Debug)]
pub enum OneDriveError {
    /// No usable session, or the token could not be obtained
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Graph API returned an error status
    #[error("Microsoft Graph error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport-level failure from the host HTTP client
    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl OneDriveError {
    /// Whether this error is a plain "resource not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, OneDriveError::ApiError { status_code: 404, .. })
    }
}

/// Result type for OneDrive operations
pub type Result<T> = std::result::Result<T, OneDriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = OneDriveError::ApiError {
            status_code: 429,
            message: "throttled".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Microsoft Graph error (status 429): throttled"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let missing = OneDriveError::ApiError {
            status_code: 404,
            message: String::new(),
        };
        assert!(missing.is_not_found());
    }
}
