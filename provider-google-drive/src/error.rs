//! Error types for the Google Drive source

use thiserror::Error;

/// Google Drive source errors.
///
/// Internal taxonomy only: at the `MediaSource` boundary every variant is
/// flattened into a displayable `MediaResult::Error` message.
#[derive(Error, Debug)]
pub enum GoogleDriveError {
    /// No usable session, or the token could not be obtained
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// API request returned an error status
    #[error("Google Drive API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Transport-level failure from the host HTTP client
    #[error(transparent)]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

impl GoogleDriveError {
    /// Whether this error is a plain "resource not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, GoogleDriveError::ApiError { status_code: 404, .. })
    }
}

/// Result type for Google Drive operations
pub type Result<T> = std::result::Result<T, GoogleDriveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GoogleDriveError::ApiError {
            status_code: 404,
            message: "File not found".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "Google Drive API error (status 404): File not found"
        );
    }

    #[test]
    fn test_not_found_detection() {
        let missing = GoogleDriveError::ApiError {
            status_code: 404,
            message: String::new(),
        };
        assert!(missing.is_not_found());

        let throttled = GoogleDriveError::ApiError {
            status_code: 429,
            message: String::new(),
        };
        assert!(!throttled.is_not_found());
    }
}
