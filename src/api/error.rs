//! API Error Types
//!
//! Errors raised while talking to the booking-management backend.

use thiserror::Error;

/// Errors that can occur when calling the booking-management API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Backend could not be reached (connection refused, DNS, ...)
    #[error("Booking API unavailable: {0}")]
    Unavailable(String),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Any other transport-level failure
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the backend answered but refused the request.
    ///
    /// Such failures leave the affected slice of dashboard state untouched
    /// instead of failing the whole load cycle.
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// HTTP status code, when the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable(err.to_string())
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 403,
            message: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "API error 403: Forbidden");
        assert!(err.is_status());
        assert_eq!(err.status_code(), Some(403));

        let err = ApiError::Timeout;
        assert_eq!(err.to_string(), "Request timeout");
        assert!(!err.is_status());
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u64>("not json").unwrap_err();
        let api_err: ApiError = json_err.into();
        assert!(matches!(api_err, ApiError::Decode(_)));
    }
}
