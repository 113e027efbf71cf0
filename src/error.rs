//! Dashboard error types

use thiserror::Error;

use crate::api::ApiError;

/// Message shown when the dashboard is opened without a session token
pub const LOGIN_PROMPT: &str = "Please log in to view dashboard";

/// Errors surfaced by dashboard operations
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No bearer token in the session
    #[error("{}", LOGIN_PROMPT)]
    Unauthenticated,

    /// A load cycle failed at transport or decoding level
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DashboardError::Unauthenticated.to_string(),
            "Please log in to view dashboard"
        );

        let err: DashboardError = ApiError::Timeout.into();
        assert_eq!(err.to_string(), "Request timeout");
    }
}
