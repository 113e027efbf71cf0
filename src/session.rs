//! Session Context
//!
//! Carries the bearer token issued by the auth subsystem. The dashboard
//! never looks the token up on its own; it is injected at construction.

use crate::config::SessionConfig;
use std::fmt;
use std::path::Path;

/// Authentication context for API calls
#[derive(Clone, Default)]
pub struct SessionContext {
    token: Option<String>,
}

impl SessionContext {
    /// Session holding `token`. Blank tokens count as absent.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: if token.is_empty() {
                None
            } else {
                Some(token.to_string())
            },
        }
    }

    /// Session without credentials
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Resolve the token from configuration.
    ///
    /// An inline token wins over the token file. An unreadable token file
    /// yields an anonymous session so the dashboard can show its login
    /// prompt instead of refusing to start.
    pub fn from_config(config: &SessionConfig) -> Self {
        if let Some(token) = config.token.as_deref() {
            let session = Self::new(token);
            if session.is_authenticated() {
                return session;
            }
        }

        match config.token_file.as_deref() {
            Some(path) => Self::from_token_file(Path::new(path)),
            None => Self::anonymous(),
        }
    }

    fn from_token_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::new(content),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read token file");
                Self::anonymous()
            }
        }
    }

    /// Bearer token, if the user is logged in
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_blank_token_is_anonymous() {
        assert!(!SessionContext::new("   ").is_authenticated());
        assert_eq!(SessionContext::new(" abc \n").token(), Some("abc"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = SessionContext::new("secret-token");
        let debug = format!("{:?}", session);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_from_config_prefers_inline_token() {
        let config = SessionConfig {
            token: Some("inline".to_string()),
            token_file: Some("/nonexistent/token".to_string()),
        };
        assert_eq!(SessionContext::from_config(&config).token(), Some("inline"));
    }

    #[test]
    fn test_from_config_reads_token_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "file-token").unwrap();

        let config = SessionConfig {
            token: None,
            token_file: Some(file.path().to_string_lossy().to_string()),
        };
        assert_eq!(SessionContext::from_config(&config).token(), Some("file-token"));
    }

    #[test]
    fn test_from_config_missing_file_is_anonymous() {
        let config = SessionConfig {
            token: None,
            token_file: Some("/nonexistent/booking-dashboard/token".to_string()),
        };
        assert!(!SessionContext::from_config(&config).is_authenticated());
    }
}
