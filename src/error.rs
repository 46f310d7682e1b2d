// Error handling module
// Defines the error taxonomy surfaced by the token manager

use thiserror::Error;

/// Errors that can occur while obtaining or using a bearer token
#[derive(Error, Debug)]
pub enum AuthError {
    /// The HTTP request itself failed (connect, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP error: {status} - {body}")]
    HttpStatus { status: u16, body: String },

    /// 2xx response that lacks the expected fields
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Expiry check before any token was stored
    #[error("No token has been stored yet")]
    NotAuthenticated,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status code, if the error came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::HttpStatus { status, .. } => Some(*status),
            AuthError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for token operations
pub type Result<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AuthError::HttpStatus {
            status: 401,
            body: "Invalid credentials".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: 401 - Invalid credentials");

        let err = AuthError::MalformedResponse("missing field `accessToken`".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed response: missing field `accessToken`"
        );

        assert_eq!(
            AuthError::NotAuthenticated.to_string(),
            "No token has been stored yet"
        );
    }

    #[test]
    fn test_config_error_message() {
        let err = AuthError::Config("username must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: username must not be empty"
        );
    }

    #[test]
    fn test_status_accessor() {
        let err = AuthError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(AuthError::NotAuthenticated.status(), None);
        assert_eq!(AuthError::Config("x".to_string()).status(), None);
    }
}
