//! Remote API and session errors.

use thiserror::Error;

/// Errors raised while talking to the remote content-matching API.
///
/// All payloads are owned strings so the error can be cloned and shared
/// between callers awaiting the same token refresh.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("No session: access token is missing")]
    NoToken,

    #[error("HTTP error: {status} - {message}")]
    Http { status: u16, message: String },

    #[error("Token refresh failed: {0}")]
    RefreshFailure(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unrecognized response shape: {0}")]
    UnrecognizedShape(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the user has to sign in again before this can succeed.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::NoToken | Self::RefreshFailure(_))
            || self.status() == Some(401)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_token_display() {
        let err = ClientError::NoToken;
        assert!(err.to_string().contains("access token is missing"));
    }

    #[test]
    fn test_http_error_display() {
        let err = ClientError::Http {
            status: 503,
            message: "Service Unavailable".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("Service Unavailable"));
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn test_refresh_failure_display() {
        let err = ClientError::RefreshFailure("status 400".to_string());
        assert!(err.to_string().contains("Token refresh failed"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_requires_login() {
        assert!(ClientError::NoToken.requires_login());
        assert!(ClientError::RefreshFailure("x".to_string()).requires_login());
        assert!(ClientError::Http { status: 401, message: String::new() }.requires_login());
        assert!(!ClientError::Http { status: 500, message: String::new() }.requires_login());
        assert!(!ClientError::Network("reset".to_string()).requires_login());
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ClientError::from(json_err);
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[test]
    fn test_clone_preserves_variant() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.clone(), err);
    }
}
