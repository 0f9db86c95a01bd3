//! Error types for the session layer.

use thiserror::Error;

use forgor_protocols::ClientError;

/// Errors surfaced by explicit user actions and session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Remote call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Cached tier snapshot says the quota is used up.
    #[error("Save quota exhausted ({max_saves} saves on the {tier} tier)")]
    SaveBlocked { tier: String, max_saves: u32 },
}

impl SessionError {
    /// Whether the failure means the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        match self {
            Self::Client(e) => e.requires_login(),
            Self::SaveBlocked { .. } => false,
        }
    }
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SessionError::SaveBlocked {
            tier: "free".to_string(),
            max_saves: 50,
        };
        assert_eq!(err.to_string(), "Save quota exhausted (50 saves on the free tier)");
    }

    #[test]
    fn test_requires_login() {
        assert!(SessionError::from(ClientError::NoToken).requires_login());
        assert!(!SessionError::from(ClientError::Network("reset".to_string())).requires_login());
    }
}
