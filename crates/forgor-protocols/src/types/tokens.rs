//! Session token pair.

use serde::{Deserialize, Serialize};

/// Access/refresh token pair as persisted by a token store.
///
/// Empty strings mean "absent"; both fields are present or the pair does
/// not describe a usable session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn has_access(&self) -> bool {
        !self.access_token.is_empty()
    }

    pub fn has_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Both tokens are present.
    pub fn is_complete(&self) -> bool {
        self.has_access() && self.has_refresh()
    }

    /// Neither token is present.
    pub fn is_empty(&self) -> bool {
        !self.has_access() && !self.has_refresh()
    }

    /// Only a refresh token survives; one refresh attempt may restore the session.
    pub fn needs_refresh(&self) -> bool {
        !self.has_access() && self.has_refresh()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let pair = TokenPair::default();
        assert!(pair.is_empty());
        assert!(!pair.is_complete());
        assert!(!pair.needs_refresh());
    }

    #[test]
    fn test_complete_pair() {
        let pair = TokenPair::new("access", "refresh");
        assert!(pair.is_complete());
        assert!(!pair.is_empty());
        assert!(!pair.needs_refresh());
    }

    #[test]
    fn test_refresh_only_pair() {
        let pair = TokenPair::new("", "refresh");
        assert!(!pair.is_complete());
        assert!(pair.needs_refresh());
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let pair: TokenPair = serde_json::from_str(r#"{"access_token":"a"}"#).unwrap();
        assert_eq!(pair.access_token, "a");
        assert!(pair.refresh_token.is_empty());
    }
}
