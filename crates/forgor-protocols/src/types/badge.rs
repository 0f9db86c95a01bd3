//! User-visible badge states.

use serde::{Deserialize, Serialize};

/// Icon badge state shown on the toolbar button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeState {
    #[default]
    Idle,
    Searching,
    Match,
    NoMatch,
    Error,
    SaveBlocked,
    Saved,
}

impl BadgeState {
    /// Short text glyph rendered on the badge.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Searching => "...",
            Self::Match => "●",
            Self::NoMatch => "0",
            Self::Error => "ERR",
            Self::SaveBlocked => "MAX",
            Self::Saved => "OK",
        }
    }

    /// Badge background color, `None` for the cleared badge.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Searching => Some("#ffa500"),
            Self::Match => Some("#3b82f6"),
            Self::NoMatch => Some("#808080"),
            Self::Error => Some("#ff0000"),
            Self::SaveBlocked => Some("#f59e0b"),
            Self::Saved => Some("#32cd32"),
        }
    }

    /// Transient states revert to [`BadgeState::Idle`] after a fixed delay.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Searching | Self::Error | Self::SaveBlocked | Self::Saved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_is_cleared() {
        assert_eq!(BadgeState::Idle.glyph(), "");
        assert_eq!(BadgeState::Idle.color(), None);
        assert!(!BadgeState::Idle.is_transient());
    }

    #[test]
    fn test_transient_states() {
        assert!(BadgeState::Searching.is_transient());
        assert!(BadgeState::Error.is_transient());
        assert!(BadgeState::SaveBlocked.is_transient());
        assert!(BadgeState::Saved.is_transient());
        assert!(!BadgeState::Match.is_transient());
        assert!(!BadgeState::NoMatch.is_transient());
    }

    #[test]
    fn test_match_glyph() {
        assert_eq!(BadgeState::Match.glyph(), "●");
        assert_eq!(BadgeState::Match.color(), Some("#3b82f6"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&BadgeState::SaveBlocked).unwrap();
        assert_eq!(json, "\"save_blocked\"");
    }
}
