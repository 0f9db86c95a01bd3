//! Account tier and save quota.

use serde::{Deserialize, Serialize};

/// Snapshot of the user's tier and save usage.
///
/// Serialized in the camelCase shape the sidepanel reads; the server's
/// snake_case field names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierInfo {
    #[serde(default = "default_tier")]
    pub tier: String,
    #[serde(default, alias = "current_saves", alias = "saves_used")]
    pub current_saves: u32,
    #[serde(default, alias = "max_saves")]
    pub max_saves: u32,
}

fn default_tier() -> String {
    "free".to_string()
}

impl TierInfo {
    pub fn saves_left(&self) -> u32 {
        self.max_saves.saturating_sub(self.current_saves)
    }

    pub fn can_save(&self) -> bool {
        self.saves_left() > 0
    }
}
