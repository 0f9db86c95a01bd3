//! Message-passing contract between the UI surfaces and the core.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{TierInfo, TokenPair};

/// Request sent by the sidepanel, login page or content scripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackgroundMessage {
    GetTokens,
    QueryCachedOrFetch {
        #[serde(default, rename = "searchText")]
        search_text: String,
    },
    /// Direct fetch that bypasses (but still populates) the cache.
    Query {
        #[serde(default, rename = "searchText")]
        search_text: String,
    },
    PromptLogin,
    GetTierInfo,
}

/// Reply to a [`BackgroundMessage`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackgroundResponse {
    Tokens {
        #[serde(rename = "accessToken")]
        access_token: String,
        #[serde(rename = "refreshToken")]
        refresh_token: String,
    },
    Query {
        ok: bool,
        body: String,
        #[serde(rename = "fromCache", default, skip_serializing_if = "Option::is_none")]
        from_cache: Option<bool>,
    },
    Ack {
        ok: bool,
    },
    TierInfo(Option<TierInfo>),
}

impl BackgroundResponse {
    pub fn tokens(pair: &TokenPair) -> Self {
        Self::Tokens {
            access_token: pair.access_token.clone(),
            refresh_token: pair.refresh_token.clone(),
        }
    }

    pub fn ack() -> Self {
        Self::Ack { ok: true }
    }
}

/// Fire-and-forget notification published by the core to whichever UI is listening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiNotification {
    RefreshIfOpen,
    OpenLogin,
    DisplaySimilarResults {
        results: Vec<Value>,
        #[serde(rename = "queryContent", default)]
        query_content: Option<Value>,
    },
    UpdateTierInfo {
        data: TierInfo,
    },
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
