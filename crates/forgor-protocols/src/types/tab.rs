//! Browser tab signals.

use serde::{Deserialize, Serialize};
use url::Url;

/// Snapshot of a browser tab at the time an event fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    #[serde(default)]
    pub tab_id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl TabSnapshot {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            tab_id: None,
            title: title.into(),
            url: Some(url.into()),
        }
    }

    pub fn with_tab_id(mut self, tab_id: i64) -> Self {
        self.tab_id = Some(tab_id);
        self
    }

    /// Hostname of the tab URL; malformed or missing URLs yield an empty string.
    pub fn hostname(&self) -> String {
        self.url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default()
    }

    /// Signal key `"<title> <hostname>"`, or `None` when both parts are blank.
    pub fn signal_key(&self) -> Option<String> {
        let key = format!("{} {}", self.title.trim(), self.hostname());
        let key = key.trim();
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }
}

/// Fields reported by a tab-updated event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabChange {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl TabChange {
    /// Content finished loading, or the title or URL changed.
    pub fn qualifies(&self) -> bool {
        self.status.as_deref() == Some("complete") || self.title.is_some() || self.url.is_some()
    }
}

#[cfg(test)]
#[path = "tab_tests.rs"]
mod tests;
