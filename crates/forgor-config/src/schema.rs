//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub relevance: RelevanceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// `~/.forgor/config.toml`, or a relative `.forgor/config.toml` without a home directory.
    pub fn default_path() -> PathBuf {
        forgor_dir().join("config.toml")
    }
}

/// `~/.forgor`.
pub fn forgor_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".forgor"))
        .unwrap_or_else(|| PathBuf::from(".forgor"))
}

/// Remote API server and client identification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as `X-App-Key` on every request.
    #[serde(default)]
    pub app_key: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// IANA timezone sent with token refreshes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_key: String::new(),
            user_agent: default_user_agent(),
            timezone: None,
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl ServerConfig {
    /// Configured timezone, then `$TZ`, then `UTC`.
    pub fn resolved_timezone(&self) -> String {
        self.timezone
            .clone()
            .filter(|tz| !tz.trim().is_empty())
            .or_else(|| std::env::var("TZ").ok().filter(|tz| !tz.trim().is_empty()))
            .unwrap_or_else(|| "UTC".to_string())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

fn default_base_url() -> String {
    "https://api.forgor.app".to_string()
}

fn default_user_agent() -> String {
    format!("ForgorCompanion/{}", env!("CARGO_PKG_VERSION"))
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

/// Pipeline timings, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Debounce quiet window before buffered tab signals are flushed.
    #[serde(default = "default_flush_ms")]
    pub flush_ms: u64,

    /// Lifetime of a cached relevance result.
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,

    /// Delay before a transient badge state reverts to idle.
    #[serde(default = "default_badge_clear_ms")]
    pub badge_clear_ms: u64,

    /// Inactivity after which the last stable tab is re-evaluated.
    #[serde(default = "default_idle_ms")]
    pub idle_ms: u64,

    /// Minimum gap between two login prompts.
    #[serde(default = "default_login_prompt_cooldown_ms")]
    pub login_prompt_cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            flush_ms: default_flush_ms(),
            cache_ttl_ms: default_cache_ttl_ms(),
            badge_clear_ms: default_badge_clear_ms(),
            idle_ms: default_idle_ms(),
            login_prompt_cooldown_ms: default_login_prompt_cooldown_ms(),
        }
    }
}

impl TimingConfig {
    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.flush_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn badge_clear_delay(&self) -> Duration {
        Duration::from_millis(self.badge_clear_ms)
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_ms)
    }

    pub fn login_prompt_cooldown(&self) -> Duration {
        Duration::from_millis(self.login_prompt_cooldown_ms)
    }
}

fn default_flush_ms() -> u64 {
    1_000
}

fn default_cache_ttl_ms() -> u64 {
    300_000
}

fn default_badge_clear_ms() -> u64 {
    3_000
}

fn default_idle_ms() -> u64 {
    15_000
}

fn default_login_prompt_cooldown_ms() -> u64 {
    10_000
}

/// Relevance scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelevanceConfig {
    /// Minimum `hybrid_score` for a result to count.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    0.25
}

/// Token storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file holding the token pair. `None` keeps tokens in memory only.
    #[serde(default = "default_token_path")]
    pub token_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            token_path: default_token_path(),
        }
    }
}

fn default_token_path() -> Option<String> {
    Some("~/.forgor/tokens.json".to_string())
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    /// Directory for daily-rotated log files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
