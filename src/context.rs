//! Wiring shared by every subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::warn;

use forgor_client::{FileTokenStore, ForgorApi, MemoryTokenStore, TokenStore};
use forgor_config::{Config, ConfigLoader, ConfigValidator};
use forgor_protocols::BadgeSink;
use forgor_runloop::{Session, SessionSettings};

/// Load the configuration file, falling back to defaults when it does not exist.
pub(crate) fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = path.unwrap_or_else(Config::default_path);
    ConfigLoader::load_or_default(&path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

/// Validate `config`, logging warnings and failing on errors.
pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }
    if !result.is_valid() {
        let errors: Vec<String> = result
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.message))
            .collect();
        bail!("Invalid configuration: {}", errors.join("; "));
    }
    Ok(())
}

pub(crate) fn token_store(config: &Config) -> Arc<dyn TokenStore> {
    match &config.storage.token_path {
        Some(path) => Arc::new(FileTokenStore::new(ConfigLoader::expand_path(path))),
        None => Arc::new(MemoryTokenStore::new()),
    }
}

pub(crate) fn build_api(config: &Config) -> anyhow::Result<ForgorApi> {
    Ok(ForgorApi::from_config(&config.server, token_store(config))?)
}

pub(crate) fn build_session(config: &Config, sink: Arc<dyn BadgeSink>) -> anyhow::Result<Session> {
    let api = build_api(config)?;
    Ok(Session::new(api, sink, SessionSettings::from_config(config)))
}
