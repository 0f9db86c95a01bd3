//! Token storage.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use forgor_protocols::{ClientError, TokenPair};

/// Persistent key/value home of the session tokens.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Current pair; missing entries come back as empty strings.
    async fn load(&self) -> Result<TokenPair, ClientError>;

    async fn save(&self, pair: &TokenPair) -> Result<(), ClientError>;

    /// Replace the access token, keeping the refresh token.
    async fn set_access_token(&self, access_token: &str) -> Result<(), ClientError> {
        let mut pair = self.load().await?;
        pair.access_token = access_token.to_string();
        self.save(&pair).await
    }

    /// Drop both tokens.
    async fn clear(&self) -> Result<(), ClientError>;
}

/// Tokens held in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    pair: RwLock<TokenPair>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pair(pair: TokenPair) -> Self {
        Self {
            pair: RwLock::new(pair),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<TokenPair, ClientError> {
        Ok(self.pair.read().clone())
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), ClientError> {
        *self.pair.write() = pair.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.pair.write() = TokenPair::default();
        Ok(())
    }
}

/// Tokens persisted as a small JSON document.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_err(path: &Path, err: impl std::fmt::Display) -> ClientError {
    ClientError::Storage(format!("{}: {}", path.display(), err))
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<TokenPair, ClientError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(TokenPair::default()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| storage_err(&self.path, e)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TokenPair::default()),
            Err(e) => Err(storage_err(&self.path, e)),
        }
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_err(parent, e))?;
        }
        let content = serde_json::to_string_pretty(pair).map_err(|e| storage_err(&self.path, e))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| storage_err(&self.path, e))?;
        debug!("Token pair written to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err(&self.path, e)),
        }
    }
}
