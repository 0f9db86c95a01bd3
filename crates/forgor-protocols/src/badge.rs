//! Badge sink trait.

use async_trait::async_trait;

use crate::error::BadgeError;

/// Platform icon-badge API.
#[async_trait]
pub trait BadgeSink: Send + Sync {
    /// Show `text` on the badge, optionally recoloring it.
    async fn set_badge(&self, text: &str, color: Option<&str>) -> Result<(), BadgeError>;

    /// Remove any badge text.
    async fn clear_badge(&self) -> Result<(), BadgeError> {
        self.set_badge("", None).await
    }
}
