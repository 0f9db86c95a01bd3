//! Explicit user actions: saves, "search similar", toolbar clicks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use forgor_client::{ForgorApi, ImageUpload, SimilarRequest, SimilarResults};
use forgor_protocols::{BadgeState, ClientError, UiNotification};

use crate::badge::BadgeController;
use crate::bus::NotificationBus;
use crate::error::{SessionError, SessionResult};
use crate::tier::TierTracker;

/// Page the user acted on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContext {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub selection: String,
}

impl PageContext {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            selection: String::new(),
        }
    }
}

/// Context-menu entry chosen by the user, with what the shell captured for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "item")]
pub enum MenuCommand {
    #[serde(rename = "forgor-capture-upload")]
    CaptureUpload {
        #[serde(rename = "dataUrl")]
        data_url: String,
        #[serde(default)]
        page: PageContext,
    },
    #[serde(rename = "forgor-upload-image-url")]
    UploadImage {
        #[serde(rename = "srcUrl", default)]
        src_url: String,
        #[serde(default)]
        page: PageContext,
    },
    #[serde(rename = "forgor-search-similar")]
    SearchSimilar {
        #[serde(rename = "dataUrl")]
        data_url: String,
        #[serde(default)]
        page: PageContext,
    },
}

/// Runs user-initiated calls and reflects their progress on the badge.
///
/// Every save shows Searching, then Saved or Error. A save is refused
/// up front with SaveBlocked when the cached tier has no saves left.
pub struct UserActions {
    api: ForgorApi,
    badge: BadgeController,
    tier: Arc<TierTracker>,
    bus: NotificationBus,
}

impl UserActions {
    pub fn new(
        api: ForgorApi,
        badge: BadgeController,
        tier: Arc<TierTracker>,
        bus: NotificationBus,
    ) -> Self {
        Self {
            api,
            badge,
            tier,
            bus,
        }
    }

    /// Dispatch a context-menu command.
    pub async fn run_menu(&self, command: &MenuCommand) -> SessionResult<Value> {
        match command {
            MenuCommand::CaptureUpload { data_url, page } => {
                self.upload_screenshot(data_url, page).await
            }
            MenuCommand::UploadImage { src_url, page } => self.upload_image(src_url, page).await,
            MenuCommand::SearchSimilar { data_url, page } => {
                let results = self.search_similar(data_url, page).await?;
                Ok(serde_json::json!({
                    "results": results.results,
                    "query_content": results.query_content,
                }))
            }
        }
    }

    /// Upload a captured screenshot.
    pub async fn upload_screenshot(&self, data_url: &str, page: &PageContext) -> SessionResult<Value> {
        self.begin_save().await?;
        let result =
            match ImageUpload::from_data_url(data_url, &page.url, &page.title, &page.selection) {
                Ok(upload) => self.api.upload_image(&upload).await,
                Err(e) => Err(e),
            };
        self.finish_save(result).await
    }

    /// Save an image by source: `data:` sources upload bytes, others go by URL.
    pub async fn upload_image(&self, src_url: &str, page: &PageContext) -> SessionResult<Value> {
        self.begin_save().await?;
        let result = if src_url.is_empty() {
            Err(ClientError::InvalidInput("no image source".to_string()))
        } else if src_url.starts_with("data:") {
            match ImageUpload::from_data_url(src_url, &page.url, &page.title, &page.selection) {
                Ok(upload) => self.api.upload_image(&upload).await,
                Err(e) => Err(e),
            }
        } else {
            self.api.upload_image_url(src_url, &page.url).await
        };
        self.finish_save(result).await
    }

    /// Look for saved content similar to a screenshot.
    pub async fn search_similar(&self, data_url: &str, page: &PageContext) -> SessionResult<SimilarResults> {
        self.badge.set_state(BadgeState::Searching).await;

        let result = match data_url.split_once(',') {
            Some((_, payload)) if !payload.is_empty() => {
                let request = SimilarRequest {
                    image_b64: payload.to_string(),
                    page_url: page.url.clone(),
                    page_title: page.title.clone(),
                };
                self.api.search_similar(&request).await
            }
            _ => Err(ClientError::InvalidInput("screenshot is not a data URL".to_string())),
        };

        match result {
            Ok(results) => {
                info!("Similar search returned {} result(s)", results.results.len());
                if results.results.is_empty() {
                    self.badge.set_state(BadgeState::NoMatch).await;
                } else {
                    self.bus.publish(UiNotification::DisplaySimilarResults {
                        results: results.results.clone(),
                        query_content: results.query_content.clone(),
                    });
                    self.badge.set_state(BadgeState::Match).await;
                }
                Ok(results)
            }
            Err(e) => {
                warn!("Similar search failed: {}", e);
                self.badge.set_state(BadgeState::Error).await;
                Err(e.into())
            }
        }
    }

    /// Toolbar button: clear the badge and ask an open panel to refresh.
    pub async fn toolbar_clicked(&self) {
        self.badge.clear_badge().await;
        self.bus.publish(UiNotification::RefreshIfOpen);
    }

    pub async fn delete_file(&self, file_name: &str) -> SessionResult<Value> {
        let reply = self.api.delete_file(file_name).await?;
        info!("Deleted {}", file_name);
        if let Err(e) = self.tier.refresh().await {
            warn!("Tier refresh after delete failed: {}", e);
        }
        Ok(reply)
    }

    pub async fn get_file(&self, name: &str) -> SessionResult<Vec<u8>> {
        Ok(self.api.get_file(name).await?)
    }

    pub async fn get_thumbnail(&self, name: &str) -> SessionResult<Vec<u8>> {
        Ok(self.api.get_thumbnail(name).await?)
    }

    async fn begin_save(&self) -> SessionResult<()> {
        if let Some(info) = self.tier.save_blocked() {
            info!("Save blocked: {}/{} used", info.current_saves, info.max_saves);
            self.badge.set_state(BadgeState::SaveBlocked).await;
            return Err(SessionError::SaveBlocked {
                tier: info.tier,
                max_saves: info.max_saves,
            });
        }
        self.badge.set_state(BadgeState::Searching).await;
        Ok(())
    }

    async fn finish_save(&self, result: Result<Value, ClientError>) -> SessionResult<Value> {
        match result {
            Ok(reply) => {
                info!("Save succeeded");
                self.badge.set_state(BadgeState::Saved).await;
                if let Err(e) = self.tier.refresh().await {
                    warn!("Tier refresh after save failed: {}", e);
                }
                Ok(reply)
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                self.badge.set_state(BadgeState::Error).await;
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
