//! Cached tier snapshot.

use parking_lot::RwLock;
use tracing::{debug, info};

use forgor_client::ForgorApi;
use forgor_protocols::{ClientError, TierInfo, UiNotification};

use crate::bus::NotificationBus;

/// Holds the last known tier and save quota.
pub struct TierTracker {
    api: ForgorApi,
    bus: NotificationBus,
    snapshot: RwLock<Option<TierInfo>>,
}

impl TierTracker {
    pub fn new(api: ForgorApi, bus: NotificationBus) -> Self {
        Self {
            api,
            bus,
            snapshot: RwLock::new(None),
        }
    }

    pub fn snapshot(&self) -> Option<TierInfo> {
        self.snapshot.read().clone()
    }

    /// The cached snapshot when it has no saves left.
    ///
    /// Without a snapshot the server is left to decide.
    pub fn save_blocked(&self) -> Option<TierInfo> {
        self.snapshot.read().as_ref().filter(|info| !info.can_save()).cloned()
    }

    /// Fetch the tier, store it and publish `UPDATE_TIER_INFO`.
    pub async fn refresh(&self) -> Result<TierInfo, ClientError> {
        let info = self.api.tier_info().await?;
        info!(
            "Tier {}: {}/{} saves used",
            info.tier, info.current_saves, info.max_saves
        );
        *self.snapshot.write() = Some(info.clone());
        self.bus
            .publish(UiNotification::UpdateTierInfo { data: info.clone() });
        Ok(info)
    }

    /// Cached snapshot, fetched on first use. Fetch failures yield `None`.
    pub async fn get_or_fetch(&self) -> Option<TierInfo> {
        if let Some(info) = self.snapshot() {
            return Some(info);
        }
        match self.refresh().await {
            Ok(info) => Some(info),
            Err(e) => {
                debug!("Tier info unavailable: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) {
        *self.snapshot.write() = None;
    }
}
