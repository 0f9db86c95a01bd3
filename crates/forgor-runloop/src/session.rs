//! Session - owns the pipeline state and wires the components together.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use forgor_client::{ForgorApi, TokenStore};
use forgor_config::Config;
use forgor_protocols::{
    BackgroundMessage, BackgroundResponse, BadgeSink, RelevanceBackend, TabChange, TabSnapshot,
    TokenPair, UiNotification, DEFAULT_RELEVANCE_THRESHOLD,
};

use crate::actions::{MenuCommand, UserActions};
use crate::badge::BadgeController;
use crate::batcher::ActionBatcher;
use crate::bus::NotificationBus;
use crate::cache::QueryCache;
use crate::error::SessionResult;
use crate::idle::IdleWatcher;
use crate::login::LoginPrompter;
use crate::poller::RelevancePoller;
use crate::router::MessageRouter;
use crate::tier::TierTracker;

/// Timings and thresholds for a [`Session`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub quiet_window: Duration,
    pub cache_ttl: Duration,
    pub badge_clear_delay: Duration,
    pub idle_delay: Duration,
    pub login_cooldown: Duration,
    pub threshold: f64,
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            quiet_window: config.timing.quiet_window(),
            cache_ttl: config.timing.cache_ttl(),
            badge_clear_delay: config.timing.badge_clear_delay(),
            idle_delay: config.timing.idle_delay(),
            login_cooldown: config.timing.login_prompt_cooldown(),
            threshold: config.relevance.threshold,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(1_000),
            cache_ttl: Duration::from_millis(300_000),
            badge_clear_delay: Duration::from_millis(3_000),
            idle_delay: Duration::from_millis(15_000),
            login_cooldown: Duration::from_millis(10_000),
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
        }
    }
}

/// Why the extension lifecycle hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    Other,
}

impl From<&str> for InstallReason {
    fn from(reason: &str) -> Self {
        match reason {
            "install" => Self::Install,
            "update" => Self::Update,
            _ => Self::Other,
        }
    }
}

/// A signed-in (or signed-out) companion session.
///
/// Holds the cache, buffer, timers, last query, tier snapshot, login
/// prompter and notification bus. Dropping the session drops all of it.
pub struct Session {
    api: ForgorApi,
    store: Arc<dyn TokenStore>,
    cache: Arc<QueryCache>,
    badge: BadgeController,
    poller: Arc<RelevancePoller>,
    batcher: ActionBatcher,
    idle: IdleWatcher,
    bus: NotificationBus,
    login: Arc<LoginPrompter>,
    tier: Arc<TierTracker>,
    actions: UserActions,
    router: MessageRouter,
}

impl Session {
    /// Build a session whose relevance checks go through `api`.
    pub fn new(api: ForgorApi, sink: Arc<dyn BadgeSink>, settings: SessionSettings) -> Self {
        let backend: Arc<dyn RelevanceBackend> = Arc::new(api.clone());
        Self::with_backend(api, backend, sink, settings)
    }

    /// Build a session with a separate relevance backend.
    pub fn with_backend(
        api: ForgorApi,
        backend: Arc<dyn RelevanceBackend>,
        sink: Arc<dyn BadgeSink>,
        settings: SessionSettings,
    ) -> Self {
        let store = api.auth().store().clone();
        let bus = NotificationBus::new();
        let cache = Arc::new(QueryCache::new(settings.cache_ttl));
        let badge = BadgeController::new(sink, settings.badge_clear_delay);
        let poller = Arc::new(RelevancePoller::new(
            backend.clone(),
            cache.clone(),
            badge.clone(),
            settings.threshold,
        ));
        let login = Arc::new(LoginPrompter::new(bus.clone(), settings.login_cooldown));
        let tier = Arc::new(TierTracker::new(api.clone(), bus.clone()));

        Self {
            batcher: ActionBatcher::new(poller.clone(), settings.quiet_window),
            idle: IdleWatcher::new(poller.clone(), settings.idle_delay),
            actions: UserActions::new(api.clone(), badge.clone(), tier.clone(), bus.clone()),
            router: MessageRouter::new(
                backend,
                cache.clone(),
                store.clone(),
                login.clone(),
                tier.clone(),
                settings.threshold,
            ),
            api,
            store,
            cache,
            badge,
            poller,
            bus,
            login,
            tier,
        }
    }

    pub fn api(&self) -> &ForgorApi {
        &self.api
    }

    pub fn badge(&self) -> &BadgeController {
        &self.badge
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    pub fn poller(&self) -> &Arc<RelevancePoller> {
        &self.poller
    }

    pub fn actions(&self) -> &UserActions {
        &self.actions
    }

    pub fn tier(&self) -> &Arc<TierTracker> {
        &self.tier
    }

    /// A tab became active.
    pub fn on_tab_activated(&self, tab: &TabSnapshot) -> bool {
        self.queue(tab)
    }

    /// A tab changed; only loads and title/URL changes count.
    pub fn on_tab_updated(&self, change: &TabChange, tab: &TabSnapshot) -> bool {
        if !change.qualifies() {
            return false;
        }
        self.queue(tab)
    }

    fn queue(&self, tab: &TabSnapshot) -> bool {
        let queued = self.batcher.queue_user_action(tab);
        if queued {
            self.idle.touch(tab);
        }
        queued
    }

    pub async fn handle_message(&self, message: BackgroundMessage) -> BackgroundResponse {
        self.router.handle(message).await
    }

    pub async fn on_context_menu(&self, command: &MenuCommand) -> SessionResult<Value> {
        let result = self.actions.run_menu(command).await;
        if let Err(e) = &result {
            if e.requires_login() {
                self.login.prompt();
            }
        }
        result
    }

    pub async fn toolbar_clicked(&self) {
        self.actions.toolbar_clicked().await;
    }

    /// Lifecycle hook run when the extension is installed or updated.
    pub async fn on_installed(&self, reason: InstallReason) {
        match reason {
            InstallReason::Install => {
                self.login.prompt();
            }
            InstallReason::Update => {
                let tokens = self.tokens().await;
                if tokens.needs_refresh() {
                    if let Err(e) = self.api.auth().refresh_access_token().await {
                        warn!("Refresh after update failed: {}", e);
                        if let Err(e) = self.store.clear().await {
                            warn!("Failed to clear tokens: {}", e);
                        }
                        self.login.prompt();
                    }
                }
                if !tokens.is_complete() {
                    self.login.prompt();
                }
            }
            InstallReason::Other => {}
        }
    }

    /// Sign in and pick up the tier snapshot.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<TokenPair> {
        let pair = self.api.login(username, password).await?;
        self.poller.reset();
        self.login.reset();
        if let Err(e) = self.tier.refresh().await {
            warn!("Tier refresh after login failed: {}", e);
        }
        self.bus.publish(UiNotification::RefreshIfOpen);
        Ok(pair)
    }

    /// Create an account, then sign in with it.
    pub async fn register(&self, username: &str, password: &str) -> SessionResult<TokenPair> {
        self.api.register(username, password).await?;
        self.login(username, password).await
    }

    /// Drop the tokens and every piece of in-memory state.
    pub async fn logout(&self) -> SessionResult<()> {
        self.api.logout().await?;
        self.reset().await;
        info!("Logged out");
        Ok(())
    }

    /// Clear buffers, timers, caches and the badge.
    pub async fn reset(&self) {
        self.batcher.cancel();
        self.idle.reset();
        self.poller.reset();
        self.cache.clear();
        self.tier.clear();
        self.login.reset();
        self.badge.clear_badge().await;
    }

    async fn tokens(&self) -> TokenPair {
        match self.store.load().await {
            Ok(pair) => pair,
            Err(e) => {
                warn!("Token store unreadable: {}", e);
                TokenPair::default()
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
