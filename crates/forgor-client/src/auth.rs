//! Authenticated fetch with transparent token refresh.
//!
//! Every request carries the bearer token plus the fixed client
//! identification headers. A 401 triggers at most one refresh and one retry.
//! Concurrent callers that hit a 401 at the same time share a single
//! in-flight refresh instead of racing parallel refresh POSTs.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use reqwest::header::USER_AGENT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use forgor_config::ServerConfig;
use forgor_protocols::ClientError;

use crate::endpoints::Endpoints;
use crate::store::TokenStore;

const APP_KEY_HEADER: &str = "X-App-Key";
const TIMEZONE_HEADER: &str = "X-Timezone";

type RefreshFuture = Shared<BoxFuture<'static, Result<String, ClientError>>>;

/// Fixed identification sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub app_key: String,
    /// IANA timezone sent with refresh requests.
    pub timezone: String,
}

impl ClientIdentity {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            app_key: config.app_key.clone(),
            timezone: config.resolved_timezone(),
        }
    }

    /// Attach `User-Agent` and `X-App-Key`.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(USER_AGENT, &self.user_agent)
            .header(APP_KEY_HEADER, &self.app_key)
    }
}

#[derive(Debug, Deserialize)]
struct RefreshReply {
    #[serde(default)]
    access_token: Option<String>,
}

struct AuthInner {
    http: Client,
    endpoints: Endpoints,
    identity: ClientIdentity,
    store: Arc<dyn TokenStore>,
    /// Pending refresh shared by every caller that needs one.
    refresh_in_flight: Mutex<Option<RefreshFuture>>,
}

impl AuthInner {
    async fn clear_tokens(&self) {
        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear tokens: {}", e);
        }
    }

    async fn refresh(&self) -> Result<String, ClientError> {
        let tokens = self.store.load().await?;
        if !tokens.has_refresh() {
            return Err(ClientError::RefreshFailure(
                "no refresh token stored".to_string(),
            ));
        }

        info!("Refreshing access token");
        let request = self
            .identity
            .apply(self.http.post(self.endpoints.refresh()))
            .header(TIMEZONE_HEADER, &self.identity.timezone)
            .json(&serde_json::json!({ "refresh_token": tokens.refresh_token }));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.clear_tokens().await;
                return Err(ClientError::RefreshFailure(format!("network: {}", e)));
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.clear_tokens().await;
            return Err(ClientError::RefreshFailure(format!(
                "refresh endpoint answered {}",
                status.as_u16()
            )));
        }

        let reply = response.json::<RefreshReply>().await.ok();
        let Some(access_token) = reply
            .and_then(|r| r.access_token)
            .filter(|token| !token.is_empty())
        else {
            self.clear_tokens().await;
            return Err(ClientError::RefreshFailure(
                "response carried no access_token".to_string(),
            ));
        };

        self.store.set_access_token(&access_token).await?;
        info!("Access token refreshed");
        Ok(access_token)
    }
}

/// HTTP client that authenticates with the stored token pair.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthInner>,
}

impl AuthClient {
    pub fn new(
        http: Client,
        endpoints: Endpoints,
        identity: ClientIdentity,
        store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            inner: Arc::new(AuthInner {
                http,
                endpoints,
                identity,
                store,
                refresh_in_flight: Mutex::new(None),
            }),
        }
    }

    /// Build a client from the `[server]` config section.
    pub fn from_config(config: &ServerConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(Self::new(
            http,
            Endpoints::new(&config.base_url),
            ClientIdentity::from_config(config),
            store,
        ))
    }

    pub fn http(&self) -> &Client {
        &self.inner.http
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.inner.endpoints
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.inner.identity
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.store
    }

    async fn send_with_token<F>(&self, build: &F, access_token: &str) -> Result<Response, ClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.inner
            .identity
            .apply(build(&self.inner.http))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))
    }

    /// Send an authenticated request.
    ///
    /// `build` is invoked once per attempt, so request bodies (including
    /// multipart forms) are rebuilt for the retry. Any status other than 401
    /// is returned as-is; only a missing token or a transport failure is an
    /// error.
    pub async fn fetch_with_auth<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let tokens = self.inner.store.load().await?;
        if !tokens.has_access() {
            return Err(ClientError::NoToken);
        }

        let first = self.send_with_token(&build, &tokens.access_token).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }

        if !tokens.has_refresh() {
            debug!("401 without refresh token, returning response as-is");
            return Ok(first);
        }

        let access_token = match self.refresh_access_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Token refresh failed, session cleared: {}", e);
                self.inner.clear_tokens().await;
                return Ok(first);
            }
        };

        let retry = self.send_with_token(&build, &access_token).await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            warn!("Retry after refresh still unauthorized, session cleared");
            self.inner.clear_tokens().await;
        }
        Ok(retry)
    }

    /// Refresh the access token, joining an in-flight refresh when one exists.
    ///
    /// The shared handle is dropped from the slot once it settles, so a
    /// later failure can be retried with a fresh request.
    pub async fn refresh_access_token(&self) -> Result<String, ClientError> {
        let pending = {
            let mut slot = self.inner.refresh_in_flight.lock();
            match slot.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight token refresh");
                    pending.clone()
                }
                None => {
                    let inner = Arc::clone(&self.inner);
                    let pending = async move { inner.refresh().await }.boxed().shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        let mut slot = self.inner.refresh_in_flight.lock();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&pending)) {
            *slot = None;
        }
        result
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
