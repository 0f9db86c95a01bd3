//! Typed wrappers over the remote API endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use forgor_config::ServerConfig;
use forgor_protocols::{ClientError, RawResponse, RelevanceBackend, TierInfo, TokenPair};

use crate::auth::AuthClient;
use crate::data_url::{decode_data_url, timestamp_name};
use crate::store::TokenStore;

/// An image upload with the page context it was captured from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub file_name: String,
    pub page_url: String,
    pub page_title: String,
    pub selection: String,
}

impl ImageUpload {
    /// Build an upload from a captured `data:` URL.
    pub fn from_data_url(
        data_url: &str,
        page_url: impl Into<String>,
        page_title: impl Into<String>,
        selection: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let decoded = decode_data_url(data_url)?;
        let file_name = timestamp_name("screenshot", decoded.extension());
        Ok(Self {
            bytes: decoded.bytes,
            mime: decoded.mime,
            file_name,
            page_url: page_url.into(),
            page_title: page_title.into(),
            selection: selection.into(),
        })
    }

    fn image_part(&self) -> Part {
        let part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        match part.mime_str(&self.mime) {
            Ok(part) => part,
            Err(_) => Part::bytes(self.bytes.clone()).file_name(self.file_name.clone()),
        }
    }

    fn form(&self) -> Form {
        Form::new()
            .part("image", self.image_part())
            .text("page_url", self.page_url.clone())
            .text("page_title", self.page_title.clone())
            .text("selection", self.selection.clone())
    }
}

/// Body of a "search similar" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarRequest {
    /// Screenshot bytes, base64 without the `data:` prefix.
    pub image_b64: String,
    pub page_url: String,
    pub page_title: String,
}

/// Reply of the "search similar" endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimilarResults {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub query_content: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    refresh_token: String,
}

/// Client for the FORGOR content-matching API.
#[derive(Clone)]
pub struct ForgorApi {
    auth: AuthClient,
}

impl ForgorApi {
    pub fn new(auth: AuthClient) -> Self {
        Self { auth }
    }

    pub fn from_config(config: &ServerConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        Ok(Self::new(AuthClient::from_config(config, store)?))
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub async fn tokens(&self) -> Result<TokenPair, ClientError> {
        self.auth.store().load().await
    }

    /// Exchange credentials for a token pair and persist it.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ClientError> {
        let response = self
            .post_credentials(&self.auth.endpoints().login(), username, password)
            .await?;
        let reply: LoginReply = serde_json::from_str(&response)?;
        let pair = TokenPair::new(reply.access_token, reply.refresh_token);
        if !pair.has_access() {
            return Err(ClientError::Parse(
                "login response carried no access_token".to_string(),
            ));
        }
        self.auth.store().save(&pair).await?;
        info!("Logged in as {}", username);
        Ok(pair)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(), ClientError> {
        self.post_credentials(&self.auth.endpoints().register(), username, password)
            .await?;
        info!("Registered {}", username);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        self.auth.store().clear().await
    }

    async fn post_credentials(
        &self,
        url: &str,
        username: &str,
        password: &str,
    ) -> Result<String, ClientError> {
        let response = self
            .auth
            .identity()
            .apply(self.auth.http().post(url))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let response = ensure_success(response).await?;
        read_text(response).await
    }

    /// POST `{searchText}` to the relevance check endpoint.
    pub async fn check_text(&self, search_text: &str) -> Result<RawResponse, ClientError> {
        let url = self.auth.endpoints().query();
        let body = json!({ "searchText": search_text });
        let response = self
            .auth
            .fetch_with_auth(|c| c.post(&url).json(&body))
            .await?;
        let status = response.status().as_u16();
        let text = read_text(response).await?;
        Ok(RawResponse::new(status, text))
    }

    /// Upload image bytes as a multipart form.
    pub async fn upload_image(&self, upload: &ImageUpload) -> Result<Value, ClientError> {
        let url = self.auth.endpoints().upload_image();
        debug!("Uploading {} ({} bytes)", upload.file_name, upload.bytes.len());
        let response = self
            .auth
            .fetch_with_auth(|c| c.post(&url).multipart(upload.form()))
            .await?;
        json_or_empty(ensure_success(response).await?).await
    }

    /// Ask the server to fetch and store a remote image.
    pub async fn upload_image_url(&self, image_url: &str, page_url: &str) -> Result<Value, ClientError> {
        if image_url.is_empty() {
            return Err(ClientError::InvalidInput("no image URL provided".to_string()));
        }
        let url = self.auth.endpoints().upload_image_url();
        let post_url = if page_url.is_empty() { "-" } else { page_url };
        let response = self
            .auth
            .fetch_with_auth(|c| {
                let form = Form::new()
                    .text("image_url", image_url.to_string())
                    .text("post_url", post_url.to_string());
                c.post(&url).multipart(form)
            })
            .await?;
        json_or_empty(ensure_success(response).await?).await
    }

    pub async fn delete_file(&self, file_name: &str) -> Result<Value, ClientError> {
        let url = self.auth.endpoints().delete();
        let response = self
            .auth
            .fetch_with_auth(|c| {
                c.post(&url)
                    .multipart(Form::new().text("file_name", file_name.to_string()))
            })
            .await?;
        json_or_empty(ensure_success(response).await?).await
    }

    pub async fn get_file(&self, name: &str) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&self.auth.endpoints().file(name)).await
    }

    pub async fn get_thumbnail(&self, name: &str) -> Result<Vec<u8>, ClientError> {
        self.get_bytes(&self.auth.endpoints().thumbnail(name)).await
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.auth.fetch_with_auth(|c| c.get(url)).await?;
        let response = ensure_success(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    pub async fn tier_info(&self) -> Result<TierInfo, ClientError> {
        let url = self.auth.endpoints().saves_left();
        let response = self.auth.fetch_with_auth(|c| c.get(&url)).await?;
        let text = read_text(ensure_success(response).await?).await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn search_similar(&self, request: &SimilarRequest) -> Result<SimilarResults, ClientError> {
        let url = self.auth.endpoints().similar_content();
        let response = self
            .auth
            .fetch_with_auth(|c| c.post(&url).json(request))
            .await?;
        let text = read_text(ensure_success(response).await?).await?;
        if text.trim().is_empty() {
            return Ok(SimilarResults::default());
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl RelevanceBackend for ForgorApi {
    async fn ensure_session(&self) -> bool {
        let tokens = match self.tokens().await {
            Ok(tokens) => tokens,
            Err(e) => {
                debug!("Token store unreadable: {}", e);
                return false;
            }
        };
        if tokens.is_complete() {
            return true;
        }
        if tokens.needs_refresh() {
            return self.auth.refresh_access_token().await.is_ok();
        }
        false
    }

    async fn check_text(&self, search_text: &str) -> Result<RawResponse, ClientError> {
        ForgorApi::check_text(self, search_text).await
    }
}

async fn read_text(response: Response) -> Result<String, ClientError> {
    response
        .text()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))
}

/// Turn a non-2xx response into [`ClientError::Http`], preferring the server's `message`.
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);
    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Decode a JSON body, treating an empty or malformed body as `{}`.
async fn json_or_empty(response: Response) -> Result<Value, ClientError> {
    let text = read_text(response).await?;
    Ok(serde_json::from_str(&text).unwrap_or_else(|_| json!({})))
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
