//! Data-URL decoding and upload file naming.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{Local, NaiveDateTime};

use forgor_protocols::ClientError;

const DEFAULT_MIME: &str = "image/png";

/// Raw bytes recovered from a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// File extension matching the mime type.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "png",
        }
    }
}

/// Decode a base64 `data:` URL such as a captured tab screenshot.
pub fn decode_data_url(data_url: &str) -> Result<DecodedImage, ClientError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| ClientError::InvalidInput("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| ClientError::InvalidInput("data URL has no payload".to_string()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| ClientError::InvalidInput("only base64 data URLs are supported".to_string()))?;
    let mime = if mime.is_empty() { DEFAULT_MIME } else { mime };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| ClientError::InvalidInput(format!("invalid base64 payload: {}", e)))?;

    Ok(DecodedImage {
        mime: mime.to_string(),
        bytes,
    })
}

/// `<prefix>_YYYYMMDD_HHMMSS.<ext>` in local time.
pub fn timestamp_name(prefix: &str, ext: &str) -> String {
    timestamp_name_at(prefix, ext, Local::now().naive_local())
}

pub(crate) fn timestamp_name_at(prefix: &str, ext: &str, at: NaiveDateTime) -> String {
    format!("{}_{}.{}", prefix, at.format("%Y%m%d_%H%M%S"), ext)
}
