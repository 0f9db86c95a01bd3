//! Remote API endpoint paths.

use url::form_urlencoded::byte_serialize;

/// Fixed endpoint paths under a configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base: base_url.as_ref().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn path(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub fn login(&self) -> String {
        self.path("/api/login")
    }

    pub fn register(&self) -> String {
        self.path("/api/register")
    }

    pub fn refresh(&self) -> String {
        self.path("/api/refresh_token")
    }

    pub fn query(&self) -> String {
        self.path("/api/check/text")
    }

    pub fn upload_image(&self) -> String {
        self.path("/api/upload/image")
    }

    pub fn upload_image_url(&self) -> String {
        self.path("/api/upload/imageurl")
    }

    pub fn delete(&self) -> String {
        self.path("/api/delete/file")
    }

    pub fn saves_left(&self) -> String {
        self.path("/api/get_saves_left")
    }

    pub fn similar_content(&self) -> String {
        self.path("/api/search/similar")
    }

    /// Full-size file by stored name.
    pub fn file(&self, name: &str) -> String {
        format!("{}/{}", self.path("/api/get_file"), encode_segment(name))
    }

    /// Thumbnail by stored name.
    pub fn thumbnail(&self, name: &str) -> String {
        format!("{}/{}", self.path("/api/get_thumbnail"), encode_segment(name))
    }
}

fn encode_segment(segment: &str) -> String {
    byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
