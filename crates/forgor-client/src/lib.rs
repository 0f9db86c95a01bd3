//! # FORGOR Client
//!
//! HTTP access to the FORGOR content-matching API.
//!
//! - [`TokenStore`] - where the access/refresh pair lives
//! - [`AuthClient`] - bearer auth with refresh-on-401 and single-flight refresh
//! - [`ForgorApi`] - typed wrappers for login, relevance checks, uploads and tier info

mod api;
mod auth;
mod data_url;
mod endpoints;
mod store;

pub use api::{ForgorApi, ImageUpload, SimilarRequest, SimilarResults};
pub use auth::{AuthClient, ClientIdentity};
pub use data_url::{decode_data_url, timestamp_name, DecodedImage};
pub use endpoints::Endpoints;
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
