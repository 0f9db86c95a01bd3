//! # FORGOR Config
//!
//! Configuration management for the FORGOR companion core: server
//! identity, pipeline timings, relevance threshold, token storage and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
