//! # FORGOR Protocols
//!
//! Shared vocabulary for the FORGOR companion core.
//! Contains data types, the error taxonomy and the traits at the seams
//! between the relevance pipeline and its collaborators - no I/O.
//!
//! ## Core Traits
//!
//! - [`RelevanceBackend`] - Remote check endpoint as seen by the poller
//! - [`BadgeSink`] - Platform icon-badge surface

pub mod backend;
pub mod badge;
pub mod error;
pub mod message;
pub mod types;

pub use backend::{RawResponse, RelevanceBackend};
pub use badge::BadgeSink;
pub use error::{BadgeError, ClientError};
pub use message::{BackgroundMessage, BackgroundResponse, UiNotification};
pub use types::*;
