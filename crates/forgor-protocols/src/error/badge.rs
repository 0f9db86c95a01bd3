//! Badge surface errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("Badge surface unavailable: {0}")]
    Unavailable(String),

    #[error("Badge write failed: {0}")]
    WriteFailed(String),
}
