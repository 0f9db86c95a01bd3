//! Error types shared across the FORGOR crates.

mod badge;
mod client;

pub use badge::*;
pub use client::*;
