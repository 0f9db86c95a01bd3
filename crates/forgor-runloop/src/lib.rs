//! # FORGOR RunLoop
//!
//! The passive relevance pipeline of the FORGOR companion core.
//!
//! ## Flow
//!
//! ```text
//! tab events ──► ActionBatcher ──(quiet window)──► RelevancePoller ──► BadgeController
//!                     │                                 │
//!                     └──► IdleWatcher ──(idle)─────────┤
//!                                                       ▼
//!                              RelevanceBackend + QueryCache
//! ```
//!
//! User actions (uploads, "search similar") go through [`UserActions`];
//! UI requests are answered by [`MessageRouter`]. [`Session`] owns every
//! piece of mutable state and wires the components together.
//!
//! ## Key Components
//!
//! - [`SingleSlot`]: Cancel-and-replace delayed task
//! - [`QueryCache`]: TTL memoization of filtered results
//! - [`ActionBatcher`]: Debounced, deduplicated tab signals
//! - [`RelevancePoller`]: Coalesced relevance queries
//! - [`BadgeController`]: Badge transitions with auto-revert
//! - [`NotificationBus`]: Best-effort core → UI notifications

pub mod actions;
pub mod badge;
pub mod batcher;
pub mod bus;
pub mod cache;
pub mod error;
pub mod idle;
pub mod login;
pub mod poller;
pub mod router;
pub mod session;
pub mod slot;
pub mod tier;

#[cfg(test)]
pub(crate) mod testing;

pub use actions::{MenuCommand, PageContext, UserActions};
pub use badge::BadgeController;
pub use batcher::{ActionBatcher, ActionBuffer, QUERY_SEPARATOR};
pub use bus::NotificationBus;
pub use cache::{make_query_key, CacheEntry, QueryCache};
pub use error::{SessionError, SessionResult};
pub use idle::IdleWatcher;
pub use login::LoginPrompter;
pub use poller::{FlushOutcome, RelevanceOutcome, RelevancePoller};
pub use router::MessageRouter;
pub use session::{InstallReason, Session, SessionSettings};
pub use slot::SingleSlot;
pub use tier::TierTracker;
