//! Common data types.

mod badge;
mod query;
mod tab;
mod tier;
mod tokens;

pub use badge::*;
pub use query::*;
pub use tab::*;
pub use tier::*;
pub use tokens::*;
