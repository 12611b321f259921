//! Store interfaces and in-memory implementations for Gestio.
//!
//! The auth and session layers talk to persistence through the narrow
//! traits in [`traits`]; the [`memory`] module provides single-node
//! implementations backed by Tokio-guarded arenas, used in tests and
//! in deployments without an external database.

pub mod memory;
pub mod traits;

pub use traits::{IdentityStore, Notifier, SessionStore, SubscriptionStore, TokenStore};
