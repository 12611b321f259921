//! In-memory store implementations for single-node deployments and tests.

pub mod identity;
pub mod notifier;
pub mod session;
pub mod subscription;
pub mod token;

pub use identity::MemoryIdentityStore;
pub use notifier::MemoryNotifier;
pub use session::MemorySessionStore;
pub use subscription::MemorySubscriptionStore;
pub use token::MemoryTokenStore;
