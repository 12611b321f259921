//! Narrow store traits behind which the CRUD and delivery layers live.

pub mod identity;
pub mod notifier;
pub mod session;
pub mod subscription;
pub mod token;

pub use identity::IdentityStore;
pub use notifier::Notifier;
pub use session::SessionStore;
pub use subscription::SubscriptionStore;
pub use token::TokenStore;
