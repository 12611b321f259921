//! Subscription domain entities.

pub mod model;

pub use model::{Subscription, SubscriptionStatus};
