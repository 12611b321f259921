//! Subscription plan to session policy resolution.

pub mod cache;
pub mod resolver;

pub use cache::PolicyCache;
pub use resolver::PlanPolicyResolver;
