//! Subscription store trait for plan lookup.

use async_trait::async_trait;
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::subscription::Subscription;

/// Trait for the billing backend, narrowed to what plan policy
/// resolution needs.
#[async_trait]
pub trait SubscriptionStore: Send + Sync + std::fmt::Debug + 'static {
    /// The subscription that currently grants a plan policy for the
    /// company, if any. Suspended, canceled, and soft-deleted
    /// subscriptions do not qualify.
    async fn find_active_by_company(&self, company_id: Uuid) -> AppResult<Option<Subscription>>;
}
