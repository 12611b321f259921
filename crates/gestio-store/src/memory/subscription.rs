//! In-memory subscription store for plan lookup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::subscription::{Subscription, SubscriptionStatus};

use super::super::traits::SubscriptionStore;

/// In-memory subscription store using a Tokio RwLock for thread safety.
///
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemorySubscriptionStore {
    /// Subscription records, newest last.
    state: Arc<RwLock<Vec<Subscription>>>,
}

impl MemorySubscriptionStore {
    /// Creates a new memory-based subscription store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a subscription.
    pub async fn insert(&self, subscription: Subscription) {
        let mut state = self.state.write().await;
        state.push(subscription);
    }

    /// Records an active subscription for a company on the given plan.
    pub async fn subscribe(&self, company_id: Uuid, plan_name: &str) -> Subscription {
        let subscription = Subscription {
            id: Uuid::new_v4(),
            company_id,
            plan_name: plan_name.to_string(),
            status: SubscriptionStatus::Active,
            deleted_at: None,
            created_at: Utc::now(),
        };
        self.insert(subscription.clone()).await;
        subscription
    }

    /// Cancels every subscription of a company.
    pub async fn cancel_for_company(&self, company_id: Uuid) {
        let mut state = self.state.write().await;
        for subscription in state.iter_mut() {
            if subscription.company_id == company_id {
                subscription.status = SubscriptionStatus::Canceled;
            }
        }
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn find_active_by_company(&self, company_id: Uuid) -> AppResult<Option<Subscription>> {
        let state = self.state.read().await;
        Ok(state
            .iter()
            .filter(|s| s.company_id == company_id && s.grants_policy())
            .max_by_key(|s| s.created_at)
            .cloned())
    }
}
