//! Plan policy resolution from subscriptions.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use gestio_core::config::plan::PlanQuotaConfig;
use gestio_core::result::AppResult;
use gestio_core::types::PlanPolicy;
use gestio_store::SubscriptionStore;

use super::cache::PolicyCache;

/// Resolves the session policy a company's subscription grants.
///
/// Resolution order:
/// 1. Cached policy from an earlier lookup
/// 2. The company's active subscription, mapped through the quota table
/// 3. The fallback policy (one session, no eviction)
///
/// Users without a company resolve to the fallback policy without a
/// subscription lookup.
#[derive(Debug, Clone)]
pub struct PlanPolicyResolver {
    /// Billing backend for subscription lookup.
    subscriptions: Arc<dyn SubscriptionStore>,
    /// Plan name to quota mapping.
    config: PlanQuotaConfig,
    /// Per-company policy cache.
    cache: PolicyCache,
}

impl PlanPolicyResolver {
    /// Creates a new resolver.
    pub fn new(subscriptions: Arc<dyn SubscriptionStore>, config: PlanQuotaConfig) -> Self {
        Self {
            cache: PolicyCache::new(&config),
            subscriptions,
            config,
        }
    }

    /// Resolves the effective session policy for a company.
    pub async fn resolve(&self, company_id: Option<Uuid>) -> AppResult<PlanPolicy> {
        let Some(company_id) = company_id else {
            return Ok(PlanPolicy::fallback());
        };

        if let Some(policy) = self.cache.get(company_id).await {
            return Ok(policy);
        }

        let policy = match self.subscriptions.find_active_by_company(company_id).await? {
            Some(subscription) => match self.config.by_plan.get(&subscription.plan_name) {
                Some(quota) => PlanPolicy::from_quota(&subscription.plan_name, quota),
                None => {
                    warn!(
                        company_id = %company_id,
                        plan = %subscription.plan_name,
                        "Subscription references an unknown plan, using fallback policy"
                    );
                    PlanPolicy::fallback()
                }
            },
            None => {
                debug!(company_id = %company_id, "No active subscription, using fallback policy");
                PlanPolicy::fallback()
            }
        };

        self.cache.insert(company_id, policy.clone()).await;

        Ok(policy)
    }

    /// Drops the cached policy for a company, forcing the next
    /// `resolve` to consult the subscription again.
    pub async fn invalidate(&self, company_id: Uuid) {
        self.cache.invalidate(company_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestio_store::memory::MemorySubscriptionStore;

    fn resolver_with(store: MemorySubscriptionStore) -> PlanPolicyResolver {
        PlanPolicyResolver::new(Arc::new(store), PlanQuotaConfig::default())
    }

    #[tokio::test]
    async fn company_less_principal_gets_fallback() {
        let resolver = resolver_with(MemorySubscriptionStore::new());
        let policy = resolver.resolve(None).await.unwrap();
        assert_eq!(policy, PlanPolicy::fallback());
    }

    #[tokio::test]
    async fn active_subscription_maps_through_quota_table() {
        let store = MemorySubscriptionStore::new();
        let company_id = Uuid::new_v4();
        store.subscribe(company_id, "professional").await;

        let resolver = resolver_with(store);
        let policy = resolver.resolve(Some(company_id)).await.unwrap();

        assert_eq!(policy.plan, "professional");
        assert_eq!(policy.max_sessions, 5);
        assert!(policy.evict_oldest);
    }

    #[tokio::test]
    async fn unknown_plan_falls_back() {
        let store = MemorySubscriptionStore::new();
        let company_id = Uuid::new_v4();
        store.subscribe(company_id, "legacy-gold").await;

        let resolver = resolver_with(store);
        let policy = resolver.resolve(Some(company_id)).await.unwrap();

        assert_eq!(policy, PlanPolicy::fallback());
    }

    #[tokio::test]
    async fn missing_subscription_falls_back() {
        let resolver = resolver_with(MemorySubscriptionStore::new());
        let policy = resolver.resolve(Some(Uuid::new_v4())).await.unwrap();
        assert_eq!(policy, PlanPolicy::fallback());
    }

    #[tokio::test]
    async fn cached_policy_survives_subscription_change_until_invalidated() {
        let store = MemorySubscriptionStore::new();
        let company_id = Uuid::new_v4();
        store.subscribe(company_id, "starter").await;

        let resolver = resolver_with(store.clone());
        assert_eq!(resolver.resolve(Some(company_id)).await.unwrap().plan, "starter");

        store.subscribe(company_id, "business").await;
        // Still cached.
        assert_eq!(resolver.resolve(Some(company_id)).await.unwrap().plan, "starter");

        resolver.invalidate(company_id).await;
        assert_eq!(resolver.resolve(Some(company_id)).await.unwrap().plan, "business");
    }
}
