//! Short-lived cache for resolved plan policies.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;

use gestio_core::config::plan::PlanQuotaConfig;
use gestio_core::types::PlanPolicy;

/// Caches resolved plan policies per company.
///
/// Entries expire on the configured TTL, so plan changes propagate
/// without an explicit invalidation at the latest one TTL later.
#[derive(Debug, Clone)]
pub struct PolicyCache {
    /// The underlying moka cache.
    cache: Cache<Uuid, PlanPolicy>,
}

impl PolicyCache {
    /// Creates a policy cache from plan quota configuration.
    pub fn new(config: &PlanQuotaConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self { cache }
    }

    /// The cached policy for a company, if present and fresh.
    pub async fn get(&self, company_id: Uuid) -> Option<PlanPolicy> {
        self.cache.get(&company_id).await
    }

    /// Caches the resolved policy for a company.
    pub async fn insert(&self, company_id: Uuid, policy: PlanPolicy) {
        self.cache.insert(company_id, policy).await;
    }

    /// Drops the cached policy for a company.
    pub async fn invalidate(&self, company_id: Uuid) {
        self.cache.invalidate(&company_id).await;
    }
}
