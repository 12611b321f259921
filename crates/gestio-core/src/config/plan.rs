//! Plan quota configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Plan quota table and policy cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanQuotaConfig {
    /// Per-plan session quotas. Key is the subscription plan name.
    /// Plans not present in this table resolve to the fallback policy.
    #[serde(default = "default_by_plan")]
    pub by_plan: HashMap<String, PlanQuota>,
    /// TTL for cached policy resolutions in seconds.
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,
    /// Maximum number of tenants held in the policy cache.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

/// Session quota for a single plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanQuota {
    /// Maximum concurrent active sessions per user.
    pub max_sessions: u32,
    /// Whether the stalest session is evicted to make room at the limit.
    #[serde(default = "default_true")]
    pub evict_oldest: bool,
}

impl Default for PlanQuotaConfig {
    fn default() -> Self {
        Self {
            by_plan: default_by_plan(),
            cache_ttl_seconds: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

fn default_by_plan() -> HashMap<String, PlanQuota> {
    let mut map = HashMap::new();
    map.insert(
        "starter".to_string(),
        PlanQuota {
            max_sessions: 2,
            evict_oldest: true,
        },
    );
    map.insert(
        "professional".to_string(),
        PlanQuota {
            max_sessions: 5,
            evict_oldest: true,
        },
    );
    map.insert(
        "business".to_string(),
        PlanQuota {
            max_sessions: 20,
            evict_oldest: true,
        },
    );
    map.insert(
        "enterprise".to_string(),
        PlanQuota {
            max_sessions: 50,
            evict_oldest: true,
        },
    );
    map
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_capacity() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}
