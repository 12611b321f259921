//! Resolved plan policy types.

use serde::{Deserialize, Serialize};

use crate::config::plan::PlanQuota;

/// Resolved session policy for a tenant.
///
/// Policies are resolved from the tenant's active subscription:
/// 1. Active, non-deleted subscription with a plan in the quota table
/// 2. Fallback (one session, no eviction) for tenants with no active
///    subscription, plans missing from the table, and tenant-less principals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPolicy {
    /// The plan name this policy was resolved from.
    pub plan: String,
    /// Maximum concurrent active sessions per user.
    pub max_sessions: u32,
    /// Whether the stalest session is evicted to make room at the limit.
    pub evict_oldest: bool,
}

impl PlanPolicy {
    /// The restrictive policy applied when no plan can be resolved.
    pub fn fallback() -> Self {
        Self {
            plan: "fallback".to_string(),
            max_sessions: 1,
            evict_oldest: false,
        }
    }

    /// Build a policy from a quota table entry.
    pub fn from_quota(plan: impl Into<String>, quota: &PlanQuota) -> Self {
        Self {
            plan: plan.into(),
            max_sessions: quota.max_sessions,
            evict_oldest: quota.evict_oldest,
        }
    }

    /// Check whether a given active session count has reached this policy's limit.
    pub fn is_exceeded_by(&self, active_count: u64) -> bool {
        active_count >= u64::from(self.max_sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_policy() {
        let policy = PlanPolicy::fallback();
        assert_eq!(policy.max_sessions, 1);
        assert!(!policy.evict_oldest);
    }

    #[test]
    fn test_is_exceeded_by() {
        let policy = PlanPolicy {
            plan: "starter".to_string(),
            max_sessions: 2,
            evict_oldest: true,
        };
        assert!(!policy.is_exceeded_by(0));
        assert!(!policy.is_exceeded_by(1));
        assert!(policy.is_exceeded_by(2));
        assert!(policy.is_exceeded_by(3));
    }

    #[test]
    fn test_from_quota() {
        let quota = PlanQuota {
            max_sessions: 5,
            evict_oldest: true,
        };
        let policy = PlanPolicy::from_quota("professional", &quota);
        assert_eq!(policy.plan, "professional");
        assert_eq!(policy.max_sessions, 5);
        assert!(policy.evict_oldest);
    }
}
