//! Subscription entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Subscription is paid up and grants its plan's policy.
    Active,
    /// Payment is overdue; the plan no longer applies.
    Suspended,
    /// Subscription was canceled.
    Canceled,
}

/// A tenant company's subscription to a plan.
///
/// Billing itself is handled elsewhere; this model carries exactly what
/// policy resolution needs. Only an `Active`, non-deleted subscription
/// grants a plan policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: Uuid,
    /// The subscribed tenant company.
    pub company_id: Uuid,
    /// Plan name, matched against the configured quota table.
    pub plan_name: String,
    /// Billing status.
    pub status: SubscriptionStatus,
    /// Soft-delete marker; deleted subscriptions never grant a policy.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When the subscription was created.
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Check whether this subscription currently grants its plan's policy.
    pub fn grants_policy(&self) -> bool {
        self.status == SubscriptionStatus::Active && self.deleted_at.is_none()
    }
}
