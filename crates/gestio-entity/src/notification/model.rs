//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Severity level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    /// Informational event (first access, reset code issued).
    Info,
    /// Suspicious but not blocking (new location, new device).
    Warning,
    /// Needs attention (concurrency burst).
    Critical,
}

impl NotificationSeverity {
    /// Return the severity as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

/// A notification recorded for a user.
///
/// Delivery (email, push, in-app feed) is handled elsewhere; this core
/// only records that the notification exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// The recipient user.
    pub user_id: Uuid,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Severity level.
    pub severity: NotificationSeverity,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}
