//! Notifier trait for recording user-facing notifications.

use async_trait::async_trait;
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::notification::NotificationSeverity;

/// Trait for the notification backend.
///
/// Implementations record the notification; delivery (email, in-app
/// feed) happens elsewhere. Callers on the login path treat failures
/// as best-effort and must not let them fail the login.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug + 'static {
    /// Record a notification for a user.
    async fn notify(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        severity: NotificationSeverity,
    ) -> AppResult<()>;
}
