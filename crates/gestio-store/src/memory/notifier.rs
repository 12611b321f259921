//! In-memory notifier that records notifications instead of delivering them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::notification::{Notification, NotificationSeverity};

use super::super::traits::Notifier;

/// In-memory notifier using a Tokio RwLock for thread safety.
///
/// Records every notification so callers can inspect what would have
/// been delivered.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotifier {
    /// Recorded notifications, oldest first.
    state: Arc<RwLock<Vec<Notification>>>,
}

impl MemoryNotifier {
    /// Creates a new memory-based notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded notifications.
    pub async fn all(&self) -> Vec<Notification> {
        self.state.read().await.clone()
    }

    /// Recorded notifications for one user.
    pub async fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.state
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(
        &self,
        user_id: Uuid,
        title: &str,
        message: &str,
        severity: NotificationSeverity,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.push(Notification {
            id: Uuid::new_v4(),
            user_id,
            title: title.to_string(),
            message: message.to_string(),
            severity,
            created_at: Utc::now(),
        });
        Ok(())
    }
}
