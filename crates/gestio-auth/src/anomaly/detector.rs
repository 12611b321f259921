//! Login anomaly detection against a user's session history.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use gestio_core::config::SessionConfig;
use gestio_core::result::AppResult;
use gestio_entity::notification::NotificationSeverity;
use gestio_entity::session::Session;
use gestio_entity::user::User;
use gestio_store::{Notifier, SessionStore};

use super::fingerprint::DeviceFingerprint;

/// Inspects fresh logins for anomalies and notifies the user.
///
/// Strictly best-effort: inspection runs after the session is created
/// and neither an inspection failure nor a notification failure ever
/// fails the login.
#[derive(Debug, Clone)]
pub struct AnomalyDetector {
    /// Session history source.
    sessions: Arc<dyn SessionStore>,
    /// Notification sink.
    notifier: Arc<dyn Notifier>,
    /// Active-session count above which a burst alert fires.
    burst_threshold: u32,
}

impl AnomalyDetector {
    /// Creates a new anomaly detector.
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            sessions,
            notifier,
            burst_threshold: config.anomaly_burst_threshold,
        }
    }

    /// Inspects a fresh login. Never fails; inspection errors are
    /// logged and swallowed.
    pub async fn inspect_login(&self, user: &User, session: &Session) {
        if let Err(e) = self.run_checks(user, session).await {
            warn!(user_id = %user.id, error = %e, "Anomaly inspection failed");
        }
    }

    async fn run_checks(&self, user: &User, session: &Session) -> AppResult<()> {
        let history = self.sessions.find_by_user(user.id).await?;
        let prior: Vec<&Session> = history.iter().filter(|s| s.id != session.id).collect();

        if prior.is_empty() {
            self.send(
                user.id,
                "First access",
                "Welcome! This is the first login on your account.",
                NotificationSeverity::Info,
            )
            .await;
            return Ok(());
        }

        if let Some(ip) = session.ip_address {
            let known_ip = prior.iter().any(|s| s.ip_address == Some(ip));
            if !known_ip {
                self.send(
                    user.id,
                    "Login from a new location",
                    &format!("A login from a new IP address ({ip}) was detected."),
                    NotificationSeverity::Warning,
                )
                .await;
            }
        }

        if let Some(user_agent) = session.user_agent.as_deref() {
            let fingerprint = DeviceFingerprint::from_user_agent(user_agent);
            let known_device = prior
                .iter()
                .filter_map(|s| s.user_agent.as_deref())
                .any(|ua| DeviceFingerprint::from_user_agent(ua) == fingerprint);
            if !known_device {
                self.send(
                    user.id,
                    "Login from a new device",
                    &format!("A login from a new device ({fingerprint}) was detected."),
                    NotificationSeverity::Warning,
                )
                .await;
            }
        }

        let active = history.iter().filter(|s| s.is_active()).count() as u32;
        if active > self.burst_threshold {
            self.send(
                user.id,
                "Unusual number of active sessions",
                &format!("Your account now has {active} active sessions."),
                NotificationSeverity::Critical,
            )
            .await;
        }

        Ok(())
    }

    /// Records one notification, swallowing delivery failures.
    async fn send(&self, user_id: Uuid, title: &str, message: &str, severity: NotificationSeverity) {
        debug!(user_id = %user_id, title = %title, "Anomaly signal");
        if let Err(e) = self.notifier.notify(user_id, title, message, severity).await {
            warn!(
                user_id = %user_id,
                title = %title,
                error = %e,
                "Failed to record anomaly notification"
            );
        }
    }
}
