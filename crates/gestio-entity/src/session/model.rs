//! Session entity model.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::SessionState;

/// A user session.
///
/// Sessions are created on login and keyed by the access token issued with
/// them; the token is unique across all sessions. A session leaves the
/// `Active` state through logout, eviction, or expiry and is then kept as
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier.
    pub id: Uuid,
    /// The user this session belongs to.
    pub user_id: Uuid,
    /// The access token issued at login. Unique across all sessions.
    pub token: String,
    /// IP address from which the session was created.
    pub ip_address: Option<IpAddr>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Lifecycle state.
    pub state: SessionState,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// Last activity timestamp.
    pub last_activity_at: DateTime<Utc>,
    /// When the session left the `Active` state.
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Check whether the session has been idle since before the cutoff.
    pub fn is_idle_since(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_activity_at < cutoff
    }

    /// Calculate how long the session has been idle (in seconds).
    pub fn idle_seconds(&self) -> i64 {
        (Utc::now() - self.last_activity_at).num_seconds().max(0)
    }
}
