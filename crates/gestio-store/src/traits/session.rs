//! Session store trait for session records and state transitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::session::{Session, SessionState};

/// Trait for the session record backend.
///
/// Sessions move from `Active` into exactly one terminal state and
/// never back; implementations must refuse transitions out of a
/// terminal state. Ended sessions are kept so that session history
/// remains available for anomaly comparison.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new session. Returns `Conflict` when a session with
    /// the same token already exists.
    async fn insert(&self, session: Session) -> AppResult<Session>;

    /// Look up a session by id, regardless of state.
    async fn find_by_id(&self, session_id: Uuid) -> AppResult<Option<Session>>;

    /// Look up a session by its access token, regardless of state.
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;

    /// All sessions ever recorded for a user, active and ended.
    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// The user's currently active sessions.
    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>>;

    /// Number of currently active sessions for a user.
    async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<u64>;

    /// The active session with the oldest `last_activity_at`, if any.
    async fn find_most_idle_by_user(&self, user_id: Uuid) -> AppResult<Option<Session>>;

    /// Update `last_activity_at` on an active session. Returns `false`
    /// when the session is missing or already ended.
    async fn touch(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<bool>;

    /// Move an active session into a terminal state, stamping
    /// `ended_at`. Returns `false` when the session is missing or
    /// already ended.
    async fn end_session(
        &self,
        session_id: Uuid,
        state: SessionState,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Move all of a user's active sessions into a terminal state.
    /// Returns the number of sessions ended.
    async fn end_all_for_user(
        &self,
        user_id: Uuid,
        state: SessionState,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Expire every active session whose `last_activity_at` is before
    /// the cutoff. Returns the number of sessions expired.
    async fn expire_idle_since(&self, cutoff: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<u64>;
}
