//! Session registry: creation, quota enforcement, and state transitions.

use std::net::IpAddr;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gestio_core::config::SessionConfig;
use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_core::types::PlanPolicy;
use gestio_entity::session::{Session, SessionState};
use gestio_store::SessionStore;

/// Manages session records and their state machine.
///
/// Sessions move from `Active` into exactly one of `Invalidated`,
/// `Evicted`, or `Expired`; a terminal session is never reactivated.
/// The count-then-create sequence in [`create_within_quota`] is
/// serialized per user so concurrent logins cannot overshoot the
/// plan quota.
///
/// [`create_within_quota`]: SessionRegistry::create_within_quota
#[derive(Debug, Clone)]
pub struct SessionRegistry {
    /// Session persistence.
    store: Arc<dyn SessionStore>,
    /// Session configuration.
    config: SessionConfig,
    /// Per-user locks serializing quota checks. Entries are tiny and
    /// bounded by the number of distinct users seen by this process.
    user_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionRegistry {
    /// Creates a new session registry.
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self {
            store,
            config,
            user_locks: Arc::new(DashMap::new()),
        }
    }

    /// Creates a new active session without quota enforcement.
    ///
    /// Used for quota-exempt roles and as the final step of
    /// [`create_within_quota`].
    ///
    /// [`create_within_quota`]: SessionRegistry::create_within_quota
    pub async fn create(
        &self,
        user_id: Uuid,
        token: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<&str>,
    ) -> AppResult<Session> {
        let now = Utc::now();
        let session = self
            .store
            .insert(Session {
                id: Uuid::new_v4(),
                user_id,
                token: token.to_string(),
                ip_address,
                user_agent: user_agent.map(str::to_string),
                state: SessionState::Active,
                created_at: now,
                last_activity_at: now,
                ended_at: None,
            })
            .await?;

        debug!(user_id = %user_id, session_id = %session.id, "Session created");

        Ok(session)
    }

    /// Creates a session subject to the given plan policy.
    ///
    /// At the quota boundary the policy decides: evict the most idle
    /// session, or refuse the login with a quota error that names the
    /// plan. Failures in the count or eviction step are logged and the
    /// login allowed through; refusing every login because the quota
    /// machinery is broken would be the worse outage.
    pub async fn create_within_quota(
        &self,
        user_id: Uuid,
        policy: &PlanPolicy,
        token: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<&str>,
    ) -> AppResult<Session> {
        let lock = self
            .user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = lock.lock().await;

        let active = match self.store.count_active_by_user(user_id).await {
            Ok(count) => count,
            Err(e) => {
                warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to count active sessions, allowing login"
                );
                return self.create(user_id, token, ip_address, user_agent).await;
            }
        };

        if policy.is_exceeded_by(active) {
            if policy.evict_oldest {
                match self.evict_oldest(user_id).await {
                    Ok(Some(evicted)) => {
                        info!(
                            user_id = %user_id,
                            evicted_session = %evicted.id,
                            plan = %policy.plan,
                            "Evicted most idle session to stay within plan quota"
                        );
                    }
                    Ok(None) => {
                        warn!(
                            user_id = %user_id,
                            "No session found to evict despite quota, allowing login"
                        );
                    }
                    Err(e) => {
                        warn!(
                            user_id = %user_id,
                            error = %e,
                            "Failed to evict session, allowing login"
                        );
                    }
                }
            } else {
                return Err(AppError::quota_exceeded(format!(
                    "Maximum concurrent sessions ({}) reached for the {} plan. \
                     Log out of another device or upgrade your plan.",
                    policy.max_sessions, policy.plan
                )));
            }
        }

        self.create(user_id, token, ip_address, user_agent).await
    }

    /// The active session bound to a token, or `None` when the token
    /// is unknown or its session has ended.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self
            .store
            .find_by_token(token)
            .await?
            .filter(Session::is_active))
    }

    /// Refreshes `last_activity_at` on an active session. Returns
    /// `false` when the session is missing or already ended.
    pub async fn touch(&self, session_id: Uuid) -> AppResult<bool> {
        self.store.touch(session_id, Utc::now()).await
    }

    /// Invalidates a session. Invalidating a session that is already
    /// ended, or unknown, is a no-op success.
    pub async fn invalidate(&self, session_id: Uuid) -> AppResult<()> {
        let ended = self
            .store
            .end_session(session_id, SessionState::Invalidated, Utc::now())
            .await?;

        if !ended {
            debug!(session_id = %session_id, "Session already ended or unknown");
        }

        Ok(())
    }

    /// Invalidates the session bound to a token, if any.
    pub async fn invalidate_by_token(&self, token: &str) -> AppResult<()> {
        match self.store.find_by_token(token).await? {
            Some(session) => self.invalidate(session.id).await,
            None => {
                debug!("No session found for token during invalidation");
                Ok(())
            }
        }
    }

    /// Invalidates every active session of a user. Returns the number
    /// of sessions invalidated.
    pub async fn invalidate_all(&self, user_id: Uuid) -> AppResult<u64> {
        let ended = self
            .store
            .end_all_for_user(user_id, SessionState::Invalidated, Utc::now())
            .await?;

        info!(user_id = %user_id, count = ended, "Invalidated all sessions for user");

        Ok(ended)
    }

    /// Evicts the user's most idle active session: the one with the
    /// smallest `last_activity_at`. Returns the evicted session, or
    /// `None` when the user has no active session.
    pub async fn evict_oldest(&self, user_id: Uuid) -> AppResult<Option<Session>> {
        let Some(candidate) = self.store.find_most_idle_by_user(user_id).await? else {
            return Ok(None);
        };

        let ended = self
            .store
            .end_session(candidate.id, SessionState::Evicted, Utc::now())
            .await?;

        // A concurrent transition beat us to this session.
        if !ended {
            return Ok(None);
        }

        Ok(Some(candidate))
    }

    /// Expires every active session idle for longer than the
    /// configured timeout. Returns the number of sessions expired.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let cutoff = Utc::now() - chrono::Duration::minutes(self.config.idle_timeout_minutes as i64);
        let expired = self.store.expire_idle_since(cutoff, Utc::now()).await?;

        if expired > 0 {
            info!(count = expired, "Expired idle sessions");
        }

        Ok(expired)
    }

    /// Number of currently active sessions for a user.
    pub async fn active_count(&self, user_id: Uuid) -> AppResult<u64> {
        self.store.count_active_by_user(user_id).await
    }

    /// The user's currently active sessions.
    pub async fn sessions_for_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.store.find_active_by_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestio_store::memory::MemorySessionStore;

    fn registry() -> SessionRegistry {
        SessionRegistry::new(Arc::new(MemorySessionStore::new()), SessionConfig::default())
    }

    fn policy(max_sessions: u32, evict_oldest: bool) -> PlanPolicy {
        PlanPolicy {
            plan: "starter".to_string(),
            max_sessions,
            evict_oldest,
        }
    }

    #[tokio::test]
    async fn quota_with_eviction_replaces_most_idle_session() {
        let registry = registry();
        let user_id = Uuid::new_v4();
        let policy = policy(2, true);

        let first = registry
            .create_within_quota(user_id, &policy, "tok-1", None, None)
            .await
            .unwrap();
        registry
            .create_within_quota(user_id, &policy, "tok-2", None, None)
            .await
            .unwrap();

        // Make the first session unambiguously the most idle.
        registry
            .store
            .touch(first.id, Utc::now() - chrono::Duration::hours(1))
            .await
            .unwrap();

        registry
            .create_within_quota(user_id, &policy, "tok-3", None, None)
            .await
            .unwrap();

        assert_eq!(registry.active_count(user_id).await.unwrap(), 2);
        assert!(registry.find_by_token("tok-1").await.unwrap().is_none());
        assert!(registry.find_by_token("tok-3").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn quota_without_eviction_refuses_login() {
        let registry = registry();
        let user_id = Uuid::new_v4();
        let policy = policy(1, false);

        registry
            .create_within_quota(user_id, &policy, "tok-1", None, None)
            .await
            .unwrap();

        let err = registry
            .create_within_quota(user_id, &policy, "tok-2", None, None)
            .await
            .unwrap_err();

        assert_eq!(err.kind, gestio_core::error::ErrorKind::QuotaExceeded);
        assert!(err.message.contains("upgrade your plan"));
        assert_eq!(registry.active_count(user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn concurrent_logins_never_overshoot_quota() {
        let registry = registry();
        let user_id = Uuid::new_v4();
        let policy = policy(2, false);

        let attempts = (0..8).map(|i| {
            let registry = registry.clone();
            let policy = policy.clone();
            let token = format!("tok-{i}");
            async move {
                registry
                    .create_within_quota(user_id, &policy, &token, None, None)
                    .await
            }
        });

        let results = futures::future::join_all(attempts).await;
        let successes = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(successes, 2);
        assert_eq!(registry.active_count(user_id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let registry = registry();
        let user_id = Uuid::new_v4();
        let session = registry.create(user_id, "tok-1", None, None).await.unwrap();

        registry.invalidate(session.id).await.unwrap();
        registry.invalidate(session.id).await.unwrap();
        registry.invalidate(Uuid::new_v4()).await.unwrap();

        assert_eq!(registry.active_count(user_id).await.unwrap(), 0);
    }
}
