//! In-memory session store using a Tokio RwLock for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::session::{Session, SessionState};

use super::super::traits::SessionStore;

/// Internal state for the memory-based session store.
#[derive(Debug, Default)]
struct InnerState {
    /// Session records keyed by id. Ended sessions stay here so that
    /// session history remains queryable.
    sessions: HashMap<Uuid, Session>,
    /// Token to session-id index for O(1) token lookup.
    token_index: HashMap<String, Uuid>,
}

/// In-memory session store using a Tokio RwLock for thread safety.
///
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    /// Protected inner state.
    state: Arc<RwLock<InnerState>>,
}

impl MemorySessionStore {
    /// Creates a new memory-based session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn insert(&self, session: Session) -> AppResult<Session> {
        let mut state = self.state.write().await;

        if state.token_index.contains_key(&session.token) {
            return Err(AppError::conflict("A session with this token already exists"));
        }

        state.token_index.insert(session.token.clone(), session.id);
        state.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, session_id: Uuid) -> AppResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state.sessions.get(&session_id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state
            .token_index
            .get(token)
            .and_then(|id| state.sessions.get(id))
            .cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let state = self.state.read().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn find_active_by_user(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        let state = self.state.read().await;
        let mut sessions: Vec<Session> = state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .cloned()
            .collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn count_active_by_user(&self, user_id: Uuid) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .count() as u64)
    }

    async fn find_most_idle_by_user(&self, user_id: Uuid) -> AppResult<Option<Session>> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            // Tie-break on creation time and id so eviction is deterministic.
            .min_by_key(|s| (s.last_activity_at, s.created_at, s.id))
            .cloned())
    }

    async fn touch(&self, session_id: Uuid, at: DateTime<Utc>) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.sessions.get_mut(&session_id) {
            Some(session) if session.is_active() => {
                session.last_activity_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn end_session(
        &self,
        session_id: Uuid,
        state: SessionState,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        if !state.is_terminal() {
            return Err(AppError::validation("Target session state must be terminal"));
        }

        let mut inner = self.state.write().await;
        match inner.sessions.get_mut(&session_id) {
            Some(session) if session.is_active() => {
                session.state = state;
                session.ended_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn end_all_for_user(
        &self,
        user_id: Uuid,
        state: SessionState,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        if !state.is_terminal() {
            return Err(AppError::validation("Target session state must be terminal"));
        }

        let mut inner = self.state.write().await;
        let mut ended = 0u64;
        for session in inner.sessions.values_mut() {
            if session.user_id == user_id && session.is_active() {
                session.state = state;
                session.ended_at = Some(at);
                ended += 1;
            }
        }
        Ok(ended)
    }

    async fn expire_idle_since(&self, cutoff: DateTime<Utc>, at: DateTime<Utc>) -> AppResult<u64> {
        let mut inner = self.state.write().await;
        let mut expired = 0u64;
        for session in inner.sessions.values_mut() {
            if session.is_active() && session.last_activity_at < cutoff {
                session.state = SessionState::Expired;
                session.ended_at = Some(at);
                expired += 1;
            }
        }
        Ok(expired)
    }
}
