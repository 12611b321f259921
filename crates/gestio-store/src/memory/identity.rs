//! In-memory identity store using a Tokio RwLock for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::permission::PermissionSet;
use gestio_entity::user::{User, UserRole, UserStatus};

use super::super::traits::IdentityStore;

/// Internal state for the memory-based identity store.
#[derive(Debug, Default)]
struct InnerState {
    /// User records keyed by id.
    users: HashMap<Uuid, User>,
    /// Permission names granted per role.
    role_permissions: HashMap<UserRole, PermissionSet>,
}

/// In-memory identity store using a Tokio RwLock for thread safety.
///
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    /// Protected inner state.
    state: Arc<RwLock<InnerState>>,
}

impl MemoryIdentityStore {
    /// Creates a new memory-based identity store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the permission names granted to a role.
    pub async fn set_role_permissions(&self, role: UserRole, permissions: PermissionSet) {
        let mut state = self.state.write().await;
        state.role_permissions.insert(role, permissions);
    }

    async fn with_user(&self, user_id: Uuid, apply: impl FnOnce(&mut User)) -> AppResult<()> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        apply(user);
        user.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut state = self.state.write().await;

        for existing in state.users.values() {
            if existing.email.eq_ignore_ascii_case(&user.email) {
                return Err(AppError::conflict("Email address is already registered"));
            }
            if existing.username == user.username {
                return Err(AppError::conflict("Username is already taken"));
            }
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> AppResult<()> {
        self.with_user(user_id, |user| {
            user.password_hash = password_hash.to_string();
        })
        .await
    }

    async fn set_status(&self, user_id: Uuid, status: UserStatus) -> AppResult<()> {
        self.with_user(user_id, |user| {
            user.status = status;
        })
        .await
    }

    async fn mark_email_verified(&self, user_id: Uuid) -> AppResult<()> {
        self.with_user(user_id, |user| {
            user.email_verified = true;
            if user.status == UserStatus::PendingVerification {
                user.status = UserStatus::Active;
            }
        })
        .await
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        self.with_user(user_id, |user| {
            user.last_login_at = Some(at);
            user.failed_login_attempts = 0;
            user.locked_until = None;
        })
        .await
    }

    async fn record_failed_attempt(
        &self,
        user_id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        self.with_user(user_id, |user| {
            user.failed_login_attempts = attempts;
            if locked_until.is_some() {
                user.locked_until = locked_until;
            }
        })
        .await
    }

    async fn permissions_for_role(&self, role: UserRole) -> AppResult<PermissionSet> {
        let state = self.state.read().await;
        Ok(state.role_permissions.get(&role).cloned().unwrap_or_default())
    }
}
