//! Identity store trait for user account lookup and credential state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::permission::PermissionSet;
use gestio_entity::user::{User, UserRole, UserStatus};

/// Trait for the user account backend.
///
/// User records are owned by the account-management side of the
/// platform; this trait exposes only what credential handling needs.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new user. Returns `Conflict` when the email address
    /// or username is already taken.
    async fn create(&self, user: User) -> AppResult<User>;

    /// Look up a user by id.
    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>>;

    /// Look up a user by email address.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Look up a user by username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Replace the stored password hash.
    async fn update_password_hash(&self, user_id: Uuid, password_hash: &str) -> AppResult<()>;

    /// Set the account status.
    async fn set_status(&self, user_id: Uuid, status: UserStatus) -> AppResult<()>;

    /// Mark the email address as verified. Accounts still pending
    /// verification are activated in the same step.
    async fn mark_email_verified(&self, user_id: Uuid) -> AppResult<()>;

    /// Record a successful login: stamps `last_login_at` and clears
    /// the failed-attempt counter and any lockout.
    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Record a failed login attempt, optionally locking the account
    /// until the given instant.
    async fn record_failed_attempt(
        &self,
        user_id: Uuid,
        attempts: i32,
        locked_until: Option<DateTime<Utc>>,
    ) -> AppResult<()>;

    /// Resolve the permission names granted to a role.
    async fn permissions_for_role(&self, role: UserRole) -> AppResult<PermissionSet>;
}
