//! Token store trait for password-reset and email-verification tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::token::{EmailVerificationToken, PasswordResetToken};

/// Trait for the single-use token backend.
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new password-reset token.
    async fn create_reset_token(&self, token: PasswordResetToken)
    -> AppResult<PasswordResetToken>;

    /// Mark every outstanding reset token for a user as used, so that
    /// only the most recently issued token can complete a reset.
    /// Returns the number of tokens invalidated.
    async fn invalidate_reset_tokens(&self, user_id: Uuid) -> AppResult<u64>;

    /// Claim a usable reset token: marks it used and returns it in a
    /// single step. Returns `None` when the token is unknown, already
    /// used, or expired.
    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PasswordResetToken>>;

    /// Return a consumed reset token to the unused state. Called when
    /// the password write fails after the token was claimed.
    async fn restore_reset_token(&self, token_id: Uuid) -> AppResult<()>;

    /// Persist a new email-verification token.
    async fn create_verification_token(
        &self,
        token: EmailVerificationToken,
    ) -> AppResult<EmailVerificationToken>;

    /// Look up a verification token by its value, used or not.
    async fn find_verification_token(
        &self,
        token: &str,
    ) -> AppResult<Option<EmailVerificationToken>>;

    /// Mark a verification token as completed.
    async fn mark_verification_completed(&self, token_id: Uuid) -> AppResult<()>;
}
