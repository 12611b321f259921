//! In-memory token store for password-reset and email-verification tokens.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::token::{EmailVerificationToken, PasswordResetToken};

use super::super::traits::TokenStore;

/// Internal state for the memory-based token store.
#[derive(Debug, Default)]
struct InnerState {
    /// Password-reset tokens keyed by id.
    reset_tokens: HashMap<Uuid, PasswordResetToken>,
    /// Email-verification tokens keyed by id.
    verification_tokens: HashMap<Uuid, EmailVerificationToken>,
}

/// In-memory token store using a Tokio RwLock for thread safety.
///
/// Suitable for single-node deployments only.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    /// Protected inner state.
    state: Arc<RwLock<InnerState>>,
}

impl MemoryTokenStore {
    /// Creates a new memory-based token store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently issued reset token for a user, used or not.
    /// Lets callers surface the token out of band when no mail
    /// delivery is wired up.
    pub async fn latest_reset_token_for(&self, user_id: Uuid) -> Option<PasswordResetToken> {
        let state = self.state.read().await;
        state
            .reset_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .max_by_key(|t| t.created_at)
            .cloned()
    }

    /// The most recently issued verification token for a user.
    pub async fn latest_verification_token_for(
        &self,
        user_id: Uuid,
    ) -> Option<EmailVerificationToken> {
        let state = self.state.read().await;
        state
            .verification_tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .max_by_key(|t| t.created_at)
            .cloned()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create_reset_token(
        &self,
        token: PasswordResetToken,
    ) -> AppResult<PasswordResetToken> {
        let mut state = self.state.write().await;
        state.reset_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn invalidate_reset_tokens(&self, user_id: Uuid) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut invalidated = 0u64;
        for token in state.reset_tokens.values_mut() {
            if token.user_id == user_id && !token.used {
                token.used = true;
                invalidated += 1;
            }
        }
        Ok(invalidated)
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<PasswordResetToken>> {
        let mut state = self.state.write().await;
        let found = state
            .reset_tokens
            .values_mut()
            .find(|t| t.token == token && t.is_usable(now));

        match found {
            Some(record) => {
                record.used = true;
                Ok(Some(record.clone()))
            }
            None => Ok(None),
        }
    }

    async fn restore_reset_token(&self, token_id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        let token = state
            .reset_tokens
            .get_mut(&token_id)
            .ok_or_else(|| AppError::not_found("Reset token not found"))?;
        token.used = false;
        Ok(())
    }

    async fn create_verification_token(
        &self,
        token: EmailVerificationToken,
    ) -> AppResult<EmailVerificationToken> {
        let mut state = self.state.write().await;
        state.verification_tokens.insert(token.id, token.clone());
        Ok(token)
    }

    async fn find_verification_token(
        &self,
        token: &str,
    ) -> AppResult<Option<EmailVerificationToken>> {
        let state = self.state.read().await;
        Ok(state
            .verification_tokens
            .values()
            .find(|t| t.token == token)
            .cloned())
    }

    async fn mark_verification_completed(&self, token_id: Uuid) -> AppResult<()> {
        let mut state = self.state.write().await;
        let token = state
            .verification_tokens
            .get_mut(&token_id)
            .ok_or_else(|| AppError::not_found("Verification token not found"))?;
        token.verified = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reset_token(user_id: Uuid, token: &str, expires_in: Duration) -> PasswordResetToken {
        let now = Utc::now();
        PasswordResetToken {
            id: Uuid::new_v4(),
            user_id,
            token: token.to_string(),
            expires_at: now + expires_in,
            used: false,
            created_at: now,
        }
    }

    #[tokio::test]
    async fn consume_is_single_use() {
        let store = MemoryTokenStore::new();
        let user_id = Uuid::new_v4();
        store
            .create_reset_token(reset_token(user_id, "reset-1", Duration::hours(1)))
            .await
            .unwrap();

        let first = store.consume_reset_token("reset-1", Utc::now()).await.unwrap();
        assert!(first.is_some());

        let second = store.consume_reset_token("reset-1", Utc::now()).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn consume_rejects_expired_tokens() {
        let store = MemoryTokenStore::new();
        let user_id = Uuid::new_v4();
        store
            .create_reset_token(reset_token(user_id, "reset-2", Duration::minutes(-5)))
            .await
            .unwrap();

        let consumed = store.consume_reset_token("reset-2", Utc::now()).await.unwrap();
        assert!(consumed.is_none());
    }

    #[tokio::test]
    async fn invalidate_covers_only_outstanding_tokens_of_user() {
        let store = MemoryTokenStore::new();
        let user_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        store
            .create_reset_token(reset_token(user_id, "reset-3", Duration::hours(1)))
            .await
            .unwrap();
        store
            .create_reset_token(reset_token(user_id, "reset-4", Duration::hours(1)))
            .await
            .unwrap();
        store
            .create_reset_token(reset_token(other, "reset-5", Duration::hours(1)))
            .await
            .unwrap();

        assert_eq!(store.invalidate_reset_tokens(user_id).await.unwrap(), 2);
        assert!(store
            .consume_reset_token("reset-5", Utc::now())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn restore_makes_token_consumable_again() {
        let store = MemoryTokenStore::new();
        let user_id = Uuid::new_v4();
        let token = store
            .create_reset_token(reset_token(user_id, "reset-6", Duration::hours(1)))
            .await
            .unwrap();

        store.consume_reset_token("reset-6", Utc::now()).await.unwrap();
        store.restore_reset_token(token.id).await.unwrap();

        let again = store.consume_reset_token("reset-6", Utc::now()).await.unwrap();
        assert!(again.is_some());
    }

    #[tokio::test]
    async fn verification_token_round_trip() {
        let store = MemoryTokenStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let token = store
            .create_verification_token(EmailVerificationToken {
                id: Uuid::new_v4(),
                user_id,
                token: "verify-1".to_string(),
                expires_at: now + Duration::hours(48),
                verified: false,
                created_at: now,
            })
            .await
            .unwrap();

        store.mark_verification_completed(token.id).await.unwrap();

        let found = store
            .find_verification_token("verify-1")
            .await
            .unwrap()
            .unwrap();
        assert!(found.verified);
    }
}
