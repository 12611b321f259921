//! Single-use credential token entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single-use password reset token.
///
/// Requesting a new reset invalidates all outstanding tokens for the user;
/// consuming a token marks it used so it can never reset a password twice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetToken {
    /// Unique token record identifier.
    pub id: Uuid,
    /// The user this token was issued to.
    pub user_id: Uuid,
    /// Opaque token value delivered to the user.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Whether the token has been consumed (or superseded).
    pub used: bool,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// Check whether the token has expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Check whether the token can still reset a password.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.used && !self.is_expired(now)
    }
}

/// A single-use email verification token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailVerificationToken {
    /// Unique token record identifier.
    pub id: Uuid,
    /// The user this token was issued to.
    pub user_id: Uuid,
    /// Opaque token value delivered to the user.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
    /// Whether the verification has been completed with this token.
    pub verified: bool,
    /// When the token was issued.
    pub created_at: DateTime<Utc>,
}

impl EmailVerificationToken {
    /// Check whether the token has expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
