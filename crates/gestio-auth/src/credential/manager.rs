//! Registration, authentication, and account recovery flows.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use gestio_core::config::AuthConfig;
use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::notification::NotificationSeverity;
use gestio_entity::token::{EmailVerificationToken, PasswordResetToken};
use gestio_entity::user::{User, UserRole, UserStatus};
use gestio_store::{IdentityStore, Notifier, TokenStore};

use crate::jwt::encoder::TokenPair;
use crate::jwt::{JwtDecoder, JwtEncoder};
use crate::password::{PasswordHasher, PasswordValidator};

use super::token::generate_opaque_token;

/// Input for creating a new user account.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Email address. Stored lowercased.
    pub email: String,
    /// Login username.
    pub username: String,
    /// Plaintext password, validated and hashed before storage.
    pub password: String,
    /// Role the account is created with.
    pub role: UserRole,
    /// Company the account belongs to, if any.
    pub company_id: Option<Uuid>,
}

/// Manages user credentials: registration, authentication, token
/// issuance, and account recovery.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    /// User account backend.
    identities: Arc<dyn IdentityStore>,
    /// Single-use token backend.
    tokens: Arc<dyn TokenStore>,
    /// Notification backend for verification and reset messages.
    notifier: Arc<dyn Notifier>,
    /// Password hasher.
    hasher: PasswordHasher,
    /// Password policy validator.
    validator: PasswordValidator,
    /// JWT encoder for token pair issuance.
    jwt_encoder: JwtEncoder,
    /// JWT decoder for refresh token validation.
    jwt_decoder: JwtDecoder,
    /// Auth configuration.
    config: AuthConfig,
}

impl CredentialManager {
    /// Creates a new credential manager.
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
        config: AuthConfig,
    ) -> AppResult<Self> {
        Ok(Self {
            hasher: PasswordHasher::new(&config)?,
            validator: PasswordValidator::new(&config),
            jwt_encoder: JwtEncoder::new(&config),
            jwt_decoder: JwtDecoder::new(&config),
            identities,
            tokens,
            notifier,
            config,
        })
    }

    /// Registers a new user account.
    ///
    /// The account starts in `PendingVerification` and cannot log in
    /// until the emailed verification link is followed. A failure to
    /// record the notification does not fail the registration.
    pub async fn register(&self, registration: Registration) -> AppResult<User> {
        let name = registration.name.trim().to_string();
        let email = registration.email.trim().to_lowercase();
        let username = registration.username.trim().to_string();

        if name.is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email address is required"));
        }
        if username.is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }

        self.validator.validate(&registration.password)?;

        if self.identities.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email address is already registered"));
        }
        if self.identities.find_by_username(&username).await?.is_some() {
            return Err(AppError::conflict("Username is already taken"));
        }

        let password_hash = self.hasher.hash_password(&registration.password)?;

        let now = Utc::now();
        let user = self
            .identities
            .create(User {
                id: Uuid::new_v4(),
                company_id: registration.company_id,
                name,
                email,
                username,
                password_hash,
                role: registration.role,
                status: UserStatus::PendingVerification,
                email_verified: false,
                failed_login_attempts: 0,
                locked_until: None,
                last_login_at: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let verification = self
            .tokens
            .create_verification_token(EmailVerificationToken {
                id: Uuid::new_v4(),
                user_id: user.id,
                token: generate_opaque_token(),
                expires_at: now
                    + chrono::Duration::hours(self.config.verification_token_ttl_hours as i64),
                verified: false,
                created_at: now,
            })
            .await?;

        self.notify_best_effort(
            user.id,
            "Verify your email",
            &format!(
                "Your verification code is {}. It expires in {} hours.",
                verification.token, self.config.verification_token_ttl_hours
            ),
        )
        .await;

        info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Authenticates a user by username or email address.
    ///
    /// The identity is tried as a username first, then as an email
    /// address. Unknown identities and wrong passwords produce the
    /// same error so the response does not reveal which part failed.
    pub async fn authenticate(&self, identity: &str, password: &str) -> AppResult<User> {
        let identity = identity.trim();

        let found = match self.identities.find_by_username(identity).await? {
            Some(user) => Some(user),
            None => self.identities.find_by_email(&identity.to_lowercase()).await?,
        };

        let mut user =
            found.ok_or_else(|| AppError::invalid_credentials("Invalid username or password"))?;

        if user.is_locked() {
            let locked_until = user.locked_until.unwrap_or_else(Utc::now);
            return Err(AppError::inactive_account(format!(
                "Account is locked until {}",
                locked_until.format("%Y-%m-%d %H:%M:%S UTC")
            )));
        }

        let password_valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !password_valid {
            self.handle_failed_login(&user).await?;
            return Err(AppError::invalid_credentials("Invalid username or password"));
        }

        self.check_account_status(&user)?;

        let now = Utc::now();
        self.identities.record_login(user.id, now).await?;
        user.last_login_at = Some(now);
        user.failed_login_attempts = 0;
        user.locked_until = None;

        Ok(user)
    }

    /// Issues a fresh access + refresh token pair for a user.
    pub fn issue_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        self.jwt_encoder.generate_token_pair(user)
    }

    /// Exchanges a valid refresh token for a new token pair.
    ///
    /// The user is re-read so that role and status changes since the
    /// refresh token was issued take effect in the new pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let claims = self.jwt_decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .identities
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::invalid_token("Token principal no longer exists"))?;

        if user.is_locked() {
            return Err(AppError::inactive_account("Account is locked"));
        }
        self.check_account_status(&user)?;

        let pair = self.jwt_encoder.generate_token_pair(&user)?;

        info!(user_id = %user.id, "Token pair refreshed");

        Ok(pair)
    }

    /// Starts a password reset for the given email address.
    ///
    /// Always succeeds from the caller's point of view: an unknown
    /// email is logged and ignored so the endpoint cannot be used to
    /// probe which addresses have accounts. Outstanding reset tokens
    /// are invalidated so only the newest one can complete a reset.
    pub async fn request_password_reset(&self, email: &str) -> AppResult<()> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.identities.find_by_email(&email).await? else {
            debug!("Password reset requested for unknown email");
            return Ok(());
        };

        self.tokens.invalidate_reset_tokens(user.id).await?;

        let now = Utc::now();
        let reset = self
            .tokens
            .create_reset_token(PasswordResetToken {
                id: Uuid::new_v4(),
                user_id: user.id,
                token: generate_opaque_token(),
                expires_at: now
                    + chrono::Duration::minutes(self.config.reset_token_ttl_minutes as i64),
                used: false,
                created_at: now,
            })
            .await?;

        self.notify_best_effort(
            user.id,
            "Password reset requested",
            &format!(
                "Your password reset code is {}. It expires in {} minutes.",
                reset.token, self.config.reset_token_ttl_minutes
            ),
        )
        .await;

        info!(user_id = %user.id, "Password reset token issued");

        Ok(())
    }

    /// Completes a password reset with a previously issued token.
    ///
    /// The new password is validated and hashed before the token is
    /// consumed; if storing the new hash then fails, the token is
    /// restored so the user can retry with the same link.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        self.validator.validate(new_password)?;
        let password_hash = self.hasher.hash_password(new_password)?;

        let consumed = self
            .tokens
            .consume_reset_token(token, Utc::now())
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid or expired reset token"))?;

        if let Err(e) = self
            .identities
            .update_password_hash(consumed.user_id, &password_hash)
            .await
        {
            error!(
                user_id = %consumed.user_id,
                error = %e,
                "Failed to store new password hash, restoring reset token"
            );
            if let Err(restore_err) = self.tokens.restore_reset_token(consumed.id).await {
                error!(
                    user_id = %consumed.user_id,
                    error = %restore_err,
                    "Failed to restore reset token"
                );
            }
            return Err(e);
        }

        info!(user_id = %consumed.user_id, "Password reset completed");

        Ok(())
    }

    /// Marks an email address as verified via its verification token.
    ///
    /// Verifying an already-verified token succeeds, so a user who
    /// follows the link twice does not see an error.
    pub async fn verify_email(&self, token: &str) -> AppResult<()> {
        let record = self
            .tokens
            .find_verification_token(token)
            .await?
            .ok_or_else(|| AppError::invalid_token("Invalid or expired verification link"))?;

        if record.verified {
            debug!(user_id = %record.user_id, "Verification link already used");
            return Ok(());
        }

        if record.is_expired(Utc::now()) {
            return Err(AppError::invalid_token("Invalid or expired verification link"));
        }

        self.identities.mark_email_verified(record.user_id).await?;
        self.tokens.mark_verification_completed(record.id).await?;

        info!(user_id = %record.user_id, "Email address verified");

        Ok(())
    }

    /// Checks account status gates that apply after the password is
    /// verified.
    fn check_account_status(&self, user: &User) -> AppResult<()> {
        match user.status {
            UserStatus::PendingVerification => Err(AppError::inactive_account(
                "Email address is not verified. Check your inbox for the verification link.",
            )),
            UserStatus::Inactive => Err(AppError::inactive_account(
                "Account is deactivated. Contact an administrator.",
            )),
            UserStatus::Active => Ok(()),
        }
    }

    /// Handles a failed login attempt by incrementing the counter and
    /// locking the account once the configured limit is reached.
    async fn handle_failed_login(&self, user: &User) -> AppResult<()> {
        let new_count = user.failed_login_attempts + 1;

        if new_count >= self.config.max_failed_attempts {
            let locked_until =
                Utc::now() + chrono::Duration::minutes(self.config.lockout_duration_minutes as i64);

            self.identities
                .record_failed_attempt(user.id, new_count, Some(locked_until))
                .await?;

            warn!(
                user_id = %user.id,
                username = %user.username,
                attempts = new_count,
                locked_until = %locked_until,
                "Account locked after repeated failed login attempts"
            );
        } else {
            self.identities
                .record_failed_attempt(user.id, new_count, None)
                .await?;
        }

        Ok(())
    }

    /// Records a notification without letting a failure surface to the
    /// caller.
    async fn notify_best_effort(&self, user_id: Uuid, title: &str, message: &str) {
        if let Err(e) = self
            .notifier
            .notify(user_id, title, message, NotificationSeverity::Info)
            .await
        {
            warn!(user_id = %user_id, error = %e, "Failed to record notification");
        }
    }
}
