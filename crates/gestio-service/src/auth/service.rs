//! Auth service: the exposed surface over credential and session
//! management.

use std::net::IpAddr;
use std::sync::Arc;

use uuid::Uuid;

use gestio_auth::credential::Registration;
use gestio_auth::jwt::TokenPair;
use gestio_auth::{CredentialManager, SessionManager};
use gestio_core::result::AppResult;
use gestio_core::types::ServiceResponse;
use gestio_entity::session::Session;
use gestio_entity::user::{User, UserRole};

use super::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshRequest, RegisterRequest,
    ResetPasswordRequest, VerifyEmailRequest, validate_request,
};

/// Exposes the auth operations behind the response envelope.
///
/// Every method validates its request, delegates to the managers, and
/// wraps the outcome; typed errors propagate to the transport layer
/// which maps them onto status codes.
#[derive(Debug, Clone)]
pub struct AuthService {
    /// Login, logout, and refresh orchestration.
    manager: Arc<SessionManager>,
    /// Registration and account recovery flows.
    credentials: Arc<CredentialManager>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(manager: Arc<SessionManager>, credentials: Arc<CredentialManager>) -> Self {
        Self {
            manager,
            credentials,
        }
    }

    /// Registers a new user account in the pending-verification state.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<ServiceResponse<User>> {
        validate_request(&request)?;

        let user = self
            .credentials
            .register(Registration {
                name: request.name,
                email: request.email,
                username: request.username,
                password: request.password,
                role: UserRole::User,
                company_id: request.company_id,
            })
            .await?;

        Ok(ServiceResponse::ok(
            "Registration successful. Check your email for the verification link.",
            user,
        ))
    }

    /// Logs a user in and returns the token pair with the session.
    pub async fn login(
        &self,
        request: LoginRequest,
        ip_address: Option<IpAddr>,
        user_agent: Option<&str>,
    ) -> AppResult<ServiceResponse<LoginResponse>> {
        validate_request(&request)?;

        let result = self
            .manager
            .login(&request.identity, &request.password, ip_address, user_agent)
            .await?;

        Ok(ServiceResponse::ok("Login successful", result.into()))
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh_token(
        &self,
        request: RefreshRequest,
    ) -> AppResult<ServiceResponse<TokenPair>> {
        validate_request(&request)?;

        let pair = self.manager.refresh(&request.refresh_token).await?;

        Ok(ServiceResponse::ok("Token refreshed", pair))
    }

    /// Logs out the session bound to an access token.
    pub async fn logout(&self, access_token: &str) -> AppResult<ServiceResponse<()>> {
        self.manager.logout(access_token).await?;

        Ok(ServiceResponse::ok_message("Logged out"))
    }

    /// Logs a user out of every active session.
    pub async fn logout_all(&self, user_id: Uuid) -> AppResult<ServiceResponse<u64>> {
        let count = self.manager.logout_all(user_id).await?;

        Ok(ServiceResponse::ok("All sessions logged out", count))
    }

    /// Starts a password reset. The response is identical whether or
    /// not the email has an account, so the endpoint cannot be used
    /// for account enumeration.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> AppResult<ServiceResponse<()>> {
        validate_request(&request)?;

        self.credentials.request_password_reset(&request.email).await?;

        Ok(ServiceResponse::ok_message(
            "If the address matches an account, a reset code has been sent.",
        ))
    }

    /// Completes a password reset with an emailed token.
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> AppResult<ServiceResponse<()>> {
        validate_request(&request)?;

        self.credentials
            .reset_password(&request.token, &request.new_password)
            .await?;

        Ok(ServiceResponse::ok_message(
            "Password has been reset. You can now log in with your new password.",
        ))
    }

    /// Verifies an email address with an emailed token.
    pub async fn verify_email(
        &self,
        request: VerifyEmailRequest,
    ) -> AppResult<ServiceResponse<()>> {
        validate_request(&request)?;

        self.credentials.verify_email(&request.token).await?;

        Ok(ServiceResponse::ok_message(
            "Email address verified. You can now log in.",
        ))
    }

    /// Lists the user's currently active sessions.
    pub async fn active_sessions(
        &self,
        user_id: Uuid,
    ) -> AppResult<ServiceResponse<Vec<Session>>> {
        let sessions = self.manager.sessions(user_id).await?;

        Ok(ServiceResponse::ok("Active sessions", sessions))
    }
}
