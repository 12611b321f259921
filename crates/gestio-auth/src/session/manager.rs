//! Session lifecycle manager for login, logout, and token refresh flows.

use std::net::IpAddr;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use gestio_core::result::AppResult;
use gestio_entity::session::Session;
use gestio_entity::user::User;

use crate::anomaly::AnomalyDetector;
use crate::credential::CredentialManager;
use crate::jwt::encoder::TokenPair;
use crate::policy::PlanPolicyResolver;

use super::registry::SessionRegistry;

/// Result of a successful login.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoginResult {
    /// The authenticated user.
    pub user: User,
    /// Generated token pair.
    pub tokens: TokenPair,
    /// Created session.
    pub session: Session,
}

/// Orchestrates the complete session lifecycle.
#[derive(Debug, Clone)]
pub struct SessionManager {
    /// Credential verification and token issuance.
    credentials: Arc<CredentialManager>,
    /// Session records and quota enforcement.
    registry: Arc<SessionRegistry>,
    /// Plan policy resolution per company.
    policy: Arc<PlanPolicyResolver>,
    /// Best-effort login anomaly detection.
    anomaly: Arc<AnomalyDetector>,
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        credentials: Arc<CredentialManager>,
        registry: Arc<SessionRegistry>,
        policy: Arc<PlanPolicyResolver>,
        anomaly: Arc<AnomalyDetector>,
    ) -> Self {
        Self {
            credentials,
            registry,
            policy,
            anomaly,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Verify credentials and account status
    /// 2. Issue the JWT token pair
    /// 3. Resolve the plan policy and create the session within quota
    ///    (admin and company admin roles skip enforcement)
    /// 4. Run anomaly detection against the session history
    ///
    /// A policy lookup failure does not fail the login; the session is
    /// created without quota enforcement and the failure logged.
    pub async fn login(
        &self,
        identity: &str,
        password: &str,
        ip_address: Option<IpAddr>,
        user_agent: Option<&str>,
    ) -> AppResult<LoginResult> {
        let user = self.credentials.authenticate(identity, password).await?;
        let tokens = self.credentials.issue_token_pair(&user)?;

        let session = if user.role.is_quota_exempt() {
            self.registry
                .create(user.id, &tokens.access_token, ip_address, user_agent)
                .await?
        } else {
            match self.policy.resolve(user.company_id).await {
                Ok(policy) => {
                    self.registry
                        .create_within_quota(
                            user.id,
                            &policy,
                            &tokens.access_token,
                            ip_address,
                            user_agent,
                        )
                        .await?
                }
                Err(e) => {
                    warn!(
                        user_id = %user.id,
                        error = %e,
                        "Plan policy lookup failed, allowing login without quota enforcement"
                    );
                    self.registry
                        .create(user.id, &tokens.access_token, ip_address, user_agent)
                        .await?
                }
            }
        };

        self.anomaly.inspect_login(&user, &session).await;

        info!(
            user_id = %user.id,
            session_id = %session.id,
            "Login successful"
        );

        Ok(LoginResult {
            user,
            tokens,
            session,
        })
    }

    /// Logs out the session bound to an access token. Unknown and
    /// already-ended sessions are a no-op success.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        self.registry.invalidate_by_token(token).await
    }

    /// Logs a user out everywhere. Returns the number of sessions
    /// invalidated.
    pub async fn logout_all(&self, user_id: Uuid) -> AppResult<u64> {
        self.registry.invalidate_all(user_id).await
    }

    /// Exchanges a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        self.credentials.refresh(refresh_token).await
    }

    /// The user's currently active sessions.
    pub async fn sessions(&self, user_id: Uuid) -> AppResult<Vec<Session>> {
        self.registry.sessions_for_user(user_id).await
    }
}
