//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use gestio_auth::{
    AnomalyDetector, CredentialManager, LoginResult, PlanPolicyResolver, Registration,
    SessionManager, SessionRegistry,
};
use gestio_core::config::AppConfig;
use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::notification::NotificationSeverity;
use gestio_entity::subscription::Subscription;
use gestio_entity::user::{User, UserRole};
use gestio_service::AuthService;
use gestio_store::memory::{
    MemoryIdentityStore, MemoryNotifier, MemorySessionStore, MemorySubscriptionStore,
    MemoryTokenStore,
};
use gestio_store::{IdentityStore, Notifier, SubscriptionStore};

/// Password accepted by the strength validator.
pub const TEST_PASSWORD: &str = "xK9#mQv2$Lp5wn";

/// Realistic user agents for anomaly tests.
pub const UA_WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const UA_WINDOWS_CHROME_NEWER: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";
pub const UA_MAC_SAFARI: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
pub const UA_ANDROID_FIREFOX: &str =
    "Mozilla/5.0 (Android 14; Mobile; rv:121.0) Gecko/121.0 Firefox/121.0";

/// In-memory application context for integration tests.
pub struct TestStack {
    /// Application config the stack was built with.
    pub config: AppConfig,
    /// User account store.
    pub identities: Arc<MemoryIdentityStore>,
    /// Session store.
    pub sessions: Arc<MemorySessionStore>,
    /// Single-use token store.
    pub tokens: Arc<MemoryTokenStore>,
    /// Subscription store.
    pub subscriptions: Arc<MemorySubscriptionStore>,
    /// Recording notification sink.
    pub notifier: Arc<MemoryNotifier>,
    /// Credential manager.
    pub credentials: Arc<CredentialManager>,
    /// Session registry.
    pub registry: Arc<SessionRegistry>,
    /// Plan policy resolver.
    pub policy: Arc<PlanPolicyResolver>,
    /// Session manager.
    pub manager: Arc<SessionManager>,
    /// Service facade.
    pub auth: AuthService,
}

impl TestStack {
    /// Create a stack with the default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a stack with a custom configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let identities = Arc::new(MemoryIdentityStore::new());
        let sessions = Arc::new(MemorySessionStore::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let subscriptions = Arc::new(MemorySubscriptionStore::new());
        let notifier = Arc::new(MemoryNotifier::new());

        let credentials = Arc::new(
            CredentialManager::new(
                identities.clone(),
                tokens.clone(),
                notifier.clone(),
                config.auth.clone(),
            )
            .expect("Failed to build credential manager"),
        );
        let registry = Arc::new(SessionRegistry::new(
            sessions.clone(),
            config.session.clone(),
        ));
        let policy = Arc::new(PlanPolicyResolver::new(
            subscriptions.clone(),
            config.plans.clone(),
        ));
        let anomaly = Arc::new(AnomalyDetector::new(
            sessions.clone(),
            notifier.clone(),
            &config.session,
        ));
        let manager = Arc::new(SessionManager::new(
            credentials.clone(),
            registry.clone(),
            policy.clone(),
            anomaly,
        ));
        let auth = AuthService::new(manager.clone(), credentials.clone());

        Self {
            config,
            identities,
            sessions,
            tokens,
            subscriptions,
            notifier,
            credentials,
            registry,
            policy,
            manager,
            auth,
        }
    }

    /// Register a verified, active user with the `user` role.
    pub async fn seed_user(&self, username: &str, company_id: Option<Uuid>) -> User {
        self.seed_user_with_role(username, UserRole::User, company_id)
            .await
    }

    /// Register a verified, active user with an explicit role.
    pub async fn seed_user_with_role(
        &self,
        username: &str,
        role: UserRole,
        company_id: Option<Uuid>,
    ) -> User {
        let user = self
            .credentials
            .register(Registration {
                name: username.to_string(),
                email: format!("{username}@example.com"),
                username: username.to_string(),
                password: TEST_PASSWORD.to_string(),
                role,
                company_id,
            })
            .await
            .expect("Failed to register test user");

        self.verify_latest_email(user.id).await;

        self.identities
            .find_by_id(user.id)
            .await
            .expect("Failed to re-read test user")
            .expect("Test user vanished after creation")
    }

    /// Follow the latest verification link recorded for a user.
    pub async fn verify_latest_email(&self, user_id: Uuid) {
        let token = self
            .tokens
            .latest_verification_token_for(user_id)
            .await
            .expect("No verification token for test user");
        self.credentials
            .verify_email(&token.token)
            .await
            .expect("Failed to verify test user email");
    }

    /// Create a company with an active subscription on the given plan.
    pub async fn company_on_plan(&self, plan: &str) -> Uuid {
        let company_id = Uuid::new_v4();
        self.subscriptions.subscribe(company_id, plan).await;
        company_id
    }

    /// Log in without client metadata.
    pub async fn login(&self, identity: &str) -> LoginResult {
        self.manager
            .login(identity, TEST_PASSWORD, None, None)
            .await
            .expect("Login failed")
    }

    /// Log in with an IP address and user agent.
    pub async fn login_from(&self, identity: &str, ip: &str, user_agent: &str) -> LoginResult {
        self.manager
            .login(
                identity,
                TEST_PASSWORD,
                Some(ip.parse().expect("Invalid test IP address")),
                Some(user_agent),
            )
            .await
            .expect("Login failed")
    }

    /// Titles of every notification recorded for a user, in order.
    pub async fn notification_titles(&self, user_id: Uuid) -> Vec<String> {
        self.notifier
            .for_user(user_id)
            .await
            .into_iter()
            .map(|n| n.title)
            .collect()
    }
}

/// Subscription backend that always fails.
#[derive(Debug)]
pub struct FailingSubscriptionStore;

#[async_trait]
impl SubscriptionStore for FailingSubscriptionStore {
    async fn find_active_by_company(&self, _company_id: Uuid) -> AppResult<Option<Subscription>> {
        Err(AppError::database("Subscription backend is down"))
    }
}

/// Notification backend that always fails.
#[derive(Debug)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn notify(
        &self,
        _user_id: Uuid,
        _title: &str,
        _message: &str,
        _severity: NotificationSeverity,
    ) -> AppResult<()> {
        Err(AppError::database("Notification backend is down"))
    }
}
