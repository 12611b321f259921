//! # Gestio
//!
//! Authentication, session lifecycle, and authorization core of the
//! Gestio business-management platform.
//!
//! This facade re-exports the workspace crates' main types and wires
//! up logging; embedders assemble the managers against their own
//! store implementations (or the in-memory ones from `gestio-store`).

use tracing_subscriber::{EnvFilter, fmt};

pub use gestio_core::config::AppConfig;
pub use gestio_core::types::{PlanPolicy, ServiceResponse};
pub use gestio_core::{AppError, AppResult};

pub use gestio_entity::notification::{Notification, NotificationSeverity};
pub use gestio_entity::permission::PermissionSet;
pub use gestio_entity::session::{Session, SessionState};
pub use gestio_entity::user::{User, UserRole, UserStatus};

pub use gestio_store::memory::{
    MemoryIdentityStore, MemoryNotifier, MemorySessionStore, MemorySubscriptionStore,
    MemoryTokenStore,
};
pub use gestio_store::{IdentityStore, Notifier, SessionStore, SubscriptionStore, TokenStore};

pub use gestio_auth::{
    AccessGate, AnomalyDetector, CredentialManager, JwtDecoder, JwtEncoder, LoginResult,
    PlanPolicyResolver, Registration, SessionManager, SessionRegistry, TokenPair, can_access,
};

pub use gestio_service::AuthService;

pub use gestio_worker::{MaintenanceScheduler, SessionSweepJob};

/// Initialize tracing from the logging configuration.
///
/// `RUST_LOG` overrides the configured level when set.
pub fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}
