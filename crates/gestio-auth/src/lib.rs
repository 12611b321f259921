//! # gestio-auth
//!
//! Authentication, session lifecycle, quota enforcement, anomaly
//! detection, and authorization for the Gestio platform.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and policy enforcement
//! - `jwt`: JWT token pair creation and validation
//! - `credential`: registration, authentication, and account recovery flows
//! - `policy`: subscription plan to session policy resolution
//! - `session`: session registry and login/logout orchestration
//! - `anomaly`: best-effort login anomaly detection
//! - `access`: role and permission access decisions

pub mod access;
pub mod anomaly;
pub mod credential;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod session;

pub use access::{AccessGate, can_access};
pub use anomaly::AnomalyDetector;
pub use credential::{CredentialManager, Registration};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenPair};
pub use password::{PasswordHasher, PasswordValidator};
pub use policy::PlanPolicyResolver;
pub use session::{LoginResult, SessionManager, SessionRegistry};
