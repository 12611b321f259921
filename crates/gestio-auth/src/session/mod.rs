//! Session registry and login/logout orchestration.

pub mod manager;
pub mod registry;

pub use manager::{LoginResult, SessionManager};
pub use registry::SessionRegistry;
