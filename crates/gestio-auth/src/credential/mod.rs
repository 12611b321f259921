//! Registration, authentication, and account recovery flows.

pub mod manager;
pub mod token;

pub use manager::{CredentialManager, Registration};
pub use token::generate_opaque_token;
