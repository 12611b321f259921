//! Credential token domain entities.

pub mod model;

pub use model::{EmailVerificationToken, PasswordResetToken};
