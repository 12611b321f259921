//! # gestio-core
//!
//! Core crate for Gestio. Contains configuration schemas, shared types
//! (plan policies, response envelopes), and the unified error system.
//!
//! This crate has **no** internal dependencies on other Gestio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
