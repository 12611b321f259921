//! Role and permission access decisions.

pub mod resolver;

pub use resolver::{AccessGate, can_access};
