//! Permission domain value objects.
//!
//! The role and permission catalog itself is owned by the entity-CRUD side
//! of the platform; this crate only models the resolved snapshot consumed
//! during access checks.

pub mod model;

pub use model::PermissionSet;
