//! User domain entities.

pub mod model;
pub mod role;
pub mod status;

pub use model::User;
pub use role::{RoleTier, UserRole};
pub use status::UserStatus;
