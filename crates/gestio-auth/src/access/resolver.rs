//! Access resolution: decides whether a role and permission set may
//! perform an operation.

use gestio_core::error::AppError;
use gestio_core::result::AppResult;
use gestio_entity::permission::PermissionSet;
use gestio_entity::user::{RoleTier, UserRole};

/// Decides whether an operation is allowed for a principal.
///
/// A pure function of its inputs, safe to mirror verbatim in a client
/// UI against the same permission snapshot: both sides must reach the
/// same verdict.
///
/// Decision order:
/// 1. The bypass tier (`admin`) is always allowed.
/// 2. The role axis passes when `required_roles` is empty or contains
///    the principal's role.
/// 3. The permission axis passes when `required_permissions` is empty
///    or intersects the principal's permission set.
/// 4. Hybrid and plain tiers require both axes to pass.
pub fn can_access(
    role: UserRole,
    permissions: &PermissionSet,
    required_roles: &[UserRole],
    required_permissions: &[&str],
) -> bool {
    if role.tier() == RoleTier::Bypass {
        return true;
    }

    let has_role = required_roles.is_empty() || required_roles.contains(&role);
    let has_permission = required_permissions.is_empty()
        || permissions.contains_any(required_permissions.iter().copied());

    has_role && has_permission
}

/// Server-side enforcement wrapper around [`can_access`] that turns a
/// denial into an authorization error.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate;

impl AccessGate {
    /// Creates a new access gate.
    pub fn new() -> Self {
        Self
    }

    /// Checks access, returning an error naming the role when denied.
    pub fn require(
        &self,
        role: UserRole,
        permissions: &PermissionSet,
        required_roles: &[UserRole],
        required_permissions: &[&str],
    ) -> AppResult<()> {
        if can_access(role, permissions, required_roles, required_permissions) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' is not allowed to perform this operation"
            )))
        }
    }
}
