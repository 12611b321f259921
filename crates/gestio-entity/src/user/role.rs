//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles available in the authorization system.
///
/// Roles fall into three enforcement tiers: `Admin` bypasses every check,
/// `CompanyAdmin` must satisfy both the role axis and the permission axis,
/// and the plain tiers (`User`, `CustomerUser`) are constrained by both
/// axes as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Platform administrator with unrestricted access.
    Admin,
    /// Administrator of a single tenant company.
    CompanyAdmin,
    /// Regular staff member of a tenant company.
    User,
    /// External customer-portal account.
    CustomerUser,
}

/// Enforcement tier a role belongs to during access resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleTier {
    /// Every access check passes unconditionally.
    Bypass,
    /// Elevated tenant management; both axes are still enforced.
    Hybrid,
    /// Constrained by required roles and required permissions.
    Plain,
}

impl UserRole {
    /// Return the enforcement tier for this role.
    pub fn tier(&self) -> RoleTier {
        match self {
            Self::Admin => RoleTier::Bypass,
            Self::CompanyAdmin => RoleTier::Hybrid,
            Self::User | Self::CustomerUser => RoleTier::Plain,
        }
    }

    /// Check if this role is a platform admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role skips concurrent-session quota enforcement.
    pub fn is_quota_exempt(&self) -> bool {
        matches!(self, Self::Admin | Self::CompanyAdmin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::CompanyAdmin => "company_admin",
            Self::User => "user",
            Self::CustomerUser => "customer_user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = gestio_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "company_admin" => Ok(Self::CompanyAdmin),
            "user" => Ok(Self::User),
            "customer_user" => Ok(Self::CustomerUser),
            _ => Err(gestio_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, company_admin, user, customer_user"
            ))),
        }
    }
}
