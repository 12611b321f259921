//! Session lifecycle state enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a session.
///
/// A session starts `Active` and moves to exactly one terminal state.
/// Terminal states are never left; ended sessions stay in the store as
/// history rather than being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Session is live and counts toward the quota.
    Active,
    /// Ended by logout or an administrative termination.
    Invalidated,
    /// Ended by quota overflow eviction.
    Evicted,
    /// Ended by the idle-timeout sweep.
    Expired,
}

impl SessionState {
    /// Check whether this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }

    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Invalidated => "invalidated",
            Self::Evicted => "evicted",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionState::Active.is_terminal());
        assert!(SessionState::Invalidated.is_terminal());
        assert!(SessionState::Evicted.is_terminal());
        assert!(SessionState::Expired.is_terminal());
    }
}
