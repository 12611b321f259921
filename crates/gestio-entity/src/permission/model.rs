//! Permission snapshot value object.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The set of permission names resolved for a principal's role.
///
/// The snapshot is resolved once at session start and shared verbatim with
/// clients, so client-side gating and server-side enforcement evaluate the
/// same data. Permission names follow the `resource_action` convention
/// (e.g. `customers_delete`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(HashSet<String>);

impl PermissionSet {
    /// Create an empty permission set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the set grants a permission by name.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Check whether the set grants any of the given permissions.
    pub fn contains_any<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> bool {
        names.into_iter().any(|name| self.contains(name))
    }

    /// Add a permission to the set.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.0.insert(name.into());
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The number of permissions in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
