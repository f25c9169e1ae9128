//! # Effective permissions
//!
//! A principal's effective permissions are its direct grants plus everything
//! granted by the roles assigned to it. This module only does set algebra;
//! no cascade rules run here.

use crate::permissions::GrantedSet;

/// Union of direct grants and every role grant.
///
/// # Example
///
/// ```
/// use access_rbac::effective::effective;
/// use access_rbac::permissions::GrantedSet;
///
/// let direct = GrantedSet::from_strings(&["Reports: Read"]);
/// let sales = GrantedSet::from_strings(&["Vendor: Read", "Vendor: Edit"]);
/// let all = effective(&direct, [&sales]);
/// assert_eq!(all.len(), 3);
/// ```
pub fn effective<'a, I>(direct: &GrantedSet, roles: I) -> GrantedSet
where
    I: IntoIterator<Item = &'a GrantedSet>,
{
    let mut all = direct.clone();
    for role in roles {
        all.merge(role);
    }
    all
}

/// Names granted through role membership.
///
/// A direct-grant editor renders these as locked.
pub fn inherited<'a, I>(roles: I) -> GrantedSet
where
    I: IntoIterator<Item = &'a GrantedSet>,
{
    effective(&GrantedSet::new(), roles)
}

/// Display partition of a principal's permissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionOverlay {
    /// Everything the principal holds.
    pub effective: GrantedSet,
    /// Held through a role; shown checked and locked.
    pub inherited: GrantedSet,
    /// Held only through direct grants; freely editable.
    pub direct_only: GrantedSet,
}

impl PermissionOverlay {
    /// Partition a principal's direct grants against its role grants.
    pub fn build<'a, I>(direct: &GrantedSet, roles: I) -> Self
    where
        I: IntoIterator<Item = &'a GrantedSet>,
    {
        let inherited = inherited(roles);
        Self {
            effective: direct.union(&inherited),
            direct_only: direct.difference(&inherited),
            inherited,
        }
    }

    /// Whether a name is held through a role and cannot be revoked directly.
    pub fn is_locked(&self, name: &str) -> bool {
        self.inherited.contains(name)
    }
}
