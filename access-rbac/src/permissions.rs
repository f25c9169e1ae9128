//! # Permissions
//!
//! The naming codec and the granted set.
//!
//! A permission is stored by its canonical name, `"<Label>: <Action>"`, where
//! the label belongs either to a resource or to one of its read variants.
//! The granted set of a principal is nothing more than a set of such names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::actions::Action;

/// Canonical permission name, e.g. `"Vendor: Edit"`.
pub type PermissionName = String;

/// Build the canonical permission name for an entity label and action.
///
/// # Example
///
/// ```
/// use access_rbac::actions::Action;
/// use access_rbac::permissions::label_for;
///
/// assert_eq!(label_for("Vendor", Action::Edit), "Vendor: Edit");
/// assert_eq!(label_for("CRM — Read (Own)", Action::Read), "CRM — Read (Own): Read");
/// ```
pub fn label_for(entity_label: &str, action: Action) -> PermissionName {
    format!("{}: {}", entity_label, action.display_name())
}

/// Split a canonical permission name back into label and action.
///
/// Splits on the last `": "` so labels containing colons survive.
///
/// # Example
///
/// ```
/// use access_rbac::actions::Action;
/// use access_rbac::permissions::parse_permission_name;
///
/// assert_eq!(parse_permission_name("Vendor: Delete"), Some(("Vendor", Action::Delete)));
/// assert_eq!(parse_permission_name("garbage"), None);
/// ```
pub fn parse_permission_name(name: &str) -> Option<(&str, Action)> {
    let (label, action) = name.rsplit_once(": ")?;
    if label.is_empty() {
        return None;
    }
    let action = match action {
        "Read" => Action::Read,
        "Edit" => Action::Edit,
        "Delete" => Action::Delete,
        _ => return None,
    };
    Some((label, action))
}

/// A set of granted permission names.
///
/// Resolver calls never mutate a set they are given; they return a new one.
/// Names outside the catalogue are carried through untouched.
///
/// # Example
///
/// ```
/// use access_rbac::permissions::GrantedSet;
///
/// let set = GrantedSet::from_strings(&["Vendor: Read", "Vendor: Edit"]);
/// assert!(set.contains("Vendor: Read"));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrantedSet {
    names: BTreeSet<PermissionName>,
}

impl GrantedSet {
    /// Create a new empty granted set.
    pub fn new() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Create from a list of permission names.
    pub fn from_strings(names: &[&str]) -> Self {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// Check if the set contains a permission name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Add a permission name.
    ///
    /// # Returns
    ///
    /// `true` if the name was not already present
    pub fn insert(&mut self, name: impl Into<PermissionName>) -> bool {
        self.names.insert(name.into())
    }

    /// Remove a permission name.
    ///
    /// # Returns
    ///
    /// `true` if the name was present
    pub fn remove(&mut self, name: &str) -> bool {
        self.names.remove(name)
    }

    /// Iterate the names in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Get the count of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Merge another set into this one.
    pub fn merge(&mut self, other: &GrantedSet) {
        self.names.extend(other.names.iter().cloned());
    }

    /// Set union, leaving both operands untouched.
    pub fn union(&self, other: &GrantedSet) -> GrantedSet {
        Self {
            names: self.names.union(&other.names).cloned().collect(),
        }
    }

    /// Names in `self` that are not in `other`.
    pub fn difference(&self, other: &GrantedSet) -> GrantedSet {
        Self {
            names: self.names.difference(&other.names).cloned().collect(),
        }
    }
}

impl FromIterator<PermissionName> for GrantedSet {
    fn from_iter<T: IntoIterator<Item = PermissionName>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl From<Vec<PermissionName>> for GrantedSet {
    fn from(names: Vec<PermissionName>) -> Self {
        names.into_iter().collect()
    }
}

impl Extend<PermissionName> for GrantedSet {
    fn extend<T: IntoIterator<Item = PermissionName>>(&mut self, iter: T) {
        self.names.extend(iter);
    }
}
