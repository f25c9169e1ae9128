//! Role records
//!
//! A role is a named, reusable granted set. Employees assigned to a role
//! inherit every permission it grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use access_rbac::{GrantedSet, ToggleEvent, ToggleResolver};

/// A persisted role.
///
/// Serialized in camelCase; the granted set is stored as a plain list under
/// `permissionNames`.
///
/// # Examples
///
/// ```
/// use access_org::Role;
/// use access_rbac::{Action, ResourceSchema, ToggleEvent, ToggleResolver};
///
/// let schema = ResourceSchema::builtin().unwrap();
/// let resolver = ToggleResolver::new(&schema);
///
/// let mut role = Role::new("Sales");
/// let changed = role.apply_toggle(&resolver, &ToggleEvent::Group {
///     resource: "customers".into(),
///     action: Action::Read,
///     checked: true,
/// });
/// assert!(changed);
/// assert!(role.has_permission("Vendor: Read"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Granted permission names
    #[serde(default)]
    pub permission_names: GrantedSet,

    /// When the role was created
    pub created_at: DateTime<Utc>,

    /// When the role's grants last changed
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role with no grants.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            description: None,
            permission_names: GrantedSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Seed the granted set, e.g. from storage.
    pub fn with_permissions(mut self, permissions: GrantedSet) -> Self {
        self.permission_names = permissions;
        self
    }

    /// Check if the role grants a permission name.
    pub fn has_permission(&self, name: &str) -> bool {
        self.permission_names.contains(name)
    }

    /// Resolve a matrix toggle against this role's grants.
    ///
    /// The granted set is replaced wholesale and `updated_at` is bumped only
    /// when the result differs.
    ///
    /// # Returns
    ///
    /// `true` if the grants changed
    pub fn apply_toggle(&mut self, resolver: &ToggleResolver<'_>, event: &ToggleEvent) -> bool {
        let next = resolver.apply(&self.permission_names, event);
        if next == self.permission_names {
            return false;
        }

        tracing::debug!(
            role_id = %self.id,
            before = self.permission_names.len(),
            after = next.len(),
            "Role grants changed"
        );
        self.permission_names = next;
        self.updated_at = Utc::now();
        true
    }
}
