//! Employee records
//!
//! An employee carries direct grants and a list of assigned roles. Their
//! effective permissions are the union of both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use access_rbac::{GrantedSet, PermissionOverlay, ToggleEvent, ToggleResolver};

use crate::roles::Role;

/// A persisted employee.
///
/// `permission_names` holds only direct grants; role grants are resolved
/// on demand from `role_ids`.
///
/// # Examples
///
/// ```
/// use access_org::{Employee, Role};
/// use access_rbac::GrantedSet;
///
/// let sales = Role::new("Sales")
///     .with_permissions(GrantedSet::from_strings(&["Vendor: Read"]));
///
/// let mut employee = Employee::new("Dana Reyes", "dana@example.com");
/// employee.assign_role(sales.id);
///
/// let effective = employee.effective_permissions(&[sales]);
/// assert!(effective.contains("Vendor: Read"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Unique employee ID
    pub id: Uuid,

    /// Full name
    pub name: String,

    /// Work email
    pub email: String,

    /// Assigned role IDs, in assignment order
    #[serde(default)]
    pub role_ids: Vec<Uuid>,

    /// Direct grants
    #[serde(default)]
    pub permission_names: GrantedSet,

    /// When the employee record was created
    pub created_at: DateTime<Utc>,

    /// When the record's grants or roles last changed
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Creates a new employee with no roles and no direct grants.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: email.into(),
            role_ids: Vec::new(),
            permission_names: GrantedSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Seed the direct grants, e.g. from storage.
    pub fn with_permissions(mut self, permissions: GrantedSet) -> Self {
        self.permission_names = permissions;
        self
    }

    /// Assign a role.
    ///
    /// # Returns
    ///
    /// `true` if the role was not already assigned
    pub fn assign_role(&mut self, role_id: Uuid) -> bool {
        if self.role_ids.contains(&role_id) {
            return false;
        }
        self.role_ids.push(role_id);
        self.updated_at = Utc::now();
        true
    }

    /// Remove a role assignment.
    ///
    /// # Returns
    ///
    /// `true` if the role was assigned
    pub fn unassign_role(&mut self, role_id: Uuid) -> bool {
        let before = self.role_ids.len();
        self.role_ids.retain(|id| *id != role_id);
        let removed = self.role_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Check if a role is assigned.
    pub fn has_role(&self, role_id: Uuid) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// The assigned roles found in `roles`.
    ///
    /// Assignments that point at unknown roles are skipped.
    pub fn assigned_roles<'a>(&self, roles: &'a [Role]) -> Vec<&'a Role> {
        self.role_ids
            .iter()
            .filter_map(|role_id| {
                let role = roles.iter().find(|r| r.id == *role_id);
                if role.is_none() {
                    tracing::warn!(
                        employee_id = %self.id,
                        role_id = %role_id,
                        "Employee references unknown role"
                    );
                }
                role
            })
            .collect()
    }

    /// Direct grants plus every assigned role's grants.
    pub fn effective_permissions(&self, roles: &[Role]) -> GrantedSet {
        access_rbac::effective(
            &self.permission_names,
            self.assigned_roles(roles)
                .into_iter()
                .map(|r| &r.permission_names),
        )
    }

    /// Display partition for the direct-grant editor.
    pub fn overlay(&self, roles: &[Role]) -> PermissionOverlay {
        PermissionOverlay::build(
            &self.permission_names,
            self.assigned_roles(roles)
                .into_iter()
                .map(|r| &r.permission_names),
        )
    }

    /// Resolve a matrix toggle against this employee's direct grants.
    ///
    /// # Returns
    ///
    /// `true` if the direct grants changed
    pub fn apply_toggle(&mut self, resolver: &ToggleResolver<'_>, event: &ToggleEvent) -> bool {
        let next = resolver.apply(&self.permission_names, event);
        if next == self.permission_names {
            return false;
        }

        tracing::debug!(
            employee_id = %self.id,
            before = self.permission_names.len(),
            after = next.len(),
            "Employee direct grants changed"
        );
        self.permission_names = next;
        self.updated_at = Utc::now();
        true
    }
}
