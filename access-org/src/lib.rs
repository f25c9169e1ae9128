//! # Access Org (Role and Employee Records)
//!
//! Persisted principals whose permissions are edited through the
//! `access-rbac` permission matrix.
//!
//! ## Overview
//!
//! The access-org crate handles:
//! - **Roles**: Named, reusable granted sets
//! - **Employees**: Direct grants plus role assignments
//! - **Migration**: Collapsing duplicate permission records and remapping IDs
//!
//! ## Architecture
//!
//! ```text
//! Employee
//!   ├─ permissionNames (direct grants, editable)
//!   └─ roleIds ─→ Role
//!                   └─ permissionNames (inherited, locked in the editor)
//!
//! effective = direct ∪ roles
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use access_org::{Employee, Role};
//! use access_rbac::{Action, ResourceSchema, ToggleEvent, ToggleResolver};
//!
//! let schema = ResourceSchema::builtin().unwrap();
//! let resolver = ToggleResolver::new(&schema);
//!
//! let mut sales = Role::new("Sales");
//! sales.apply_toggle(&resolver, &ToggleEvent::Group {
//!     resource: "customers".into(),
//!     action: Action::Edit,
//!     checked: true,
//! });
//!
//! let mut employee = Employee::new("Dana Reyes", "dana@example.com");
//! employee.assign_role(sales.id);
//!
//! let overlay = employee.overlay(&[sales]);
//! assert!(overlay.is_locked("Vendor: Edit"));
//! ```
//!
//! ## Persistence
//!
//! Records serialize in camelCase with grants as plain name lists
//! (`permissionNames`). Storing and loading them is the caller's concern.

pub mod employees;
pub mod migration;
pub mod roles;

// Re-export main types for convenience
pub use employees::Employee;
pub use migration::{PermissionRecord, PermissionRemap, RemappedIds};
pub use roles::Role;
