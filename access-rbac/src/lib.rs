//! # Access RBAC (Permission Matrix Engine)
//!
//! This crate resolves permission-matrix checkbox toggles into consistent
//! sets of granted permission names.
//!
//! ## Overview
//!
//! The access-rbac crate handles:
//! - **Actions**: The `Read < Edit < Delete` privilege lattice
//! - **Resources**: The static, hierarchical resource catalogue
//! - **Permissions**: The canonical naming codec and the granted set
//! - **Catalogue**: Enumeration and auditing of valid permission names
//! - **Toggle**: Group, child and read-variant toggle resolution
//! - **Effective**: Role and direct-grant aggregation
//!
//! ## Architecture
//!
//! ```text
//! Permission name = "<Resource or variant label>: <Action>"
//!
//! Examples:
//!   "Vendor: Edit"              - Edit vendors
//!   "CRM — Read (Own): Read"    - Read own CRM records
//!   "CRM: Delete"               - Delete CRM records (needs Edit and a read scope)
//! ```
//!
//! The engine holds no state. Every toggle is a pure function from the
//! current granted set and an event to the next granted set; the caller
//! persists the result.
//!
//! ## Usage
//!
//! ```rust
//! use access_rbac::{Action, GrantedSet, ResourceSchema, ToggleResolver};
//!
//! let schema = ResourceSchema::builtin().unwrap();
//! let resolver = ToggleResolver::new(&schema);
//!
//! let granted = resolver.compute_group_toggle(&GrantedSet::new(), "customers", Action::Read, true);
//! assert!(granted.contains("CRM — Read (Own): Read"));
//! assert!(granted.contains("Vendor: Read"));
//!
//! let granted = resolver.compute_child_toggle_variant(
//!     &granted,
//!     "customers",
//!     "customers-crm",
//!     "CRM — Read (All)",
//!     true,
//! );
//! assert!(granted.contains("CRM — Read (All): Read"));
//! assert!(!granted.contains("CRM — Read (Own): Read"));
//! ```
//!
//! ## Cascade Rules
//!
//! - Granting an action grants every action below it
//! - Revoking an action revokes every action above it
//! - Granting a read variant revokes its siblings
//! - Losing the last read variant revokes Edit and Delete

pub mod actions;
pub mod builtin;
pub mod catalogue;
pub mod effective;
pub mod error;
pub mod permissions;
pub mod resources;
pub mod toggle;

// Re-export main types for convenience
pub use actions::Action;
pub use catalogue::{PermissionNames, Violation};
pub use effective::{effective, inherited, PermissionOverlay};
pub use error::{SchemaError, SchemaResult};
pub use permissions::{label_for, parse_permission_name, GrantedSet, PermissionName};
pub use resources::{EntityId, ReadVariant, ResourceNode, ResourceSchema, SchemaNode, SchemaVariant};
pub use toggle::{ToggleEvent, ToggleResolver};
