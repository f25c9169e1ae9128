//! # Toggle resolution
//!
//! Turns one checkbox toggle into the next granted set.
//!
//! Every entry point is a total, pure function of `(current set, event)`:
//! unknown keys are no-ops, the input set is never touched, and the result
//! always satisfies the matrix invariants:
//!
//! - **Dependency closure**: Delete requires Edit, Edit requires Read.
//! - **Variant exclusion**: at most one read variant per resource.
//! - **Read scope**: Edit and Delete on a variant-bearing resource require
//!   one of its variants.
//!
//! All cascades funnel through one primitive that walks the action lattice
//! upward on grant and downward on revoke. For a variant-bearing resource the
//! Read rung of that lattice is its variant slot: granting it fills the slot
//! with the narrowest variant if empty, revoking it clears every variant.

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::permissions::GrantedSet;
use crate::resources::{EntityId, ResourceSchema, SchemaNode};

/// A toggle emitted by the permission matrix UI.
///
/// # Example
///
/// ```
/// use access_rbac::toggle::ToggleEvent;
///
/// let event: ToggleEvent = serde_json::from_str(
///     r#"{"kind": "group", "resource": "customers", "action": "read", "checked": true}"#,
/// ).unwrap();
/// assert!(event.checked());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToggleEvent {
    /// Aggregate checkbox on a resource row.
    Group {
        resource: String,
        action: Action,
        checked: bool,
    },
    /// A single child row under an expanded group.
    Child {
        parent: String,
        child: String,
        action: Action,
        checked: bool,
    },
    /// One read-variant checkbox of a child row.
    Variant {
        parent: String,
        child: String,
        variant: String,
        checked: bool,
    },
}

impl ToggleEvent {
    /// Whether the toggle grants (`true`) or revokes (`false`).
    pub fn checked(&self) -> bool {
        match self {
            ToggleEvent::Group { checked, .. }
            | ToggleEvent::Child { checked, .. }
            | ToggleEvent::Variant { checked, .. } => *checked,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ToggleEvent::Group { .. } => "group",
            ToggleEvent::Child { .. } => "child",
            ToggleEvent::Variant { .. } => "variant",
        }
    }
}

/// Resolves toggles against a borrowed catalogue.
///
/// # Example
///
/// ```
/// use access_rbac::actions::Action;
/// use access_rbac::permissions::GrantedSet;
/// use access_rbac::resources::ResourceSchema;
/// use access_rbac::toggle::ToggleResolver;
///
/// let schema = ResourceSchema::builtin().unwrap();
/// let resolver = ToggleResolver::new(&schema);
///
/// let next = resolver.compute_group_toggle(&GrantedSet::new(), "customers", Action::Edit, true);
/// assert!(next.contains("CRM — Read (Own): Read"));
/// assert!(next.contains("CRM: Edit"));
/// assert!(next.contains("Vendor: Read"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ToggleResolver<'a> {
    schema: &'a ResourceSchema,
}

impl<'a> ToggleResolver<'a> {
    /// Create a resolver over a compiled catalogue.
    pub fn new(schema: &'a ResourceSchema) -> Self {
        Self { schema }
    }

    /// The catalogue this resolver runs over.
    pub fn schema(&self) -> &'a ResourceSchema {
        self.schema
    }

    /// Dispatch a toggle event to its entry point.
    pub fn apply(&self, selected: &GrantedSet, event: &ToggleEvent) -> GrantedSet {
        let next = match event {
            ToggleEvent::Group {
                resource,
                action,
                checked,
            } => self.compute_group_toggle(selected, resource, *action, *checked),
            ToggleEvent::Child {
                parent,
                child,
                action,
                checked,
            } => self.compute_child_toggle(selected, parent, child, *action, *checked),
            ToggleEvent::Variant {
                parent,
                child,
                variant,
                checked,
            } => self.compute_child_toggle_variant(selected, parent, child, variant, *checked),
        };

        tracing::trace!(
            kind = event.kind(),
            checked = event.checked(),
            before = selected.len(),
            after = next.len(),
            "Applied permission toggle"
        );
        next
    }

    /// Toggle the aggregate checkbox of a resource row for one action column.
    ///
    /// A leaf row cascades on itself. A group row fans the toggle out to
    /// every editable child; granting any column fills empty read-variant
    /// slots with the narrowest variant and never replaces a wider one.
    pub fn compute_group_toggle(
        &self,
        selected: &GrantedSet,
        resource_key: &str,
        action: Action,
        checked: bool,
    ) -> GrantedSet {
        let Some(node) = editable(self.schema.resource(resource_key)) else {
            tracing::debug!(resource = resource_key, "Ignoring toggle on unknown resource");
            return selected.clone();
        };

        let mut draft = Draft::new(self.schema, selected);
        if node.is_group() {
            draft.fan_out(node, action, checked);
        } else {
            draft.cascade(node, action, checked);
        }
        draft.set
    }

    /// Toggle one child row (not a specific variant) under a group.
    ///
    /// On a variant-bearing row the Read column stands for the whole variant
    /// slot: granting fills it with the narrowest variant if it is empty,
    /// revoking clears every variant along with Edit and Delete.
    pub fn compute_child_toggle(
        &self,
        selected: &GrantedSet,
        parent_key: &str,
        child_key: &str,
        action: Action,
        checked: bool,
    ) -> GrantedSet {
        let Some(child) = self.editable_child(parent_key, child_key) else {
            return selected.clone();
        };

        let mut draft = Draft::new(self.schema, selected);
        if child.is_group() {
            draft.fan_out(child, action, checked);
        } else {
            draft.cascade(child, action, checked);
        }
        draft.set
    }

    /// Toggle one specific read variant of a child row.
    ///
    /// Granting a variant revokes its siblings. Revoking the last granted
    /// variant also revokes the row's Edit and Delete.
    pub fn compute_child_toggle_variant(
        &self,
        selected: &GrantedSet,
        parent_key: &str,
        child_key: &str,
        variant_label: &str,
        checked: bool,
    ) -> GrantedSet {
        let Some(child) = self.editable_child(parent_key, child_key) else {
            return selected.clone();
        };
        let Some(target) = child.variant(variant_label) else {
            tracing::debug!(
                parent = parent_key,
                child = child_key,
                variant = variant_label,
                "Ignoring toggle on unknown read variant"
            );
            return selected.clone();
        };

        let mut draft = Draft::new(self.schema, selected);
        if checked {
            for variant in child.read_variants() {
                draft.put(variant.entity(), Action::Read, variant.key() == target.key());
            }
        } else {
            draft.put(target.entity(), Action::Read, false);
            if !draft.has_read(child) {
                draft.revoke_from(child, Action::Edit);
            }
        }
        draft.set
    }

    fn editable_child(&self, parent_key: &str, child_key: &str) -> Option<&'a SchemaNode> {
        let child = editable(self.schema.resource(parent_key))
            .and_then(|parent| editable(parent.child(child_key)));
        if child.is_none() {
            tracing::debug!(
                parent = parent_key,
                child = child_key,
                "Ignoring toggle on unknown child resource"
            );
        }
        child
    }
}

fn editable(node: Option<&SchemaNode>) -> Option<&SchemaNode> {
    node.filter(|n| n.is_editable())
}

/// Working copy of the granted set for one resolver call.
struct Draft<'a> {
    schema: &'a ResourceSchema,
    set: GrantedSet,
}

impl<'a> Draft<'a> {
    fn new(schema: &'a ResourceSchema, selected: &GrantedSet) -> Self {
        Self {
            schema,
            set: selected.clone(),
        }
    }

    fn holds(&self, entity: EntityId, action: Action) -> bool {
        self.set.contains(&self.schema.permission_name(entity, action))
    }

    fn put(&mut self, entity: EntityId, action: Action, granted: bool) {
        let name = self.schema.permission_name(entity, action);
        if granted {
            self.set.insert(name);
        } else {
            self.set.remove(&name);
        }
    }

    /// Whether the Read rung of a row is held.
    fn has_read(&self, node: &SchemaNode) -> bool {
        if node.has_read_variants() {
            node.read_variants()
                .iter()
                .any(|v| self.holds(v.entity(), Action::Read))
        } else {
            self.holds(node.entity(), Action::Read)
        }
    }

    /// Fill an empty variant slot with the narrowest variant.
    fn ensure_read_variant(&mut self, node: &SchemaNode) {
        if self.has_read(node) {
            return;
        }
        if let Some(variant) = node.default_variant() {
            self.put(variant.entity(), Action::Read, true);
        }
    }

    fn grant_read(&mut self, node: &SchemaNode) {
        if node.has_read_variants() {
            self.ensure_read_variant(node);
        } else {
            self.put(node.entity(), Action::Read, true);
        }
    }

    fn revoke_read(&mut self, node: &SchemaNode) {
        if node.has_read_variants() {
            for variant in node.read_variants() {
                self.put(variant.entity(), Action::Read, false);
            }
        } else {
            self.put(node.entity(), Action::Read, false);
        }
    }

    /// Revoke `action` and everything above it.
    fn revoke_from(&mut self, node: &SchemaNode, action: Action) {
        for a in action.close_downward() {
            if a == Action::Read {
                self.revoke_read(node);
            } else {
                self.put(node.entity(), a, false);
            }
        }
    }

    /// Grant `action` and everything below it that the row supports.
    fn grant_up_to(&mut self, node: &SchemaNode, action: Action) {
        for a in action.close_upward() {
            if a == Action::Read {
                if node.supports(Action::Read) {
                    self.grant_read(node);
                }
            } else if node.supports(a) {
                self.put(node.entity(), a, true);
            }
        }
    }

    /// The single-row dependency cascade.
    fn cascade(&mut self, node: &SchemaNode, action: Action, checked: bool) {
        if !node.supports(action) {
            return;
        }
        if checked {
            self.grant_up_to(node, action);
        } else {
            self.revoke_from(node, action);
        }
    }

    /// Apply a column toggle to every editable child of a group.
    fn fan_out(&mut self, group: &SchemaNode, action: Action, checked: bool) {
        for child in group.children().iter().filter(|c| c.is_editable()) {
            if child.is_group() {
                self.fan_out(child, action, checked);
                continue;
            }
            // Edit and Delete columns still need a read scope underneath.
            if checked && child.has_read_variants() {
                self.ensure_read_variant(child);
            }
            self.cascade(child, action, checked);
        }
    }
}
