//! # Catalogue
//!
//! Flattening the resource tree into the universe of valid permission names,
//! and auditing a granted set against it.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::actions::Action;
use crate::permissions::{parse_permission_name, GrantedSet, PermissionName};
use crate::resources::{ResourceSchema, SchemaNode};

/// Lazy depth-first walk over every editable permission name.
///
/// Created by [`ResourceSchema::all_permission_names`]; each call starts a
/// fresh walk.
pub struct PermissionNames<'a> {
    schema: &'a ResourceSchema,
    stack: Vec<std::slice::Iter<'a, SchemaNode>>,
    pending: VecDeque<PermissionName>,
}

impl<'a> Iterator for PermissionNames<'a> {
    type Item = PermissionName;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(name) = self.pending.pop_front() {
                return Some(name);
            }

            let level = self.stack.last_mut()?;
            let Some(node) = level.next() else {
                self.stack.pop();
                continue;
            };
            if !node.is_editable() {
                continue;
            }

            for variant in node.read_variants() {
                self.pending
                    .push_back(self.schema.permission_name(variant.entity(), Action::Read));
            }
            if node.is_group() {
                self.stack.push(node.children().iter());
            } else {
                for &action in node.actions() {
                    self.pending
                        .push_back(self.schema.permission_name(node.entity(), action));
                }
            }
        }
    }
}

/// A granted set that breaks a matrix invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// An action is granted without one it depends on.
    MissingDependency {
        /// Key of the resource.
        resource: String,
        /// The action that is granted.
        granted: Action,
        /// The action it requires but lacks.
        missing: Action,
    },

    /// More than one read variant of a resource is granted.
    ConflictingVariants {
        /// Key of the resource.
        resource: String,
        /// The granted variant permission names.
        granted: Vec<PermissionName>,
    },

    /// A name carries a catalogue label with an action that row does not offer,
    /// e.g. a bare Read on a variant-bearing resource.
    UnsupportedAction {
        /// Key of the resource the label belongs to.
        resource: String,
        /// The offending permission name.
        name: PermissionName,
    },
}

impl ResourceSchema {
    /// Every permission name of the editable catalogue, in display order.
    ///
    /// Mocked and admin-only rows (and everything under them) are skipped.
    /// Read variants come before the row's own actions.
    ///
    /// # Example
    ///
    /// ```
    /// use access_rbac::resources::ResourceSchema;
    ///
    /// let schema = ResourceSchema::builtin().unwrap();
    /// let names: Vec<String> = schema.all_permission_names().collect();
    /// assert!(names.contains(&"Vendor: Delete".to_string()));
    /// ```
    pub fn all_permission_names(&self) -> PermissionNames<'_> {
        PermissionNames {
            schema: self,
            stack: vec![self.resources().iter()],
            pending: VecDeque::new(),
        }
    }

    /// Check if a name belongs to the editable catalogue.
    pub fn is_known(&self, name: &str) -> bool {
        self.all_permission_names().any(|n| n == name)
    }

    /// Names in a granted set that the editable catalogue does not produce.
    pub fn unknown_names(&self, set: &GrantedSet) -> Vec<PermissionName> {
        let known: HashSet<PermissionName> = self.all_permission_names().collect();
        set.iter()
            .filter(|name| !known.contains(*name))
            .map(str::to_string)
            .collect()
    }

    /// Names produced by more than one entity, in first-seen order.
    pub fn duplicate_names(&self) -> Vec<PermissionName> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for name in self.all_permission_names() {
            if !seen.insert(name.clone()) && !duplicates.contains(&name) {
                duplicates.push(name);
            }
        }
        duplicates
    }

    /// Audit a granted set against the matrix invariants.
    ///
    /// Reports broken dependency closure and variant exclusion per row, then
    /// names whose label belongs to an editable row but whose action that row
    /// cannot hold. Names with labels outside the catalogue are not reported
    /// here, see [`ResourceSchema::unknown_names`].
    pub fn violations(&self, set: &GrantedSet) -> Vec<Violation> {
        let mut found = Vec::new();
        for node in self.resources() {
            self.audit_node(node, set, &mut found);
        }

        let owners = self.label_owners();
        for name in set.iter() {
            let Some((label, action)) = parse_permission_name(name) else {
                continue;
            };
            let Some(&(node, is_variant)) = owners.get(label) else {
                continue;
            };
            let offered = if is_variant {
                action == Action::Read
            } else {
                node.actions().contains(&action)
            };
            if !offered {
                found.push(Violation::UnsupportedAction {
                    resource: node.key().to_string(),
                    name: name.to_string(),
                });
            }
        }
        found
    }

    /// Editable leaf rows and variants by label. The flag marks variants.
    fn label_owners(&self) -> HashMap<&str, (&SchemaNode, bool)> {
        let mut owners = HashMap::new();
        let mut stack: Vec<&SchemaNode> = self.resources().iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !node.is_editable() {
                continue;
            }
            if node.is_group() {
                stack.extend(node.children().iter().rev());
                continue;
            }
            owners.entry(node.label()).or_insert((node, false));
            for variant in node.read_variants() {
                owners.entry(variant.label()).or_insert((node, true));
            }
        }
        owners
    }

    fn audit_node(&self, node: &SchemaNode, set: &GrantedSet, found: &mut Vec<Violation>) {
        if !node.is_editable() {
            return;
        }
        if node.is_group() {
            for child in node.children() {
                self.audit_node(child, set, found);
            }
            return;
        }

        let granted_variants: Vec<PermissionName> = node
            .read_variants()
            .iter()
            .map(|v| self.permission_name(v.entity(), Action::Read))
            .filter(|name| set.contains(name))
            .collect();
        if granted_variants.len() > 1 {
            found.push(Violation::ConflictingVariants {
                resource: node.key().to_string(),
                granted: granted_variants.clone(),
            });
        }

        let holds = |action: Action| {
            if action == Action::Read && node.has_read_variants() {
                !granted_variants.is_empty()
            } else {
                set.contains(&self.permission_name(node.entity(), action))
            }
        };

        for granted in [Action::Edit, Action::Delete] {
            if !node.actions().contains(&granted)
                || !set.contains(&self.permission_name(node.entity(), granted))
            {
                continue;
            }
            for missing in granted.close_upward().filter(|a| *a != granted) {
                if !holds(missing) {
                    found.push(Violation::MissingDependency {
                        resource: node.key().to_string(),
                        granted,
                        missing,
                    });
                }
            }
        }
    }
}
