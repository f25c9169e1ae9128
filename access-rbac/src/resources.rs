//! # Resources
//!
//! The resource catalogue: a static tree of resources, each exposing a subset
//! of actions and, for some resources, mutually exclusive read variants.
//!
//! [`ResourceNode`] is the declarative form (what a catalogue file contains).
//! [`ResourceSchema`] is the compiled, immutable form the engine runs over.
//! Compiling interns every label-bearing entity (resources and variants) into
//! an [`EntityId`], so the resolver works on ids and actions and only turns
//! them into permission names at the edge.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::actions::Action;
use crate::error::{SchemaError, SchemaResult};
use crate::permissions::{label_for, PermissionName};

/// A mutually exclusive scope for a resource's Read action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReadVariant {
    /// Stable key, unique within the resource (e.g. "own").
    pub key: String,
    /// Display label; the variant's permission name is `"<label>: Read"`.
    pub label: String,
}

impl ReadVariant {
    /// Create a new read variant.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Declarative definition of one row of the permission matrix.
///
/// A node with children is a group and holds no actions of its own.
/// A node with read variants has no bare Read; its variants stand in for it.
/// Variants are declared narrowest scope first.
///
/// # Example
///
/// ```
/// use access_rbac::actions::Action;
/// use access_rbac::resources::{ReadVariant, ResourceNode};
///
/// let crm = ResourceNode::leaf("customers-crm", "CRM", &[Action::Edit, Action::Delete])
///     .with_read_variants(vec![
///         ReadVariant::new("own", "CRM — Read (Own)"),
///         ReadVariant::new("all", "CRM — Read (All)"),
///     ]);
/// let customers = ResourceNode::group("customers", "Customers", vec![crm]);
/// assert!(customers.is_group());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceNode {
    /// Stable identifier, unique among siblings.
    pub key: String,
    /// Display name and basis of the permission name.
    pub label: String,
    /// Actions this resource supports. Empty for chip-only placeholders.
    #[serde(default)]
    pub actions: Vec<Action>,
    /// Child resources, in display order.
    #[serde(default)]
    pub children: Vec<ResourceNode>,
    /// Read scopes, narrowest first.
    #[serde(default)]
    pub read_variants: Vec<ReadVariant>,
    /// Display-only placeholder; excluded from the editable catalogue.
    #[serde(default)]
    pub mocked: bool,
    /// Only administrators see this row; excluded from the editable catalogue.
    #[serde(default)]
    pub admin_only: bool,
}

impl ResourceNode {
    /// Create a leaf resource with the given actions.
    pub fn leaf(key: impl Into<String>, label: impl Into<String>, actions: &[Action]) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            actions: actions.to_vec(),
            children: Vec::new(),
            read_variants: Vec::new(),
            mocked: false,
            admin_only: false,
        }
    }

    /// Create a group resource aggregating the given children.
    pub fn group(
        key: impl Into<String>,
        label: impl Into<String>,
        children: Vec<ResourceNode>,
    ) -> Self {
        Self {
            children,
            ..Self::leaf(key, label, &[])
        }
    }

    /// Attach read variants.
    pub fn with_read_variants(mut self, variants: Vec<ReadVariant>) -> Self {
        self.read_variants = variants;
        self
    }

    /// Mark as a display-only placeholder.
    pub fn mocked(mut self) -> Self {
        self.mocked = true;
        self
    }

    /// Mark as admin-only.
    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    /// Check if this node aggregates children.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Interned identifier of a label-bearing entity (a resource or a variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u32);

impl EntityId {
    /// Position of the entity in its schema's label table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A compiled read variant.
#[derive(Debug, Clone)]
pub struct SchemaVariant {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) entity: EntityId,
}

impl SchemaVariant {
    /// Stable key, unique within the resource.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display label; the variant grants `"<label>: Read"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Interned id of the variant.
    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

/// A compiled resource node.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub(crate) key: String,
    pub(crate) label: String,
    pub(crate) entity: EntityId,
    pub(crate) actions: Vec<Action>,
    pub(crate) variants: Vec<SchemaVariant>,
    pub(crate) children: Vec<SchemaNode>,
    pub(crate) mocked: bool,
    pub(crate) admin_only: bool,
}

impl SchemaNode {
    /// Stable key, unique among siblings.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display label and basis of the node's permission names.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Interned id of the node.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Declared actions, sorted and deduplicated.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Child resources, in display order.
    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    /// Read scopes, narrowest first.
    pub fn read_variants(&self) -> &[SchemaVariant] {
        &self.variants
    }

    /// Check if this node aggregates children.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Check if Read on this node is held through variants.
    pub fn has_read_variants(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Check if this is a display-only placeholder.
    pub fn is_mocked(&self) -> bool {
        self.mocked
    }

    /// Check if only administrators see this row.
    pub fn is_admin_only(&self) -> bool {
        self.admin_only
    }

    /// Check if this row takes part in the editable catalogue.
    pub fn is_editable(&self) -> bool {
        !self.mocked && !self.admin_only
    }

    /// Check if this node can hold the given action.
    ///
    /// A variant-bearing node supports Read through its variants.
    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action) || (action == Action::Read && self.has_read_variants())
    }

    /// The least privileged variant, used to fill an empty read slot.
    pub fn default_variant(&self) -> Option<&SchemaVariant> {
        self.variants.first()
    }

    /// Look up a variant by its label.
    pub fn variant(&self, label: &str) -> Option<&SchemaVariant> {
        self.variants.iter().find(|v| v.label == label)
    }

    /// Look up a direct child by key.
    pub fn child(&self, key: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.key == key)
    }
}

/// The compiled, immutable resource catalogue.
///
/// Build one at startup and share it by reference; the resolver borrows it.
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    roots: Vec<SchemaNode>,
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl ResourceSchema {
    /// Compile a catalogue, checking its structure.
    ///
    /// Canonical name uniqueness is a separate check, see
    /// [`ResourceSchema::check_names`].
    pub fn new(nodes: Vec<ResourceNode>) -> SchemaResult<Self> {
        let mut labels = Vec::new();
        let roots = compile_level(&nodes, "<root>", &mut labels)?;
        let index = roots
            .iter()
            .enumerate()
            .map(|(i, node)| (node.key.clone(), i))
            .collect();

        tracing::debug!(
            resources = roots.len(),
            entities = labels.len(),
            "Compiled resource schema"
        );

        Ok(Self {
            roots,
            labels,
            index,
        })
    }

    /// Load a catalogue from JSON and run every check.
    ///
    /// # Example
    ///
    /// ```
    /// use access_rbac::resources::ResourceSchema;
    ///
    /// let schema = ResourceSchema::from_json(r#"[
    ///     {"key": "reports", "label": "Reports", "actions": ["read"]}
    /// ]"#).unwrap();
    /// assert!(schema.resource("reports").is_some());
    /// ```
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let nodes: Vec<ResourceNode> = serde_json::from_str(json)?;
        let schema = Self::new(nodes)?;
        schema.check_names()?;
        Ok(schema)
    }

    /// Ensure no two editable entities produce the same permission name.
    pub fn check_names(&self) -> SchemaResult<()> {
        match self.duplicate_names().into_iter().next() {
            Some(name) => Err(SchemaError::DuplicatePermissionName(name)),
            None => Ok(()),
        }
    }

    /// Top-level resources in declared order.
    pub fn resources(&self) -> &[SchemaNode] {
        &self.roots
    }

    /// Look up a top-level resource.
    pub fn resource(&self, key: &str) -> Option<&SchemaNode> {
        self.index.get(key).map(|&i| &self.roots[i])
    }

    /// Look up a child within a top-level resource.
    pub fn child(&self, parent_key: &str, child_key: &str) -> Option<&SchemaNode> {
        self.resource(parent_key)?.child(child_key)
    }

    /// Label of an interned entity.
    ///
    /// `entity` must come from one of this schema's own nodes.
    pub(crate) fn label(&self, entity: EntityId) -> &str {
        &self.labels[entity.index()]
    }

    /// Canonical permission name for an entity and action.
    pub(crate) fn permission_name(&self, entity: EntityId, action: Action) -> PermissionName {
        label_for(self.label(entity), action)
    }
}

fn intern(labels: &mut Vec<String>, label: &str) -> EntityId {
    let id = EntityId(labels.len() as u32);
    labels.push(label.to_string());
    id
}

fn compile_level(
    nodes: &[ResourceNode],
    parent: &str,
    labels: &mut Vec<String>,
) -> SchemaResult<Vec<SchemaNode>> {
    let mut seen = HashSet::new();
    let mut compiled = Vec::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.key.as_str()) {
            return Err(SchemaError::DuplicateKey {
                parent: parent.to_string(),
                key: node.key.clone(),
            });
        }
        compiled.push(compile_node(node, labels)?);
    }
    Ok(compiled)
}

fn compile_node(node: &ResourceNode, labels: &mut Vec<String>) -> SchemaResult<SchemaNode> {
    if node.key.is_empty() {
        return Err(SchemaError::EmptyField {
            field: "key",
            key: node.key.clone(),
        });
    }
    if node.label.is_empty() {
        return Err(SchemaError::EmptyField {
            field: "label",
            key: node.key.clone(),
        });
    }
    if node.is_group() && (!node.actions.is_empty() || !node.read_variants.is_empty()) {
        return Err(SchemaError::GroupWithActions(node.key.clone()));
    }
    if !node.read_variants.is_empty() && node.actions.contains(&Action::Read) {
        return Err(SchemaError::VariantsWithBareRead(node.key.clone()));
    }
    // Every declared action needs the rungs below it: Read (or a variant) and Edit.
    let has_read = node.actions.contains(&Action::Read) || !node.read_variants.is_empty();
    let has_edit = node.actions.contains(&Action::Edit);
    let has_delete = node.actions.contains(&Action::Delete);
    if ((has_edit || has_delete) && !has_read) || (has_delete && !has_edit) {
        return Err(SchemaError::IncompleteActionChain(node.key.clone()));
    }

    let entity = intern(labels, &node.label);

    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(node.read_variants.len());
    for variant in &node.read_variants {
        if variant.key.is_empty() || variant.label.is_empty() {
            return Err(SchemaError::EmptyField {
                field: if variant.key.is_empty() { "key" } else { "label" },
                key: format!("{}/{}", node.key, variant.key),
            });
        }
        if !seen.insert(variant.key.as_str()) {
            return Err(SchemaError::DuplicateKey {
                parent: node.key.clone(),
                key: variant.key.clone(),
            });
        }
        variants.push(SchemaVariant {
            key: variant.key.clone(),
            label: variant.label.clone(),
            entity: intern(labels, &variant.label),
        });
    }

    let mut actions = node.actions.clone();
    actions.sort();
    actions.dedup();

    Ok(SchemaNode {
        key: node.key.clone(),
        label: node.label.clone(),
        entity,
        actions,
        variants,
        children: compile_level(&node.children, &node.key, labels)?,
        mocked: node.mocked,
        admin_only: node.admin_only,
    })
}
