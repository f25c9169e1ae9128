//! Permission record migration
//!
//! Stores that index permissions by ID can accumulate several records with
//! the same name. This module collapses them onto one canonical record per
//! name and rewrites the ID lists held by roles and employees.
//!
//! The first record for a name, in input order, is canonical. For a given
//! input order the remap is therefore deterministic; callers that need a
//! stable result across loads should read records in a stable order (e.g.
//! by creation time).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use access_rbac::GrantedSet;

/// A stored permission record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRecord {
    /// Stored ID
    pub id: Uuid,
    /// Canonical permission name
    pub name: String,
}

impl PermissionRecord {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An ID list after remapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemappedIds {
    /// Canonical IDs, deduplicated, in first-seen order
    pub ids: Vec<Uuid>,
    /// IDs with no matching record
    pub dangling: Vec<Uuid>,
}

/// Maps every known permission ID onto its canonical record.
///
/// # Examples
///
/// ```
/// use access_org::migration::{PermissionRecord, PermissionRemap};
/// use uuid::Uuid;
///
/// let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
/// let remap = PermissionRemap::from_records(vec![
///     PermissionRecord::new(a, "Vendor: Read"),
///     PermissionRecord::new(b, "Vendor: Read"),
/// ]);
/// assert_eq!(remap.canonical_id(b), Some(a));
/// assert_eq!(remap.records().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PermissionRemap {
    canonical: Vec<PermissionRecord>,
    by_id: HashMap<Uuid, usize>,
    by_name: HashMap<String, usize>,
}

impl PermissionRemap {
    /// Build the remap from stored records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = PermissionRecord>,
    {
        let mut remap = Self::default();
        for record in records {
            remap.add(record);
        }
        remap
    }

    fn add(&mut self, record: PermissionRecord) {
        if let Some(&existing) = self.by_id.get(&record.id) {
            if self.canonical[existing].name != record.name {
                tracing::warn!(
                    id = %record.id,
                    kept = %self.canonical[existing].name,
                    dropped = %record.name,
                    "Permission ID reused for a different name; keeping the first"
                );
            }
            return;
        }

        match self.by_name.get(&record.name) {
            Some(&index) => {
                tracing::info!(
                    stale = %record.id,
                    canonical = %self.canonical[index].id,
                    name = %record.name,
                    "Remapping duplicate permission record"
                );
                self.by_id.insert(record.id, index);
            }
            None => {
                let index = self.canonical.len();
                self.by_id.insert(record.id, index);
                self.by_name.insert(record.name.clone(), index);
                self.canonical.push(record);
            }
        }
    }

    /// The canonical records, one per name, in input order.
    pub fn records(&self) -> &[PermissionRecord] {
        &self.canonical
    }

    /// Number of stored IDs that point at another record.
    pub fn stale_count(&self) -> usize {
        self.by_id.len() - self.canonical.len()
    }

    /// The canonical ID for any known ID.
    pub fn canonical_id(&self, id: Uuid) -> Option<Uuid> {
        self.by_id.get(&id).map(|&i| self.canonical[i].id)
    }

    /// The canonical ID for a permission name.
    pub fn id_for_name(&self, name: &str) -> Option<Uuid> {
        self.by_name.get(name).map(|&i| self.canonical[i].id)
    }

    /// Rewrite an ID list onto canonical IDs.
    pub fn remap_ids(&self, ids: &[Uuid]) -> RemappedIds {
        let mut out = RemappedIds::default();
        for &id in ids {
            match self.canonical_id(id) {
                Some(canonical) if !out.ids.contains(&canonical) => out.ids.push(canonical),
                Some(_) => {}
                None => {
                    tracing::warn!(id = %id, "Dangling permission ID");
                    out.dangling.push(id);
                }
            }
        }
        out
    }

    /// Resolve an ID list into a granted set.
    ///
    /// # Returns
    ///
    /// The granted names and the IDs that matched no record
    pub fn resolve_names(&self, ids: &[Uuid]) -> (GrantedSet, Vec<Uuid>) {
        let remapped = self.remap_ids(ids);
        let names = remapped
            .ids
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .map(|&i| self.canonical[i].name.clone())
            .collect();
        (names, remapped.dangling)
    }

    /// Canonical IDs for a granted set, in name order.
    ///
    /// Names with no stored record are skipped.
    pub fn ids_for(&self, set: &GrantedSet) -> Vec<Uuid> {
        set.iter().filter_map(|name| self.id_for_name(name)).collect()
    }
}
