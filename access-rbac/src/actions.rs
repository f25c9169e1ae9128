//! # Actions
//!
//! Defines the actions a permission-matrix column can grant.
//! Actions form a small privilege lattice: `Read < Edit < Delete`.

use serde::{Deserialize, Serialize};

/// Actions that can be granted on a resource.
///
/// Actions are totally ordered by privilege:
/// - **Read**: View resource data
/// - **Edit**: Modify resource data (requires Read)
/// - **Delete**: Remove resource data (requires Edit and Read)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read/view resource.
    Read,

    /// Edit existing resource.
    Edit,

    /// Delete resource.
    ///
    /// The most privileged action; granting it implies every other action.
    Delete,
}

impl Action {
    /// Get the string representation of the action.
    ///
    /// # Returns
    ///
    /// A static lowercase string, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }

    /// Get the display form used inside canonical permission names.
    ///
    /// # Example
    ///
    /// ```
    /// use access_rbac::actions::Action;
    ///
    /// assert_eq!(Action::Edit.display_name(), "Edit");
    /// ```
    pub fn display_name(&self) -> &'static str {
        match self {
            Action::Read => "Read",
            Action::Edit => "Edit",
            Action::Delete => "Delete",
        }
    }

    /// Get all actions, least privileged first.
    pub fn all() -> [Self; 3] {
        [Action::Read, Action::Edit, Action::Delete]
    }

    /// Actions that must be granted alongside this one.
    ///
    /// Returns every action at or below `self`, least privileged first.
    pub fn close_upward(self) -> impl Iterator<Item = Action> {
        Self::all().into_iter().filter(move |a| *a <= self)
    }

    /// Actions that must be revoked alongside this one.
    ///
    /// Returns every action at or above `self`, least privileged first.
    pub fn close_downward(self) -> impl Iterator<Item = Action> {
        Self::all().into_iter().filter(move |a| *a >= self)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
