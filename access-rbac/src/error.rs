//! Error types for catalogue loading
//!
//! The resolver itself never fails. These errors describe defects in the
//! resource catalogue that are caught when a schema is compiled or loaded.

use thiserror::Error;

/// Resource catalogue defects.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A node or variant has an empty key or label
    #[error("Empty {field} on resource {key:?}")]
    EmptyField {
        /// Which field was empty ("key" or "label")
        field: &'static str,
        /// Key of the offending node (may itself be empty)
        key: String,
    },

    /// Two siblings share a key
    #[error("Duplicate resource key {key:?} under {parent}")]
    DuplicateKey {
        /// Parent key, or "<root>" for top-level resources
        parent: String,
        /// The duplicated key
        key: String,
    },

    /// A node declares read variants and a bare Read action
    #[error("Resource {0:?} declares both read variants and a bare Read action")]
    VariantsWithBareRead(String),

    /// A leaf declares an action without the ones below it in the lattice
    #[error("Resource {0:?} declares an action without the actions it depends on")]
    IncompleteActionChain(String),

    /// A group node declares its own actions or variants
    #[error("Group resource {0:?} must not declare its own actions or read variants")]
    GroupWithActions(String),

    /// Two distinct entities produce the same canonical permission name
    #[error("Duplicate permission name {0:?}")]
    DuplicatePermissionName(String),

    /// Catalogue JSON could not be parsed
    #[error("Invalid catalogue JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for catalogue operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

impl SchemaError {
    /// Get a stable error code for reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::EmptyField { .. } => "EMPTY_FIELD",
            SchemaError::DuplicateKey { .. } => "DUPLICATE_KEY",
            SchemaError::VariantsWithBareRead(_) => "VARIANTS_WITH_BARE_READ",
            SchemaError::IncompleteActionChain(_) => "INCOMPLETE_ACTION_CHAIN",
            SchemaError::GroupWithActions(_) => "GROUP_WITH_ACTIONS",
            SchemaError::DuplicatePermissionName(_) => "DUPLICATE_PERMISSION_NAME",
            SchemaError::Json(_) => "INVALID_JSON",
        }
    }
}
