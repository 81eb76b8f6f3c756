//! Error types for structural edits.

use define_model::ModelError;
use thiserror::Error;

/// Errors raised by copy, merge, delete, and bulk update.
///
/// An edit that fails leaves the document unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EditError {
    /// A bulk replace pattern does not compile.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The field does not support the requested bulk action.
    #[error("Bulk {action} is not supported for {field}")]
    UnsupportedBulkUpdate {
        field: &'static str,
        action: &'static str,
    },

    /// The dataset or value list to edit does not exist.
    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type for edit operations.
pub type Result<T> = std::result::Result<T, EditError>;
