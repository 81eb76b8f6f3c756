//! Error types for the Define-XML entity model.

use thiserror::Error;

use crate::oid::OidKind;

/// Errors raised by model construction and reference bookkeeping.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// An OID was assigned that already exists or is reserved.
    #[error("Duplicate {kind} OID: {oid}")]
    DuplicateOid { kind: OidKind, oid: String },

    /// A pointer field names an entity that does not exist.
    #[error("Dangling reference in {field}: {oid}")]
    DanglingReference { field: &'static str, oid: String },

    /// The referrer kind cannot point at the target kind.
    #[error("{referrer} cannot reference {target}")]
    UnsupportedReference { referrer: String, target: String },

    /// An attribute value is outside its allowed vocabulary.
    #[error("Invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    /// An item was added to a codelist of the wrong type.
    #[error("Codelist {oid} is {actual}, expected {expected}")]
    WrongCodeListType {
        oid: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Configuration could not be read.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl ModelError {
    /// Shorthand for a dangling pointer.
    pub fn dangling(field: &'static str, oid: impl Into<String>) -> Self {
        Self::DanglingReference {
            field,
            oid: oid.into(),
        }
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
