//! Error types for Define-XML parsing.

use define_model::ModelError;
use quick_xml::encoding::EncodingError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors that abort a parse. There is no partial recovery.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attr(#[from] AttrError),

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// An entity reference other than the five predefined ones.
    #[error("Unknown entity reference: &{0};")]
    UnknownEntity(String),

    /// Required nested structure is absent or contradictory.
    #[error("Malformed {element}: {reason}")]
    MalformedDocument { element: String, reason: String },

    #[error("{element} is missing required attribute {attribute}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// Two attribute names collapse to the same key after normalization.
    #[error("{element} has duplicate attribute '{key}' after name normalization")]
    DuplicateKey { element: String, key: String },

    #[error("Expected root element {expected}, found {found}")]
    UnexpectedRoot {
        expected: &'static str,
        found: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ParseError {
    pub(crate) fn missing_child(element: &str, child: &str) -> Self {
        Self::MalformedDocument {
            element: element.to_string(),
            reason: format!("missing required {child} element"),
        }
    }

    pub(crate) fn malformed(element: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            element: element.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
