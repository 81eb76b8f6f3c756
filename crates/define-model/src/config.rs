//! Configuration for parsing and editing.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// How unresolved pointers are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Unresolved pointers fail the operation with `DanglingReference`.
    #[default]
    Strict,
    /// Unresolved pointers are logged and the operation continues.
    Permissive,
}

impl ReferenceMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ReferenceMode::Strict)
    }
}

impl FromStr for ReferenceMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ReferenceMode::Strict),
            "permissive" => Ok(ReferenceMode::Permissive),
            _ => Err(ModelError::InvalidValue {
                field: "reference_mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Defaults applied when a copy request does not override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyDefaults {
    pub copy_vlm: bool,
    pub detach_methods: bool,
    pub detach_comments: bool,
}

impl Default for CopyDefaults {
    fn default() -> Self {
        Self {
            copy_vlm: true,
            detach_methods: false,
            detach_comments: false,
        }
    }
}

/// Settings shared by the parser and the edit operations.
///
/// ```toml
/// reference_mode = "permissive"
/// default_lang = "en"
///
/// [copy]
/// copy_vlm = true
/// detach_methods = false
/// detach_comments = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefineConfig {
    pub reference_mode: ReferenceMode,
    /// Language for new descriptions when the document declares none.
    pub default_lang: String,
    pub copy: CopyDefaults,
}

impl Default for DefineConfig {
    fn default() -> Self {
        Self {
            reference_mode: ReferenceMode::default(),
            default_lang: "en".to_string(),
            copy: CopyDefaults::default(),
        }
    }
}

impl DefineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    #[must_use]
    pub fn with_reference_mode(mut self, mode: ReferenceMode) -> Self {
        self.reference_mode = mode;
        self
    }

    #[must_use]
    pub fn with_default_lang(mut self, lang: impl Into<String>) -> Self {
        self.default_lang = lang.into();
        self
    }

    #[must_use]
    pub fn with_copy_defaults(mut self, copy: CopyDefaults) -> Self {
        self.copy = copy;
        self
    }
}
