//! Per-element conversion from [`XmlNode`](crate::XmlNode) to model entities.

pub(crate) mod analysis;
pub(crate) mod code_list;
pub(crate) mod common;
pub(crate) mod item_def;
pub(crate) mod item_group;
pub(crate) mod method;
pub(crate) mod standard;
pub(crate) mod where_clause;

use define_model::{DefineConfig, OidKind, OidRegistry};

use crate::error::Result;

/// State threaded through every element parser.
pub(crate) struct ParseContext<'a> {
    pub config: &'a DefineConfig,
    registry: OidRegistry,
    /// First `xml:lang` seen on a translated text.
    pub lang: Option<String>,
}

impl<'a> ParseContext<'a> {
    pub fn new(config: &'a DefineConfig) -> Self {
        Self {
            config,
            registry: OidRegistry::new(),
            lang: None,
        }
    }

    /// Claim an OID read from the document.
    pub fn claim(&mut self, kind: OidKind, oid: &str) -> Result<String> {
        self.registry.reserve(kind, oid)?;
        Ok(oid.to_string())
    }

    /// Mint an OID for an entity the document does not name.
    pub fn mint(&mut self, kind: OidKind) -> String {
        self.registry.mint(kind)
    }

    pub fn note_lang(&mut self, lang: Option<&str>) {
        if self.lang.is_none()
            && let Some(lang) = lang
        {
            self.lang = Some(lang.to_string());
        }
    }
}
