//! Variable definitions and their provenance.

use serde::{Deserialize, Serialize};

use crate::text::{Alias, Document, TranslatedText, impl_describable, impl_documentable};

/// Origin type assigned by predecessor copies.
pub const PREDECESSOR_ORIGIN: &str = "Predecessor";

/// Provenance of a variable's data (`def:Origin`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Origin {
    pub origin_type: Option<String>,
    pub source: Option<String>,
    pub descriptions: Vec<TranslatedText>,
    pub documents: Vec<Document>,
}

impl Origin {
    pub fn new(origin_type: impl Into<String>) -> Self {
        Self {
            origin_type: Some(origin_type.into()),
            ..Self::default()
        }
    }

    /// Predecessor origin pointing at `<dataset>.<variable>`.
    pub fn predecessor(dataset: &str, variable: &str, lang: Option<&str>) -> Self {
        Self {
            origin_type: Some(PREDECESSOR_ORIGIN.to_string()),
            source: None,
            descriptions: vec![TranslatedText::new(lang, format!("{dataset}.{variable}"))],
            documents: Vec::new(),
        }
    }
}

/// Back-references of a variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefSources {
    pub item_groups: Vec<String>,
    pub value_lists: Vec<String>,
}

impl ItemDefSources {
    pub fn is_empty(&self) -> bool {
        self.item_groups.is_empty() && self.value_lists.is_empty()
    }
}

/// A variable definition (`ItemDef`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDef {
    pub oid: String,
    pub name: String,
    pub data_type: Option<String>,
    pub length: Option<u32>,
    pub fraction_digits: Option<u32>,
    pub field_name: Option<String>,
    pub display_format: Option<String>,
    pub comment_oid: Option<String>,
    pub code_list_oid: Option<String>,
    pub value_list_oid: Option<String>,
    /// Set on value-level items: the variable whose value list owns this item.
    pub parent_item_def_oid: Option<String>,
    pub descriptions: Vec<TranslatedText>,
    pub origins: Vec<Origin>,
    pub alias: Option<Alias>,
    pub sources: ItemDefSources,
}

impl ItemDef {
    /// New variable; `fieldName` starts equal to the name.
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            oid: oid.into(),
            field_name: Some(name.clone()),
            name,
            data_type: None,
            length: None,
            fraction_digits: None,
            display_format: None,
            comment_oid: None,
            code_list_oid: None,
            value_list_oid: None,
            parent_item_def_oid: None,
            descriptions: Vec::new(),
            origins: Vec::new(),
            alias: None,
            sources: ItemDefSources::default(),
        }
    }

    pub fn add_origin(&mut self, origin: Origin) {
        self.origins.push(origin);
    }

    /// Whether this item belongs to a value list.
    pub fn is_value_level(&self) -> bool {
        self.parent_item_def_oid.is_some()
    }

    /// Rename the variable, carrying `fieldName` along when it mirrored the old name.
    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.field_name.as_deref() == Some(self.name.as_str()) {
            self.field_name = Some(name.clone());
        }
        self.name = name;
    }
}

impl_describable!(Origin, ItemDef);
impl_documentable!(Origin);
