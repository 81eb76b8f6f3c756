//! Controlled vocabularies.
//!
//! A codelist stores either decoded items, enumerated items, or a reference to
//! an external dictionary. [`CodeListType`] decides which storage is populated:
//!
//! | type | `code_list_items` | `enumerated_items` |
//! |---|---|---|
//! | decoded | `Some` | `None` |
//! | enumerated | `None` | `Some` |
//! | external | `None` | `None` |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{CodeListType, YesNo};
use crate::error::{ModelError, Result};
use crate::oid::{OidKind, OidRegistry};
use crate::text::{Alias, TranslatedText, impl_describable};

/// A coded value with decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListItem {
    pub coded_value: String,
    pub rank: Option<String>,
    pub extended_value: Option<YesNo>,
    pub decodes: Vec<TranslatedText>,
    pub alias: Option<Alias>,
}

impl CodeListItem {
    pub fn new(coded_value: impl Into<String>) -> Self {
        Self {
            coded_value: coded_value.into(),
            ..Self::default()
        }
    }

    /// Decode for a language, falling back to the first one.
    pub fn decode(&self, lang: Option<&str>) -> Option<&str> {
        self.decodes
            .iter()
            .find(|text| text.lang.as_deref() == lang)
            .or_else(|| self.decodes.first())
            .map(|text| text.value.as_str())
    }
}

/// A coded value without decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumeratedItem {
    pub coded_value: String,
    pub rank: Option<String>,
    pub extended_value: Option<YesNo>,
    pub alias: Option<Alias>,
}

impl EnumeratedItem {
    pub fn new(coded_value: impl Into<String>) -> Self {
        Self {
            coded_value: coded_value.into(),
            ..Self::default()
        }
    }
}

/// Reference to an external dictionary such as MedDRA.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCodeList {
    pub dictionary: Option<String>,
    pub version: Option<String>,
    pub reference: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeListSources {
    pub item_defs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeList {
    pub oid: String,
    pub name: String,
    pub data_type: Option<String>,
    pub sas_format_name: Option<String>,
    pub code_list_type: CodeListType,
    pub external_code_list: Option<ExternalCodeList>,
    pub code_list_items: Option<BTreeMap<String, CodeListItem>>,
    pub enumerated_items: Option<BTreeMap<String, EnumeratedItem>>,
    pub item_order: Vec<String>,
    pub alias: Option<Alias>,
    pub standard_oid: Option<String>,
    pub comment_oid: Option<String>,
    pub is_non_standard: Option<YesNo>,
    pub descriptions: Vec<TranslatedText>,
    pub sources: CodeListSources,
}

impl CodeList {
    pub fn new(
        oid: impl Into<String>,
        name: impl Into<String>,
        code_list_type: CodeListType,
    ) -> Self {
        let (code_list_items, enumerated_items, external_code_list) = match code_list_type {
            CodeListType::Decoded => (Some(BTreeMap::new()), None, None),
            CodeListType::Enumerated => (None, Some(BTreeMap::new()), None),
            CodeListType::External => (None, None, Some(ExternalCodeList::default())),
        };
        Self {
            oid: oid.into(),
            name: name.into(),
            data_type: None,
            sas_format_name: None,
            code_list_type,
            external_code_list,
            code_list_items,
            enumerated_items,
            item_order: Vec::new(),
            alias: None,
            standard_oid: None,
            comment_oid: None,
            is_non_standard: None,
            descriptions: Vec::new(),
            sources: CodeListSources::default(),
        }
    }

    /// Append a decoded item, returning its minted OID.
    pub fn add_code_list_item(
        &mut self,
        item: CodeListItem,
        registry: &mut OidRegistry,
    ) -> Result<String> {
        let actual = self.code_list_type.as_str();
        let Some(items) = self.code_list_items.as_mut() else {
            return Err(ModelError::WrongCodeListType {
                oid: self.oid.clone(),
                expected: CodeListType::Decoded.as_str(),
                actual,
            });
        };
        let oid = registry.mint(OidKind::CodeListItem);
        items.insert(oid.clone(), item);
        self.item_order.push(oid.clone());
        Ok(oid)
    }

    /// Append an enumerated item, returning its minted OID.
    pub fn add_enumerated_item(
        &mut self,
        item: EnumeratedItem,
        registry: &mut OidRegistry,
    ) -> Result<String> {
        let actual = self.code_list_type.as_str();
        let Some(items) = self.enumerated_items.as_mut() else {
            return Err(ModelError::WrongCodeListType {
                oid: self.oid.clone(),
                expected: CodeListType::Enumerated.as_str(),
                actual,
            });
        };
        let oid = registry.mint(OidKind::CodeListItem);
        items.insert(oid.clone(), item);
        self.item_order.push(oid.clone());
        Ok(oid)
    }

    /// Coded values in item order.
    pub fn coded_values(&self) -> Vec<&str> {
        self.item_order
            .iter()
            .filter_map(|oid| {
                if let Some(items) = &self.code_list_items {
                    items.get(oid).map(|item| item.coded_value.as_str())
                } else if let Some(items) = &self.enumerated_items {
                    items.get(oid).map(|item| item.coded_value.as_str())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Give every item a fresh OID, keeping the order.
    pub fn remint_items(&mut self, registry: &mut OidRegistry) {
        let mut renamed = Vec::with_capacity(self.item_order.len());
        for old in &self.item_order {
            let new = registry.mint(OidKind::CodeListItem);
            if let Some(items) = self.code_list_items.as_mut()
                && let Some(item) = items.remove(old)
            {
                items.insert(new.clone(), item);
            }
            if let Some(items) = self.enumerated_items.as_mut()
                && let Some(item) = items.remove(old)
            {
                items.insert(new.clone(), item);
            }
            renamed.push(new);
        }
        self.item_order = renamed;
    }
}

impl_describable!(CodeList);
