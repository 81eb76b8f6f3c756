//! Datasets, value lists, and the item references binding variables into them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::YesNo;
use crate::leaf::Leaf;
use crate::text::{Alias, TranslatedText, impl_describable};

/// Binds an [`ItemDef`](crate::ItemDef) into a dataset or value list.
///
/// Item refs are keyed by their own OID inside the owning container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub item_oid: String,
    pub mandatory: YesNo,
    pub method_oid: Option<String>,
    pub role: Option<String>,
    pub role_code_list_oid: Option<String>,
    pub where_clause_oid: Option<String>,
    pub is_non_standard: Option<YesNo>,
    pub has_no_data: Option<YesNo>,
}

impl ItemRef {
    pub fn new(item_oid: impl Into<String>) -> Self {
        Self {
            item_oid: item_oid.into(),
            mandatory: YesNo::No,
            method_oid: None,
            role: None,
            role_code_list_oid: None,
            where_clause_oid: None,
            is_non_standard: None,
            has_no_data: None,
        }
    }
}

/// Identifies an entity that owns item refs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Container {
    ItemGroup(String),
    ValueList(String),
}

impl Container {
    pub fn oid(&self) -> &str {
        match self {
            Container::ItemGroup(oid) | Container::ValueList(oid) => oid,
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::ItemGroup(oid) => write!(f, "ItemGroup {oid}"),
            Container::ValueList(oid) => write!(f, "ValueList {oid}"),
        }
    }
}

/// Shared shape of entities that own item refs.
pub trait ItemRefContainer {
    fn item_refs(&self) -> &BTreeMap<String, ItemRef>;

    fn item_refs_mut(&mut self) -> &mut BTreeMap<String, ItemRef>;

    fn item_ref_order(&self) -> &[String];

    fn item_ref_order_mut(&mut self) -> &mut Vec<String>;

    fn key_order(&self) -> &[String];

    fn key_order_mut(&mut self) -> &mut Vec<String>;

    /// Item refs in display order.
    fn ordered_item_refs(&self) -> Vec<(&str, &ItemRef)> {
        self.item_ref_order()
            .iter()
            .filter_map(|oid| {
                self.item_refs()
                    .get(oid)
                    .map(|item_ref| (oid.as_str(), item_ref))
            })
            .collect()
    }

    /// Insert an item ref after `position` entries, or at the end.
    fn insert_item_ref(&mut self, oid: String, item_ref: ItemRef, position: Option<usize>) {
        let order = self.item_ref_order_mut();
        let index = position.map_or(order.len(), |p| p.min(order.len()));
        order.insert(index, oid.clone());
        self.item_refs_mut().insert(oid, item_ref);
    }

    /// Remove an item ref from the map and both order lists.
    fn remove_item_ref(&mut self, oid: &str) -> Option<ItemRef> {
        self.item_ref_order_mut().retain(|existing| existing != oid);
        self.key_order_mut().retain(|existing| existing != oid);
        self.item_refs_mut().remove(oid)
    }

    /// Item ref that binds the given ItemDef.
    fn find_item_ref(&self, item_oid: &str) -> Option<&str> {
        self.item_ref_order()
            .iter()
            .find(|oid| {
                self.item_refs()
                    .get(oid.as_str())
                    .is_some_and(|item_ref| item_ref.item_oid == item_oid)
            })
            .map(String::as_str)
    }
}

macro_rules! impl_container {
    ($ty:ty) => {
        impl ItemRefContainer for $ty {
            fn item_refs(&self) -> &BTreeMap<String, ItemRef> {
                &self.item_refs
            }

            fn item_refs_mut(&mut self) -> &mut BTreeMap<String, ItemRef> {
                &mut self.item_refs
            }

            fn item_ref_order(&self) -> &[String] {
                &self.item_ref_order
            }

            fn item_ref_order_mut(&mut self) -> &mut Vec<String> {
                &mut self.item_ref_order
            }

            fn key_order(&self) -> &[String] {
                &self.key_order
            }

            fn key_order_mut(&mut self) -> &mut Vec<String> {
                &mut self.key_order
            }
        }
    };
}

/// Observation class of a dataset (Define-XML 2.1 `def:Class`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetClass {
    pub name: String,
    pub sub_classes: Vec<String>,
}

/// A dataset (`ItemGroupDef`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemGroup {
    pub oid: String,
    pub name: String,
    pub domain: Option<String>,
    pub dataset_name: Option<String>,
    pub repeating: YesNo,
    pub is_reference_data: Option<YesNo>,
    pub purpose: Option<String>,
    pub structure: Option<String>,
    pub dataset_class: Option<DatasetClass>,
    pub archive_location_id: Option<String>,
    pub comment_oid: Option<String>,
    pub is_non_standard: Option<YesNo>,
    pub standard_oid: Option<String>,
    pub has_no_data: Option<YesNo>,
    pub descriptions: Vec<TranslatedText>,
    pub alias: Option<Alias>,
    pub leaf: Option<Leaf>,
    pub item_refs: BTreeMap<String, ItemRef>,
    pub item_ref_order: Vec<String>,
    pub key_order: Vec<String>,
}

impl ItemGroup {
    /// New dataset; `repeating` defaults to `Yes`.
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            domain: None,
            dataset_name: None,
            repeating: YesNo::Yes,
            is_reference_data: None,
            purpose: None,
            structure: None,
            dataset_class: None,
            archive_location_id: None,
            comment_oid: None,
            is_non_standard: None,
            standard_oid: None,
            has_no_data: None,
            descriptions: Vec::new(),
            alias: None,
            leaf: None,
            item_refs: BTreeMap::new(),
            item_ref_order: Vec::new(),
            key_order: Vec::new(),
        }
    }
}

/// Back-references of a value list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueListSources {
    pub item_defs: Vec<String>,
}

/// Value-level metadata for one parent variable (`def:ValueListDef`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueList {
    pub oid: String,
    pub descriptions: Vec<TranslatedText>,
    pub item_refs: BTreeMap<String, ItemRef>,
    pub item_ref_order: Vec<String>,
    pub key_order: Vec<String>,
    pub sources: ValueListSources,
}

impl ValueList {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            descriptions: Vec::new(),
            item_refs: BTreeMap::new(),
            item_ref_order: Vec::new(),
            key_order: Vec::new(),
            sources: ValueListSources::default(),
        }
    }
}

impl_container!(ItemGroup);
impl_container!(ValueList);
impl_describable!(ItemGroup, ValueList);
