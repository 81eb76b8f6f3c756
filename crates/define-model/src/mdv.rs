//! The MetaDataVersion aggregate.
//!
//! Every entity lives in exactly one map owned by [`MetaDataVersion`], keyed
//! by OID. Entities refer to each other only through OID strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResultDisplays;
use crate::code_list::CodeList;
use crate::comment::{Comment, Method};
use crate::enums::YesNo;
use crate::item_def::ItemDef;
use crate::item_group::{Container, ItemGroup, ItemRefContainer, ValueList};
use crate::leaf::Leaf;
use crate::text::{Document, TranslatedText, impl_describable};
use crate::where_clause::WhereClause;

/// A referenced CDISC standard or controlled terminology package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standard {
    pub oid: String,
    pub name: String,
    /// `IG` or `CT`.
    pub standard_type: Option<String>,
    pub publishing_set: Option<String>,
    pub version: Option<String>,
    pub status: Option<String>,
    pub comment_oid: Option<String>,
    pub is_default: Option<YesNo>,
}

impl Standard {
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            standard_type: None,
            publishing_set: None,
            version: None,
            status: None,
            comment_oid: None,
            is_default: None,
        }
    }

    pub fn is_default(&self) -> bool {
        self.is_default.is_some_and(|flag| flag.is_yes())
    }

    /// CDISC model implied by the standard name.
    ///
    /// `SDTMIG` gives `SDTM`, `ADaMIG` gives `ADaM`, `SDTMIG-MD` gives `SDTM`.
    pub fn model_name(&self) -> Option<String> {
        let name = self.name.trim();
        let name = name.strip_prefix("CDISC ").unwrap_or(name);
        let base = name.split(['-', ' ']).next().unwrap_or(name);
        let base = base.strip_suffix("IG").unwrap_or(base);
        if base.is_empty() {
            None
        } else {
            Some(base.to_string())
        }
    }
}

/// Explicit ordering of the top-level maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MdvOrder {
    pub item_group_order: Vec<String>,
    pub code_list_order: Vec<String>,
    pub leaf_order: Vec<String>,
    pub standard_order: Vec<String>,
}

/// One study's metadata snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaDataVersion {
    pub oid: String,
    pub name: String,
    pub define_version: Option<String>,
    /// Derived from the default standard.
    pub model: Option<String>,
    pub lang: Option<String>,
    pub comment_oid: Option<String>,
    pub descriptions: Vec<TranslatedText>,
    pub standards: BTreeMap<String, Standard>,
    pub annotated_crf: Vec<Document>,
    pub supplemental_doc: Vec<Document>,
    pub item_groups: BTreeMap<String, ItemGroup>,
    pub item_defs: BTreeMap<String, ItemDef>,
    pub code_lists: BTreeMap<String, CodeList>,
    pub value_lists: BTreeMap<String, ValueList>,
    pub where_clauses: BTreeMap<String, WhereClause>,
    pub methods: BTreeMap<String, Method>,
    pub comments: BTreeMap<String, Comment>,
    pub leafs: BTreeMap<String, Leaf>,
    pub analysis_result_displays: AnalysisResultDisplays,
    pub order: MdvOrder,
}

impl MetaDataVersion {
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            define_version: None,
            model: None,
            lang: None,
            comment_oid: None,
            descriptions: Vec::new(),
            standards: BTreeMap::new(),
            annotated_crf: Vec::new(),
            supplemental_doc: Vec::new(),
            item_groups: BTreeMap::new(),
            item_defs: BTreeMap::new(),
            code_lists: BTreeMap::new(),
            value_lists: BTreeMap::new(),
            where_clauses: BTreeMap::new(),
            methods: BTreeMap::new(),
            comments: BTreeMap::new(),
            leafs: BTreeMap::new(),
            analysis_result_displays: AnalysisResultDisplays::default(),
            order: MdvOrder::default(),
        }
    }

    /// The standard flagged `isDefault="Yes"`, if any.
    pub fn default_standard(&self) -> Option<&Standard> {
        self.order
            .standard_order
            .iter()
            .filter_map(|oid| self.standards.get(oid))
            .find(|standard| standard.is_default())
            .or_else(|| self.standards.values().find(|standard| standard.is_default()))
    }

    /// Set `model` from the default standard. Leaves it `None` when there is none.
    pub fn derive_model(&mut self) -> Option<&str> {
        self.model = self.default_standard().and_then(Standard::model_name);
        self.model.as_deref()
    }

    pub fn item_groups_in_order(&self) -> impl Iterator<Item = &ItemGroup> {
        self.order
            .item_group_order
            .iter()
            .filter_map(|oid| self.item_groups.get(oid))
    }

    pub fn code_lists_in_order(&self) -> impl Iterator<Item = &CodeList> {
        self.order
            .code_list_order
            .iter()
            .filter_map(|oid| self.code_lists.get(oid))
    }

    pub fn container(&self, container: &Container) -> Option<&dyn ItemRefContainer> {
        match container {
            Container::ItemGroup(oid) => self
                .item_groups
                .get(oid)
                .map(|group| group as &dyn ItemRefContainer),
            Container::ValueList(oid) => self
                .value_lists
                .get(oid)
                .map(|list| list as &dyn ItemRefContainer),
        }
    }

    pub fn container_mut(&mut self, container: &Container) -> Option<&mut dyn ItemRefContainer> {
        match container {
            Container::ItemGroup(oid) => self
                .item_groups
                .get_mut(oid)
                .map(|group| group as &mut dyn ItemRefContainer),
            Container::ValueList(oid) => self
                .value_lists
                .get_mut(oid)
                .map(|list| list as &mut dyn ItemRefContainer),
        }
    }

    /// Name of the dataset a container belongs to.
    ///
    /// For a value list this is the first dataset of its parent variable.
    pub fn dataset_name(&self, container: &Container) -> Option<&str> {
        match container {
            Container::ItemGroup(oid) => self.item_groups.get(oid).map(|group| group.name.as_str()),
            Container::ValueList(oid) => {
                let list = self.value_lists.get(oid)?;
                let parent = list
                    .sources
                    .item_defs
                    .iter()
                    .find_map(|item_oid| self.item_defs.get(item_oid))?;
                let group_oid = parent.sources.item_groups.first()?;
                self.item_groups.get(group_oid).map(|group| group.name.as_str())
            }
        }
    }
}

impl_describable!(MetaDataVersion);
