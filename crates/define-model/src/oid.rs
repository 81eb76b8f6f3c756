//! Object identifiers.
//!
//! Every entity is keyed by an OID of the form `<Prefix>.<uuid>`. The prefix is
//! fixed per entity kind so tooling can classify an OID without a lookup.
//! OIDs read from an existing document are kept verbatim; only new entities
//! receive minted ones.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::mdv::MetaDataVersion;

/// Entity kinds that carry an OID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OidKind {
    Odm,
    Study,
    MetaDataVersion,
    Standard,
    ItemGroup,
    ItemDef,
    ItemRef,
    ValueList,
    WhereClause,
    CodeList,
    CodeListItem,
    Method,
    Comment,
    Leaf,
    ResultDisplay,
    AnalysisResult,
}

impl OidKind {
    pub const ALL: [OidKind; 16] = [
        OidKind::Odm,
        OidKind::Study,
        OidKind::MetaDataVersion,
        OidKind::Standard,
        OidKind::ItemGroup,
        OidKind::ItemDef,
        OidKind::ItemRef,
        OidKind::ValueList,
        OidKind::WhereClause,
        OidKind::CodeList,
        OidKind::CodeListItem,
        OidKind::Method,
        OidKind::Comment,
        OidKind::Leaf,
        OidKind::ResultDisplay,
        OidKind::AnalysisResult,
    ];

    /// Prefix placed before the dot.
    pub fn prefix(&self) -> &'static str {
        match self {
            OidKind::Odm => "ODM",
            OidKind::Study => "STDY",
            OidKind::MetaDataVersion => "MDV",
            OidKind::Standard => "STD",
            OidKind::ItemGroup => "IG",
            OidKind::ItemDef => "IT",
            OidKind::ItemRef => "IR",
            OidKind::ValueList => "VL",
            OidKind::WhereClause => "WC",
            OidKind::CodeList => "CL",
            OidKind::CodeListItem => "CI",
            OidKind::Method => "MT",
            OidKind::Comment => "COM",
            OidKind::Leaf => "LF",
            OidKind::ResultDisplay => "RD",
            OidKind::AnalysisResult => "AR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OidKind::Odm => "ODM",
            OidKind::Study => "Study",
            OidKind::MetaDataVersion => "MetaDataVersion",
            OidKind::Standard => "Standard",
            OidKind::ItemGroup => "ItemGroup",
            OidKind::ItemDef => "ItemDef",
            OidKind::ItemRef => "ItemRef",
            OidKind::ValueList => "ValueList",
            OidKind::WhereClause => "WhereClause",
            OidKind::CodeList => "CodeList",
            OidKind::CodeListItem => "CodeListItem",
            OidKind::Method => "Method",
            OidKind::Comment => "Comment",
            OidKind::Leaf => "Leaf",
            OidKind::ResultDisplay => "ResultDisplay",
            OidKind::AnalysisResult => "AnalysisResult",
        }
    }

    /// Generate a fresh OID without checking for collisions.
    ///
    /// Use [`OidRegistry::mint`] when the OID has to be unique in a document.
    pub fn generate(&self) -> String {
        format!("{}.{}", self.prefix(), Uuid::new_v4().hyphenated())
    }

    /// Classify an OID by its prefix.
    pub fn classify(oid: &str) -> Option<OidKind> {
        let (prefix, rest) = oid.split_once('.')?;
        if rest.is_empty() {
            return None;
        }
        OidKind::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for OidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of OIDs already in use, per kind.
///
/// One registry is threaded through a whole batch of edits so that OIDs
/// minted for one dataset are never handed out again for the next one.
#[derive(Debug, Clone, Default)]
pub struct OidRegistry {
    taken: BTreeMap<OidKind, BTreeSet<String>>,
}

impl OidRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a registry with every OID present in a MetaDataVersion.
    pub fn from_mdv(mdv: &MetaDataVersion) -> Self {
        let mut registry = Self::new();
        registry.absorb(mdv);
        registry
    }

    /// Add every OID of a MetaDataVersion to the registry.
    pub fn absorb(&mut self, mdv: &MetaDataVersion) {
        self.insert(OidKind::MetaDataVersion, &mdv.oid);
        self.extend(OidKind::Standard, mdv.standards.keys());
        self.extend(OidKind::ItemGroup, mdv.item_groups.keys());
        self.extend(OidKind::ItemDef, mdv.item_defs.keys());
        self.extend(OidKind::ValueList, mdv.value_lists.keys());
        self.extend(OidKind::WhereClause, mdv.where_clauses.keys());
        self.extend(OidKind::CodeList, mdv.code_lists.keys());
        self.extend(OidKind::Method, mdv.methods.keys());
        self.extend(OidKind::Comment, mdv.comments.keys());
        self.extend(OidKind::Leaf, mdv.leafs.keys());
        for group in mdv.item_groups.values() {
            self.extend(OidKind::ItemRef, group.item_refs.keys());
        }
        for value_list in mdv.value_lists.values() {
            self.extend(OidKind::ItemRef, value_list.item_refs.keys());
        }
        for code_list in mdv.code_lists.values() {
            self.extend(OidKind::CodeListItem, code_list.item_order.iter());
        }
        let displays = &mdv.analysis_result_displays;
        self.extend(OidKind::ResultDisplay, displays.result_displays.keys());
        for display in displays.result_displays.values() {
            self.extend(OidKind::AnalysisResult, display.analysis_results.keys());
        }
    }

    pub fn contains(&self, kind: OidKind, oid: &str) -> bool {
        self.taken
            .get(&kind)
            .is_some_and(|oids| oids.contains(oid))
    }

    /// Claim a specific OID, failing if it is already taken.
    pub fn reserve(&mut self, kind: OidKind, oid: impl Into<String>) -> Result<()> {
        let oid = oid.into();
        if self.contains(kind, &oid) {
            return Err(ModelError::DuplicateOid { kind, oid });
        }
        self.insert(kind, &oid);
        Ok(())
    }

    /// Mint a new OID that is not yet taken and claim it.
    pub fn mint(&mut self, kind: OidKind) -> String {
        loop {
            let candidate = kind.generate();
            if !self.contains(kind, &candidate) {
                self.insert(kind, &candidate);
                return candidate;
            }
        }
    }

    /// Number of OIDs claimed across all kinds.
    pub fn len(&self) -> usize {
        self.taken.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, kind: OidKind, oid: &str) {
        self.taken.entry(kind).or_default().insert(oid.to_string());
    }

    fn extend<'a>(&mut self, kind: OidKind, oids: impl Iterator<Item = &'a String>) {
        let set = self.taken.entry(kind).or_default();
        set.extend(oids.cloned());
    }
}
