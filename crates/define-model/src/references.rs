//! Cross-reference maintenance.
//!
//! Shared entities keep `sources` lists naming every entity that points at
//! them. Forward pointers are plain OID fields; [`attach_reference`] and
//! [`detach_reference`] keep the back-references in step with them, and the
//! `set_*` helpers change a pointer and its back-reference together.
//!
//! Supported edges:
//!
//! | referrer | target | recorded in |
//! |---|---|---|
//! | ItemGroup, ValueList | ItemDef | `ItemDef.sources.{item_groups, value_lists}` |
//! | ItemRef | Method | `Method.sources.{item_groups, value_lists}[container]` |
//! | ItemDef | CodeList | `CodeList.sources.item_defs` |
//! | ItemDef | ValueList | `ValueList.sources.item_defs` |
//! | ValueList, AnalysisResult | WhereClause | `WhereClause.sources.*` |
//! | any commentable entity | Comment | `Comment.sources.*` |
//!
//! Detaching never deletes the target. A target left without sources is
//! reported as [`DetachOutcome::Orphaned`] and pruned only by explicit
//! delete operations.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::code_list::CodeList;
use crate::error::{ModelError, Result};
use crate::item_def::ItemDef;
use crate::item_group::{Container, ItemGroup, ItemRef, ValueList};
use crate::mdv::MetaDataVersion;
use crate::oid::OidKind;
use crate::text::Documentable;
use crate::where_clause::WhereClause;

/// The entity holding a forward pointer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Referrer {
    ItemGroup(String),
    ValueList(String),
    ItemDef(String),
    CodeList(String),
    WhereClause(String),
    MetaDataVersion(String),
    Standard(String),
    AnalysisResult(String),
    ItemRef {
        container: Container,
        item_ref_oid: String,
    },
}

impl Referrer {
    pub fn item_ref(container: Container, item_ref_oid: impl Into<String>) -> Self {
        Referrer::ItemRef {
            container,
            item_ref_oid: item_ref_oid.into(),
        }
    }

    /// OID recorded in the target's sources.
    pub fn oid(&self) -> &str {
        match self {
            Referrer::ItemGroup(oid)
            | Referrer::ValueList(oid)
            | Referrer::ItemDef(oid)
            | Referrer::CodeList(oid)
            | Referrer::WhereClause(oid)
            | Referrer::MetaDataVersion(oid)
            | Referrer::Standard(oid)
            | Referrer::AnalysisResult(oid) => oid,
            Referrer::ItemRef { item_ref_oid, .. } => item_ref_oid,
        }
    }

    pub fn kind(&self) -> OidKind {
        match self {
            Referrer::ItemGroup(_) => OidKind::ItemGroup,
            Referrer::ValueList(_) => OidKind::ValueList,
            Referrer::ItemDef(_) => OidKind::ItemDef,
            Referrer::CodeList(_) => OidKind::CodeList,
            Referrer::WhereClause(_) => OidKind::WhereClause,
            Referrer::MetaDataVersion(_) => OidKind::MetaDataVersion,
            Referrer::Standard(_) => OidKind::Standard,
            Referrer::AnalysisResult(_) => OidKind::AnalysisResult,
            Referrer::ItemRef { .. } => OidKind::ItemRef,
        }
    }
}

impl From<&Container> for Referrer {
    fn from(container: &Container) -> Self {
        match container {
            Container::ItemGroup(oid) => Referrer::ItemGroup(oid.clone()),
            Container::ValueList(oid) => Referrer::ValueList(oid.clone()),
        }
    }
}

impl fmt::Display for Referrer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referrer::ItemRef {
                container,
                item_ref_oid,
            } => write!(f, "ItemRef {item_ref_oid} in {container}"),
            other => write!(f, "{} {}", other.kind(), other.oid()),
        }
    }
}

/// The shared entity a pointer names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Target {
    ItemDef(String),
    ValueList(String),
    WhereClause(String),
    CodeList(String),
    Method(String),
    Comment(String),
}

impl Target {
    pub fn oid(&self) -> &str {
        match self {
            Target::ItemDef(oid)
            | Target::ValueList(oid)
            | Target::WhereClause(oid)
            | Target::CodeList(oid)
            | Target::Method(oid)
            | Target::Comment(oid) => oid,
        }
    }

    pub fn kind(&self) -> OidKind {
        match self {
            Target::ItemDef(_) => OidKind::ItemDef,
            Target::ValueList(_) => OidKind::ValueList,
            Target::WhereClause(_) => OidKind::WhereClause,
            Target::CodeList(_) => OidKind::CodeList,
            Target::Method(_) => OidKind::Method,
            Target::Comment(_) => OidKind::Comment,
        }
    }

    /// Name of the pointer field that holds this target.
    pub fn field(&self) -> &'static str {
        match self {
            Target::ItemDef(_) => "itemOid",
            Target::ValueList(_) => "valueListOid",
            Target::WhereClause(_) => "whereClauseOid",
            Target::CodeList(_) => "codeListOid",
            Target::Method(_) => "methodOid",
            Target::Comment(_) => "commentOid",
        }
    }

    pub fn exists(&self, mdv: &MetaDataVersion) -> bool {
        match self {
            Target::ItemDef(oid) => mdv.item_defs.contains_key(oid),
            Target::ValueList(oid) => mdv.value_lists.contains_key(oid),
            Target::WhereClause(oid) => mdv.where_clauses.contains_key(oid),
            Target::CodeList(oid) => mdv.code_lists.contains_key(oid),
            Target::Method(oid) => mdv.methods.contains_key(oid),
            Target::Comment(oid) => mdv.comments.contains_key(oid),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.oid())
    }
}

/// One forward pointer.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Reference {
    pub referrer: Referrer,
    pub target: Target,
}

impl Reference {
    pub fn new(referrer: Referrer, target: Target) -> Self {
        Self { referrer, target }
    }
}

/// State of a target after a reference to it was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachOutcome {
    /// No sources remain.
    Orphaned,
    StillReferenced,
    /// The target did not exist; nothing was changed.
    TargetMissing,
}

/// Whether the model records back-references for this pair.
pub fn is_supported(referrer: &Referrer, target: &Target) -> bool {
    matches!(
        (referrer, target),
        (
            Referrer::ItemGroup(_) | Referrer::ValueList(_),
            Target::ItemDef(_)
        ) | (Referrer::ItemRef { .. }, Target::Method(_))
            | (
                Referrer::ItemDef(_),
                Target::CodeList(_) | Target::ValueList(_)
            )
            | (
                Referrer::ValueList(_) | Referrer::AnalysisResult(_),
                Target::WhereClause(_)
            )
            | (
                Referrer::ItemGroup(_)
                    | Referrer::ItemDef(_)
                    | Referrer::CodeList(_)
                    | Referrer::WhereClause(_)
                    | Referrer::MetaDataVersion(_)
                    | Referrer::Standard(_)
                    | Referrer::AnalysisResult(_),
                Target::Comment(_)
            )
    )
}

fn unsupported(referrer: &Referrer, target: &Target) -> ModelError {
    ModelError::UnsupportedReference {
        referrer: referrer.to_string(),
        target: target.to_string(),
    }
}

fn lookup<'a, T>(map: &'a mut BTreeMap<String, T>, target: &Target) -> Result<&'a mut T> {
    map.get_mut(target.oid())
        .ok_or_else(|| ModelError::dangling(target.field(), target.oid()))
}

fn push_unique(list: &mut Vec<String>, oid: &str) {
    if !list.iter().any(|existing| existing == oid) {
        list.push(oid.to_string());
    }
}

fn source_list<'a>(
    mdv: &'a mut MetaDataVersion,
    referrer: &Referrer,
    target: &Target,
) -> Result<&'a mut Vec<String>> {
    let list = match (referrer, target) {
        (Referrer::ItemGroup(_), Target::ItemDef(_)) => {
            &mut lookup(&mut mdv.item_defs, target)?.sources.item_groups
        }
        (Referrer::ValueList(_), Target::ItemDef(_)) => {
            &mut lookup(&mut mdv.item_defs, target)?.sources.value_lists
        }
        (Referrer::ItemDef(_), Target::CodeList(_)) => {
            &mut lookup(&mut mdv.code_lists, target)?.sources.item_defs
        }
        (Referrer::ItemDef(_), Target::ValueList(_)) => {
            &mut lookup(&mut mdv.value_lists, target)?.sources.item_defs
        }
        (Referrer::ValueList(_), Target::WhereClause(_)) => {
            &mut lookup(&mut mdv.where_clauses, target)?.sources.value_lists
        }
        (Referrer::AnalysisResult(_), Target::WhereClause(_)) => {
            &mut lookup(&mut mdv.where_clauses, target)?.sources.analysis_results
        }
        (Referrer::ItemRef { container, .. }, Target::Method(_)) => {
            let sources = &mut lookup(&mut mdv.methods, target)?.sources;
            let by_container = match container {
                Container::ItemGroup(_) => &mut sources.item_groups,
                Container::ValueList(_) => &mut sources.value_lists,
            };
            by_container.entry(container.oid().to_string()).or_default()
        }
        (_, Target::Comment(_)) => {
            let sources = &mut lookup(&mut mdv.comments, target)?.sources;
            match referrer {
                Referrer::ItemGroup(_) => &mut sources.item_groups,
                Referrer::ItemDef(_) => &mut sources.item_defs,
                Referrer::CodeList(_) => &mut sources.code_lists,
                Referrer::WhereClause(_) => &mut sources.where_clauses,
                Referrer::MetaDataVersion(_) => &mut sources.meta_data_versions,
                Referrer::Standard(_) => &mut sources.standards,
                Referrer::AnalysisResult(_) => &mut sources.analysis_results,
                Referrer::ValueList(_) | Referrer::ItemRef { .. } => {
                    return Err(unsupported(referrer, target));
                }
            }
        }
        _ => return Err(unsupported(referrer, target)),
    };
    Ok(list)
}

fn has_sources(mdv: &MetaDataVersion, target: &Target) -> bool {
    match target {
        Target::ItemDef(oid) => mdv
            .item_defs
            .get(oid)
            .is_some_and(|item_def| !item_def.sources.is_empty()),
        Target::ValueList(oid) => mdv
            .value_lists
            .get(oid)
            .is_some_and(|list| !list.sources.item_defs.is_empty()),
        Target::WhereClause(oid) => mdv
            .where_clauses
            .get(oid)
            .is_some_and(|clause| !clause.sources.is_empty()),
        Target::CodeList(oid) => mdv
            .code_lists
            .get(oid)
            .is_some_and(|code_list| !code_list.sources.item_defs.is_empty()),
        Target::Method(oid) => mdv
            .methods
            .get(oid)
            .is_some_and(|method| !method.sources.is_empty()),
        Target::Comment(oid) => mdv
            .comments
            .get(oid)
            .is_some_and(|comment| !comment.sources.is_empty()),
    }
}

/// Record `referrer` in the sources of `target`.
///
/// Idempotent. Fails with `DanglingReference` when the target does not exist
/// and with `UnsupportedReference` for pairs the model does not track.
pub fn attach_reference(
    mdv: &mut MetaDataVersion,
    referrer: &Referrer,
    target: &Target,
) -> Result<()> {
    if !is_supported(referrer, target) {
        return Err(unsupported(referrer, target));
    }
    let list = source_list(mdv, referrer, target)?;
    push_unique(list, referrer.oid());
    Ok(())
}

/// Remove `referrer` from the sources of `target`.
pub fn detach_reference(
    mdv: &mut MetaDataVersion,
    referrer: &Referrer,
    target: &Target,
) -> Result<DetachOutcome> {
    if !is_supported(referrer, target) {
        return Err(unsupported(referrer, target));
    }
    if !target.exists(mdv) {
        return Ok(DetachOutcome::TargetMissing);
    }
    let list = source_list(mdv, referrer, target)?;
    list.retain(|oid| oid != referrer.oid());

    if let (Referrer::ItemRef { container, .. }, Target::Method(oid)) = (referrer, target)
        && let Some(method) = mdv.methods.get_mut(oid)
    {
        let by_container = match container {
            Container::ItemGroup(_) => &mut method.sources.item_groups,
            Container::ValueList(_) => &mut method.sources.value_lists,
        };
        by_container.retain(|_, item_refs| !item_refs.is_empty());
    }

    if has_sources(mdv, target) {
        Ok(DetachOutcome::StillReferenced)
    } else {
        Ok(DetachOutcome::Orphaned)
    }
}

/// Point an ItemDef at a codelist, or clear it.
///
/// Returns the outcome for the previously attached codelist, if there was one.
pub fn set_code_list(
    mdv: &mut MetaDataVersion,
    item_oid: &str,
    code_list_oid: Option<String>,
) -> Result<Option<DetachOutcome>> {
    let current = mdv
        .item_defs
        .get(item_oid)
        .ok_or_else(|| ModelError::dangling("itemOid", item_oid))?
        .code_list_oid
        .clone();
    if current == code_list_oid {
        return Ok(None);
    }
    if let Some(new) = &code_list_oid
        && !mdv.code_lists.contains_key(new)
    {
        return Err(ModelError::dangling("codeListOid", new.clone()));
    }

    let referrer = Referrer::ItemDef(item_oid.to_string());
    let outcome = match current {
        Some(old) => Some(detach_reference(mdv, &referrer, &Target::CodeList(old))?),
        None => None,
    };
    if let Some(item_def) = mdv.item_defs.get_mut(item_oid) {
        item_def.code_list_oid = code_list_oid.clone();
    }
    if let Some(new) = code_list_oid {
        attach_reference(mdv, &referrer, &Target::CodeList(new))?;
    }
    Ok(outcome)
}

fn comment_slot<'a>(
    mdv: &'a mut MetaDataVersion,
    referrer: &Referrer,
) -> Option<&'a mut Option<String>> {
    match referrer {
        Referrer::ItemGroup(oid) => mdv.item_groups.get_mut(oid).map(|e| &mut e.comment_oid),
        Referrer::ItemDef(oid) => mdv.item_defs.get_mut(oid).map(|e| &mut e.comment_oid),
        Referrer::CodeList(oid) => mdv.code_lists.get_mut(oid).map(|e| &mut e.comment_oid),
        Referrer::WhereClause(oid) => mdv.where_clauses.get_mut(oid).map(|e| &mut e.comment_oid),
        Referrer::Standard(oid) => mdv.standards.get_mut(oid).map(|e| &mut e.comment_oid),
        Referrer::MetaDataVersion(oid) => {
            if mdv.oid == *oid {
                Some(&mut mdv.comment_oid)
            } else {
                None
            }
        }
        Referrer::AnalysisResult(oid) => mdv
            .analysis_result_displays
            .find_analysis_result_mut(oid)
            .map(|result| &mut result.analysis_datasets_comment_oid),
        Referrer::ValueList(_) | Referrer::ItemRef { .. } => None,
    }
}

/// Point a commentable entity at a comment, or clear it.
pub fn set_comment(
    mdv: &mut MetaDataVersion,
    referrer: &Referrer,
    comment_oid: Option<String>,
) -> Result<Option<DetachOutcome>> {
    let current = comment_slot(mdv, referrer)
        .ok_or_else(|| ModelError::dangling("commentOid", referrer.oid()))?
        .clone();
    if current == comment_oid {
        return Ok(None);
    }
    if let Some(new) = &comment_oid
        && !mdv.comments.contains_key(new)
    {
        return Err(ModelError::dangling("commentOid", new.clone()));
    }

    let outcome = match current {
        Some(old) => Some(detach_reference(mdv, referrer, &Target::Comment(old))?),
        None => None,
    };
    if let Some(slot) = comment_slot(mdv, referrer) {
        *slot = comment_oid.clone();
    }
    if let Some(new) = comment_oid {
        attach_reference(mdv, referrer, &Target::Comment(new))?;
    }
    Ok(outcome)
}

/// Point an item ref at a method, or clear it.
pub fn set_method(
    mdv: &mut MetaDataVersion,
    container: &Container,
    item_ref_oid: &str,
    method_oid: Option<String>,
) -> Result<Option<DetachOutcome>> {
    let current = mdv
        .container(container)
        .and_then(|owner| owner.item_refs().get(item_ref_oid))
        .ok_or_else(|| ModelError::dangling("itemRefOid", item_ref_oid))?
        .method_oid
        .clone();
    if current == method_oid {
        return Ok(None);
    }
    if let Some(new) = &method_oid
        && !mdv.methods.contains_key(new)
    {
        return Err(ModelError::dangling("methodOid", new.clone()));
    }

    let referrer = Referrer::item_ref(container.clone(), item_ref_oid);
    let outcome = match current {
        Some(old) => Some(detach_reference(mdv, &referrer, &Target::Method(old))?),
        None => None,
    };
    if let Some(item_ref) = mdv
        .container_mut(container)
        .and_then(|owner| owner.item_refs_mut().get_mut(item_ref_oid))
    {
        item_ref.method_oid = method_oid.clone();
    }
    if let Some(new) = method_oid {
        attach_reference(mdv, &referrer, &Target::Method(new))?;
    }
    Ok(outcome)
}

/// Forward pointers held by one item ref.
pub fn item_ref_references(
    container: &Container,
    item_ref_oid: &str,
    item_ref: &ItemRef,
) -> Vec<Reference> {
    let mut references = vec![Reference::new(
        Referrer::from(container),
        Target::ItemDef(item_ref.item_oid.clone()),
    )];
    if let Some(method_oid) = &item_ref.method_oid {
        references.push(Reference::new(
            Referrer::item_ref(container.clone(), item_ref_oid),
            Target::Method(method_oid.clone()),
        ));
    }
    if let (Container::ValueList(_), Some(where_clause_oid)) = (container, &item_ref.where_clause_oid)
    {
        references.push(Reference::new(
            Referrer::from(container),
            Target::WhereClause(where_clause_oid.clone()),
        ));
    }
    references
}

fn comment_reference(referrer: Referrer, comment_oid: Option<&String>) -> Option<Reference> {
    comment_oid.map(|oid| Reference::new(referrer, Target::Comment(oid.clone())))
}

pub fn item_group_references(group: &ItemGroup) -> Vec<Reference> {
    let container = Container::ItemGroup(group.oid.clone());
    let mut references: Vec<Reference> = group
        .item_refs
        .iter()
        .flat_map(|(oid, item_ref)| item_ref_references(&container, oid, item_ref))
        .collect();
    references.extend(comment_reference(
        Referrer::ItemGroup(group.oid.clone()),
        group.comment_oid.as_ref(),
    ));
    references
}

pub fn value_list_references(list: &ValueList) -> Vec<Reference> {
    let container = Container::ValueList(list.oid.clone());
    list.item_refs
        .iter()
        .flat_map(|(oid, item_ref)| item_ref_references(&container, oid, item_ref))
        .collect()
}

pub fn item_def_references(item_def: &ItemDef) -> Vec<Reference> {
    let referrer = Referrer::ItemDef(item_def.oid.clone());
    let mut references = Vec::new();
    if let Some(oid) = &item_def.code_list_oid {
        references.push(Reference::new(referrer.clone(), Target::CodeList(oid.clone())));
    }
    if let Some(oid) = &item_def.value_list_oid {
        references.push(Reference::new(referrer.clone(), Target::ValueList(oid.clone())));
    }
    references.extend(comment_reference(referrer, item_def.comment_oid.as_ref()));
    references
}

pub fn code_list_references(code_list: &CodeList) -> Vec<Reference> {
    comment_reference(
        Referrer::CodeList(code_list.oid.clone()),
        code_list.comment_oid.as_ref(),
    )
    .into_iter()
    .collect()
}

pub fn where_clause_references(where_clause: &WhereClause) -> Vec<Reference> {
    comment_reference(
        Referrer::WhereClause(where_clause.oid.clone()),
        where_clause.comment_oid.as_ref(),
    )
    .into_iter()
    .collect()
}

pub fn analysis_result_references(result: &AnalysisResult) -> Vec<Reference> {
    let referrer = Referrer::AnalysisResult(result.oid.clone());
    let mut references: Vec<Reference> = result
        .analysis_datasets
        .values()
        .filter_map(|dataset| dataset.where_clause_oid.as_ref())
        .map(|oid| Reference::new(referrer.clone(), Target::WhereClause(oid.clone())))
        .collect();
    references.extend(comment_reference(
        referrer,
        result.analysis_datasets_comment_oid.as_ref(),
    ));
    references
}

/// Every forward pointer in the document that has a back-reference.
pub fn forward_references(mdv: &MetaDataVersion) -> Vec<Reference> {
    let mut references = Vec::new();
    references.extend(comment_reference(
        Referrer::MetaDataVersion(mdv.oid.clone()),
        mdv.comment_oid.as_ref(),
    ));
    for standard in mdv.standards.values() {
        references.extend(comment_reference(
            Referrer::Standard(standard.oid.clone()),
            standard.comment_oid.as_ref(),
        ));
    }
    references.extend(mdv.item_groups.values().flat_map(item_group_references));
    references.extend(mdv.value_lists.values().flat_map(value_list_references));
    references.extend(mdv.item_defs.values().flat_map(item_def_references));
    references.extend(mdv.code_lists.values().flat_map(code_list_references));
    references.extend(mdv.where_clauses.values().flat_map(where_clause_references));
    references.extend(
        mdv.analysis_result_displays
            .analysis_results()
            .flat_map(analysis_result_references),
    );
    references
}

fn clear_sources(mdv: &mut MetaDataVersion) {
    for item_def in mdv.item_defs.values_mut() {
        item_def.sources = Default::default();
    }
    for list in mdv.value_lists.values_mut() {
        list.sources = Default::default();
    }
    for clause in mdv.where_clauses.values_mut() {
        clause.sources = Default::default();
    }
    for code_list in mdv.code_lists.values_mut() {
        code_list.sources = Default::default();
    }
    for method in mdv.methods.values_mut() {
        method.sources = Default::default();
    }
    for comment in mdv.comments.values_mut() {
        comment.sources = Default::default();
    }
}

/// Recompute every `sources` list from the forward pointers.
///
/// Pointers to missing entities are skipped; see [`dangling_references`].
pub fn rebuild_sources(mdv: &mut MetaDataVersion) {
    clear_sources(mdv);
    let references = forward_references(mdv);
    let total = references.len();
    for reference in references {
        if let Err(error) = attach_reference(mdv, &reference.referrer, &reference.target) {
            tracing::debug!(%error, "skipping unresolved reference");
        }
    }
    tracing::debug!(references = total, "rebuilt sources");
}

/// An entity whose stored sources differ from its forward pointers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMismatch {
    pub kind: OidKind,
    pub oid: String,
}

fn as_set(list: &[String]) -> BTreeSet<&str> {
    list.iter().map(String::as_str).collect()
}

fn as_nested_set(map: &BTreeMap<String, Vec<String>>) -> BTreeMap<&str, BTreeSet<&str>> {
    map.iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(oid, list)| (oid.as_str(), as_set(list)))
        .collect()
}

fn collect_mismatches<T>(
    kind: OidKind,
    stored: &BTreeMap<String, T>,
    expected: &BTreeMap<String, T>,
    same: impl Fn(&T, &T) -> bool,
    out: &mut Vec<SourceMismatch>,
) {
    for (oid, entity) in stored {
        if let Some(rebuilt) = expected.get(oid)
            && !same(entity, rebuilt)
        {
            out.push(SourceMismatch {
                kind,
                oid: oid.clone(),
            });
        }
    }
}

/// Compare stored sources against a fresh rebuild. Empty when consistent.
pub fn audit_sources(mdv: &MetaDataVersion) -> Vec<SourceMismatch> {
    let mut expected = mdv.clone();
    rebuild_sources(&mut expected);

    let mut mismatches = Vec::new();
    collect_mismatches(
        OidKind::ItemDef,
        &mdv.item_defs,
        &expected.item_defs,
        |a, b| {
            as_set(&a.sources.item_groups) == as_set(&b.sources.item_groups)
                && as_set(&a.sources.value_lists) == as_set(&b.sources.value_lists)
        },
        &mut mismatches,
    );
    collect_mismatches(
        OidKind::ValueList,
        &mdv.value_lists,
        &expected.value_lists,
        |a, b| as_set(&a.sources.item_defs) == as_set(&b.sources.item_defs),
        &mut mismatches,
    );
    collect_mismatches(
        OidKind::WhereClause,
        &mdv.where_clauses,
        &expected.where_clauses,
        |a, b| {
            as_set(&a.sources.value_lists) == as_set(&b.sources.value_lists)
                && as_set(&a.sources.analysis_results) == as_set(&b.sources.analysis_results)
        },
        &mut mismatches,
    );
    collect_mismatches(
        OidKind::CodeList,
        &mdv.code_lists,
        &expected.code_lists,
        |a, b| as_set(&a.sources.item_defs) == as_set(&b.sources.item_defs),
        &mut mismatches,
    );
    collect_mismatches(
        OidKind::Method,
        &mdv.methods,
        &expected.methods,
        |a, b| {
            as_nested_set(&a.sources.item_groups) == as_nested_set(&b.sources.item_groups)
                && as_nested_set(&a.sources.value_lists) == as_nested_set(&b.sources.value_lists)
        },
        &mut mismatches,
    );
    collect_mismatches(
        OidKind::Comment,
        &mdv.comments,
        &expected.comments,
        |a, b| {
            let (a, b) = (&a.sources, &b.sources);
            as_set(&a.item_defs) == as_set(&b.item_defs)
                && as_set(&a.item_groups) == as_set(&b.item_groups)
                && as_set(&a.where_clauses) == as_set(&b.where_clauses)
                && as_set(&a.code_lists) == as_set(&b.code_lists)
                && as_set(&a.meta_data_versions) == as_set(&b.meta_data_versions)
                && as_set(&a.standards) == as_set(&b.standards)
                && as_set(&a.analysis_results) == as_set(&b.analysis_results)
        },
        &mut mismatches,
    );
    mismatches
}

/// A pointer field naming an entity that does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingPointer {
    /// Human-readable owner, e.g. `ItemDef IT.AGE`.
    pub owner: String,
    pub field: &'static str,
    pub oid: String,
}

impl DanglingPointer {
    fn new(owner: impl fmt::Display, field: &'static str, oid: &str) -> Self {
        Self {
            owner: owner.to_string(),
            field,
            oid: oid.to_string(),
        }
    }

    pub fn into_error(self) -> ModelError {
        ModelError::DanglingReference {
            field: self.field,
            oid: self.oid,
        }
    }
}

impl fmt::Display for DanglingPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} not found", self.owner, self.field, self.oid)
    }
}

/// Every pointer in the document that does not resolve.
///
/// Covers the back-referenced pointers plus range-check items, parent
/// variables, role codelists, standards, analysis datasets, and leaf IDs.
pub fn dangling_references(mdv: &MetaDataVersion) -> Vec<DanglingPointer> {
    let mut dangling: Vec<DanglingPointer> = forward_references(mdv)
        .into_iter()
        .filter(|reference| !reference.target.exists(mdv))
        .map(|reference| {
            DanglingPointer::new(
                &reference.referrer,
                reference.target.field(),
                reference.target.oid(),
            )
        })
        .collect();

    let mut check = |owner: &dyn fmt::Display, field: &'static str, oid: &str, exists: bool| {
        if !exists {
            dangling.push(DanglingPointer::new(owner, field, oid));
        }
    };

    for group in mdv.item_groups.values() {
        let owner = format!("ItemGroup {}", group.oid);
        if let Some(oid) = &group.standard_oid {
            check(&owner, "standardOid", oid, mdv.standards.contains_key(oid));
        }
        for item_ref in group.item_refs.values() {
            if let Some(oid) = &item_ref.role_code_list_oid {
                check(&owner, "roleCodeListOid", oid, mdv.code_lists.contains_key(oid));
            }
        }
    }
    for item_def in mdv.item_defs.values() {
        let owner = format!("ItemDef {}", item_def.oid);
        if let Some(oid) = &item_def.parent_item_def_oid {
            check(&owner, "parentItemDefOid", oid, mdv.item_defs.contains_key(oid));
        }
        for origin in &item_def.origins {
            for leaf_id in origin.leaf_ids() {
                check(&owner, "leafId", &leaf_id, mdv.leafs.contains_key(&leaf_id));
            }
        }
    }
    for code_list in mdv.code_lists.values() {
        if let Some(oid) = &code_list.standard_oid {
            let owner = format!("CodeList {}", code_list.oid);
            check(&owner, "standardOid", oid, mdv.standards.contains_key(oid));
        }
    }
    for clause in mdv.where_clauses.values() {
        let owner = format!("WhereClause {}", clause.oid);
        for range_check in &clause.range_checks {
            if let Some(oid) = &range_check.item_oid {
                check(&owner, "itemOid", oid, mdv.item_defs.contains_key(oid));
            }
            if let Some(oid) = &range_check.item_group_oid {
                check(&owner, "itemGroupOid", oid, mdv.item_groups.contains_key(oid));
            }
        }
    }
    for method in mdv.methods.values() {
        let owner = format!("Method {}", method.oid);
        for leaf_id in method.leaf_ids() {
            check(&owner, "leafId", &leaf_id, mdv.leafs.contains_key(&leaf_id));
        }
    }
    for comment in mdv.comments.values() {
        let owner = format!("Comment {}", comment.oid);
        for leaf_id in comment.leaf_ids() {
            check(&owner, "leafId", &leaf_id, mdv.leafs.contains_key(&leaf_id));
        }
    }
    let mdv_owner = format!("MetaDataVersion {}", mdv.oid);
    for document in mdv.annotated_crf.iter().chain(&mdv.supplemental_doc) {
        check(
            &mdv_owner,
            "leafId",
            &document.leaf_id,
            mdv.leafs.contains_key(&document.leaf_id),
        );
    }
    for result in mdv.analysis_result_displays.analysis_results() {
        let owner = format!("AnalysisResult {}", result.oid);
        if let Some(oid) = &result.parameter_oid {
            check(&owner, "parameterOid", oid, mdv.item_defs.contains_key(oid));
        }
        for dataset in result.analysis_datasets.values() {
            check(
                &owner,
                "itemGroupOid",
                &dataset.item_group_oid,
                mdv.item_groups.contains_key(&dataset.item_group_oid),
            );
            for oid in &dataset.analysis_variable_oids {
                check(&owner, "itemOid", oid, mdv.item_defs.contains_key(oid));
            }
        }
    }
    dangling
}
