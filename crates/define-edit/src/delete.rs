//! Deleting variables, datasets, and codelists.
//!
//! Removing an entity detaches every reference it held. A variable, value
//! list, where-clause, method, comment, or codelist left without sources is
//! removed in turn, so a delete cascades down to everything only the deleted
//! entity used. Leafs go with the last method, comment, or origin that
//! pointed at them. A codelist still named as an item ref role is kept.

use define_model::references::{
    code_list_references, item_def_references, item_group_references, item_ref_references,
    value_list_references, where_clause_references,
};
use define_model::{
    Container, DetachOutcome, Document, Documentable, ItemRef, ItemRefContainer, MetaDataVersion,
    ModelError, Reference, Target, detach_reference,
};

use crate::error::{EditError, Result};

/// OIDs of everything a delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub item_groups: Vec<String>,
    pub item_refs: Vec<String>,
    pub item_defs: Vec<String>,
    pub value_lists: Vec<String>,
    pub where_clauses: Vec<String>,
    pub code_lists: Vec<String>,
    pub methods: Vec<String>,
    pub comments: Vec<String>,
    pub leafs: Vec<String>,
    /// Range checks whose variable or dataset was removed.
    pub cleared_range_checks: usize,
}

impl DeleteOutcome {
    /// Number of removed entities.
    pub fn removed(&self) -> usize {
        self.item_groups.len()
            + self.item_refs.len()
            + self.item_defs.len()
            + self.value_lists.len()
            + self.where_clauses.len()
            + self.code_lists.len()
            + self.methods.len()
            + self.comments.len()
            + self.leafs.len()
    }
}

struct Pruner<'a> {
    mdv: &'a mut MetaDataVersion,
    outcome: DeleteOutcome,
}

impl<'a> Pruner<'a> {
    fn new(mdv: &'a mut MetaDataVersion) -> Self {
        Self {
            mdv,
            outcome: DeleteOutcome::default(),
        }
    }

    /// Detach references and prune the targets nobody points at anymore.
    fn release(&mut self, references: Vec<Reference>) -> Result<()> {
        for reference in references {
            let outcome = detach_reference(self.mdv, &reference.referrer, &reference.target)?;
            if outcome == DetachOutcome::Orphaned {
                self.prune(&reference.target)?;
            }
        }
        Ok(())
    }

    fn prune(&mut self, target: &Target) -> Result<()> {
        match target {
            Target::ItemDef(oid) => self.remove_item_def(oid),
            Target::ValueList(oid) => self.remove_value_list(oid),
            Target::WhereClause(oid) => self.remove_where_clause(oid),
            Target::Method(oid) => {
                if let Some(method) = self.mdv.methods.remove(oid) {
                    self.outcome.methods.push(oid.clone());
                    self.remove_unused_leafs(method.leaf_ids());
                }
                Ok(())
            }
            Target::Comment(oid) => {
                if let Some(comment) = self.mdv.comments.remove(oid) {
                    self.outcome.comments.push(oid.clone());
                    self.remove_unused_leafs(comment.leaf_ids());
                }
                Ok(())
            }
            Target::CodeList(oid) => {
                if role_code_list_oids(self.mdv).any(|role| role == oid.as_str()) {
                    tracing::debug!(code_list = %oid, "codelist still used as a role, kept");
                    return Ok(());
                }
                self.remove_code_list(oid)
            }
        }
    }

    fn remove_item_ref(&mut self, container: &Container, item_ref_oid: &str) -> Result<()> {
        let Some(owner) = self.mdv.container_mut(container) else {
            return Ok(());
        };
        let Some(item_ref) = owner.remove_item_ref(item_ref_oid) else {
            return Ok(());
        };
        // Another item ref of the same container may bind the same variable
        // or where-clause; those edges stay.
        let remaining: Vec<Reference> = owner
            .item_refs()
            .iter()
            .flat_map(|(oid, other)| item_ref_references(container, oid, other))
            .collect();
        let released = item_ref_references(container, item_ref_oid, &item_ref)
            .into_iter()
            .filter(|reference| !remaining.contains(reference))
            .collect();

        self.outcome.item_refs.push(item_ref_oid.to_string());
        self.release(released)
    }

    fn remove_item_def(&mut self, oid: &str) -> Result<()> {
        let Some(item_def) = self.mdv.item_defs.remove(oid) else {
            return Ok(());
        };
        self.outcome.item_defs.push(oid.to_string());
        for child in self.mdv.item_defs.values_mut() {
            if child.parent_item_def_oid.as_deref() == Some(oid) {
                child.parent_item_def_oid = None;
            }
        }
        self.clear_range_checks(|check_item, _| check_item == Some(oid));
        self.remove_unused_leafs(item_def.origins.iter().flat_map(|origin| origin.leaf_ids()));
        self.release(item_def_references(&item_def))
    }

    fn remove_value_list(&mut self, oid: &str) -> Result<()> {
        let Some(list) = self.mdv.value_lists.remove(oid) else {
            return Ok(());
        };
        self.outcome.value_lists.push(oid.to_string());
        self.release(value_list_references(&list))
    }

    fn remove_where_clause(&mut self, oid: &str) -> Result<()> {
        let Some(clause) = self.mdv.where_clauses.remove(oid) else {
            return Ok(());
        };
        self.outcome.where_clauses.push(oid.to_string());
        self.release(where_clause_references(&clause))
    }

    fn remove_item_group(&mut self, oid: &str) -> Result<()> {
        let container = Container::ItemGroup(oid.to_string());
        let ref_oids = self
            .mdv
            .container(&container)
            .map(|owner| owner.item_ref_order().to_vec())
            .unwrap_or_default();
        for ref_oid in &ref_oids {
            self.remove_item_ref(&container, ref_oid)?;
        }

        let Some(group) = self.mdv.item_groups.remove(oid) else {
            return Ok(());
        };
        self.mdv.order.item_group_order.retain(|existing| existing != oid);
        self.outcome.item_groups.push(oid.to_string());
        self.clear_range_checks(|_, check_group| check_group == Some(oid));
        self.release(item_group_references(&group))
    }

    fn remove_code_list(&mut self, oid: &str) -> Result<()> {
        let Some(code_list) = self.mdv.code_lists.remove(oid) else {
            return Ok(());
        };
        self.mdv.order.code_list_order.retain(|existing| existing != oid);
        for item_def in self.mdv.item_defs.values_mut() {
            if item_def.code_list_oid.as_deref() == Some(oid) {
                item_def.code_list_oid = None;
            }
        }
        let item_refs = self
            .mdv
            .item_groups
            .values_mut()
            .flat_map(|group| group.item_refs.values_mut())
            .chain(
                self.mdv
                    .value_lists
                    .values_mut()
                    .flat_map(|list| list.item_refs.values_mut()),
            );
        for item_ref in item_refs {
            if item_ref.role_code_list_oid.as_deref() == Some(oid) {
                item_ref.role_code_list_oid = None;
            }
        }
        self.outcome.code_lists.push(oid.to_string());
        self.release(code_list_references(&code_list))
    }

    fn remove_unused_leafs(&mut self, leaf_ids: impl IntoIterator<Item = String>) {
        for leaf_id in leaf_ids {
            if leaf_in_use(self.mdv, &leaf_id) || self.mdv.leafs.remove(&leaf_id).is_none() {
                continue;
            }
            self.mdv.order.leaf_order.retain(|existing| *existing != leaf_id);
            self.outcome.leafs.push(leaf_id);
        }
    }

    /// Clear range checks matching `pred(item_oid, item_group_oid)`.
    fn clear_range_checks(&mut self, pred: impl Fn(Option<&str>, Option<&str>) -> bool) {
        for clause in self.mdv.where_clauses.values_mut() {
            for check in &mut clause.range_checks {
                if pred(check.item_oid.as_deref(), check.item_group_oid.as_deref()) {
                    check.item_oid = None;
                    check.item_group_oid = None;
                    self.outcome.cleared_range_checks += 1;
                }
            }
        }
    }

    fn finish(self, operation: &'static str) -> DeleteOutcome {
        tracing::info!(
            operation,
            removed = self.outcome.removed(),
            item_defs = self.outcome.item_defs.len(),
            methods = self.outcome.methods.len(),
            comments = self.outcome.comments.len(),
            code_lists = self.outcome.code_lists.len(),
            leafs = self.outcome.leafs.len(),
            cleared_range_checks = self.outcome.cleared_range_checks,
            "delete applied"
        );
        self.outcome
    }
}

fn all_item_refs(mdv: &MetaDataVersion) -> impl Iterator<Item = &ItemRef> {
    mdv.item_groups
        .values()
        .flat_map(|group| group.item_refs.values())
        .chain(mdv.value_lists.values().flat_map(|list| list.item_refs.values()))
}

fn role_code_list_oids(mdv: &MetaDataVersion) -> impl Iterator<Item = &str> {
    all_item_refs(mdv).filter_map(|item_ref| item_ref.role_code_list_oid.as_deref())
}

/// Whether anything in the document still points at a leaf.
fn leaf_in_use(mdv: &MetaDataVersion, leaf_id: &str) -> bool {
    let uses = |documents: &[Document]| documents.iter().any(|doc| doc.leaf_id == leaf_id);
    let displays = &mdv.analysis_result_displays.result_displays;
    uses(&mdv.annotated_crf)
        || uses(&mdv.supplemental_doc)
        || mdv.methods.values().any(|method| uses(method.documents()))
        || mdv.comments.values().any(|comment| uses(comment.documents()))
        || mdv
            .item_defs
            .values()
            .flat_map(|item_def| &item_def.origins)
            .any(|origin| uses(origin.documents()))
        || displays.values().any(|display| {
            uses(display.documents())
                || display.analysis_results.values().any(|result| {
                    result
                        .documentation
                        .as_ref()
                        .is_some_and(|doc| uses(doc.documents()))
                        || result
                            .programming_code
                            .as_ref()
                            .is_some_and(|code| uses(code.documents()))
                })
        })
}

/// Run `edit` on a copy of the document and keep the result only on success.
fn staged(
    mdv: &mut MetaDataVersion,
    edit: impl FnOnce(&mut MetaDataVersion) -> Result<DeleteOutcome>,
) -> Result<DeleteOutcome> {
    let mut copy = mdv.clone();
    let outcome = edit(&mut copy)?;
    *mdv = copy;
    Ok(outcome)
}

/// Remove item refs from a dataset or value list.
///
/// Variables no longer used anywhere are removed with their value lists,
/// where-clauses, methods, and comments when those become unused too.
pub fn delete_variables(
    mdv: &mut MetaDataVersion,
    container: &Container,
    item_ref_oids: &[String],
) -> Result<DeleteOutcome> {
    let owner = mdv
        .container(container)
        .ok_or_else(|| EditError::ContainerNotFound(container.to_string()))?;
    if let Some(missing) = item_ref_oids
        .iter()
        .find(|oid| !owner.item_refs().contains_key(oid.as_str()))
    {
        return Err(ModelError::dangling("itemRefOid", missing.clone()).into());
    }

    staged(mdv, |mdv| {
        let mut pruner = Pruner::new(mdv);
        for oid in item_ref_oids {
            pruner.remove_item_ref(container, oid)?;
        }
        Ok(pruner.finish("delete_variables"))
    })
}

/// Remove datasets with their item refs and everything only they used.
pub fn delete_item_groups(
    mdv: &mut MetaDataVersion,
    item_group_oids: &[String],
) -> Result<DeleteOutcome> {
    if let Some(missing) = item_group_oids
        .iter()
        .find(|oid| !mdv.item_groups.contains_key(oid.as_str()))
    {
        return Err(EditError::ContainerNotFound(missing.clone()));
    }

    staged(mdv, |mdv| {
        let mut pruner = Pruner::new(mdv);
        for oid in item_group_oids {
            pruner.remove_item_group(oid)?;
        }
        Ok(pruner.finish("delete_item_groups"))
    })
}

/// Remove codelists, clearing every variable and role that used them.
pub fn delete_code_lists(
    mdv: &mut MetaDataVersion,
    code_list_oids: &[String],
) -> Result<DeleteOutcome> {
    if let Some(missing) = code_list_oids
        .iter()
        .find(|oid| !mdv.code_lists.contains_key(oid.as_str()))
    {
        return Err(ModelError::dangling("codeListOid", missing.clone()).into());
    }

    staged(mdv, |mdv| {
        let mut pruner = Pruner::new(mdv);
        for oid in code_list_oids {
            pruner.remove_code_list(oid)?;
        }
        Ok(pruner.finish("delete_code_lists"))
    })
}

/// Remove codelists no variable and no item ref role points at.
pub fn delete_unused_code_lists(mdv: &mut MetaDataVersion) -> Result<DeleteOutcome> {
    let role_code_lists: Vec<&str> = role_code_list_oids(mdv).collect();
    let unused: Vec<String> = mdv
        .code_lists_in_order()
        .filter(|code_list| code_list.sources.item_defs.is_empty())
        .filter(|code_list| !role_code_lists.contains(&code_list.oid.as_str()))
        .map(|code_list| code_list.oid.clone())
        .collect();
    delete_code_lists(mdv, &unused)
}
