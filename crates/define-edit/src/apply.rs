//! Merging a copy into its target document.

use std::collections::BTreeMap;

use define_model::references::{
    code_list_references, item_def_references, item_group_references, item_ref_references,
    value_list_references, where_clause_references,
};
use define_model::{
    Container, ItemRefContainer, MetaDataVersion, ModelError, OidKind, Reference, ReferenceMode,
    attach_reference,
};

use crate::copy::CopyOutcome;
use crate::error::{EditError, Result};

fn insert_new<T>(
    map: &mut BTreeMap<String, T>,
    kind: OidKind,
    entities: BTreeMap<String, T>,
) -> Result<()> {
    for (oid, entity) in entities {
        if map.contains_key(&oid) {
            return Err(ModelError::DuplicateOid { kind, oid }.into());
        }
        map.insert(oid, entity);
    }
    Ok(())
}

fn insert_order(order: &mut Vec<String>, position: Option<usize>, new: Vec<String>) {
    let index = position.map_or(order.len(), |p| p.min(order.len()));
    order.splice(index..index, new);
}

/// Merge a copy outcome into `mdv` and record every new back-reference.
///
/// Item refs of a variable copy go into `target` after `position` entries, or
/// at the end. Copied datasets are placed in the dataset order the same way.
/// A reference to an entity that exists in neither the outcome nor `mdv`
/// fails in strict mode and is kept with a warning in permissive mode.
///
/// The document is left unchanged when the merge fails.
pub fn apply_copy(
    mdv: &mut MetaDataVersion,
    outcome: CopyOutcome,
    target: Option<&Container>,
    position: Option<usize>,
    mode: ReferenceMode,
) -> Result<()> {
    let mut staged = mdv.clone();
    merge(&mut staged, outcome, target, position, mode)?;
    *mdv = staged;
    Ok(())
}

fn merge(
    mdv: &mut MetaDataVersion,
    outcome: CopyOutcome,
    target: Option<&Container>,
    position: Option<usize>,
    mode: ReferenceMode,
) -> Result<()> {
    let CopyOutcome {
        item_groups,
        item_group_order,
        item_refs,
        item_ref_order,
        key_order,
        item_defs,
        value_lists,
        where_clauses,
        code_lists,
        code_list_order,
        methods,
        comments,
        leafs,
        leaf_order,
        ..
    } = outcome;

    let mut references: Vec<Reference> = Vec::new();
    references.extend(item_groups.values().flat_map(item_group_references));
    references.extend(item_defs.values().flat_map(item_def_references));
    references.extend(value_lists.values().flat_map(value_list_references));
    references.extend(where_clauses.values().flat_map(where_clause_references));
    references.extend(code_lists.values().flat_map(code_list_references));
    let created = references.len();

    insert_new(&mut mdv.leafs, OidKind::Leaf, leafs)?;
    mdv.order.leaf_order.extend(leaf_order);
    insert_new(&mut mdv.comments, OidKind::Comment, comments)?;
    insert_new(&mut mdv.methods, OidKind::Method, methods)?;
    insert_new(&mut mdv.code_lists, OidKind::CodeList, code_lists)?;
    mdv.order.code_list_order.extend(code_list_order);
    insert_new(&mut mdv.where_clauses, OidKind::WhereClause, where_clauses)?;
    insert_new(&mut mdv.value_lists, OidKind::ValueList, value_lists)?;
    insert_new(&mut mdv.item_defs, OidKind::ItemDef, item_defs)?;
    insert_new(&mut mdv.item_groups, OidKind::ItemGroup, item_groups)?;
    insert_order(&mut mdv.order.item_group_order, position, item_group_order);

    if !item_refs.is_empty() {
        let container = target.ok_or_else(|| {
            EditError::ContainerNotFound("no target container for copied variables".to_string())
        })?;
        let owner = mdv
            .container_mut(container)
            .ok_or_else(|| EditError::ContainerNotFound(container.to_string()))?;
        let mut pending = item_refs;
        for (offset, oid) in item_ref_order.into_iter().enumerate() {
            if owner.item_refs().contains_key(&oid) {
                return Err(ModelError::DuplicateOid {
                    kind: OidKind::ItemRef,
                    oid,
                }
                .into());
            }
            let Some(item_ref) = pending.remove(&oid) else {
                continue;
            };
            references.extend(item_ref_references(container, &oid, &item_ref));
            owner.insert_item_ref(oid, item_ref, position.map(|p| p + offset));
        }
        owner.key_order_mut().extend(key_order);
    }

    let total = references.len();
    for reference in references {
        if reference.target.exists(mdv) {
            attach_reference(mdv, &reference.referrer, &reference.target)?;
        } else if mode.is_strict() {
            return Err(
                ModelError::dangling(reference.target.field(), reference.target.oid()).into(),
            );
        } else {
            tracing::warn!(
                referrer = %reference.referrer,
                target = %reference.target,
                "unresolved reference kept"
            );
        }
    }

    tracing::debug!(
        references = total,
        item_ref_references = total - created,
        "copy applied"
    );
    Ok(())
}
