//! Tests for copying and merging variables, datasets, and codelists.

mod common;

use std::collections::BTreeSet;

use common::{adsl_mdv, derivation_method, oids, sex_code_list, target_mdv};
use define_edit::{
    CopyOptions, EditError, VariableCopy, apply_copy, copy_code_lists, copy_item_groups,
    copy_variables,
};
use define_model::{
    Container, ItemDef, ItemGroup, ItemRef, ItemRefContainer, Leaf, MetaDataVersion, OidKind,
    OidRegistry, PREDECESSOR_ORIGIN, ReferenceMode, ValueList, audit_sources, rebuild_sources,
};
use proptest::prelude::*;

fn adsl() -> Container {
    Container::ItemGroup("IG.ADSL".to_string())
}

fn tgt() -> Container {
    Container::ItemGroup("IG.TGT".to_string())
}

fn request(source: Container, refs: &[&str], target: Container) -> VariableCopy {
    VariableCopy {
        source_container: source,
        item_ref_oids: oids(refs),
        target_container: target,
    }
}

fn same_define() -> CopyOptions {
    CopyOptions {
        same_define: true,
        ..CopyOptions::default()
    }
}

/// Copy variables and merge them at the end of the target container.
fn copy_into(
    target: &mut MetaDataVersion,
    source: &MetaDataVersion,
    request: &VariableCopy,
    options: &CopyOptions,
    registry: &mut OidRegistry,
) -> define_edit::CopyOutcome {
    let outcome = copy_variables(target, source, request, options, registry).unwrap();
    apply_copy(
        target,
        outcome.clone(),
        Some(&request.target_container),
        None,
        options.reference_mode,
    )
    .unwrap();
    outcome
}

fn item_by_name<'a>(mdv: &'a MetaDataVersion, container: &Container, name: &str) -> &'a ItemDef {
    let owner = mdv.container(container).unwrap();
    owner
        .ordered_item_refs()
        .into_iter()
        .map(|(_, item_ref)| &mdv.item_defs[&item_ref.item_oid])
        .find(|item_def| item_def.name == name)
        .unwrap()
}

// --- Same document ---

#[test]
fn copy_within_document_shares_comment_and_codelist() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let mut registry = OidRegistry::new();
    let outcome = copy_into(
        &mut mdv,
        &source,
        &request(adsl(), &["IR.SEX", "IR.AGE"], adsl()),
        &same_define(),
        &mut registry,
    );

    assert_eq!(outcome.item_defs.len(), 2);
    assert!(outcome.code_lists.is_empty());
    assert!(outcome.comments.is_empty());
    let group = &mdv.item_groups["IG.ADSL"];
    assert_eq!(group.item_ref_order.len(), 7);
    assert_eq!(mdv.code_lists["CL.SEX"].sources.item_defs.len(), 2);
    assert_eq!(mdv.comments["COM.AGE"].sources.item_defs.len(), 2);
    assert!(audit_sources(&mdv).is_empty());
}

#[test]
fn copying_twice_mints_disjoint_oids() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let mut registry = OidRegistry::new();
    let copy = request(adsl(), &["IR.AGE", "IR.PARAM"], adsl());
    let first = copy_into(&mut mdv, &source, &copy, &same_define(), &mut registry);
    let second = copy_into(&mut mdv, &source, &copy, &same_define(), &mut registry);

    let first_oids: BTreeSet<&String> =
        first.item_defs.keys().chain(&first.item_ref_order).collect();
    let second_oids: BTreeSet<&String> =
        second.item_defs.keys().chain(&second.item_ref_order).collect();
    assert!(first_oids.is_disjoint(&second_oids));
    assert_eq!(mdv.item_groups["IG.ADSL"].item_refs.len(), 9);
    assert_eq!(mdv.comments["COM.AGE"].sources.item_defs.len(), 3);
    assert_eq!(mdv.methods["MT.DERIV"].sources.item_groups["IG.ADSL"].len(), 4);
    assert!(audit_sources(&mdv).is_empty());
}

#[test]
fn detach_methods_duplicates_method_in_same_document() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let options = same_define().with_detach_methods(true);
    let outcome = copy_into(
        &mut mdv,
        &source,
        &request(adsl(), &["IR.PARAM"], adsl()),
        &options,
        &mut OidRegistry::new(),
    );

    assert_eq!(outcome.methods.len(), 1);
    let new_method = outcome.methods.keys().next().unwrap();
    assert_ne!(new_method, "MT.DERIV");
    assert_eq!(mdv.methods[new_method].body, mdv.methods["MT.DERIV"].body);
    assert!(audit_sources(&mdv).is_empty());
}

#[test]
fn copied_keys_follow_source_key_order() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let outcome = copy_into(
        &mut mdv,
        &source,
        &request(adsl(), &["IR.AGE", "IR.PARAM"], adsl()),
        &same_define(),
        &mut OidRegistry::new(),
    );

    let new_param = outcome.mapped(OidKind::ItemRef, "IR.PARAM").unwrap();
    assert_eq!(outcome.key_order, vec![new_param.to_string()]);
    assert_eq!(
        mdv.item_groups["IG.ADSL"].key_order,
        vec!["IR.PARAM".to_string(), new_param.to_string()]
    );
}

#[test]
fn apply_inserts_at_position() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let copy = request(adsl(), &["IR.AGE"], adsl());
    let outcome = copy_variables(&mdv, &source, &copy, &same_define(), &mut OidRegistry::new())
        .unwrap();
    let new_ref = outcome.item_ref_order[0].clone();
    apply_copy(&mut mdv, outcome, Some(&adsl()), Some(1), ReferenceMode::Strict).unwrap();

    assert_eq!(mdv.item_groups["IG.ADSL"].item_ref_order[1], new_ref);
}

#[test]
fn copy_into_missing_container_fails() {
    let mdv = adsl_mdv();
    let error = copy_variables(
        &mdv,
        &mdv,
        &request(adsl(), &["IR.AGE"], Container::ItemGroup("IG.NOPE".to_string())),
        &same_define(),
        &mut OidRegistry::new(),
    )
    .unwrap_err();
    assert!(matches!(error, EditError::ContainerNotFound(_)));
}

#[test]
fn apply_without_target_leaves_document_unchanged() {
    let mut mdv = adsl_mdv();
    let before = mdv.clone();
    let outcome = copy_variables(
        &mdv,
        &before,
        &request(adsl(), &["IR.AGE"], adsl()),
        &same_define(),
        &mut OidRegistry::new(),
    )
    .unwrap();
    let error = apply_copy(&mut mdv, outcome, None, None, ReferenceMode::Strict).unwrap_err();

    assert!(matches!(error, EditError::ContainerNotFound(_)));
    assert_eq!(mdv, before);
}

#[test]
fn unknown_item_ref_is_rejected() {
    let mdv = adsl_mdv();
    let error = copy_variables(
        &mdv,
        &mdv,
        &request(adsl(), &["IR.NOPE"], adsl()),
        &same_define(),
        &mut OidRegistry::new(),
    )
    .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Dangling reference in itemRefOid: IR.NOPE");
}

#[test]
fn copy_item_group_within_document() {
    let mut mdv = adsl_mdv();
    mdv.item_groups.get_mut("IG.ADSL").unwrap().leaf = Some(Leaf::new("LF.ADSL", "adsl.xpt"));
    mdv.item_groups.get_mut("IG.ADSL").unwrap().archive_location_id =
        Some("LF.ADSL".to_string());
    let source = mdv.clone();
    let outcome = copy_item_groups(
        &mdv,
        &source,
        &oids(&["IG.ADSL"]),
        &same_define(),
        &mut OidRegistry::new(),
    )
    .unwrap();
    let new_group = outcome.item_group_order[0].clone();
    apply_copy(&mut mdv, outcome, None, Some(0), ReferenceMode::Strict).unwrap();

    assert_eq!(mdv.order.item_group_order, vec![new_group.clone(), "IG.ADSL".to_string()]);
    let group = &mdv.item_groups[&new_group];
    assert_eq!(group.name, "ADSL");
    assert_eq!(group.item_ref_order.len(), 5);
    let leaf = group.leaf.as_ref().unwrap();
    assert_ne!(leaf.id, "LF.ADSL");
    assert_eq!(group.archive_location_id.as_deref(), Some(leaf.id.as_str()));
    assert_eq!(mdv.methods["MT.DERIV"].sources.item_groups.len(), 2);
    assert!(audit_sources(&mdv).is_empty());
}

#[test]
fn copy_code_list_within_document_duplicates_it() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let outcome = copy_code_lists(
        &mdv,
        &source,
        &oids(&["CL.SEX"]),
        &same_define(),
        &mut OidRegistry::new(),
    )
    .unwrap();
    apply_copy(&mut mdv, outcome, None, None, ReferenceMode::Strict).unwrap();

    assert_eq!(mdv.order.code_list_order.len(), 2);
    let copy = &mdv.code_lists[&mdv.order.code_list_order[1]];
    assert_eq!(copy.coded_values(), vec!["M", "F"]);
    assert!(copy.sources.item_defs.is_empty());
    let original: BTreeSet<&String> = mdv.code_lists["CL.SEX"].item_order.iter().collect();
    assert!(copy.item_order.iter().all(|oid| !original.contains(oid)));
}

// --- Across documents ---

#[test]
fn cross_document_copy_reuses_equal_codelist_and_method() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    target
        .code_lists
        .insert("CL.T.SEX".to_string(), sex_code_list("CL.T.SEX"));
    target.order.code_list_order.push("CL.T.SEX".to_string());
    target
        .leafs
        .insert("LF.SAP".to_string(), Leaf::new("LF.SAP", "sap.pdf"));
    target
        .methods
        .insert("MT.T".to_string(), derivation_method("MT.T", "LF.SAP"));

    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.SEX", "IR.PARAM"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    assert!(outcome.code_lists.is_empty());
    assert!(outcome.methods.is_empty());
    assert!(outcome.leafs.is_empty());
    assert_eq!(outcome.reused, 2);
    assert_eq!(outcome.mapped(OidKind::CodeList, "CL.SEX"), Some("CL.T.SEX"));
    let sex = item_by_name(&target, &tgt(), "SEX");
    assert_eq!(sex.code_list_oid.as_deref(), Some("CL.T.SEX"));
    assert_eq!(target.methods["MT.T"].sources.item_groups["IG.TGT"].len(), 1);
    assert!(audit_sources(&target).is_empty());
}

#[test]
fn cross_document_copy_brings_missing_shared_entities() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.SEX", "IR.AGE", "IR.PARAM"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    assert_eq!(outcome.code_lists.len(), 1);
    assert_eq!(outcome.comments.len(), 1);
    assert_eq!(outcome.methods.len(), 1);
    assert_eq!(outcome.leafs.len(), 1);
    assert!(target.leafs.contains_key("LF.SAP"));
    assert_eq!(target.order.code_list_order.len(), 1);
    assert!(audit_sources(&target).is_empty());
}

#[test]
fn leaf_with_taken_id_is_renamed() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    target
        .leafs
        .insert("LF.SAP".to_string(), Leaf::new("LF.SAP", "other.pdf"));
    target.order.leaf_order.push("LF.SAP".to_string());

    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.PARAM"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    let renamed = outcome.mapped(OidKind::Leaf, "LF.SAP").unwrap().to_string();
    assert_ne!(renamed, "LF.SAP");
    assert!(renamed.starts_with("LF."));
    assert_eq!(target.leafs[&renamed].href, "sap.pdf");
    assert_eq!(target.leafs["LF.SAP"].href, "other.pdf");
    let method = target.methods.values().next().unwrap();
    assert_eq!(method.body.documents[0].leaf_id, renamed);
}

#[test]
fn equal_leaf_under_other_id_is_reused() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    target
        .leafs
        .insert("LF.PLAN".to_string(), Leaf::new("LF.PLAN", "sap.pdf"));

    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.PARAM"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    assert!(outcome.leafs.is_empty());
    let method = target.methods.values().next().unwrap();
    assert_eq!(method.body.documents[0].leaf_id, "LF.PLAN");
}

#[test]
fn predecessor_copy_drops_method_and_comment() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let options = CopyOptions::default().with_predecessor(true);
    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.AGE", "IR.PARAM"], tgt()),
        &options,
        &mut OidRegistry::new(),
    );

    assert!(outcome.methods.is_empty());
    assert!(outcome.comments.is_empty());
    let age = item_by_name(&target, &tgt(), "AGE");
    assert!(age.comment_oid.is_none());
    assert_eq!(age.origins.len(), 1);
    assert_eq!(age.origins[0].origin_type.as_deref(), Some(PREDECESSOR_ORIGIN));
    insta::assert_snapshot!(age.origins[0].descriptions[0].value.as_str(), @"ADSL.AGE");
    let owner = target.container(&tgt()).unwrap();
    assert!(owner.item_refs().values().all(|item_ref| item_ref.method_oid.is_none()));
}

// --- Value-level metadata ---

#[test]
fn value_list_is_copied_with_its_variable() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.AVAL", "IR.PARAM"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    assert_eq!(outcome.value_lists.len(), 1);
    assert_eq!(outcome.where_clauses.len(), 1);
    let aval = item_by_name(&target, &tgt(), "AVAL");
    let list_oid = aval.value_list_oid.clone().unwrap();
    let list = &target.value_lists[&list_oid];
    assert_eq!(list.sources.item_defs, vec![aval.oid.clone()]);
    let (_, vl_ref) = list.ordered_item_refs()[0];
    let child = &target.item_defs[&vl_ref.item_oid];
    assert_eq!(child.parent_item_def_oid.as_deref(), Some(aval.oid.as_str()));

    let param = item_by_name(&target, &tgt(), "PARAM");
    let clause = &target.where_clauses[vl_ref.where_clause_oid.as_ref().unwrap()];
    assert_eq!(clause.range_checks[0].item_oid.as_deref(), Some(param.oid.as_str()));
    assert_eq!(clause.range_checks[0].item_group_oid.as_deref(), Some("IG.TGT"));
    insta::assert_snapshot!(clause.to_text(&target), @"ADSL.PARAM EQ SYSBP");
    assert!(audit_sources(&target).is_empty());
}

#[test]
fn variable_copied_into_value_list_becomes_value_level() {
    let mut mdv = adsl_mdv();
    let source = mdv.clone();
    let vl_aval = Container::ValueList("VL.AVAL".to_string());
    copy_into(
        &mut mdv,
        &source,
        &request(adsl(), &["IR.AVALU"], vl_aval.clone()),
        &same_define(),
        &mut OidRegistry::new(),
    );

    let copied = item_by_name(&mdv, &vl_aval, "AVALU");
    assert_ne!(copied.oid, "IT.AVALU");
    assert!(copied.is_value_level());
    assert_eq!(copied.parent_item_def_oid.as_deref(), Some("IT.AVAL"));
    assert!(!mdv.item_defs["IT.AVALU"].is_value_level());
}

#[test]
fn range_check_variable_is_found_by_name_in_target() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let mut param = ItemDef::new("IT.T.PARAM", "PARAM");
    param.data_type = Some("text".to_string());
    target.item_defs.insert(param.oid.clone(), param);
    target
        .item_groups
        .get_mut("IG.TGT")
        .unwrap()
        .insert_item_ref("IR.T.PARAM".to_string(), ItemRef::new("IT.T.PARAM"), None);
    rebuild_sources(&mut target);

    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.AVAL"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    let clause = outcome.where_clauses.values().next().unwrap();
    assert_eq!(clause.range_checks[0].item_oid.as_deref(), Some("IT.T.PARAM"));
    assert_eq!(clause.range_checks[0].item_group_oid.as_deref(), Some("IG.TGT"));
}

#[test]
fn range_check_without_match_is_cleared() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.AVAL"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    let clause = outcome.where_clauses.values().next().unwrap();
    assert!(clause.range_checks[0].item_oid.is_none());
    assert!(clause.range_checks[0].item_group_oid.is_none());
    assert_eq!(clause.range_checks[0].check_values, vec!["SYSBP"]);
}

#[test]
fn range_check_is_not_matched_in_another_dataset() {
    let source = adsl_mdv();
    let mut target = MetaDataVersion::new("MDV.V", "Study V");
    let mut aval = ItemDef::new("IT.V.AVAL", "AVAL");
    aval.value_list_oid = Some("VL.V.AVAL".to_string());
    let mut advs = ItemGroup::new("IG.ADVS", "ADVS");
    for item_def in [ItemDef::new("IT.V.PARAM", "PARAM"), aval] {
        let ref_oid = item_def.oid.replace("IT.", "IR.");
        advs.insert_item_ref(ref_oid, ItemRef::new(item_def.oid.clone()), None);
        target.item_defs.insert(item_def.oid.clone(), item_def);
    }
    target.item_groups.insert(advs.oid.clone(), advs);
    target.order.item_group_order.push("IG.ADVS".to_string());
    target
        .value_lists
        .insert("VL.V.AVAL".to_string(), ValueList::new("VL.V.AVAL"));
    rebuild_sources(&mut target);

    let vl_target = Container::ValueList("VL.V.AVAL".to_string());
    let outcome = copy_into(
        &mut target,
        &source,
        &request(
            Container::ValueList("VL.AVAL".to_string()),
            &["IR.VL.SYSBP"],
            vl_target.clone(),
        ),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    );

    let clause = outcome.where_clauses.values().next().unwrap();
    assert!(clause.range_checks[0].item_oid.is_none());
    assert!(clause.range_checks[0].item_group_oid.is_none());
    let copied = item_by_name(&target, &vl_target, "AVAL");
    assert_eq!(copied.parent_item_def_oid.as_deref(), Some("IT.V.AVAL"));
}

#[test]
fn copy_without_vlm_drops_value_list() {
    let source = adsl_mdv();
    let mut target = target_mdv();
    let options = CopyOptions::default().with_copy_vlm(false);
    let outcome = copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.AVAL"], tgt()),
        &options,
        &mut OidRegistry::new(),
    );

    assert!(outcome.value_lists.is_empty());
    assert!(item_by_name(&target, &tgt(), "AVAL").value_list_oid.is_none());
    assert!(target.value_lists.is_empty());
}

#[test]
fn strict_copy_fails_on_missing_source_codelist() {
    let mut source = adsl_mdv();
    source.code_lists.remove("CL.SEX");
    let target = target_mdv();
    let error = copy_variables(
        &target,
        &source,
        &request(adsl(), &["IR.SEX"], tgt()),
        &CopyOptions::default(),
        &mut OidRegistry::new(),
    )
    .unwrap_err();
    insta::assert_snapshot!(error.to_string(), @"Dangling reference in codeListOid: CL.SEX");
}

#[test]
fn permissive_copy_clears_missing_source_codelist() {
    let mut source = adsl_mdv();
    source.code_lists.remove("CL.SEX");
    let mut target = target_mdv();
    let options = CopyOptions {
        reference_mode: ReferenceMode::Permissive,
        ..CopyOptions::default()
    };
    copy_into(
        &mut target,
        &source,
        &request(adsl(), &["IR.SEX"], tgt()),
        &options,
        &mut OidRegistry::new(),
    );
    assert!(item_by_name(&target, &tgt(), "SEX").code_list_oid.is_none());
}

proptest! {
    #[test]
    fn repeated_copies_never_collide(rounds in 1usize..5) {
        let mut mdv = adsl_mdv();
        let source = mdv.clone();
        let mut registry = OidRegistry::new();
        let copy = request(adsl(), &["IR.AGE", "IR.SEX"], adsl());
        for _ in 0..rounds {
            copy_into(&mut mdv, &source, &copy, &same_define(), &mut registry);
        }
        let group = &mdv.item_groups["IG.ADSL"];
        prop_assert_eq!(group.item_ref_order.len(), 5 + 2 * rounds);
        prop_assert_eq!(mdv.item_defs.len(), 6 + 2 * rounds);
        prop_assert!(audit_sources(&mdv).is_empty());
    }
}
