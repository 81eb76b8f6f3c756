//! Shared fixtures for define-edit tests.

#![allow(dead_code)]

use define_model::{
    CodeList, CodeListItem, CodeListType, Comment, Comparator, Document, ItemDef, ItemGroup,
    ItemRef, ItemRefContainer, Leaf, MetaDataVersion, Method, OidRegistry, RangeCheck,
    TranslatedText, ValueList, WhereClause, rebuild_sources,
};

pub fn oids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

pub fn sex_code_list(oid: &str) -> CodeList {
    let mut registry = OidRegistry::new();
    let mut code_list = CodeList::new(oid, "Sex", CodeListType::Decoded);
    for (coded, decode) in [("M", "Male"), ("F", "Female")] {
        let mut item = CodeListItem::new(coded);
        item.decodes.push(TranslatedText::new(Some("en"), decode));
        code_list
            .add_code_list_item(item, &mut registry)
            .expect("decoded codelist");
    }
    code_list
}

pub fn derivation_method(oid: &str, leaf_id: &str) -> Method {
    let mut method = Method::new(oid, "Derivation");
    method.method_type = Some("Computation".to_string());
    method
        .body
        .descriptions
        .push(TranslatedText::new(Some("en"), "Derived from raw values"));
    method.body.documents.push(Document::new(leaf_id));
    method
}

fn add_variable(mdv: &mut MetaDataVersion, group: &mut ItemGroup, ref_oid: &str, item: ItemDef) {
    group.insert_item_ref(ref_oid.to_string(), ItemRef::new(item.oid.clone()), None);
    mdv.item_defs.insert(item.oid.clone(), item);
}

/// ADSL with AVAL (method, value list), AVALU, PARAM (same method), SEX
/// (codelist), and AGE (comment).
///
/// The value list of AVAL has one entry, AVAL.SYSBP, selected by
/// `PARAM EQ SYSBP`.
pub fn adsl_mdv() -> MetaDataVersion {
    let mut mdv = MetaDataVersion::new("MDV.A", "Study A");
    mdv.lang = Some("en".to_string());

    mdv.leafs
        .insert("LF.SAP".to_string(), Leaf::new("LF.SAP", "sap.pdf"));
    mdv.order.leaf_order.push("LF.SAP".to_string());
    mdv.methods
        .insert("MT.DERIV".to_string(), derivation_method("MT.DERIV", "LF.SAP"));
    let mut comment = Comment::new("COM.AGE");
    comment
        .body
        .descriptions
        .push(TranslatedText::new(Some("en"), "Age at consent"));
    mdv.comments.insert(comment.oid.clone(), comment);
    mdv.code_lists
        .insert("CL.SEX".to_string(), sex_code_list("CL.SEX"));
    mdv.order.code_list_order.push("CL.SEX".to_string());

    let mut adsl = ItemGroup::new("IG.ADSL", "ADSL");
    let mut aval = ItemDef::new("IT.AVAL", "AVAL");
    aval.data_type = Some("float".to_string());
    aval.length = Some(8);
    aval.value_list_oid = Some("VL.AVAL".to_string());
    aval.descriptions
        .push(TranslatedText::new(Some("en"), "Analysis Value"));
    add_variable(&mut mdv, &mut adsl, "IR.AVAL", aval);
    add_variable(&mut mdv, &mut adsl, "IR.AVALU", ItemDef::new("IT.AVALU", "AVALU"));
    add_variable(&mut mdv, &mut adsl, "IR.PARAM", ItemDef::new("IT.PARAM", "PARAM"));
    let mut sex = ItemDef::new("IT.SEX", "SEX");
    sex.code_list_oid = Some("CL.SEX".to_string());
    add_variable(&mut mdv, &mut adsl, "IR.SEX", sex);
    let mut age = ItemDef::new("IT.AGE", "AGE");
    age.comment_oid = Some("COM.AGE".to_string());
    add_variable(&mut mdv, &mut adsl, "IR.AGE", age);
    for ref_oid in ["IR.AVAL", "IR.PARAM"] {
        if let Some(item_ref) = adsl.item_refs.get_mut(ref_oid) {
            item_ref.method_oid = Some("MT.DERIV".to_string());
        }
    }
    adsl.key_order.push("IR.PARAM".to_string());
    mdv.item_groups.insert(adsl.oid.clone(), adsl);
    mdv.order.item_group_order.push("IG.ADSL".to_string());

    let mut sysbp = ItemDef::new("IT.AVAL.SYSBP", "AVAL");
    sysbp.parent_item_def_oid = Some("IT.AVAL".to_string());
    mdv.item_defs.insert(sysbp.oid.clone(), sysbp);
    let mut where_clause = WhereClause::new("WC.SYSBP");
    where_clause.add_range_check(
        RangeCheck::new(Comparator::Eq, "IT.PARAM")
            .with_item_group("IG.ADSL")
            .with_values(["SYSBP"]),
    );
    mdv.where_clauses
        .insert(where_clause.oid.clone(), where_clause);
    let mut value_list = ValueList::new("VL.AVAL");
    let mut vl_ref = ItemRef::new("IT.AVAL.SYSBP");
    vl_ref.where_clause_oid = Some("WC.SYSBP".to_string());
    value_list.insert_item_ref("IR.VL.SYSBP".to_string(), vl_ref, None);
    mdv.value_lists.insert(value_list.oid.clone(), value_list);

    rebuild_sources(&mut mdv);
    mdv
}

/// An empty study with one dataset, `IG.TGT` named ADSL.
pub fn target_mdv() -> MetaDataVersion {
    let mut mdv = MetaDataVersion::new("MDV.T", "Study T");
    mdv.lang = Some("en".to_string());
    mdv.item_groups
        .insert("IG.TGT".to_string(), ItemGroup::new("IG.TGT", "ADSL"));
    mdv.order.item_group_order.push("IG.TGT".to_string());
    mdv
}
