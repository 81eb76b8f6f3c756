//! Tests for parsing complete Define-XML documents.

use define_model::{
    CodeListType, DefineConfig, ItemRefContainer, ModelError, OidKind, ReferenceMode, YesNo,
    audit_sources,
};
use define_parse::{ParseError, parse_define_json, parse_define_str};
use serde_json::json;

const DEFINE_21: &str = include_str!("fixtures/define21.xml");

fn parse(xml: &str) -> define_parse::Result<define_model::Odm> {
    parse_define_str(xml, &DefineConfig::default())
}

/// Minimal document around a MetaDataVersion body.
fn wrap(mdv_attrs: &str, body: &str) -> String {
    format!(
        r#"<ODM xmlns:def="http://www.cdisc.org/ns/def/v2.1" FileOID="DEF.T" ODMVersion="1.3.2">
  <Study OID="ST.T">
    <MetaDataVersion OID="MDV.T" Name="Test" {mdv_attrs}>
      {body}
    </MetaDataVersion>
  </Study>
</ODM>"#
    )
}

// --- Document header ---

#[test]
fn reads_odm_and_study_attributes() {
    let odm = parse(DEFINE_21).unwrap();
    assert_eq!(odm.file_oid, "DEF.STUDY01");
    assert_eq!(odm.odm_version, "1.3.2");
    assert_eq!(odm.context.as_deref(), Some("Submission"));
    assert_eq!(odm.originator.as_deref(), Some("Data Management"));
    assert_eq!(
        odm.namespaces.def.as_deref(),
        Some("http://www.cdisc.org/ns/def/v2.1")
    );
    assert_eq!(odm.study.oid, "ST.STUDY01");
    assert_eq!(
        odm.study.global_variables.study_description.as_deref(),
        Some("Phase II dose finding")
    );

    let mdv = odm.mdv();
    assert_eq!(mdv.oid, "MDV.STUDY01");
    assert_eq!(mdv.define_version.as_deref(), Some("2.1.0"));
    assert_eq!(mdv.descriptions[0].value, "SDTM metadata");
}

#[test]
fn derives_model_and_language() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();
    assert_eq!(mdv.model.as_deref(), Some("SDTM"));
    assert_eq!(mdv.lang.as_deref(), Some("en"));
    assert_eq!(mdv.order.standard_order, vec!["STD.SDTMIG", "STD.CT"]);
    assert!(mdv.standards["STD.SDTMIG"].is_default());
}

// --- Datasets and variables ---

#[test]
fn orders_item_refs_by_order_number() {
    let odm = parse(DEFINE_21).unwrap();
    let dm = &odm.mdv().item_groups["IG.DM"];
    let names: Vec<&str> = dm
        .ordered_item_refs()
        .into_iter()
        .map(|(_, item_ref)| item_ref.item_oid.as_str())
        .collect();
    assert_eq!(names, vec!["IT.STUDYID", "IT.USUBJID", "IT.SEX", "IT.AGE"]);
}

#[test]
fn key_order_only_contains_key_variables() {
    let odm = parse(DEFINE_21).unwrap();
    let dm = &odm.mdv().item_groups["IG.DM"];
    let keys: Vec<&str> = dm
        .key_order
        .iter()
        .map(|oid| dm.item_refs[oid].item_oid.as_str())
        .collect();
    assert_eq!(keys, vec!["IT.STUDYID", "IT.USUBJID"]);
}

#[test]
fn item_ref_oids_are_minted() {
    let odm = parse(DEFINE_21).unwrap();
    let dm = &odm.mdv().item_groups["IG.DM"];
    assert_eq!(dm.item_refs.len(), 4);
    assert!(
        dm.item_refs
            .keys()
            .all(|oid| OidKind::classify(oid) == Some(OidKind::ItemRef))
    );
}

#[test]
fn reads_item_group_attributes() {
    let odm = parse(DEFINE_21).unwrap();
    let dm = &odm.mdv().item_groups["IG.DM"];
    assert_eq!(dm.domain.as_deref(), Some("DM"));
    assert_eq!(dm.dataset_name.as_deref(), Some("DM"));
    assert_eq!(dm.repeating, YesNo::No);
    assert_eq!(dm.archive_location_id.as_deref(), Some("LF.DM"));
    assert_eq!(dm.standard_oid.as_deref(), Some("STD.SDTMIG"));
    assert_eq!(
        dm.dataset_class.as_ref().map(|class| class.name.as_str()),
        Some("SPECIAL PURPOSE")
    );
    let leaf = dm.leaf.as_ref().unwrap();
    assert_eq!(leaf.href, "dm.xpt");
    assert_eq!(leaf.title.as_deref(), Some("dm.xpt"));
}

#[test]
fn reads_item_def_attributes() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();

    let sex = &mdv.item_defs["IT.SEX"];
    assert_eq!(sex.length, Some(1));
    assert_eq!(sex.field_name.as_deref(), Some("SEX"));
    assert_eq!(sex.code_list_oid.as_deref(), Some("CL.SEX"));
    let origin = &sex.origins[0];
    assert_eq!(origin.origin_type.as_deref(), Some("Collected"));
    assert_eq!(origin.source.as_deref(), Some("Investigator"));
    assert_eq!(origin.documents[0].leaf_id, "LF.acrf");

    let studyid = &mdv.item_defs["IT.STUDYID"];
    assert_eq!(studyid.field_name.as_deref(), Some("STUDYID"));
}

// --- Back-references ---

#[test]
fn sources_are_consistent_after_parse() {
    let odm = parse(DEFINE_21).unwrap();
    assert!(audit_sources(odm.mdv()).is_empty());
}

#[test]
fn shared_entities_know_their_users() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();

    assert_eq!(mdv.code_lists["CL.SEX"].sources.item_defs, vec!["IT.SEX"]);
    assert_eq!(mdv.comments["COM.AGE"].sources.item_defs, vec!["IT.AGE"]);
    assert_eq!(mdv.methods["MT.AGE"].sources.item_groups["IG.DM"].len(), 1);
    assert_eq!(
        mdv.value_lists["VL.VS.VSORRES"].sources.item_defs,
        vec!["IT.VS.VSORRES"]
    );
    assert_eq!(
        mdv.where_clauses["WC.VS.SYSBP"].sources.value_lists,
        vec!["VL.VS.VSORRES"]
    );

    let mut studyid_groups = mdv.item_defs["IT.STUDYID"].sources.item_groups.clone();
    studyid_groups.sort();
    assert_eq!(studyid_groups, vec!["IG.DM", "IG.VS"]);
}

#[test]
fn value_level_items_point_at_parent() {
    let odm = parse(DEFINE_21).unwrap();
    let sysbp = &odm.mdv().item_defs["IT.VS.VSORRES.SYSBP"];
    assert_eq!(sysbp.parent_item_def_oid.as_deref(), Some("IT.VS.VSORRES"));
    assert!(sysbp.is_value_level());
}

#[test]
fn range_check_inherits_dataset_of_its_variable() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();
    let clause = &mdv.where_clauses["WC.VS.SYSBP"];
    assert_eq!(clause.range_checks[0].item_group_oid.as_deref(), Some("IG.VS"));
    insta::assert_snapshot!(clause.to_text(mdv), @"VS.VSTESTCD EQ SYSBP");
}

// --- Codelists, methods, comments ---

#[test]
fn code_list_storage_follows_item_kind() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();

    let sex = &mdv.code_lists["CL.SEX"];
    assert_eq!(sex.code_list_type, CodeListType::Decoded);
    assert_eq!(sex.coded_values(), vec!["M", "F"]);
    assert_eq!(sex.alias.as_ref().map(|a| a.name.as_str()), Some("C66731"));
    assert!(sex.enumerated_items.is_none());

    let ny = &mdv.code_lists["CL.NY"];
    assert_eq!(ny.code_list_type, CodeListType::Enumerated);
    assert_eq!(ny.coded_values(), vec!["Y", "N"]);

    let meddra = &mdv.code_lists["CL.MEDDRA"];
    assert_eq!(meddra.code_list_type, CodeListType::External);
    assert_eq!(
        meddra
            .external_code_list
            .as_ref()
            .and_then(|ext| ext.dictionary.as_deref()),
        Some("MedDRA")
    );

    assert_eq!(mdv.order.code_list_order, vec!["CL.SEX", "CL.NY", "CL.MEDDRA"]);
}

#[test]
fn method_and_comment_text_is_unescaped() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();
    let method = &mdv.methods["MT.AGE"];
    assert_eq!(method.method_type.as_deref(), Some("Computation"));
    assert_eq!(method.formal_expressions[0].context.as_deref(), Some("SAS"));
    assert_eq!(
        mdv.comments["COM.AGE"].body.descriptions[0].value,
        "Age & birth date are collected on the CRF"
    );
}

#[test]
fn leafs_and_documents_are_read() {
    let odm = parse(DEFINE_21).unwrap();
    let mdv = odm.mdv();
    assert_eq!(mdv.order.leaf_order, vec!["LF.acrf"]);
    assert_eq!(mdv.leafs["LF.acrf"].title.as_deref(), Some("Annotated CRF"));
    assert_eq!(mdv.annotated_crf[0].leaf_id, "LF.acrf");
}

// --- Define-XML 2.0 ---

#[test]
fn define_20_standard_comes_from_mdv_attributes() {
    let xml = wrap(
        r#"def:DefineVersion="2.0.0" def:StandardName="SDTM-IG" def:StandardVersion="3.1.2""#,
        "",
    );
    let odm = parse(&xml).unwrap();
    let mdv = odm.mdv();
    assert_eq!(mdv.standards.len(), 1);
    let standard = mdv.default_standard().unwrap();
    assert_eq!(standard.version.as_deref(), Some("3.1.2"));
    assert_eq!(mdv.model.as_deref(), Some("SDTM"));
}

#[test]
fn missing_standard_leaves_model_unset() {
    let odm = parse(&wrap("", "")).unwrap();
    assert!(odm.mdv().model.is_none());
    assert_eq!(odm.mdv().lang.as_deref(), Some("en"));
}

#[test]
fn configured_default_lang_applies_without_translated_text() {
    let config = DefineConfig::default().with_default_lang("de");
    let odm = parse_define_str(&wrap("", ""), &config).unwrap();
    assert_eq!(odm.mdv().lang.as_deref(), Some("de"));
}

// --- Errors ---

#[test]
fn unexpected_root_is_rejected() {
    let error = parse("<Define/>").unwrap_err();
    assert!(matches!(
        error,
        ParseError::UnexpectedRoot { expected: "ODM", ref found } if found == "Define"
    ));
}

#[test]
fn item_group_without_description_is_malformed() {
    let xml = wrap("", r#"<ItemGroupDef OID="IG.DM" Name="DM"/>"#);
    let error = parse(&xml).unwrap_err();
    assert!(matches!(
        error,
        ParseError::MalformedDocument { ref element, .. } if element == "ItemGroupDef"
    ));
}

#[test]
fn duplicate_oid_is_rejected() {
    let xml = wrap(
        "",
        r#"<ItemDef OID="IT.AGE" Name="AGE"/><ItemDef OID="IT.AGE" Name="AGEU"/>"#,
    );
    let error = parse(&xml).unwrap_err();
    assert!(matches!(
        error,
        ParseError::Model(ModelError::DuplicateOid { ref oid, .. }) if oid == "IT.AGE"
    ));
}

#[test]
fn missing_required_attribute_is_reported() {
    let xml = wrap("", r#"<ItemDef OID="IT.AGE"/>"#);
    let error = parse(&xml).unwrap_err();
    assert!(matches!(
        error,
        ParseError::MissingAttribute { attribute: "name", .. }
    ));
}

#[test]
fn mixed_code_list_items_are_malformed() {
    let xml = wrap(
        "",
        r#"<CodeList OID="CL.X" Name="X">
             <CodeListItem CodedValue="A"/>
             <EnumeratedItem CodedValue="B"/>
           </CodeList>"#,
    );
    assert!(matches!(
        parse(&xml).unwrap_err(),
        ParseError::MalformedDocument { .. }
    ));
}

#[test]
fn invalid_comparator_is_rejected() {
    let xml = wrap(
        "",
        r#"<def:WhereClauseDef OID="WC.1"><RangeCheck Comparator="LIKE"/></def:WhereClauseDef>"#,
    );
    assert!(matches!(
        parse(&xml).unwrap_err(),
        ParseError::Model(ModelError::InvalidValue { .. })
    ));
}

const DANGLING_CODE_LIST: &str = r#"<ItemDef OID="IT.SEX" Name="SEX">
  <CodeListRef CodeListOID="CL.MISSING"/>
</ItemDef>"#;

#[test]
fn strict_mode_rejects_dangling_reference() {
    let xml = wrap("", DANGLING_CODE_LIST);
    let error = parse(&xml).unwrap_err();
    assert!(matches!(
        error,
        ParseError::Model(ModelError::DanglingReference { field: "codeListOid", ref oid })
            if oid == "CL.MISSING"
    ));
}

#[test]
fn permissive_mode_keeps_dangling_reference() {
    let xml = wrap("", DANGLING_CODE_LIST);
    let config = DefineConfig::default().with_reference_mode(ReferenceMode::Permissive);
    let odm = parse_define_str(&xml, &config).unwrap();
    assert_eq!(
        odm.mdv().item_defs["IT.SEX"].code_list_oid.as_deref(),
        Some("CL.MISSING")
    );
}

// --- JSON input ---

#[test]
fn json_input_matches_xml_shape() {
    let document = json!({
        "ODM": {
            "$": { "FileOID": "DEF.J", "ODMVersion": "1.3.2", "xmlns:def": "http://www.cdisc.org/ns/def/v2.1" },
            "Study": [{
                "$": { "OID": "ST.J" },
                "MetaDataVersion": [{
                    "$": { "OID": "MDV.J", "Name": "Json", "def:DefineVersion": "2.1.0" },
                    "def:Standards": [{
                        "def:Standard": [{
                            "$": { "OID": "STD.1", "Name": "ADaMIG", "Type": "IG", "Version": "1.1" }
                        }]
                    }],
                    "ItemGroupDef": [{
                        "$": { "OID": "IG.ADSL", "Name": "ADSL", "Repeating": "No" },
                        "Description": [{
                            "TranslatedText": [{ "_": "Subject-Level Analysis Dataset", "$": { "xml:lang": "fr" } }]
                        }],
                        "ItemRef": [
                            { "$": { "ItemOID": "IT.AGE", "OrderNumber": "2" } },
                            { "$": { "ItemOID": "IT.USUBJID", "OrderNumber": "1", "KeySequence": "1" } }
                        ]
                    }],
                    "ItemDef": [
                        { "$": { "OID": "IT.USUBJID", "Name": "USUBJID", "DataType": "text" } },
                        { "$": { "OID": "IT.AGE", "Name": "AGE", "DataType": "integer", "Length": 3 } }
                    ]
                }]
            }]
        }
    });

    let odm = parse_define_json(&document, &DefineConfig::default()).unwrap();
    let mdv = odm.mdv();
    assert_eq!(mdv.model.as_deref(), Some("ADaM"));
    assert_eq!(mdv.lang.as_deref(), Some("fr"));
    assert_eq!(mdv.item_defs["IT.AGE"].length, Some(3));

    let adsl = &mdv.item_groups["IG.ADSL"];
    let order: Vec<&str> = adsl
        .ordered_item_refs()
        .into_iter()
        .map(|(_, item_ref)| item_ref.item_oid.as_str())
        .collect();
    assert_eq!(order, vec!["IT.USUBJID", "IT.AGE"]);
    assert!(audit_sources(mdv).is_empty());
}
