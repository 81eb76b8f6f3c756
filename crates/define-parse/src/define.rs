//! Define-XML document parser.
//!
//! Entities are read bottom-up so that later passes can rely on earlier
//! ones: leafs and documents, standards, methods, comments, codelists,
//! where-clauses, value lists, datasets, variables, analysis results.
//! Afterwards the value-level parents are linked, every `sources` list is
//! rebuilt from the forward pointers in one pass, range checks without a
//! dataset get the dataset of their variable, and the model is derived from
//! the default standard.

use define_model::references::dangling_references;
use define_model::{
    DefineConfig, GlobalVariables, MetaDataVersion, Namespaces, Odm, OidKind, Study,
    TranslatedText, rebuild_sources,
};
use serde_json::Value;

use crate::elements::ParseContext;
use crate::elements::analysis::parse_result_displays;
use crate::elements::code_list::parse_code_list;
use crate::elements::common::{documents, expect_element, leaf};
use crate::elements::item_def::parse_item_def;
use crate::elements::item_group::{parse_item_group, parse_value_list};
use crate::elements::method::{parse_comment, parse_method};
use crate::elements::standard::parse_standards;
use crate::elements::where_clause::parse_where_clause;
use crate::error::Result;
use crate::tree::XmlNode;

/// Parse Define-XML text.
pub fn parse_define_str(xml: &str, config: &DefineConfig) -> Result<Odm> {
    let root = XmlNode::from_xml_str(xml)?;
    parse_define(&root, config)
}

/// Parse a document already converted to the xml2js JSON shape.
pub fn parse_define_json(value: &Value, config: &DefineConfig) -> Result<Odm> {
    let root = XmlNode::from_json(value)?;
    parse_define(&root, config)
}

/// Parse an `ODM` element tree into the entity model.
pub fn parse_define(root: &XmlNode, config: &DefineConfig) -> Result<Odm> {
    expect_element(root, "ODM")?;
    let mut ctx = ParseContext::new(config);

    let study_node = root.required_child("Study")?;
    let mdv_node = study_node.required_child("MetaDataVersion")?;
    let mdv = parse_mdv(mdv_node, &mut ctx)?;

    let globals = study_node.child("GlobalVariables");
    let global_text = |name: &str| {
        globals
            .and_then(|node| node.child_text(name))
            .map(str::to_string)
    };
    let study = Study {
        oid: ctx.claim(OidKind::Study, study_node.required_attr("oid")?)?,
        global_variables: GlobalVariables {
            study_name: global_text("StudyName"),
            study_description: global_text("StudyDescription"),
            protocol_name: global_text("ProtocolName"),
        },
        meta_data_version: mdv,
    };

    let attr = |key: &str| root.attr(key).map(str::to_string);
    let odm = Odm {
        file_oid: root.required_attr("fileOid")?.to_string(),
        file_type: root.attr("fileType").unwrap_or("Snapshot").to_string(),
        odm_version: root.attr("odmVersion").unwrap_or("1.3.2").to_string(),
        creation_date_time: attr("creationDateTime"),
        as_of_date_time: attr("asOfDateTime"),
        originator: attr("originator"),
        source_system: attr("sourceSystem"),
        source_system_version: attr("sourceSystemVersion"),
        context: attr("context"),
        namespaces: Namespaces {
            xmlns: attr("xmlns"),
            def: attr("def"),
            xlink: attr("xlink"),
            arm: attr("arm"),
        },
        study,
    };

    let mdv = odm.mdv();
    tracing::info!(
        item_groups = mdv.item_groups.len(),
        item_defs = mdv.item_defs.len(),
        code_lists = mdv.code_lists.len(),
        value_lists = mdv.value_lists.len(),
        where_clauses = mdv.where_clauses.len(),
        methods = mdv.methods.len(),
        comments = mdv.comments.len(),
        "parsed Define-XML"
    );
    Ok(odm)
}

fn parse_mdv(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<MetaDataVersion> {
    let oid = ctx.claim(OidKind::MetaDataVersion, node.required_attr("oid")?)?;
    let mut mdv = MetaDataVersion::new(oid, node.attr("name").unwrap_or_default());
    mdv.define_version = node.attr("defineVersion").map(str::to_string);
    mdv.comment_oid = node.attr("commentOid").map(str::to_string);
    if let Some(description) = node.attr("description") {
        mdv.descriptions
            .push(TranslatedText::new(None, description));
    }

    for leaf_node in node.children("leaf") {
        let parsed = leaf(leaf_node)?;
        ctx.claim(OidKind::Leaf, &parsed.id)?;
        mdv.order.leaf_order.push(parsed.id.clone());
        mdv.leafs.insert(parsed.id.clone(), parsed);
    }
    if let Some(crf) = node.child("AnnotatedCRF") {
        mdv.annotated_crf = documents(crf)?;
    }
    if let Some(supplemental) = node.child("SupplementalDoc") {
        mdv.supplemental_doc = documents(supplemental)?;
    }

    parse_standards(node, &mut mdv, ctx)?;

    for method_node in node.children("MethodDef") {
        let method = parse_method(method_node, ctx)?;
        mdv.methods.insert(method.oid.clone(), method);
    }
    for comment_node in node.children("CommentDef") {
        let comment = parse_comment(comment_node, ctx)?;
        mdv.comments.insert(comment.oid.clone(), comment);
    }
    tracing::debug!(
        leafs = mdv.leafs.len(),
        methods = mdv.methods.len(),
        comments = mdv.comments.len(),
        "parsed leafs, methods, and comments"
    );

    for code_list_node in node.children("CodeList") {
        let code_list = parse_code_list(code_list_node, ctx)?;
        mdv.order.code_list_order.push(code_list.oid.clone());
        mdv.code_lists.insert(code_list.oid.clone(), code_list);
    }
    for where_clause_node in node.children("WhereClauseDef") {
        let where_clause = parse_where_clause(where_clause_node, ctx)?;
        mdv.where_clauses
            .insert(where_clause.oid.clone(), where_clause);
    }
    for value_list_node in node.children("ValueListDef") {
        let list = parse_value_list(value_list_node, ctx)?;
        mdv.value_lists.insert(list.oid.clone(), list);
    }
    for group_node in node.children("ItemGroupDef") {
        let group = parse_item_group(group_node, ctx)?;
        mdv.order.item_group_order.push(group.oid.clone());
        mdv.item_groups.insert(group.oid.clone(), group);
    }
    for item_node in node.children("ItemDef") {
        let item_def = parse_item_def(item_node, ctx)?;
        mdv.item_defs.insert(item_def.oid.clone(), item_def);
    }
    if let Some(displays) = node.child("AnalysisResultDisplays") {
        mdv.analysis_result_displays = parse_result_displays(displays, ctx)?;
    }
    tracing::debug!(
        code_lists = mdv.code_lists.len(),
        where_clauses = mdv.where_clauses.len(),
        value_lists = mdv.value_lists.len(),
        item_groups = mdv.item_groups.len(),
        item_defs = mdv.item_defs.len(),
        "parsed datasets and variables"
    );

    link_value_level_parents(&mut mdv);
    rebuild_sources(&mut mdv);
    fill_range_check_groups(&mut mdv);

    if mdv.derive_model().is_none() {
        tracing::warn!(mdv = %mdv.oid, "no default standard, model left unset");
    }
    mdv.lang = Some(
        ctx.lang
            .clone()
            .unwrap_or_else(|| ctx.config.default_lang.clone()),
    );

    check_references(&mdv, ctx)?;
    Ok(mdv)
}

/// Mark every item of a value list with the variable that owns the list.
fn link_value_level_parents(mdv: &mut MetaDataVersion) {
    let links: Vec<(String, String)> = mdv
        .item_defs
        .values()
        .filter_map(|item_def| {
            item_def
                .value_list_oid
                .as_ref()
                .map(|list_oid| (item_def.oid.clone(), list_oid.clone()))
        })
        .collect();

    for (parent_oid, list_oid) in links {
        let Some(list) = mdv.value_lists.get(&list_oid) else {
            continue;
        };
        let children: Vec<String> = list
            .item_refs
            .values()
            .map(|item_ref| item_ref.item_oid.clone())
            .collect();
        for child_oid in children {
            if let Some(child) = mdv.item_defs.get_mut(&child_oid) {
                child.parent_item_def_oid = Some(parent_oid.clone());
            }
        }
    }
}

/// Range checks without a dataset use the first dataset of their variable.
///
/// A value-level variable is looked up through its parent.
fn fill_range_check_groups(mdv: &mut MetaDataVersion) {
    let group_of = |item_oid: &str| -> Option<String> {
        let item_def = mdv.item_defs.get(item_oid)?;
        item_def
            .sources
            .item_groups
            .first()
            .or_else(|| {
                let parent = mdv.item_defs.get(item_def.parent_item_def_oid.as_deref()?)?;
                parent.sources.item_groups.first()
            })
            .cloned()
    };

    let mut updates = Vec::new();
    for (clause_oid, clause) in &mdv.where_clauses {
        for (index, check) in clause.range_checks.iter().enumerate() {
            if check.item_group_oid.is_none()
                && let Some(group_oid) = check.item_oid.as_deref().and_then(group_of)
            {
                updates.push((clause_oid.clone(), index, group_oid));
            }
        }
    }
    for (clause_oid, index, group_oid) in updates {
        if let Some(check) = mdv
            .where_clauses
            .get_mut(&clause_oid)
            .and_then(|clause| clause.range_checks.get_mut(index))
        {
            check.item_group_oid = Some(group_oid);
        }
    }
}

fn check_references(mdv: &MetaDataVersion, ctx: &ParseContext<'_>) -> Result<()> {
    let dangling = dangling_references(mdv);
    if ctx.config.reference_mode.is_strict() {
        if let Some(pointer) = dangling.into_iter().next() {
            return Err(pointer.into_error().into());
        }
        return Ok(());
    }
    for pointer in &dangling {
        tracing::warn!(
            owner = %pointer.owner,
            field = pointer.field,
            oid = %pointer.oid,
            "unresolved reference kept"
        );
    }
    Ok(())
}
