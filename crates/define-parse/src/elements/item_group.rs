//! `ItemGroupDef`, `def:ValueListDef`, and the `ItemRef`s they own.

use std::collections::BTreeMap;

use define_model::{DatasetClass, ItemGroup, ItemRef, OidKind, ValueList, YesNo};

use super::ParseContext;
use super::common::{alias, descriptions, leaf, ref_oid, required_descriptions};
use crate::error::Result;
use crate::order::{derive_explicit_order, derive_order};
use crate::tree::XmlNode;

/// Item refs with minted OIDs plus their display and key order.
pub(crate) struct ParsedItemRefs {
    pub item_refs: BTreeMap<String, ItemRef>,
    pub item_ref_order: Vec<String>,
    pub key_order: Vec<String>,
}

pub(crate) fn parse_item_refs(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<ParsedItemRefs> {
    let mut item_refs = BTreeMap::new();
    let mut positions = Vec::new();
    let mut keys = Vec::new();

    for ref_node in node.children("ItemRef") {
        let oid = ctx.mint(OidKind::ItemRef);
        let mut item_ref = ItemRef::new(ref_node.required_attr("itemOid")?);
        item_ref.mandatory = ref_node.parsed_attr("mandatory")?.unwrap_or(YesNo::No);
        item_ref.method_oid = ref_node.attr("methodOid").map(str::to_string);
        item_ref.role = ref_node.attr("role").map(str::to_string);
        item_ref.role_code_list_oid = ref_node.attr("roleCodeListOid").map(str::to_string);
        item_ref.where_clause_oid = ref_oid(ref_node, "WhereClauseRef", "whereClauseOid")?;
        item_ref.is_non_standard = ref_node.parsed_attr("isNonStandard")?;
        item_ref.has_no_data = ref_node.parsed_attr("hasNoData")?;

        positions.push((oid.clone(), ref_node.u32_attr("orderNumber")?));
        keys.push((oid.clone(), ref_node.u32_attr("keySequence")?));
        item_refs.insert(oid, item_ref);
    }

    Ok(ParsedItemRefs {
        item_refs,
        item_ref_order: derive_order(positions),
        key_order: derive_explicit_order(keys),
    })
}

/// Define-XML 2.1 `def:Class` element, or the 2.0 `def:Class` attribute.
fn dataset_class(node: &XmlNode) -> Result<Option<DatasetClass>> {
    if let Some(class) = node.child("Class") {
        let sub_classes = class
            .children("SubClass")
            .iter()
            .map(|sub| sub.required_attr("name").map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        return Ok(Some(DatasetClass {
            name: class.required_attr("name")?.to_string(),
            sub_classes,
        }));
    }
    Ok(node.attr("class").map(|name| DatasetClass {
        name: name.to_string(),
        sub_classes: Vec::new(),
    }))
}

pub(crate) fn parse_item_group(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<ItemGroup> {
    let oid = ctx.claim(OidKind::ItemGroup, node.required_attr("oid")?)?;
    let mut group = ItemGroup::new(oid, node.required_attr("name")?);
    group.domain = node.attr("domain").map(str::to_string);
    group.dataset_name = node.attr("sasDatasetName").map(str::to_string);
    group.repeating = node.parsed_attr("repeating")?.unwrap_or(YesNo::Yes);
    group.is_reference_data = node.parsed_attr("isReferenceData")?;
    group.purpose = node.attr("purpose").map(str::to_string);
    group.structure = node.attr("structure").map(str::to_string);
    group.archive_location_id = node.attr("archiveLocationId").map(str::to_string);
    group.comment_oid = node.attr("commentOid").map(str::to_string);
    group.is_non_standard = node.parsed_attr("isNonStandard")?;
    group.standard_oid = node.attr("standardOid").map(str::to_string);
    group.has_no_data = node.parsed_attr("hasNoData")?;
    group.dataset_class = dataset_class(node)?;
    group.descriptions = required_descriptions(node, ctx)?;
    group.alias = alias(node)?;
    group.leaf = node.child("leaf").map(leaf).transpose()?;

    let parsed = parse_item_refs(node, ctx)?;
    group.item_refs = parsed.item_refs;
    group.item_ref_order = parsed.item_ref_order;
    group.key_order = parsed.key_order;
    Ok(group)
}

pub(crate) fn parse_value_list(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<ValueList> {
    let oid = ctx.claim(OidKind::ValueList, node.required_attr("oid")?)?;
    let mut list = ValueList::new(oid);
    list.descriptions = descriptions(node, ctx);

    let parsed = parse_item_refs(node, ctx)?;
    list.item_refs = parsed.item_refs;
    list.item_ref_order = parsed.item_ref_order;
    list.key_order = parsed.key_order;
    Ok(list)
}
