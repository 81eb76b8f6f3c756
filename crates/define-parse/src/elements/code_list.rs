//! `CodeList` with decoded, enumerated, or external values.

use std::collections::BTreeMap;

use define_model::{
    CodeList, CodeListItem, CodeListType, EnumeratedItem, ExternalCodeList, OidKind,
};

use super::ParseContext;
use super::common::{alias, descriptions, translated_texts};
use crate::error::{ParseError, Result};
use crate::order::derive_order;
use crate::tree::XmlNode;

fn code_list_type(node: &XmlNode) -> Result<CodeListType> {
    let decoded = !node.children("CodeListItem").is_empty();
    let enumerated = !node.children("EnumeratedItem").is_empty();
    match (decoded, enumerated) {
        (true, true) => Err(ParseError::malformed(
            &node.name,
            "CodeListItem and EnumeratedItem cannot be mixed",
        )),
        (true, false) => Ok(CodeListType::Decoded),
        (false, true) => Ok(CodeListType::Enumerated),
        (false, false) if node.child("ExternalCodeList").is_some() => Ok(CodeListType::External),
        // An empty codelist is stored as enumerated.
        (false, false) => Ok(CodeListType::Enumerated),
    }
}

fn external(node: &XmlNode) -> ExternalCodeList {
    ExternalCodeList {
        dictionary: node.attr("dictionary").map(str::to_string),
        version: node.attr("version").map(str::to_string),
        reference: node.attr("ref").map(str::to_string),
        href: node.attr("href").map(str::to_string),
    }
}

pub(crate) fn parse_code_list(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<CodeList> {
    let oid = ctx.claim(OidKind::CodeList, node.required_attr("oid")?)?;
    let code_list_type = code_list_type(node)?;
    let mut code_list = CodeList::new(oid, node.required_attr("name")?, code_list_type);
    code_list.data_type = node.attr("dataType").map(str::to_string);
    code_list.sas_format_name = node.attr("sasFormatName").map(str::to_string);
    code_list.standard_oid = node.attr("standardOid").map(str::to_string);
    code_list.comment_oid = node.attr("commentOid").map(str::to_string);
    code_list.is_non_standard = node.parsed_attr("isNonStandard")?;
    code_list.descriptions = descriptions(node, ctx);
    code_list.alias = alias(node)?;

    let mut positions = Vec::new();
    match code_list_type {
        CodeListType::Decoded => {
            let mut items = BTreeMap::new();
            for item_node in node.children("CodeListItem") {
                let oid = ctx.mint(OidKind::CodeListItem);
                let decodes = item_node
                    .child("Decode")
                    .map(|decode| translated_texts(decode, ctx))
                    .unwrap_or_default();
                let item = CodeListItem {
                    coded_value: item_node.required_attr("codedValue")?.to_string(),
                    rank: item_node.attr("rank").map(str::to_string),
                    extended_value: item_node.parsed_attr("extendedValue")?,
                    decodes,
                    alias: alias(item_node)?,
                };
                positions.push((oid.clone(), item_node.u32_attr("orderNumber")?));
                items.insert(oid, item);
            }
            code_list.code_list_items = Some(items);
        }
        CodeListType::Enumerated => {
            let mut items = BTreeMap::new();
            for item_node in node.children("EnumeratedItem") {
                let oid = ctx.mint(OidKind::CodeListItem);
                let item = EnumeratedItem {
                    coded_value: item_node.required_attr("codedValue")?.to_string(),
                    rank: item_node.attr("rank").map(str::to_string),
                    extended_value: item_node.parsed_attr("extendedValue")?,
                    alias: alias(item_node)?,
                };
                positions.push((oid.clone(), item_node.u32_attr("orderNumber")?));
                items.insert(oid, item);
            }
            code_list.enumerated_items = Some(items);
        }
        CodeListType::External => {
            code_list.external_code_list = node.child("ExternalCodeList").map(external);
        }
    }
    code_list.item_order = derive_order(positions);
    Ok(code_list)
}
