use define_model::{ItemDef, OidKind};

use super::ParseContext;
use super::common::{alias, descriptions, origin, ref_oid};
use crate::error::Result;
use crate::tree::XmlNode;

pub(crate) fn parse_item_def(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<ItemDef> {
    let oid = ctx.claim(OidKind::ItemDef, node.required_attr("oid")?)?;
    let mut item_def = ItemDef::new(oid, node.required_attr("name")?);
    item_def.data_type = node.attr("dataType").map(str::to_string);
    item_def.length = node.u32_attr("length")?;
    item_def.fraction_digits = node.u32_attr("significantDigits")?;
    item_def.field_name = node
        .attr("sasFieldName")
        .map(str::to_string)
        .or(item_def.field_name);
    item_def.display_format = node.attr("displayFormat").map(str::to_string);
    item_def.comment_oid = node.attr("commentOid").map(str::to_string);
    item_def.code_list_oid = ref_oid(node, "CodeListRef", "codeListOid")?;
    item_def.value_list_oid = ref_oid(node, "ValueListRef", "valueListOid")?;
    item_def.descriptions = descriptions(node, ctx);
    item_def.alias = alias(node)?;
    for origin_node in node.children("Origin") {
        item_def.add_origin(origin(origin_node, ctx)?);
    }
    Ok(item_def)
}
