use define_model::{Comparator, OidKind, RangeCheck, WhereClause};

use super::ParseContext;
use crate::error::Result;
use crate::tree::XmlNode;

fn range_check(node: &XmlNode) -> Result<RangeCheck> {
    let comparator: Comparator = node.required_attr("comparator")?.parse()?;
    Ok(RangeCheck {
        comparator,
        soft_hard: node.attr("softHard").map(str::to_string),
        item_oid: node.attr("itemOid").map(str::to_string),
        item_group_oid: node.attr("itemGroupOid").map(str::to_string),
        check_values: node
            .children("CheckValue")
            .iter()
            .map(|value| value.text().unwrap_or_default().to_string())
            .collect(),
    })
}

pub(crate) fn parse_where_clause(
    node: &XmlNode,
    ctx: &mut ParseContext<'_>,
) -> Result<WhereClause> {
    let oid = ctx.claim(OidKind::WhereClause, node.required_attr("oid")?)?;
    let mut where_clause = WhereClause::new(oid);
    where_clause.comment_oid = node.attr("commentOid").map(str::to_string);
    for check in node.children("RangeCheck") {
        where_clause.add_range_check(range_check(check)?);
    }
    Ok(where_clause)
}
