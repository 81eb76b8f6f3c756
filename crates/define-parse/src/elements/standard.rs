use define_model::{MetaDataVersion, OidKind, Standard, YesNo};

use super::ParseContext;
use crate::error::Result;
use crate::tree::XmlNode;

fn standard(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<Standard> {
    let oid = ctx.claim(OidKind::Standard, node.required_attr("oid")?)?;
    let mut standard = Standard::new(oid, node.required_attr("name")?);
    standard.standard_type = node.attr("type").map(str::to_string);
    standard.publishing_set = node.attr("publishingSet").map(str::to_string);
    standard.version = node.attr("version").map(str::to_string);
    standard.status = node.attr("status").map(str::to_string);
    standard.comment_oid = node.attr("commentOid").map(str::to_string);
    standard.is_default = node.parsed_attr("isDefault")?;
    Ok(standard)
}

/// Read `def:Standards`, or synthesize one standard from the
/// MetaDataVersion attributes of a Define-XML 2.0 document.
pub(crate) fn parse_standards(
    mdv_node: &XmlNode,
    mdv: &mut MetaDataVersion,
    ctx: &mut ParseContext<'_>,
) -> Result<()> {
    let declared = mdv_node
        .child("Standards")
        .map(|standards| standards.children("Standard"))
        .unwrap_or_default();

    for node in declared {
        let standard = standard(node, ctx)?;
        mdv.order.standard_order.push(standard.oid.clone());
        mdv.standards.insert(standard.oid.clone(), standard);
    }

    if declared.is_empty()
        && let Some(name) = mdv_node.attr("standardName")
    {
        let mut standard = Standard::new(ctx.mint(OidKind::Standard), name);
        standard.standard_type = Some("IG".to_string());
        standard.version = mdv_node.attr("standardVersion").map(str::to_string);
        standard.is_default = Some(YesNo::Yes);
        mdv.order.standard_order.push(standard.oid.clone());
        mdv.standards.insert(standard.oid.clone(), standard);
    }

    if mdv.default_standard().is_none() {
        let first_ig = mdv
            .order
            .standard_order
            .iter()
            .find(|oid| {
                mdv.standards
                    .get(*oid)
                    .is_some_and(|s| s.standard_type.as_deref() == Some("IG"))
            })
            .cloned();
        if let Some(oid) = first_ig
            && let Some(standard) = mdv.standards.get_mut(&oid)
        {
            tracing::debug!(standard = %standard.name, "no default standard declared, using first IG");
            standard.is_default = Some(YesNo::Yes);
        }
    }

    tracing::debug!(standards = mdv.standards.len(), "parsed standards");
    Ok(())
}
