//! Analysis Results Metadata (`arm:AnalysisResultDisplays`).

use define_model::{
    AnalysisDataset, AnalysisResult, AnalysisResultDisplays, Documentation, OidKind,
    ProgrammingCode, ResultDisplay,
};

use super::ParseContext;
use super::common::{descriptions, documents, ref_oid};
use crate::error::Result;
use crate::tree::XmlNode;

fn analysis_result(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<AnalysisResult> {
    let oid = ctx.claim(OidKind::AnalysisResult, node.required_attr("oid")?)?;
    let mut result = AnalysisResult::new(oid);
    result.parameter_oid = node.attr("parameterOid").map(str::to_string);
    result.analysis_reason = node.attr("analysisReason").map(str::to_string);
    result.analysis_purpose = node.attr("analysisPurpose").map(str::to_string);
    result.descriptions = descriptions(node, ctx);

    if let Some(datasets) = node.child("AnalysisDatasets") {
        result.analysis_datasets_comment_oid = datasets.attr("commentOid").map(str::to_string);
        for dataset_node in datasets.children("AnalysisDataset") {
            let dataset = AnalysisDataset {
                item_group_oid: dataset_node.required_attr("itemGroupOid")?.to_string(),
                where_clause_oid: ref_oid(dataset_node, "WhereClauseRef", "whereClauseOid")?,
                analysis_variable_oids: dataset_node
                    .children("AnalysisVariable")
                    .iter()
                    .map(|variable| variable.required_attr("itemOid").map(str::to_string))
                    .collect::<Result<Vec<_>>>()?,
            };
            result
                .analysis_dataset_order
                .push(dataset.item_group_oid.clone());
            result
                .analysis_datasets
                .insert(dataset.item_group_oid.clone(), dataset);
        }
    }

    if let Some(documentation) = node.child("Documentation") {
        result.documentation = Some(Documentation {
            descriptions: descriptions(documentation, ctx),
            documents: documents(documentation)?,
        });
    }
    if let Some(code) = node.child("ProgrammingCode") {
        result.programming_code = Some(ProgrammingCode {
            context: code.attr("context").map(str::to_string),
            code: code.child_text("Code").map(str::to_string),
            documents: documents(code)?,
        });
    }
    Ok(result)
}

fn result_display(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<ResultDisplay> {
    let oid = ctx.claim(OidKind::ResultDisplay, node.required_attr("oid")?)?;
    let mut display = ResultDisplay::new(oid, node.required_attr("name")?);
    display.descriptions = descriptions(node, ctx);
    display.documents = documents(node)?;
    for result_node in node.children("AnalysisResult") {
        let result = analysis_result(result_node, ctx)?;
        display.analysis_result_order.push(result.oid.clone());
        display.analysis_results.insert(result.oid.clone(), result);
    }
    Ok(display)
}

pub(crate) fn parse_result_displays(
    node: &XmlNode,
    ctx: &mut ParseContext<'_>,
) -> Result<AnalysisResultDisplays> {
    let mut displays = AnalysisResultDisplays::default();
    for display_node in node.children("ResultDisplay") {
        let display = result_display(display_node, ctx)?;
        displays.result_display_order.push(display.oid.clone());
        displays.result_displays.insert(display.oid.clone(), display);
    }
    Ok(displays)
}
