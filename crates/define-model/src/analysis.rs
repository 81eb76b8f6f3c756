//! Analysis Results Metadata (ARM) displays and results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::text::{Document, TranslatedText, impl_describable, impl_documentable};

/// Dataset used by an analysis result, with its selection and variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDataset {
    pub item_group_oid: String,
    pub where_clause_oid: Option<String>,
    pub analysis_variable_oids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    pub descriptions: Vec<TranslatedText>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgrammingCode {
    pub context: Option<String>,
    pub code: Option<String>,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub oid: String,
    pub parameter_oid: Option<String>,
    pub analysis_reason: Option<String>,
    pub analysis_purpose: Option<String>,
    pub descriptions: Vec<TranslatedText>,
    pub documentation: Option<Documentation>,
    pub programming_code: Option<ProgrammingCode>,
    /// Keyed by ItemGroup OID.
    pub analysis_datasets: BTreeMap<String, AnalysisDataset>,
    pub analysis_dataset_order: Vec<String>,
    pub analysis_datasets_comment_oid: Option<String>,
}

impl AnalysisResult {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            parameter_oid: None,
            analysis_reason: None,
            analysis_purpose: None,
            descriptions: Vec::new(),
            documentation: None,
            programming_code: None,
            analysis_datasets: BTreeMap::new(),
            analysis_dataset_order: Vec::new(),
            analysis_datasets_comment_oid: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDisplay {
    pub oid: String,
    pub name: String,
    pub descriptions: Vec<TranslatedText>,
    pub documents: Vec<Document>,
    pub analysis_results: BTreeMap<String, AnalysisResult>,
    pub analysis_result_order: Vec<String>,
}

impl ResultDisplay {
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            descriptions: Vec::new(),
            documents: Vec::new(),
            analysis_results: BTreeMap::new(),
            analysis_result_order: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResultDisplays {
    pub result_displays: BTreeMap<String, ResultDisplay>,
    pub result_display_order: Vec<String>,
}

impl AnalysisResultDisplays {
    pub fn is_empty(&self) -> bool {
        self.result_displays.is_empty()
    }

    /// Every analysis result across all displays.
    pub fn analysis_results(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.result_displays
            .values()
            .flat_map(|display| display.analysis_results.values())
    }

    pub fn analysis_results_mut(&mut self) -> impl Iterator<Item = &mut AnalysisResult> {
        self.result_displays
            .values_mut()
            .flat_map(|display| display.analysis_results.values_mut())
    }

    pub fn find_analysis_result_mut(&mut self, oid: &str) -> Option<&mut AnalysisResult> {
        self.result_displays
            .values_mut()
            .find_map(|display| display.analysis_results.get_mut(oid))
    }
}

impl_describable!(AnalysisResult, ResultDisplay, Documentation);
impl_documentable!(ResultDisplay, Documentation, ProgrammingCode);
