//! Comments and methods.
//!
//! A [`Method`] embeds the same [`CommentBody`] a [`Comment`] has, plus a name,
//! a type, and formal expressions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::text::{Describable, Document, Documentable, TranslatedText};

/// Descriptions plus document references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub descriptions: Vec<TranslatedText>,
    pub documents: Vec<Document>,
}

/// Back-references of a comment, one list per kind of commentable entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSources {
    pub item_defs: Vec<String>,
    pub item_groups: Vec<String>,
    pub where_clauses: Vec<String>,
    pub code_lists: Vec<String>,
    pub meta_data_versions: Vec<String>,
    pub standards: Vec<String>,
    pub analysis_results: Vec<String>,
}

impl CommentSources {
    pub fn is_empty(&self) -> bool {
        self.item_defs.is_empty()
            && self.item_groups.is_empty()
            && self.where_clauses.is_empty()
            && self.code_lists.is_empty()
            && self.meta_data_versions.is_empty()
            && self.standards.is_empty()
            && self.analysis_results.is_empty()
    }
}

/// Reusable free-text annotation (`def:CommentDef`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub oid: String,
    pub body: CommentBody,
    pub sources: CommentSources,
}

impl Comment {
    pub fn new(oid: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            body: CommentBody::default(),
            sources: CommentSources::default(),
        }
    }
}

/// A machine-readable expression of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormalExpression {
    pub context: Option<String>,
    pub value: String,
}

/// Back-references of a method: container OID to the item refs using it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSources {
    pub item_groups: BTreeMap<String, Vec<String>>,
    pub value_lists: BTreeMap<String, Vec<String>>,
}

impl MethodSources {
    pub fn is_empty(&self) -> bool {
        self.item_groups.values().all(Vec::is_empty) && self.value_lists.values().all(Vec::is_empty)
    }
}

/// Derivation or computation description (`MethodDef`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    pub oid: String,
    pub name: String,
    pub method_type: Option<String>,
    pub body: CommentBody,
    pub formal_expressions: Vec<FormalExpression>,
    pub sources: MethodSources,
}

impl Method {
    pub fn new(oid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            oid: oid.into(),
            name: name.into(),
            method_type: None,
            body: CommentBody::default(),
            formal_expressions: Vec::new(),
            sources: MethodSources::default(),
        }
    }
}

macro_rules! delegate_body {
    ($($ty:ty),+) => {
        $(
            impl Describable for $ty {
                fn descriptions(&self) -> &[TranslatedText] {
                    &self.body.descriptions
                }

                fn descriptions_mut(&mut self) -> &mut Vec<TranslatedText> {
                    &mut self.body.descriptions
                }
            }

            impl Documentable for $ty {
                fn documents(&self) -> &[Document] {
                    &self.body.documents
                }

                fn documents_mut(&mut self) -> &mut Vec<Document> {
                    &mut self.body.documents
                }
            }
        )+
    };
}

delegate_body!(Comment, Method);

crate::text::impl_describable!(CommentBody);
crate::text::impl_documentable!(CommentBody);
