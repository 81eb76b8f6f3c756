//! Descriptions, aliases, and document references shared by many entities.
//!
//! Entities that carry translated descriptions implement [`Describable`];
//! entities that point at external documents implement [`Documentable`].
//! Both are small capabilities attached to whichever struct needs them.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A piece of text in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedText {
    pub lang: Option<String>,
    pub value: String,
}

impl TranslatedText {
    pub fn new(lang: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            lang: lang.map(str::to_string),
            value: value.into(),
        }
    }
}

/// An alternate name in another context (e.g. an NCI code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub context: String,
    pub name: String,
}

/// Page reference inside a PDF leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPageRef {
    /// `PhysicalRef` or `NamedDestination`.
    pub page_type: Option<String>,
    pub page_refs: Option<String>,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub title: Option<String>,
}

/// Reference to a [`Leaf`](crate::Leaf), optionally narrowed to pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub leaf_id: String,
    pub pdf_page_refs: Vec<PdfPageRef>,
}

impl Document {
    pub fn new(leaf_id: impl Into<String>) -> Self {
        Self {
            leaf_id: leaf_id.into(),
            pdf_page_refs: Vec::new(),
        }
    }

    pub fn add_pdf_page_ref(&mut self, page_ref: PdfPageRef) {
        self.pdf_page_refs.push(page_ref);
    }
}

/// Capability: the entity holds a list of translated descriptions.
pub trait Describable {
    fn descriptions(&self) -> &[TranslatedText];

    fn descriptions_mut(&mut self) -> &mut Vec<TranslatedText>;

    /// Description for a language.
    ///
    /// Falls back to a description without language and then to the first
    /// description when there is no exact match.
    fn description(&self, lang: Option<&str>) -> Option<&str> {
        self.description_index(lang)
            .map(|index| self.descriptions()[index].value.as_str())
    }

    /// Position of the description [`description`](Self::description) returns.
    fn description_index(&self, lang: Option<&str>) -> Option<usize> {
        let descriptions = self.descriptions();
        descriptions
            .iter()
            .position(|text| text.lang.as_deref() == lang)
            .or_else(|| descriptions.iter().position(|text| text.lang.is_none()))
            .or_else(|| (!descriptions.is_empty()).then_some(0))
    }

    /// Replace the description for a language, adding it when absent.
    fn set_description(&mut self, lang: Option<&str>, value: impl Into<String>) {
        let value = value.into();
        let descriptions = self.descriptions_mut();
        match descriptions
            .iter_mut()
            .find(|text| text.lang.as_deref() == lang)
        {
            Some(existing) => existing.value = value,
            None => descriptions.push(TranslatedText::new(lang, value)),
        }
    }

    fn add_description(&mut self, text: TranslatedText) {
        self.descriptions_mut().push(text);
    }

    /// Remove the description for a language.
    fn remove_description(&mut self, lang: Option<&str>) {
        self.descriptions_mut()
            .retain(|text| text.lang.as_deref() != lang);
    }
}

/// Capability: the entity references external documents.
pub trait Documentable {
    fn documents(&self) -> &[Document];

    fn documents_mut(&mut self) -> &mut Vec<Document>;

    fn add_document(&mut self, document: Document) {
        self.documents_mut().push(document);
    }

    /// Leaf IDs referenced by this entity.
    fn leaf_ids(&self) -> BTreeSet<String> {
        self.documents()
            .iter()
            .map(|document| document.leaf_id.clone())
            .collect()
    }

    /// Point every document at `old` to `new` instead.
    fn rename_leaf(&mut self, old: &str, new: &str) {
        for document in self.documents_mut() {
            if document.leaf_id == old {
                document.leaf_id = new.to_string();
            }
        }
    }
}

/// Implement [`Describable`] for a struct with a `descriptions` field.
macro_rules! impl_describable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::text::Describable for $ty {
                fn descriptions(&self) -> &[$crate::text::TranslatedText] {
                    &self.descriptions
                }

                fn descriptions_mut(&mut self) -> &mut Vec<$crate::text::TranslatedText> {
                    &mut self.descriptions
                }
            }
        )+
    };
}

/// Implement [`Documentable`] for a struct with a `documents` field.
macro_rules! impl_documentable {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::text::Documentable for $ty {
                fn documents(&self) -> &[$crate::text::Document] {
                    &self.documents
                }

                fn documents_mut(&mut self) -> &mut Vec<$crate::text::Document> {
                    &mut self.documents
                }
            }
        )+
    };
}

pub(crate) use impl_describable;
pub(crate) use impl_documentable;
