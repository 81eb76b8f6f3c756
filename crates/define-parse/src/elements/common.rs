//! Shared sub-elements: descriptions, aliases, document references, leafs.

use define_model::{Alias, Document, Leaf, Origin, PdfPageRef, TranslatedText};

use super::ParseContext;
use crate::error::{ParseError, Result};
use crate::tree::XmlNode;

pub(crate) fn translated_texts(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Vec<TranslatedText> {
    node.children("TranslatedText")
        .iter()
        .map(|text| {
            let lang = text.attr("lang");
            ctx.note_lang(lang);
            TranslatedText::new(lang, text.text().unwrap_or_default())
        })
        .collect()
}

/// Texts of the first `Description` child, if any.
pub(crate) fn descriptions(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Vec<TranslatedText> {
    node.child("Description")
        .map(|description| translated_texts(description, ctx))
        .unwrap_or_default()
}

/// Like [`descriptions`] for elements where `Description` is mandatory.
pub(crate) fn required_descriptions(
    node: &XmlNode,
    ctx: &mut ParseContext<'_>,
) -> Result<Vec<TranslatedText>> {
    let description = node.required_child("Description")?;
    Ok(translated_texts(description, ctx))
}

pub(crate) fn alias(node: &XmlNode) -> Result<Option<Alias>> {
    node.child("Alias")
        .map(|alias| {
            Ok(Alias {
                context: alias.required_attr("context")?.to_string(),
                name: alias.required_attr("name")?.to_string(),
            })
        })
        .transpose()
}

fn pdf_page_ref(node: &XmlNode) -> Result<PdfPageRef> {
    Ok(PdfPageRef {
        page_type: node.attr("type").map(str::to_string),
        page_refs: node.attr("pageRefs").map(str::to_string),
        first_page: node.u32_attr("firstPage")?,
        last_page: node.u32_attr("lastPage")?,
        title: node.attr("title").map(str::to_string),
    })
}

/// `def:DocumentRef` children.
pub(crate) fn documents(node: &XmlNode) -> Result<Vec<Document>> {
    node.children("DocumentRef")
        .iter()
        .map(|reference| {
            let mut document = Document::new(reference.required_attr("leafId")?);
            for page_ref in reference.children("PDFPageRef") {
                document.add_pdf_page_ref(pdf_page_ref(page_ref)?);
            }
            Ok(document)
        })
        .collect()
}

pub(crate) fn leaf(node: &XmlNode) -> Result<Leaf> {
    let mut leaf = Leaf::new(node.required_attr("id")?, node.required_attr("href")?);
    leaf.title = node.child_text("title").map(str::to_string);
    Ok(leaf)
}

pub(crate) fn origin(node: &XmlNode, ctx: &mut ParseContext<'_>) -> Result<Origin> {
    Ok(Origin {
        origin_type: node.attr("type").map(str::to_string),
        source: node.attr("source").map(str::to_string),
        descriptions: descriptions(node, ctx),
        documents: documents(node)?,
    })
}

/// OID attribute of a `*Ref` child, e.g. `CodeListRef/@CodeListOID`.
pub(crate) fn ref_oid(node: &XmlNode, child: &str, key: &'static str) -> Result<Option<String>> {
    node.child(child)
        .map(|reference| reference.required_attr(key).map(str::to_string))
        .transpose()
}

/// Reject a node whose name differs from the expected element.
pub(crate) fn expect_element(node: &XmlNode, expected: &'static str) -> Result<()> {
    if node.name == expected {
        Ok(())
    } else {
        Err(ParseError::UnexpectedRoot {
            expected,
            found: node.name.clone(),
        })
    }
}
