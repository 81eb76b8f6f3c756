//! Tests for name normalization, the element tree, and order derivation.

use define_parse::names::{attribute_key, element_name, lower_camel_case, strip_namespace};
use define_parse::order::{derive_explicit_order, derive_order};
use define_parse::{ParseError, XmlNode};
use proptest::prelude::*;

// --- Names ---

#[test]
fn attribute_keys_are_lower_camel_case() {
    let cases = [
        ("OID", "oid"),
        ("Name", "name"),
        ("ODMVersion", "odmVersion"),
        ("SASDatasetName", "sasDatasetName"),
        ("ItemOID", "itemOid"),
        ("def:ArchiveLocationID", "archiveLocationId"),
        ("def:leafID", "leafId"),
        ("xlink:href", "href"),
        ("xml:lang", "lang"),
        ("xmlns:def", "def"),
        ("PDFPageRef", "pdfPageRef"),
    ];
    for (raw, expected) in cases {
        assert_eq!(attribute_key(raw), expected, "for {raw}");
    }
}

#[test]
fn lower_camel_case_leaves_lowercase_untouched() {
    assert_eq!(lower_camel_case("href"), "href");
    assert_eq!(lower_camel_case(""), "");
}

#[test]
fn element_names_keep_their_case() {
    assert_eq!(element_name("def:ValueListDef"), "ValueListDef");
    assert_eq!(element_name("ItemGroupDef"), "ItemGroupDef");
    assert_eq!(strip_namespace("arm:ResultDisplay"), "ResultDisplay");
}

// --- XmlNode from XML ---

#[test]
fn groups_children_by_name() {
    let root = XmlNode::from_xml_str(
        r#"<Root A="1"><Item N="a"/><Other/><Item N="b"/></Root>"#,
    )
    .unwrap();
    assert_eq!(root.attr("a"), Some("1"));
    let items: Vec<&str> = root
        .children("Item")
        .iter()
        .filter_map(|item| item.attr("n"))
        .collect();
    assert_eq!(items, vec!["a", "b"]);
    assert!(root.children("Missing").is_empty());
}

#[test]
fn whitespace_only_text_is_dropped() {
    let root = XmlNode::from_xml_str("<Root>\n  <Leaf> kept </Leaf>\n</Root>").unwrap();
    assert_eq!(root.text(), None);
    assert_eq!(root.child_text("Leaf"), Some(" kept "));
}

#[test]
fn entities_and_character_references_are_resolved() {
    let root = XmlNode::from_xml_str("<T>a &lt; b &amp;&#32;c&#x21;</T>").unwrap();
    assert_eq!(root.text(), Some("a < b & c!"));
}

#[test]
fn unknown_entity_is_an_error() {
    let error = XmlNode::from_xml_str("<T>&nbsp;</T>").unwrap_err();
    assert!(matches!(error, ParseError::UnknownEntity(ref name) if name == "nbsp"));
}

#[test]
fn colliding_attribute_keys_are_rejected() {
    let error = XmlNode::from_xml_str(r#"<ItemDef OID="IT.1" def:OID="IT.2"/>"#).unwrap_err();
    assert!(matches!(
        error,
        ParseError::DuplicateKey { ref key, .. } if key == "oid"
    ));
}

#[test]
fn unclosed_element_is_malformed() {
    assert!(XmlNode::from_xml_str("<Root><Child>").is_err());
}

// --- XmlNode from JSON ---

#[test]
fn json_text_and_attributes() {
    let root = XmlNode::from_json_str(
        r#"{"Description": {"TranslatedText": [{"_": "Age", "$": {"xml:lang": "en"}}, "Alter"]}}"#,
    )
    .unwrap();
    let texts = root.children("TranslatedText");
    assert_eq!(texts[0].attr("lang"), Some("en"));
    assert_eq!(texts[0].text(), Some("Age"));
    assert_eq!(texts[1].text(), Some("Alter"));
}

#[test]
fn json_requires_a_single_root() {
    let error = XmlNode::from_json_str(r#"{"A": {}, "B": {}}"#).unwrap_err();
    assert!(matches!(error, ParseError::MalformedDocument { .. }));
}

// --- Order derivation ---

fn entries(positions: &[Option<u32>]) -> Vec<(String, Option<u32>)> {
    positions
        .iter()
        .enumerate()
        .map(|(index, position)| (format!("IR.{index}"), *position))
        .collect()
}

#[test]
fn unnumbered_entries_come_first_in_declaration_order() {
    let order = derive_order(entries(&[Some(2), None, Some(1), None]));
    assert_eq!(order, vec!["IR.1", "IR.3", "IR.2", "IR.0"]);
}

#[test]
fn ties_keep_declaration_order() {
    let order = derive_order(entries(&[Some(1), Some(1), Some(0)]));
    assert_eq!(order, vec!["IR.2", "IR.0", "IR.1"]);
}

#[test]
fn explicit_order_skips_unnumbered() {
    let order = derive_explicit_order(entries(&[None, Some(2), Some(1)]));
    assert_eq!(order, vec!["IR.2", "IR.1"]);
}

proptest! {
    #[test]
    fn derive_order_is_a_permutation(positions in prop::collection::vec(prop::option::of(0u32..5), 0..20)) {
        let input = entries(&positions);
        let mut order = derive_order(input.clone());
        prop_assert_eq!(order.len(), input.len());
        order.sort();
        let mut expected: Vec<String> = input.into_iter().map(|(oid, _)| oid).collect();
        expected.sort();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn numbered_entries_are_sorted(positions in prop::collection::vec(prop::option::of(0u32..5), 0..20)) {
        let input = entries(&positions);
        let position_of = |oid: &str| {
            input.iter().find(|(o, _)| o == oid).and_then(|(_, p)| *p)
        };
        let order = derive_order(input.clone());
        for pair in order.windows(2) {
            prop_assert!(position_of(pair[0].as_str()) <= position_of(pair[1].as_str()));
        }
    }
}
