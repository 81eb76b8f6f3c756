//! Content equality used to deduplicate shared entities on copy.
//!
//! Each comparison ignores identity and bookkeeping fields:
//!
//! | entity | ignored fields |
//! |---|---|
//! | [`CodeList`] | `oid`, `sources`, `standard_oid`, `comment_oid`, item OIDs |
//! | [`Method`] | `oid`, `sources` |
//! | [`Comment`] | `oid`, `sources` |
//! | [`Leaf`] | `id` |
//!
//! Codelist items are compared in display order; the OIDs they are stored
//! under are document-local and never match across documents.

use std::collections::BTreeMap;

use crate::code_list::CodeList;
use crate::comment::{Comment, Method};
use crate::leaf::Leaf;

pub fn code_lists_equal(a: &CodeList, b: &CodeList) -> bool {
    a.name == b.name
        && a.data_type == b.data_type
        && a.sas_format_name == b.sas_format_name
        && a.code_list_type == b.code_list_type
        && a.external_code_list == b.external_code_list
        && a.alias == b.alias
        && a.is_non_standard == b.is_non_standard
        && a.descriptions == b.descriptions
        && items_equal(a, b)
}

fn items_equal(a: &CodeList, b: &CodeList) -> bool {
    if a.item_order.len() != b.item_order.len() {
        return false;
    }
    match (
        &a.code_list_items,
        &b.code_list_items,
        &a.enumerated_items,
        &b.enumerated_items,
    ) {
        (Some(left), Some(right), _, _) => same_in_order(&a.item_order, left, &b.item_order, right),
        (None, None, Some(left), Some(right)) => {
            same_in_order(&a.item_order, left, &b.item_order, right)
        }
        (None, None, None, None) => true,
        _ => false,
    }
}

fn same_in_order<T: PartialEq>(
    left_order: &[String],
    left: &BTreeMap<String, T>,
    right_order: &[String],
    right: &BTreeMap<String, T>,
) -> bool {
    left_order
        .iter()
        .zip(right_order)
        .all(|(l, r)| matches!((left.get(l), right.get(r)), (Some(x), Some(y)) if x == y))
}

pub fn methods_equal(a: &Method, b: &Method) -> bool {
    a.name == b.name
        && a.method_type == b.method_type
        && a.body == b.body
        && a.formal_expressions == b.formal_expressions
}

pub fn comments_equal(a: &Comment, b: &Comment) -> bool {
    a.body == b.body
}

pub fn leafs_equal(a: &Leaf, b: &Leaf) -> bool {
    a.href == b.href && a.title == b.title
}
