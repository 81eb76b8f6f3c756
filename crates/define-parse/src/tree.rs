//! Attribute-bagged element tree.
//!
//! [`XmlNode`] is the input shape of the parser: each element carries its
//! attributes, its children grouped by element name, and its text. Two
//! adapters build it, one from XML text through quick-xml and one from the
//! `{"$": attrs, "_": text, child: [...]}` JSON shape produced by xml2js.
//! Both apply the same name normalization (see [`crate::names`]).

use std::collections::BTreeMap;
use std::str::{self, FromStr};

use define_model::ModelError;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;

use crate::error::{ParseError, Result};
use crate::names::{attribute_key, element_name};

/// One element with normalized attribute keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: BTreeMap<String, Vec<XmlNode>>,
    pub text: Option<String>,
}

impl XmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Insert an attribute under its normalized key.
    pub fn insert_attr(&mut self, raw_key: &str, value: impl Into<String>) -> Result<()> {
        let key = attribute_key(raw_key);
        if self.attrs.contains_key(&key) {
            return Err(ParseError::DuplicateKey {
                element: self.name.clone(),
                key,
            });
        }
        self.attrs.insert(key, value.into());
        Ok(())
    }

    pub fn push_child(&mut self, child: XmlNode) {
        self.children
            .entry(child.name.clone())
            .or_default()
            .push(child);
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn required_attr(&self, key: &'static str) -> Result<&str> {
        self.attr(key).ok_or_else(|| ParseError::MissingAttribute {
            element: self.name.clone(),
            attribute: key,
        })
    }

    /// Attribute parsed through `FromStr`, e.g. `YesNo` or `Comparator`.
    pub fn parsed_attr<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = ModelError>,
    {
        self.attr(key)
            .map(str::parse::<T>)
            .transpose()
            .map_err(ParseError::from)
    }

    pub fn u32_attr(&self, key: &'static str) -> Result<Option<u32>> {
        self.attr(key)
            .map(|value| {
                value.trim().parse::<u32>().map_err(|_| {
                    ParseError::Model(ModelError::InvalidValue {
                        field: key,
                        value: value.to_string(),
                    })
                })
            })
            .transpose()
    }

    /// Children with the given element name, in document order.
    pub fn children(&self, name: &str) -> &[XmlNode] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children(name).first()
    }

    pub fn required_child(&self, name: &str) -> Result<&XmlNode> {
        self.child(name)
            .ok_or_else(|| ParseError::missing_child(&self.name, name))
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlNode::text)
    }

    /// Build a tree from XML text.
    pub fn from_xml_str(xml: &str) -> Result<XmlNode> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => stack.push(node_from_start(&e)?),
                Event::Empty(e) => {
                    let node = node_from_start(&e)?;
                    close_node(node, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| ParseError::malformed("document", "unbalanced end tag"))?;
                    close_node(node, &mut stack, &mut root)?;
                }
                Event::Text(t) => append_text(&mut stack, &t.decode()?),
                Event::CData(c) => append_text(&mut stack, &c.decode()?),
                Event::GeneralRef(r) => {
                    let resolved = match r.resolve_char_ref()? {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = r.decode()?;
                            resolve_predefined_entity(&name)
                                .map(str::to_string)
                                .ok_or_else(|| ParseError::UnknownEntity(name.into_owned()))?
                        }
                    };
                    append_text(&mut stack, &resolved);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::malformed(&open.name, "element is not closed"));
        }
        root.ok_or_else(|| ParseError::malformed("document", "no root element"))
    }

    /// Build a tree from the xml2js JSON shape.
    ///
    /// The value is an object with one key naming the root element. Each
    /// element holds attributes under `$`, text under `_`, and children as
    /// arrays keyed by element name. A bare string is a text-only element.
    pub fn from_json(value: &Value) -> Result<XmlNode> {
        let Value::Object(map) = value else {
            return Err(ParseError::malformed("document", "JSON root is not an object"));
        };
        let mut elements = map.iter().filter(|(key, _)| !matches!(key.as_str(), "$" | "_"));
        let (name, body) = elements
            .next()
            .ok_or_else(|| ParseError::malformed("document", "no root element"))?;
        if elements.next().is_some() {
            return Err(ParseError::malformed("document", "more than one root element"));
        }
        node_from_json(name, body)
    }

    pub fn from_json_str(json: &str) -> Result<XmlNode> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }
}

fn node_from_start(e: &BytesStart<'_>) -> Result<XmlNode> {
    let mut node = XmlNode::new(element_name(str::from_utf8(e.name().as_ref())?));
    for attr in e.attributes() {
        let attr = attr?;
        let key = str::from_utf8(attr.key.as_ref())?;
        let value = attr.unescape_value()?;
        node.insert_attr(key, value)?;
    }
    Ok(node)
}

fn close_node(
    mut node: XmlNode,
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
) -> Result<()> {
    if node.text.as_deref().is_some_and(|text| text.trim().is_empty()) {
        node.text = None;
    }
    match stack.last_mut() {
        Some(parent) => parent.push_child(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(ParseError::malformed("document", "more than one root element")),
    }
    Ok(())
}

fn append_text(stack: &mut [XmlNode], text: &str) {
    if let Some(node) = stack.last_mut() {
        node.text.get_or_insert_with(String::new).push_str(text);
    }
}

fn json_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn node_from_json(name: &str, value: &Value) -> Result<XmlNode> {
    let mut node = XmlNode::new(element_name(name));
    let Value::Object(map) = value else {
        node.text = json_scalar(value);
        return Ok(node);
    };

    for (key, entry) in map {
        match key.as_str() {
            "$" => {
                let Value::Object(attrs) = entry else {
                    return Err(ParseError::malformed(&node.name, "attributes are not an object"));
                };
                for (raw_key, raw_value) in attrs {
                    if let Some(value) = json_scalar(raw_value) {
                        node.insert_attr(raw_key, value)?;
                    }
                }
            }
            "_" => node.text = json_scalar(entry),
            child_name => match entry {
                Value::Array(items) => {
                    for item in items {
                        node.push_child(node_from_json(child_name, item)?);
                    }
                }
                other => node.push_child(node_from_json(child_name, other)?),
            },
        }
    }
    Ok(node)
}
