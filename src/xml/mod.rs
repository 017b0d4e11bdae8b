// src/xml/mod.rs

//! Modern project document tree and XML serializer
//!
//! [`ModernNode`] is the XML-shaped tree the mapper produces and the
//! rewriter serializes. Tag and attribute names are compile-time
//! constants from the translation table, so the writer has nothing to
//! reject at runtime except I/O faults, which it reports as
//! [`SerializationFault`]. Attribute escaping is quick-xml's job;
//! the mapper guarantees values are well-formed text to begin with.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use thiserror::Error;

/// One node of the modern XML-shaped project tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ModernNode {
    pub tag: &'static str,
    /// Name/value pairs in emission order.
    pub attributes: Vec<(&'static str, String)>,
    /// Children in emission order.
    pub children: Vec<ModernNode>,
}

impl ModernNode {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn push_attr(&mut self, name: &'static str, value: impl Into<String>) {
        self.attributes.push((name, value.into()));
    }

    pub fn push_child(&mut self, child: ModernNode) {
        self.children.push(child);
    }

    /// First value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The XML writer could not emit the document.
#[derive(Debug, Error)]
#[error("XML writer failed at <{tag}>: {source}")]
pub struct SerializationFault {
    pub tag: &'static str,
    #[source]
    pub source: quick_xml::Error,
}

fn fault(tag: &'static str, source: quick_xml::Error) -> SerializationFault {
    SerializationFault { tag, source }
}

/// Serialize a modern document: XML declaration, two-space indent,
/// self-closing empty elements.
pub fn write_document<W: io::Write>(root: &ModernNode, out: W) -> Result<(), SerializationFault> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
        .map_err(|e| fault(root.tag, e))?;
    write_node(&mut writer, root)
}

fn write_node<W: io::Write>(
    writer: &mut Writer<W>,
    node: &ModernNode,
) -> Result<(), SerializationFault> {
    let mut start = BytesStart::new(node.tag);
    for (name, value) in &node.attributes {
        start.push_attribute((*name, value.as_str()));
    }

    if node.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| fault(node.tag, e))?;
    } else {
        writer
            .write_event(Event::Start(start))
            .map_err(|e| fault(node.tag, e))?;
        for child in &node.children {
            write_node(writer, child)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(node.tag)))
            .map_err(|e| fault(node.tag, e))?;
    }
    Ok(())
}
