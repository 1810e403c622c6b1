//! The native parse tree.
//!
//! html5ever and xml5ever build an `RcDom` whose names and comment payloads
//! are immutable, so the document is lowered once into an owned [`NativeNode`]
//! tree. The sanitizer edits that tree in place before any AST node exists.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use quokka_ast::Attribute;
use xml5ever::driver::{XmlParseOpts, parse_document as parse_xml_document};

use crate::args::Format;

/// Kind of a native node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    /// An element.
    Element,
    /// Character data.
    Text,
    /// A comment.
    Comment,
    /// A processing instruction (XHTML only).
    ProcessingInstruction,
}

/// An owned node of the native parse tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeNode {
    /// Node kind.
    pub kind: NativeKind,
    /// Lower-cased tag name, or the target of a processing instruction.
    pub name: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
    /// Text, comment or processing-instruction payload.
    pub value: String,
    /// Children in document order.
    pub children: Vec<NativeNode>,
}

impl NativeNode {
    /// A childless element.
    #[must_use]
    pub fn element(name: &str) -> Self {
        Self::new(NativeKind::Element, name, "")
    }

    /// A text node.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::new(NativeKind::Text, "#text", value)
    }

    fn new(kind: NativeKind, name: &str, value: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            attributes: Vec::new(),
            value: value.to_string(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attributes.iter_mut().find(|attr| attr.name == name) {
            value.clone_into(&mut attr.value);
        } else {
            self.attributes.push(Attribute::new(name, value));
        }
    }
}

/// The XHTML namespace declared on the document shell.
const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse `html` as the content of a `<body>` and return that body.
///
/// HTML goes through html5ever's tree builder. XHTML is parsed as XML by
/// xml5ever inside a namespaced document shell, so self-closing tags close
/// and CDATA sections arrive as character data.
#[must_use]
pub fn parse_body(html: &str, format: Format) -> NativeNode {
    let dom = match format {
        Format::Html => parse_document(RcDom::default(), ParseOpts::default())
            .one(format!("<body>{html}</body>")),
        Format::Xhtml => parse_xml_document(RcDom::default(), XmlParseOpts::default()).one(
            format!("<html xmlns=\"{XHTML_NAMESPACE}\"><head></head><body>{html}</body></html>"),
        ),
    };

    let mut body = NativeNode::element("body");
    if let Some(handle) = find_element(&dom.document, "body") {
        lower_children(&handle, &mut body);
    }
    body
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data
        && &*name.local == tag
    {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

fn lower_children(handle: &Handle, parent: &mut NativeNode) {
    for child in handle.children.borrow().iter() {
        if let Some(node) = lower(child) {
            parent.children.push(node);
        }
    }
}

fn lower(handle: &Handle) -> Option<NativeNode> {
    let node = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut element = NativeNode::element(&name.local.to_ascii_lowercase());
            element.attributes = attrs
                .borrow()
                .iter()
                .map(|attr| {
                    let local = attr.name.local.to_ascii_lowercase().to_string();
                    let name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{local}", &**prefix),
                        None => local,
                    };
                    Attribute::new(name, attr.value.to_string())
                })
                .collect();
            lower_children(handle, &mut element);
            element
        }
        NodeData::Text { contents } => NativeNode::text(&contents.borrow()),
        NodeData::Comment { contents } => NativeNode::new(NativeKind::Comment, "#comment", contents),
        NodeData::ProcessingInstruction { target, contents } => {
            NativeNode::new(NativeKind::ProcessingInstruction, target, contents.trim())
        }
        NodeData::Document | NodeData::Doctype { .. } => return None,
    };
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body_lowers_tree() {
        let body = parse_body("<P CLASS=x>a<!--c--></P>", Format::Html);
        assert_eq!(body.children.len(), 1);

        let p = &body.children[0];
        assert_eq!(p.name, "p");
        assert_eq!(p.attr("class"), Some("x"));
        assert_eq!(p.children[0].kind, NativeKind::Text);
        assert_eq!(p.children[0].value, "a");
        assert_eq!(p.children[1].kind, NativeKind::Comment);
        assert_eq!(p.children[1].value, "c");
    }

    #[test]
    fn test_parse_body_prefixed_attribute() {
        let body = parse_body(r##"<svg><a xlink:href="#x"></a></svg>"##, Format::Html);
        let a = &body.children[0].children[0];
        assert_eq!(a.attr("xlink:href"), Some("#x"));
    }

    #[test]
    fn test_xhtml_self_closing_element_is_empty() {
        let body = parse_body("<div/>after<p>x</p>", Format::Xhtml);
        let names: Vec<&str> = body.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["div", "#text", "p"]);
        assert!(body.children[0].children.is_empty());
        assert_eq!(body.children[1].value, "after");
    }

    #[test]
    fn test_xhtml_cdata_is_character_data() {
        let body = parse_body("<p><![CDATA[a>b]]></p>", Format::Xhtml);
        let p = &body.children[0];
        assert_eq!(p.children.len(), 1);
        assert_eq!(p.children[0].kind, NativeKind::Text);
        assert_eq!(p.children[0].value, "a>b");
    }

    #[test]
    fn test_xhtml_processing_instruction() {
        let body = parse_body("<?php echo 1 ?><p>x</p>", Format::Xhtml);
        assert_eq!(body.children[0].kind, NativeKind::ProcessingInstruction);
        assert_eq!(body.children[0].name, "php");
        assert_eq!(body.children[1].name, "p");
    }
}
