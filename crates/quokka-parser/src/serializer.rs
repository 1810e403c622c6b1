//! HTML serialization of a parsed tree.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use quokka_ast::{AstTree, NodeId, NodeKind};
use quokka_schema::Schema;

/// Serialize the children of the tree's root.
#[must_use]
pub fn serialize(tree: &AstTree, schema: &Schema) -> String {
    let mut output = String::new();
    for child in tree.children(tree.root()) {
        serialize_node(tree, schema, child, &mut output);
    }
    output
}

fn serialize_node(tree: &AstTree, schema: &Schema, id: NodeId, output: &mut String) {
    let value = tree.value(id).unwrap_or_default();
    match tree.kind(id) {
        NodeKind::Text => {
            if tree.node(id).raw {
                output.push_str(value);
            } else {
                escape_into(value, false, output);
            }
        }
        NodeKind::Comment => {
            output.push_str("<!--");
            output.push_str(value);
            output.push_str("-->");
        }
        NodeKind::CData => {
            output.push_str("<![CDATA[");
            output.push_str(value);
            output.push_str("]]>");
        }
        NodeKind::ProcessingInstruction => {
            output.push_str("<?");
            output.push_str(tree.name(id));
            if !value.is_empty() {
                output.push(' ');
                output.push_str(value);
            }
            output.push_str("?>");
        }
        NodeKind::Element => serialize_element(tree, schema, id, output),
        NodeKind::Document | NodeKind::DocumentFragment | NodeKind::DocumentType => {
            for child in tree.children(id) {
                serialize_node(tree, schema, child, output);
            }
        }
    }
}

fn serialize_element(tree: &AstTree, schema: &Schema, id: NodeId, output: &mut String) {
    let name = tree.name(id);
    output.push('<');
    output.push_str(name);
    for attr in tree.attributes(id) {
        output.push(' ');
        output.push_str(&attr.name);
        output.push_str("=\"");
        escape_into(&attr.value, true, output);
        output.push('"');
    }
    output.push('>');

    if schema.is_void(name) {
        return;
    }
    for child in tree.children(id) {
        serialize_node(tree, schema, child, output);
    }
    output.push_str("</");
    output.push_str(name);
    output.push('>');
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
fn escape_into(text: &str, in_attribute: bool, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '\u{a0}' => output.push_str("&nbsp;"),
            '"' if in_attribute => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}
