//! Transcribes the sanitized native tree into an [`AstTree`].

use std::collections::HashSet;

use quokka_ast::{AstTree, NodeId, NodeKind};

use crate::native::{NativeKind, NativeNode};

/// Special elements whose content is re-parsed as markup (RCDATA), so their
/// text is not raw.
///
/// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
const RCDATA_ELEMENTS: &[&str] = &["title", "textarea"];

/// Build an AST whose root is a document fragment named `root_name` holding
/// the children of `native_root`.
#[must_use]
pub fn build_tree(
    root_name: &str,
    native_root: &NativeNode,
    special_elements: &HashSet<String>,
) -> AstTree {
    let mut tree = AstTree::new(root_name, NodeKind::DocumentFragment);
    transfer_children(&mut tree, NodeId::ROOT, native_root, special_elements);
    tree
}

fn transfer_children(
    tree: &mut AstTree,
    parent: NodeId,
    native_parent: &NativeNode,
    special_elements: &HashSet<String>,
) {
    let parent_name = tree.name(parent);
    let is_raw = special_elements.contains(parent_name) && !RCDATA_ELEMENTS.contains(&parent_name);

    for native in &native_parent.children {
        let child = match native.kind {
            NativeKind::Element => {
                let id = tree.create_element(&native.name);
                for attr in &native.attributes {
                    tree.set_attr(id, &attr.name, attr.value.as_str());
                }
                id
            }
            NativeKind::Text => {
                let id = tree.create_text(&native.value);
                tree.node_mut(id).raw = is_raw;
                id
            }
            NativeKind::Comment => create_with_value(tree, "#comment", NodeKind::Comment, native),
            NativeKind::ProcessingInstruction => {
                create_with_value(tree, "#pi", NodeKind::ProcessingInstruction, native)
            }
        };

        transfer_children(tree, child, native, special_elements);
        tree.append(parent, child);
    }
}

fn create_with_value(tree: &mut AstTree, name: &str, kind: NodeKind, native: &NativeNode) -> NodeId {
    let id = tree.create(name, kind);
    tree.set_value(id, native.value.as_str());
    id
}
