//! Wraps stray root-level inline content in the forced root block.

use std::collections::BTreeMap;

use quokka_ast::{AstTree, INTERNAL_ATTR, NodeId};
use quokka_common::warning::warn_once;
use quokka_schema::Schema;

use crate::utils::{block_elements, trim_end_whitespace, trim_start_whitespace};

/// Group runs of text and inline elements directly under `root` into
/// `block_name` elements carrying `attributes`.
///
/// Block elements, structural containers such as `script` and `style`, `p`,
/// internal elements and comments end the current run.
/// `on_create` is called for every wrapper created.
pub fn add_root_blocks(
    tree: &mut AstTree,
    schema: &Schema,
    root: NodeId,
    block_name: &str,
    attributes: &BTreeMap<String, String>,
    on_create: &mut dyn FnMut(&mut AstTree, NodeId),
) {
    let block_name = block_name.to_ascii_lowercase();
    if !schema.is_valid_child(tree.name(root), &block_name) {
        warn_once(
            "RootBlock",
            &format!("<{block_name}> is not a valid child of <{}>", tree.name(root)),
        );
        return;
    }

    let block_elements = block_elements(schema);
    let mut wrapper: Option<NodeId> = None;
    let mut current = tree.first_child(root);
    while let Some(node) = current {
        current = tree.next(node);

        let wraps = tree.is_text(node)
            || (tree.is_element(node)
                && tree.name(node) != "p"
                && !block_elements.contains(tree.name(node))
                && !tree.has_attr(node, INTERNAL_ATTR));

        if wraps {
            let block = match wrapper {
                Some(block) => block,
                None => {
                    let block = tree.create_element(&block_name);
                    for (name, value) in attributes {
                        tree.set_attr(block, name, value.as_str());
                    }
                    on_create(tree, block);
                    tree.insert_before(block, node);
                    wrapper = Some(block);
                    block
                }
            };
            tree.append(block, node);
        } else if let Some(block) = wrapper.take() {
            trim_root_block(tree, block);
        }
    }

    if let Some(block) = wrapper {
        trim_root_block(tree, block);
    }
}

/// Trim the outer whitespace of a finished wrapper. A wrapper left without
/// content is removed.
fn trim_root_block(tree: &mut AstTree, block: NodeId) {
    if let Some(first) = tree.first_child(block)
        && tree.is_text(first)
    {
        let trimmed = trim_start_whitespace(tree.value(first).unwrap_or_default()).to_string();
        set_or_remove_text(tree, first, trimmed);
    }
    if let Some(last) = tree.last_child(block)
        && tree.is_text(last)
    {
        let trimmed = trim_end_whitespace(tree.value(last).unwrap_or_default()).to_string();
        set_or_remove_text(tree, last, trimmed);
    }
    if tree.first_child(block).is_none() {
        tree.remove(block);
    }
}

fn set_or_remove_text(tree: &mut AstTree, id: NodeId, value: String) {
    if value.is_empty() {
        tree.remove(id);
    } else {
        tree.set_value(id, value);
    }
}
