//! Invalid-child detection and repair.
//!
//! [§ 3.2.5 Content models](https://html.spec.whatwg.org/multipage/dom.html#content-models)
//!
//! An element is invalid when the content model constrains it and its parent
//! does not accept it. Repair prefers moving the element up to an ancestor
//! that accepts it, splitting the ancestors in between.

use std::collections::HashSet;

use quokka_ast::{AstTree, NodeId};
use quokka_schema::Schema;

use crate::utils::is_empty;

/// Ancestors that are never split to make room for an invalid child.
const NON_SPLITTABLE_ELEMENTS: &[&str] =
    &["tr", "td", "th", "tbody", "thead", "tfoot", "table", "summary"];

/// Walker post-visitor body: record `id` if its parent does not accept it.
pub fn find_invalid_child(
    schema: &Schema,
    tree: &AstTree,
    id: NodeId,
    invalid_children: &mut Vec<NodeId>,
) {
    let Some(parent) = tree.parent(id) else {
        return;
    };
    let name = tree.name(id);
    if schema.has_child_rules(name) && !schema.is_valid_child(tree.name(parent), name) {
        invalid_children.push(id);
    }
}

/// Repair every node in `nodes` (document order).
///
/// `on_create` is called for every node the repair creates, so it can be
/// matched against the registered filters.
pub fn clean_invalid_nodes(
    tree: &mut AstTree,
    nodes: &[NodeId],
    schema: &Schema,
    root: NodeId,
    on_create: &mut dyn FnMut(&mut AstTree, NodeId),
) {
    let mut fixed = HashSet::new();
    let is_splittable = |tree: &AstTree, node: NodeId| {
        node != root && !NON_SPLITTABLE_ELEMENTS.contains(&tree.name(node))
    };

    for &node in nodes {
        let Some(parent) = tree.parent(node) else {
            continue;
        };
        if fixed.contains(&node) {
            continue;
        }
        log::debug!(
            target: "quokka.repair",
            "<{}> is not valid inside <{}>",
            tree.name(node),
            tree.name(parent)
        );

        // Text blocks inside a list item: unwrap the first, turn following
        // text blocks into sibling list items.
        if schema.is_text_block(tree.name(node)) && tree.name(parent) == "li" {
            let mut sibling = tree.next(node);
            let mut insert_after = parent;
            while let Some(current) = sibling {
                if !schema.is_text_block(tree.name(current)) {
                    break;
                }
                sibling = tree.next(current);
                tree.set_name(current, "li");
                let _ = fixed.insert(current);
                tree.insert_after(current, insert_after);
                insert_after = current;
            }
            tree.unwrap(node);
            continue;
        }

        // Collect the ancestors up to one that accepts the node.
        let mut parents = vec![node];
        let mut target = Some(parent);
        while let Some(ancestor) = target {
            if schema.is_valid_child(tree.name(ancestor), tree.name(node))
                || !is_splittable(tree, ancestor)
            {
                break;
            }
            parents.push(ancestor);
            target = tree.parent(ancestor);
        }

        if let Some(target) = target
            && parents.len() > 1
        {
            if schema.is_valid_child(tree.name(target), tree.name(node)) {
                split_ancestors(tree, schema, target, &parents, on_create);
            } else {
                remove_or_unwrap_invalid_node(tree, schema, node, None);
            }
        } else if tree.name(node) == "li" {
            wrap_orphan_list_item(tree, node, on_create);
        } else if schema.is_valid_child(tree.name(parent), "div")
            && schema.is_valid_child("div", tree.name(node))
        {
            let wrapper = tree.create_element("div");
            on_create(tree, wrapper);
            tree.wrap(node, wrapper);
        } else {
            remove_or_unwrap_invalid_node(tree, schema, node, None);
        }
    }
}

/// Move `parents[0]` up into `target`, cloning the ancestor chain for the
/// content on its left.
///
/// `parents` runs from the node up to the outermost ancestor being split.
fn split_ancestors(
    tree: &mut AstTree,
    schema: &Schema,
    target: NodeId,
    parents: &[NodeId],
    on_create: &mut dyn FnMut(&mut AstTree, NodeId),
) {
    let node = parents[0];
    let chain: Vec<NodeId> = parents.iter().rev().copied().collect();
    let outermost = chain[0];

    // STEP 1: Clone the chain and move the left-hand content into it.
    let new_parent = tree.clone_node(outermost);
    on_create(tree, new_parent);
    let mut current = new_parent;
    for (index, window) in chain.windows(2).enumerate() {
        let (original, next_in_chain) = (window[0], window[1]);
        let holder = if index > 0 && schema.is_valid_child(tree.name(current), tree.name(original))
        {
            let clone = tree.clone_node(original);
            on_create(tree, clone);
            tree.append(current, clone);
            clone
        } else {
            current
        };

        let mut child = tree.first_child(original);
        while let Some(moving) = child {
            if moving == next_in_chain {
                break;
            }
            child = tree.next(moving);
            tree.append(holder, moving);
        }
        current = holder;
    }

    // STEP 2: Place the clone (if it got content) and the node.
    if is_empty(schema, tree, new_parent) {
        tree.insert_before(node, outermost);
    } else {
        tree.insert_before(new_parent, outermost);
        tree.insert_after(node, new_parent);
    }
    debug_assert_eq!(tree.parent(node), Some(target));

    // STEP 3: Drop the right-hand original if nothing is left in it.
    let only_br = tree
        .only_child(outermost)
        .is_some_and(|child| tree.name(child) == "br");
    if is_empty(schema, tree, outermost) || only_br {
        tree.empty(outermost);
        tree.remove(outermost);
    }
}

/// Put an `li` without a list parent into an adjacent list, or a new `ul`.
fn wrap_orphan_list_item(
    tree: &mut AstTree,
    node: NodeId,
    on_create: &mut dyn FnMut(&mut AstTree, NodeId),
) {
    let is_list = |tree: &AstTree, id: NodeId| matches!(tree.name(id), "ul" | "ol");

    if let Some(prev) = tree.prev(node)
        && is_list(tree, prev)
    {
        tree.append(prev, node);
        return;
    }
    if let Some(next) = tree.next(node)
        && is_list(tree, next)
        && let Some(first) = tree.first_child(next)
    {
        tree.insert_before(node, first);
        return;
    }

    let wrapper = tree.create_element("ul");
    on_create(tree, wrapper);
    tree.wrap(node, wrapper);
}

/// Remove raw-content elements outright; unwrap anything else, first
/// recursing into children that the original parent would not accept.
fn remove_or_unwrap_invalid_node(
    tree: &mut AstTree,
    schema: &Schema,
    node: NodeId,
    original_parent: Option<NodeId>,
) {
    if schema.is_special(tree.name(node)) {
        tree.empty(node);
        tree.remove(node);
        return;
    }

    let original_parent = original_parent.or_else(|| tree.parent(node));
    let children: Vec<NodeId> = tree.children(node).collect();
    for child in children {
        if let Some(parent) = original_parent
            && !schema.is_valid_child(tree.name(parent), tree.name(child))
        {
            remove_or_unwrap_invalid_node(tree, schema, child, Some(parent));
        }
    }
    tree.unwrap(node);
}
