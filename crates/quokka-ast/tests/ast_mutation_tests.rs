//! Tests for AST mutation methods: append, insert, remove, unwrap, wrap, walk.

use std::collections::HashSet;

use quokka_ast::{AstTree, BOGUS_ATTR, NodeId, NodeKind};

fn new_tree() -> AstTree {
    AstTree::new("body", NodeKind::DocumentFragment)
}

/// Helper to create an element and append it to `parent`.
fn append_element(tree: &mut AstTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag);
    tree.append(parent, id);
    id
}

fn children(tree: &AstTree, id: NodeId) -> Vec<NodeId> {
    tree.children(id).collect()
}

fn set(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

// ========== append / remove ==========

#[test]
fn test_append_links_siblings() {
    let mut tree = new_tree();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let b = append_element(&mut tree, NodeId::ROOT, "b");

    assert_eq!(children(&tree, NodeId::ROOT), [a, b]);
    assert_eq!(tree.first_child(NodeId::ROOT), Some(a));
    assert_eq!(tree.last_child(NodeId::ROOT), Some(b));
    assert_eq!(tree.next(a), Some(b));
    assert_eq!(tree.prev(b), Some(a));
    assert_eq!(tree.parent(b), Some(NodeId::ROOT));
}

#[test]
fn test_append_moves_attached_node() {
    let mut tree = new_tree();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let span = append_element(&mut tree, NodeId::ROOT, "span");
    let b = append_element(&mut tree, div, "b");

    tree.append(span, b);

    assert!(children(&tree, div).is_empty());
    assert_eq!(children(&tree, span), [b]);
    assert_eq!(tree.parent(b), Some(span));
}

#[test]
fn test_remove_middle_child() {
    let mut tree = new_tree();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let b = append_element(&mut tree, NodeId::ROOT, "b");
    let c = append_element(&mut tree, NodeId::ROOT, "c");

    tree.remove(b);

    assert_eq!(children(&tree, NodeId::ROOT), [a, c]);
    assert_eq!(tree.next(a), Some(c));
    assert_eq!(tree.prev(c), Some(a));
    assert!(tree.is_detached(b));
    assert_eq!(tree.prev(b), None);
    assert_eq!(tree.next(b), None);
}

#[test]
fn test_remove_first_and_last() {
    let mut tree = new_tree();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let b = append_element(&mut tree, NodeId::ROOT, "b");
    let c = append_element(&mut tree, NodeId::ROOT, "c");

    tree.remove(a);
    tree.remove(c);

    assert_eq!(tree.first_child(NodeId::ROOT), Some(b));
    assert_eq!(tree.last_child(NodeId::ROOT), Some(b));
    assert_eq!(tree.prev(b), None);
    assert_eq!(tree.next(b), None);
}

#[test]
fn test_root_is_never_detached() {
    let tree = new_tree();
    assert!(!tree.is_detached(NodeId::ROOT));
}

// ========== insert ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = new_tree();
    let existing = append_element(&mut tree, NodeId::ROOT, "b");
    let new_child = tree.create_element("a");

    tree.insert_before(new_child, existing);

    assert_eq!(children(&tree, NodeId::ROOT), [new_child, existing]);
    assert_eq!(tree.prev(new_child), None);
    assert_eq!(tree.prev(existing), Some(new_child));
}

#[test]
fn test_insert_after_last_child() {
    let mut tree = new_tree();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let b = tree.create_element("b");

    tree.insert_after(b, a);

    assert_eq!(children(&tree, NodeId::ROOT), [a, b]);
    assert_eq!(tree.last_child(NodeId::ROOT), Some(b));
}

#[test]
fn test_insert_moves_sibling() {
    let mut tree = new_tree();
    let a = append_element(&mut tree, NodeId::ROOT, "a");
    let b = append_element(&mut tree, NodeId::ROOT, "b");
    let c = append_element(&mut tree, NodeId::ROOT, "c");

    tree.insert_before(c, a);

    assert_eq!(children(&tree, NodeId::ROOT), [c, a, b]);
    assert_eq!(tree.last_child(NodeId::ROOT), Some(b));
}

#[test]
fn test_insert_next_to_detached_reference_is_noop() {
    let mut tree = new_tree();
    let detached = tree.create_element("p");
    let node = tree.create_element("b");

    tree.insert_before(node, detached);

    assert!(tree.is_detached(node));
}

// ========== unwrap / wrap / replace / empty ==========

#[test]
fn test_unwrap_promotes_children() {
    let mut tree = new_tree();
    let before = append_element(&mut tree, NodeId::ROOT, "i");
    let span = append_element(&mut tree, NodeId::ROOT, "span");
    let after = append_element(&mut tree, NodeId::ROOT, "u");
    let a = append_element(&mut tree, span, "a");
    let b = append_element(&mut tree, span, "b");

    tree.unwrap(span);

    assert_eq!(children(&tree, NodeId::ROOT), [before, a, b, after]);
    assert!(tree.is_detached(span));
}

#[test]
fn test_wrap_and_replace() {
    let mut tree = new_tree();
    let text = tree.create_text("x");
    tree.append(NodeId::ROOT, text);

    let p = tree.create_element("p");
    tree.wrap(text, p);
    assert_eq!(children(&tree, NodeId::ROOT), [p]);
    assert_eq!(children(&tree, p), [text]);

    let br = tree.create_element("br");
    tree.replace(text, br);
    assert_eq!(children(&tree, p), [br]);
    assert!(tree.is_detached(text));
}

#[test]
fn test_empty_detaches_children() {
    let mut tree = new_tree();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    let a = append_element(&mut tree, p, "a");
    let b = append_element(&mut tree, p, "b");

    tree.empty(p);

    assert_eq!(tree.first_child(p), None);
    assert!(tree.is_detached(a));
    assert!(tree.is_detached(b));
}

#[test]
fn test_clone_node_is_shallow() {
    let mut tree = new_tree();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    tree.set_attr(p, "class", "x");
    let _child = append_element(&mut tree, p, "b");

    let copy = tree.clone_node(p);

    assert_eq!(tree.name(copy), "p");
    assert_eq!(tree.attr(copy, "class"), Some("x"));
    assert_eq!(tree.first_child(copy), None);
    assert!(tree.is_detached(copy));
}

// ========== walk ==========

#[test]
fn test_walk_is_preorder_and_bounded() {
    let mut tree = new_tree();
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    let p = append_element(&mut tree, div, "p");
    let b = append_element(&mut tree, p, "b");
    let span = append_element(&mut tree, div, "span");
    let outside = append_element(&mut tree, NodeId::ROOT, "hr");

    let mut order = Vec::new();
    let mut current = Some(div);
    while let Some(id) = current {
        order.push(id);
        current = tree.walk(id, Some(div));
    }
    assert_eq!(order, [div, p, b, span]);

    assert_eq!(tree.walk(span, None), Some(outside));
    assert_eq!(tree.walk_back(span, Some(div)), Some(p));
    assert_eq!(tree.get_all(NodeId::ROOT, "b"), [b]);
}

// ========== is_empty_node ==========

#[test]
fn test_is_empty_node() {
    let non_empty = set(&["br", "img"]);
    let whitespace = set(&["pre"]);
    let never = |_: &AstTree, _: NodeId| false;

    let mut tree = new_tree();
    let p = append_element(&mut tree, NodeId::ROOT, "p");
    let ws = tree.create_text("  \n");
    tree.append(p, ws);
    assert!(tree.is_empty_node(p, &non_empty, &whitespace, never));

    let bogus = append_element(&mut tree, p, "span");
    tree.set_attr(bogus, BOGUS_ATTR, "1");
    assert!(tree.is_empty_node(p, &non_empty, &whitespace, never));

    let _br = append_element(&mut tree, bogus, "br");
    assert!(!tree.is_empty_node(p, &non_empty, &whitespace, never));

    let pre = append_element(&mut tree, NodeId::ROOT, "pre");
    let pre_ws = tree.create_text(" ");
    tree.append(pre, pre_ws);
    let div = append_element(&mut tree, NodeId::ROOT, "div");
    tree.append(div, pre);
    assert!(!tree.is_empty_node(div, &non_empty, &whitespace, never));

    let anchor = append_element(&mut tree, NodeId::ROOT, "a");
    tree.set_attr(anchor, "id", "top");
    assert!(!tree.is_empty_node(anchor, &non_empty, &whitespace, never));

    let nbsp = append_element(&mut tree, NodeId::ROOT, "td");
    let nbsp_text = tree.create_text("\u{a0}");
    tree.append(nbsp, nbsp_text);
    assert!(!tree.is_empty_node(nbsp, &non_empty, &whitespace, never));
}

// ========== node kinds ==========

#[test]
fn test_node_kind_display() {
    assert_eq!(NodeKind::Element.to_string(), "Element");
    assert_eq!(NodeKind::CData.to_string(), "CData");
    assert_eq!(
        NodeKind::ProcessingInstruction.to_string(),
        "ProcessingInstruction"
    );
}
