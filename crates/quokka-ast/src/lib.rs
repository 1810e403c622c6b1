//! AST node tree for the Quokka parser.
//!
//! This crate provides the arena-based tree that the parser produces and
//! every later stage (whitespace cleanup, repair, filters) mutates in place.
//! Its shape follows the [DOM Living Standard](https://dom.spec.whatwg.org/)
//! node model, trimmed to what a sanitized fragment needs.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//!
//! Nodes are never freed. Removing a node only unlinks it: its `parent` becomes
//! `None` and it is no longer reachable from the root. Such a *detached* node is
//! a tombstone; holders of its `NodeId` (a traversal snapshot, a filter match
//! list) can check [`AstTree::is_detached`] and skip it.

use std::collections::HashSet;

use strum_macros::Display;

mod attributes;

pub use attributes::{Attribute, Attributes};

/// Marker attribute identifying editor scaffolding ("internal" elements).
pub const INTERNAL_ATTR: &str = "data-qk-type";

/// Marker attribute for transient elements that never reach sanitized output.
pub const BOGUS_ATTR: &str = "data-qk-bogus";

/// Marker attribute for selection bookmarks, which count as content.
pub const BOOKMARK_ATTR: &str = "data-qk-bookmark";

/// A type-safe index into the AST arena.
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NodeKind {
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element,
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text,
    /// [§ 4.11 Interface CDATASection](https://dom.spec.whatwg.org/#interface-cdatasection)
    CData,
    /// [§ 4.12 Interface ProcessingInstruction](https://dom.spec.whatwg.org/#interface-processinginstruction)
    ProcessingInstruction,
    /// [§ 4.13 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment,
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType,
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    DocumentFragment,
}

impl NodeKind {
    /// The numeric `nodeType` code for this kind.
    ///
    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-nodetype)
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Element => 1,
            Self::Text => 3,
            Self::CData => 4,
            Self::ProcessingInstruction => 7,
            Self::Comment => 8,
            Self::Document => 9,
            Self::DocumentType => 10,
            Self::DocumentFragment => 11,
        }
    }

    /// The synthetic node name used for non-element kinds.
    #[must_use]
    pub const fn synthetic_name(self) -> Option<&'static str> {
        match self {
            Self::Element => None,
            Self::Text => Some("#text"),
            Self::CData => Some("#cdata"),
            Self::ProcessingInstruction => Some("#pi"),
            Self::Comment => Some("#comment"),
            Self::Document => Some("#document"),
            Self::DocumentType => Some("#doctype"),
            Self::DocumentFragment => Some("#document-fragment"),
        }
    }
}

/// A node in the AST arena.
///
/// Tree links are indices: `parent`, `prev` and `next` never own anything,
/// and `first_child`/`last_child` bound the doubly-linked sibling chain of
/// the node's children.
#[derive(Debug, Clone)]
pub struct AstNode {
    /// Lower-cased tag name, or a synthetic name such as `#text`.
    pub name: String,
    /// The node kind; drives every branch in normalization.
    pub kind: NodeKind,
    /// Element attributes (always empty for other kinds).
    pub attributes: Attributes,
    /// Payload for text, comment, CDATA and processing-instruction nodes.
    pub value: Option<String>,
    /// When set, `value` is raw text (script/style content) that must not be
    /// re-escaped.
    pub raw: bool,
    /// Parent node, or `None` for the root and detached nodes.
    pub parent: Option<NodeId>,
    /// First child in the sibling chain.
    pub first_child: Option<NodeId>,
    /// Last child in the sibling chain.
    pub last_child: Option<NodeId>,
    /// Previous sibling.
    pub prev: Option<NodeId>,
    /// Next sibling.
    pub next: Option<NodeId>,
}

impl AstNode {
    fn new(name: String, kind: NodeKind) -> Self {
        Self {
            name,
            kind,
            attributes: Attributes::new(),
            value: None,
            raw: false,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        }
    }
}

/// Arena-based AST with O(1) node access and traversal.
///
/// All nodes live in a contiguous vector. The root (a document fragment named
/// after the parse context) is always at [`NodeId::ROOT`].
#[derive(Debug, Clone)]
pub struct AstTree {
    nodes: Vec<AstNode>,
}

impl AstTree {
    /// Create a new tree with just a root node.
    #[must_use]
    pub fn new(root_name: &str, kind: NodeKind) -> Self {
        Self {
            nodes: vec![AstNode::new(root_name.to_string(), kind)],
        }
    }

    /// Get the root node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut AstNode> {
        self.nodes.get_mut(id.0)
    }

    /// Get a node by its ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id.0]
    }

    /// Get a mutable reference to a node by its ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut AstNode {
        &mut self.nodes[id.0]
    }

    /// Number of allocated nodes, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty (it always holds at least the root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn create(&mut self, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(AstNode::new(name.to_string(), kind));
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create(name, NodeKind::Element)
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, value: &str) -> NodeId {
        let id = self.create("#text", NodeKind::Text);
        self.nodes[id.0].value = Some(value.to_string());
        id
    }

    /// The node's name.
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Rename a node in place (children and attributes are kept).
    pub fn set_name(&mut self, id: NodeId, name: &str) {
        name.clone_into(&mut self.nodes[id.0].name);
    }

    /// The node's kind.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    /// Returns true if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Element
    }

    /// Returns true if the node is a text node.
    #[must_use]
    pub fn is_text(&self, id: NodeId) -> bool {
        self.kind(id) == NodeKind::Text
    }

    /// The node's value (text/comment/CDATA/PI payload).
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].value.as_deref()
    }

    /// Replace the node's value.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id.0].value = Some(value.into());
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0].attributes.get(name)
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id.0].attributes.contains(name)
    }

    /// Set an attribute value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[id.0].attributes.set(name, value);
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let _ = self.nodes[id.0].attributes.remove(name);
    }

    /// The node's attributes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &Attributes {
        &self.nodes[id.0].attributes
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child)
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev)
    }

    /// Returns true if the node has been unlinked from its parent.
    ///
    /// The root is never detached.
    #[must_use]
    pub fn is_detached(&self, id: NodeId) -> bool {
        id != NodeId::ROOT && self.parent(id).is_none()
    }

    /// Iterate over the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> ChildIterator<'_> {
        ChildIterator {
            tree: self,
            current: self.first_child(id),
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Returns the node's only child if it has exactly one.
    #[must_use]
    pub fn only_child(&self, id: NodeId) -> Option<NodeId> {
        let first = self.first_child(id)?;
        (self.last_child(id) == Some(first)).then_some(first)
    }

    /// Unlink a node from its parent and siblings.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let prev = self.nodes[id.0].prev;
        let next = self.nodes[id.0].next;

        match prev {
            Some(prev_id) => self.nodes[prev_id.0].next = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next_id) => self.nodes[next_id.0].prev = prev,
            None => self.nodes[parent.0].last_child = prev,
        }

        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev = None;
        node.next = None;
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`, moving it out of its
    /// current position first.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let prev_last_child = self.nodes[parent.0].last_child;
        match prev_last_child {
            Some(prev_id) => self.nodes[prev_id.0].next = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev = prev_last_child;
        node.next = None;
        self.nodes[parent.0].last_child = Some(child);
    }

    /// [§ 4.2.3 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Inserts `node` as the previous sibling of `reference`. Does nothing if
    /// `reference` is detached.
    pub fn insert_before(&mut self, node: NodeId, reference: NodeId) {
        if node == reference {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(node);

        let prev = self.nodes[reference.0].prev;
        match prev {
            Some(prev_id) => self.nodes[prev_id.0].next = Some(node),
            None => self.nodes[parent.0].first_child = Some(node),
        }
        self.nodes[reference.0].prev = Some(node);

        let inserted = &mut self.nodes[node.0];
        inserted.parent = Some(parent);
        inserted.prev = prev;
        inserted.next = Some(reference);
    }

    /// Inserts `node` as the next sibling of `reference`. Does nothing if
    /// `reference` is detached.
    pub fn insert_after(&mut self, node: NodeId, reference: NodeId) {
        if node == reference {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            return;
        };
        self.detach(node);

        let next = self.nodes[reference.0].next;
        match next {
            Some(next_id) => self.nodes[next_id.0].prev = Some(node),
            None => self.nodes[parent.0].last_child = Some(node),
        }
        self.nodes[reference.0].next = Some(node);

        let inserted = &mut self.nodes[node.0];
        inserted.parent = Some(parent);
        inserted.prev = Some(reference);
        inserted.next = next;
    }

    /// [§ 4.2.4 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detaches the node (and with it, its subtree) from the tree.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    /// Replaces the node with its children, then removes it.
    pub fn unwrap(&mut self, id: NodeId) {
        if self.parent(id).is_none() {
            return;
        }
        while let Some(child) = self.first_child(id) {
            self.insert_before(child, id);
        }
        self.detach(id);
    }

    /// Puts `replacement` where `id` is and detaches `id`.
    pub fn replace(&mut self, id: NodeId, replacement: NodeId) {
        self.insert_before(replacement, id);
        self.detach(id);
    }

    /// Puts `wrapper` where `id` is and moves `id` inside it.
    pub fn wrap(&mut self, id: NodeId, wrapper: NodeId) {
        self.insert_before(wrapper, id);
        self.append(wrapper, id);
    }

    /// Detaches every child of the node.
    pub fn empty(&mut self, id: NodeId) {
        while let Some(child) = self.first_child(id) {
            self.detach(child);
        }
    }

    /// Allocates a shallow copy of the node: name, kind, attributes and value,
    /// but no children and no tree links.
    pub fn clone_node(&mut self, id: NodeId) -> NodeId {
        let source = &self.nodes[id.0];
        let mut copy = AstNode::new(source.name.clone(), source.kind);
        copy.attributes = source.attributes.clone();
        copy.value.clone_from(&source.value);
        copy.raw = source.raw;

        let copy_id = NodeId(self.nodes.len());
        self.nodes.push(copy);
        copy_id
    }

    /// Pre-order successor of `id`, bounded by `root`.
    ///
    /// Steps to the first child, else the next sibling, else the next sibling
    /// of the nearest ancestor below `root`.
    #[must_use]
    pub fn walk(&self, id: NodeId, root: Option<NodeId>) -> Option<NodeId> {
        if let Some(child) = self.first_child(id) {
            return Some(child);
        }
        if Some(id) == root {
            return None;
        }
        if let Some(sibling) = self.next(id) {
            return Some(sibling);
        }
        let mut ancestor = self.parent(id);
        while let Some(current) = ancestor {
            if Some(current) == root {
                break;
            }
            if let Some(sibling) = self.next(current) {
                return Some(sibling);
            }
            ancestor = self.parent(current);
        }
        None
    }

    /// Reverse pre-order step: last child, else previous sibling, else the
    /// previous sibling of the nearest ancestor below `root`.
    #[must_use]
    pub fn walk_back(&self, id: NodeId, root: Option<NodeId>) -> Option<NodeId> {
        if let Some(child) = self.last_child(id) {
            return Some(child);
        }
        if Some(id) == root {
            return None;
        }
        if let Some(sibling) = self.prev(id) {
            return Some(sibling);
        }
        let mut ancestor = self.parent(id);
        while let Some(current) = ancestor {
            if Some(current) == root {
                break;
            }
            if let Some(sibling) = self.prev(current) {
                return Some(sibling);
            }
            ancestor = self.parent(current);
        }
        None
    }

    /// All descendants of `id` with the given name, in document order.
    #[must_use]
    pub fn get_all(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut current = self.first_child(id);
        while let Some(node) = current {
            if self.name(node) == name {
                found.push(node);
            }
            current = self.walk(node, Some(id));
        }
        found
    }

    /// Returns true if the element counts as content even without children:
    /// named anchors, childless elements with an id, and bookmarks.
    #[must_use]
    pub fn is_non_empty_element(&self, id: NodeId) -> bool {
        if !self.is_element(id) {
            return false;
        }
        let has = |name: &str| self.attr(id, name).is_some_and(|v| !v.is_empty());
        let is_named_anchor = self.name(id) == "a" && !has("href") && has("id");
        has("name")
            || (has("id") && self.first_child(id).is_none())
            || has(BOOKMARK_ATTR)
            || is_named_anchor
    }

    /// Returns true if the node has no meaningful content.
    ///
    /// Walks the subtree: elements in `non_empty_elements`, comments,
    /// non-whitespace text, whitespace text inside `whitespace_elements`, and
    /// nodes accepted by `predicate` are content. Bogus elements are
    /// transparent.
    #[must_use]
    pub fn is_empty_node<F>(
        &self,
        id: NodeId,
        non_empty_elements: &HashSet<String>,
        whitespace_elements: &HashSet<String>,
        predicate: F,
    ) -> bool
    where
        F: Fn(&Self, NodeId) -> bool,
    {
        if self.is_non_empty_element(id) {
            return false;
        }

        let mut current = self.first_child(id);
        while let Some(node) = current {
            current = self.walk(node, Some(id));
            match self.kind(node) {
                NodeKind::Element => {
                    if self.has_attr(node, BOGUS_ATTR) {
                        continue;
                    }
                    if non_empty_elements.contains(self.name(node))
                        || self.is_non_empty_element(node)
                    {
                        return false;
                    }
                }
                NodeKind::Comment => return false,
                NodeKind::Text => {
                    let text = self.value(node).unwrap_or_default();
                    if !is_whitespace_text(text) {
                        return false;
                    }
                    if self
                        .parent(node)
                        .is_some_and(|parent| whitespace_elements.contains(self.name(parent)))
                    {
                        return false;
                    }
                }
                _ => {}
            }
            if predicate(self, node) {
                return false;
            }
        }
        true
    }
}

/// Returns true for strings made only of ASCII space, tab, CR and LF.
///
/// U+00A0 is deliberately not whitespace here: it is the padding character.
#[must_use]
pub fn is_whitespace_text(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

/// Iterator over the children of a node.
pub struct ChildIterator<'a> {
    tree: &'a AstTree,
    current: Option<NodeId>,
}

impl Iterator for ChildIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next(id);
        Some(id)
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a AstTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Print an AST for debugging.
pub fn print_tree(tree: &AstTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    let node = tree.node(id);
    match node.kind {
        NodeKind::Element => {
            if node.attributes.is_empty() {
                println!("{prefix}<{}>", node.name);
            } else {
                let attrs: Vec<String> = node
                    .attributes
                    .iter()
                    .map(|attr| {
                        if attr.value.is_empty() {
                            attr.name.clone()
                        } else {
                            format!("{}=\"{}\"", attr.name, attr.value)
                        }
                    })
                    .collect();
                println!("{prefix}<{} {}>", node.name, attrs.join(" "));
            }
        }
        NodeKind::Text => {
            let data = node.value.as_deref().unwrap_or_default();
            let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
            if node.raw {
                println!("{prefix}raw \"{display}\"");
            } else {
                println!("{prefix}\"{display}\"");
            }
        }
        NodeKind::Comment => {
            println!("{prefix}<!--{}-->", node.value.as_deref().unwrap_or_default());
        }
        kind => {
            println!("{prefix}{} ({kind})", node.name);
        }
    }
    for child in tree.children(id) {
        print_tree(tree, child, indent + 1);
    }
}
