//! Node and attribute filters.
//!
//! Filters are registered under tag names (node filters) or attribute names
//! (attribute filters). During a parse every node is matched against them
//! and each callback is later invoked once with all of its nodes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;

use quokka_ast::{AstTree, NodeId};

use crate::args::ParserArgs;

/// A filter callback: the tree, the matched nodes in document order, the
/// name the filter was registered under, and the per-parse options.
pub type FilterCallback = Rc<dyn Fn(&mut AstTree, &[NodeId], &str, &mut ParserArgs)>;

/// The callbacks registered under one name.
#[derive(Clone)]
pub struct ParserFilter {
    /// Tag or attribute name.
    pub name: String,
    /// Callbacks in registration order.
    pub callbacks: Vec<FilterCallback>,
}

impl fmt::Debug for ParserFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserFilter")
            .field("name", &self.name)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Filters keyed by name, kept in first-registration order.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    filters: Vec<ParserFilter>,
    index: HashMap<String, usize>,
}

impl FilterRegistry {
    /// Register `callback` under every name in the comma-separated `names`.
    ///
    /// Registering a name again appends another callback.
    pub fn add(&mut self, names: &str, callback: &FilterCallback) {
        for name in names.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            if let Some(&position) = self.index.get(name) {
                self.filters[position].callbacks.push(Rc::clone(callback));
            } else {
                let _ = self.index.insert(name.to_string(), self.filters.len());
                self.filters.push(ParserFilter {
                    name: name.to_string(),
                    callbacks: vec![Rc::clone(callback)],
                });
            }
        }
    }

    /// All filters in registration order.
    #[must_use]
    pub fn filters(&self) -> &[ParserFilter] {
        &self.filters
    }

    /// Position of the filter registered under `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Nodes collected for each filter during one parse.
#[derive(Debug)]
pub struct FilterMatches<'a> {
    node_filters: &'a FilterRegistry,
    attribute_filters: &'a FilterRegistry,
    nodes: BTreeMap<usize, Vec<NodeId>>,
    attributes: BTreeMap<usize, Vec<NodeId>>,
}

impl<'a> FilterMatches<'a> {
    /// Start collecting against the given registries.
    #[must_use]
    pub const fn new(
        node_filters: &'a FilterRegistry,
        attribute_filters: &'a FilterRegistry,
    ) -> Self {
        Self {
            node_filters,
            attribute_filters,
            nodes: BTreeMap::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Record `id` under every filter it matches: by name, and for elements
    /// by each registered attribute it carries.
    pub fn match_node(&mut self, tree: &AstTree, id: NodeId) {
        if let Some(position) = self.node_filters.position(tree.name(id)) {
            self.nodes.entry(position).or_default().push(id);
        }

        if !tree.is_element(id) {
            return;
        }
        for (position, filter) in self.attribute_filters.filters().iter().enumerate() {
            if tree.has_attr(id, &filter.name) {
                self.attributes.entry(position).or_default().push(id);
            }
        }
    }

    /// Returns true if no node matched any filter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.attributes.is_empty()
    }

    /// Invoke every matched filter. Each registry runs in registration
    /// order; callers must not rely on node filters firing before attribute
    /// filters for the same node.
    ///
    /// Before each callback, nodes that earlier callbacks detached, renamed
    /// or stripped of the matched attribute are dropped; a callback left with no
    /// nodes is skipped.
    pub fn run(self, tree: &mut AstTree, args: &mut ParserArgs) {
        for (position, mut nodes) in self.nodes {
            let filter = &self.node_filters.filters()[position];
            run_filter(tree, filter, &mut nodes, false, args);
        }
        for (position, mut nodes) in self.attributes {
            let filter = &self.attribute_filters.filters()[position];
            run_filter(tree, filter, &mut nodes, true, args);
        }
    }
}

fn run_filter(
    tree: &mut AstTree,
    filter: &ParserFilter,
    nodes: &mut Vec<NodeId>,
    is_attribute_match: bool,
    args: &mut ParserArgs,
) {
    for callback in &filter.callbacks {
        nodes.retain(|&id| {
            tree.parent(id).is_some()
                && if is_attribute_match {
                    tree.has_attr(id, &filter.name)
                } else {
                    tree.name(id) == filter.name
                }
        });
        if nodes.is_empty() {
            continue;
        }
        log::trace!(
            target: "quokka.filter",
            "running filter {} on {} node(s)",
            filter.name,
            nodes.len()
        );
        callback(&mut *tree, nodes.as_slice(), &filter.name, &mut *args);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use quokka_ast::NodeKind;

    use super::*;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, label: &'static str) -> FilterCallback {
        let log = Rc::clone(log);
        Rc::new(move |tree: &mut AstTree, nodes: &[NodeId], name: &str, _: &mut ParserArgs| {
            let names: Vec<&str> = nodes.iter().map(|&id| tree.name(id)).collect();
            log.borrow_mut().push(format!("{label}:{name}:{}", names.join(",")));
        })
    }

    #[test]
    fn test_registry_appends_and_keeps_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = FilterRegistry::default();
        registry.add("p, a", &recorder(&log, "one"));
        registry.add("a", &recorder(&log, "two"));

        let names: Vec<&str> = registry.filters().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["p", "a"]);
        assert_eq!(registry.filters()[1].callbacks.len(), 2);
    }

    #[test]
    fn test_matches_run_once_per_callback() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut nodes = FilterRegistry::default();
        let mut attributes = FilterRegistry::default();
        nodes.add("a", &recorder(&log, "node"));
        attributes.add("href", &recorder(&log, "attr"));

        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let first = tree.create_element("a");
        let second = tree.create_element("a");
        tree.set_attr(first, "href", "x");
        tree.append(NodeId::ROOT, first);
        tree.append(NodeId::ROOT, second);

        let mut matches = FilterMatches::new(&nodes, &attributes);
        for id in [NodeId::ROOT, first, second] {
            matches.match_node(&tree, id);
        }
        matches.run(&mut tree, &mut ParserArgs::default());

        assert_eq!(*log.borrow(), ["node:a:a,a", "attr:href:a"]);
    }

    #[test]
    fn test_detached_nodes_are_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut nodes = FilterRegistry::default();
        let remove_all: FilterCallback =
            Rc::new(|tree: &mut AstTree, ids: &[NodeId], _: &str, _: &mut ParserArgs| {
                for &id in ids {
                    tree.remove(id);
                }
            });
        nodes.add("b", &remove_all);
        nodes.add("b", &recorder(&log, "after"));

        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let b = tree.create_element("b");
        tree.append(NodeId::ROOT, b);

        let empty = FilterRegistry::default();
        let mut matches = FilterMatches::new(&nodes, &empty);
        matches.match_node(&tree, b);
        matches.run(&mut tree, &mut ParserArgs::default());

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_renamed_nodes_are_skipped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut nodes = FilterRegistry::default();
        let rename_first: FilterCallback =
            Rc::new(|tree: &mut AstTree, ids: &[NodeId], _: &str, _: &mut ParserArgs| {
                tree.set_name(ids[0], "i");
            });
        nodes.add("b", &rename_first);
        nodes.add("b", &recorder(&log, "after"));

        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let first = tree.create_element("b");
        let second = tree.create_element("b");
        tree.append(NodeId::ROOT, first);
        tree.append(NodeId::ROOT, second);

        let empty = FilterRegistry::default();
        let mut matches = FilterMatches::new(&nodes, &empty);
        matches.match_node(&tree, first);
        matches.match_node(&tree, second);
        matches.run(&mut tree, &mut ParserArgs::default());

        assert_eq!(tree.name(first), "i");
        assert_eq!(*log.borrow(), ["after:b:b"]);
    }
}
