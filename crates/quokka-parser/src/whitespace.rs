//! Whitespace collapsing and empty-element cleanup.
//!
//! [§ 16.3.3 Whitespace processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
//!
//! Runs as a walker pre-visitor (text collapsing and leading trims, so every
//! node to the left is already settled) and a post-visitor (trailing trims
//! and empty elements, so every child is already settled).

use std::collections::HashSet;
use std::sync::LazyLock;

use quokka_ast::{AstTree, NodeId};
use quokka_schema::{EmptyPolicy, Schema};
use regex::Regex;

use crate::args::ParserArgs;
use crate::settings::ParserSettings;
use crate::utils::{
    block_elements, is_empty, is_line_break_node, is_padded_with_nbsp, padd_empty_node,
    trim_end_whitespace, trim_start_whitespace,
};

static ALL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n]+").expect("valid regex"));

/// Which side of a node to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

/// Schema-driven whitespace normalizer for one parse.
pub struct WhitespaceCleaner<'a> {
    schema: &'a Schema,
    settings: &'a ParserSettings,
    args: &'a ParserArgs,
    root: NodeId,
    block_elements: HashSet<String>,
}

impl<'a> WhitespaceCleaner<'a> {
    /// Create a cleaner for the tree rooted at `root`.
    #[must_use]
    pub fn new(
        schema: &'a Schema,
        settings: &'a ParserSettings,
        args: &'a ParserArgs,
        root: NodeId,
    ) -> Self {
        Self {
            schema,
            settings,
            args,
            root,
            block_elements: block_elements(schema),
        }
    }

    /// Collapse whitespace runs and strip leading whitespace after a line
    /// break or at the start of a block.
    pub fn pre(&self, tree: &mut AstTree, id: NodeId) {
        if !tree.is_text(id) || self.has_whitespace_parent(tree, id) {
            return;
        }

        let value = tree.value(id).unwrap_or_default();
        let collapsed = ALL_WHITESPACE.replace_all(value, " ");
        let text = if is_line_break_node(tree, tree.prev(id), &self.block_elements)
            || self.is_at_edge_of_block(tree, id, Edge::Start)
        {
            trim_start_whitespace(&collapsed)
        } else {
            &collapsed
        };

        if text.is_empty() {
            tree.remove(id);
        } else {
            let text = text.to_string();
            tree.set_value(id, text);
        }
    }

    /// Trim trailing whitespace before a block or at the end of a block, and
    /// pad, remove or unwrap empty elements.
    pub fn post(&self, tree: &mut AstTree, id: NodeId) {
        if tree.is_element(id) {
            self.clean_element(tree, id);
        } else if tree.is_text(id) && !self.has_whitespace_parent(tree, id) {
            let next_is_block = tree
                .next(id)
                .is_some_and(|next| self.block_elements.contains(tree.name(next)));
            let value = tree.value(id).unwrap_or_default();
            let text = if next_is_block || self.is_at_edge_of_block(tree, id, Edge::End) {
                trim_end_whitespace(value)
            } else {
                value
            };

            if text.is_empty() {
                tree.remove(id);
            } else if text.len() != value.len() {
                let text = text.to_string();
                tree.set_value(id, text);
            }
        }
    }

    fn clean_element(&self, tree: &mut AstTree, id: NodeId) {
        if !self.settings.validate {
            return;
        }
        let Some(rule) = self.schema.element_rule(tree.name(id)) else {
            return;
        };

        let is_block = self.block_elements.contains(tree.name(id));
        let is_node_empty = is_empty(self.schema, tree, id);

        if rule.padd_in_empty_block && is_node_empty && self.is_text_root_block_empty(tree, id) {
            padd_empty_node(tree, id, self.settings, self.args, is_block);
        } else if rule.empty == EmptyPolicy::Remove && is_node_empty {
            if is_block {
                tree.remove(id);
            } else {
                tree.unwrap(id);
            }
        } else if rule.empty == EmptyPolicy::Pad && (is_node_empty || is_padded_with_nbsp(tree, id))
        {
            padd_empty_node(tree, id, self.settings, self.args, is_block);
        }
    }

    fn has_whitespace_parent(&self, tree: &AstTree, id: NodeId) -> bool {
        tree.ancestors(id)
            .any(|ancestor| self.schema.whitespace_elements().contains(tree.name(ancestor)))
    }

    /// The nearest text-root block at or above `id` is empty.
    fn is_text_root_block_empty(&self, tree: &AstTree, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(tree.ancestors(id))
            .find(|node| {
                self.schema
                    .text_root_block_elements()
                    .contains(tree.name(*node))
            })
            .is_some_and(|block| is_empty(self.schema, tree, block))
    }

    /// The node has no sibling on `edge` and its parent is a block. The
    /// synthetic root only counts when the content is root content.
    fn is_at_edge_of_block(&self, tree: &AstTree, id: NodeId, edge: Edge) -> bool {
        let neighbour = match edge {
            Edge::Start => tree.prev(id),
            Edge::End => tree.next(id),
        };
        if neighbour.is_some() {
            return false;
        }
        tree.parent(id).is_some_and(|parent| {
            self.block_elements.contains(tree.name(parent))
                && (parent != self.root || self.args.is_root_content)
        })
    }
}
