//! The parse pipeline.
//!
//! Markup is parsed by html5ever, sanitized against the [`Schema`],
//! transcribed into an [`AstTree`] and normalized in a single walk. Repair,
//! root-block wrapping and the registered filters run afterwards.

use std::rc::Rc;

use quokka_ast::{AstTree, NodeId};
use quokka_schema::Schema;

use crate::args::{Format, ParserArgs};
use crate::builder::build_tree;
use crate::filter::{FilterCallback, FilterMatches, FilterRegistry, ParserFilter};
use crate::invalid::{clean_invalid_nodes, find_invalid_child};
use crate::native::{NativeKind, NativeNode, parse_body};
use crate::policy::SchemaPolicy;
use crate::root_block::add_root_blocks;
use crate::sanitize::sanitize;
use crate::settings::ParserSettings;
use crate::walker::{Visitor, walk_tree};
use crate::whitespace::WhitespaceCleaner;
use crate::{builtin_filters, legacy};

/// A configured HTML parser.
///
/// The schema is shared and never mutated by parsing; settings are fixed at
/// construction. Built-in filters are registered by [`DomParser::new`].
pub struct DomParser {
    settings: ParserSettings,
    schema: Rc<Schema>,
    node_filters: FilterRegistry,
    attribute_filters: FilterRegistry,
}

impl Default for DomParser {
    fn default() -> Self {
        Self::new(ParserSettings::default(), Schema::html5())
    }
}

impl DomParser {
    /// Create a parser and register the built-in filters enabled by
    /// `settings`.
    #[must_use]
    pub fn new(settings: ParserSettings, schema: impl Into<Rc<Schema>>) -> Self {
        let mut parser = Self {
            settings,
            schema: schema.into(),
            node_filters: FilterRegistry::default(),
            attribute_filters: FilterRegistry::default(),
        };
        builtin_filters::register(&mut parser);
        legacy::register(&mut parser);
        parser
    }

    /// The schema this parser enforces.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// A shared handle on the schema, for filters that need it.
    #[must_use]
    pub fn shared_schema(&self) -> Rc<Schema> {
        Rc::clone(&self.schema)
    }

    /// The parser settings.
    #[must_use]
    pub const fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Register `callback` for elements named in the comma-separated `names`.
    pub fn add_node_filter<F>(&mut self, names: &str, callback: F)
    where
        F: Fn(&mut AstTree, &[NodeId], &str, &mut ParserArgs) + 'static,
    {
        let callback: FilterCallback = Rc::new(callback);
        self.node_filters.add(names, &callback);
    }

    /// Register `callback` for elements carrying any attribute named in the
    /// comma-separated `names`.
    pub fn add_attribute_filter<F>(&mut self, names: &str, callback: F)
    where
        F: Fn(&mut AstTree, &[NodeId], &str, &mut ParserArgs) + 'static,
    {
        let callback: FilterCallback = Rc::new(callback);
        self.attribute_filters.add(names, &callback);
    }

    /// Registered node filters in registration order.
    #[must_use]
    pub fn node_filters(&self) -> &[ParserFilter] {
        self.node_filters.filters()
    }

    /// Registered attribute filters in registration order.
    #[must_use]
    pub fn attribute_filters(&self) -> &[ParserFilter] {
        self.attribute_filters.filters()
    }

    /// Parse `html` into a sanitized, normalized tree.
    ///
    /// # Algorithm
    ///
    /// STEP 1: Parse and sanitize the markup inside the root element
    /// (`args.context`, else the configured root name).
    ///
    /// STEP 2: Transcribe the sanitized tree into an [`AstTree`].
    ///
    /// STEP 3: Walk the tree once: collapse whitespace and match filters on
    /// the way down, settle empty elements and collect invalid children on
    /// the way up.
    ///
    /// STEP 4: Repair invalid children. In a contextual parse, children of
    /// the root are not repaired; they set `args.invalid` instead.
    ///
    /// STEP 5: Wrap stray root content in the forced root block.
    ///
    /// STEP 6: Run the matched filters, unless the content was invalid.
    pub fn parse(&self, html: &str, args: &mut ParserArgs) -> AstTree {
        let validate = self.settings.validate;
        args.invalid = false;
        let root_name = args
            .context
            .as_deref()
            .unwrap_or(self.settings.root_name.as_str())
            .to_ascii_lowercase();
        let root = NodeId::ROOT;

        // STEP 1
        let element = self.parse_and_sanitize(html, &root_name, args.format);

        // STEP 2
        let mut tree = build_tree(&root_name, &element, self.schema.special_elements());

        // STEP 3
        let mut matches = FilterMatches::new(&self.node_filters, &self.attribute_filters);
        let mut invalid_children = Vec::new();
        {
            let cleaner = WhitespaceCleaner::new(&self.schema, &self.settings, args, root);
            let mut whitespace_pre = |tree: &mut AstTree, id: NodeId| cleaner.pre(tree, id);
            let mut match_finder = |tree: &mut AstTree, id: NodeId| matches.match_node(tree, id);
            let mut whitespace_post = |tree: &mut AstTree, id: NodeId| cleaner.post(tree, id);
            let mut invalid_finder = |tree: &mut AstTree, id: NodeId| {
                if validate {
                    find_invalid_child(&self.schema, tree, id, &mut invalid_children);
                }
            };

            let mut pre: [&mut Visitor<'_>; 2] = [&mut whitespace_pre, &mut match_finder];
            let mut post: [&mut Visitor<'_>; 2] = [&mut whitespace_post, &mut invalid_finder];
            walk_tree(&mut tree, root, &mut pre, &mut post);
        }

        // STEP 4
        invalid_children.reverse();
        let mut on_create = |tree: &mut AstTree, id: NodeId| matches.match_node(tree, id);
        if validate && !invalid_children.is_empty() {
            if args.context.is_some() {
                let (top_level, nested): (Vec<NodeId>, Vec<NodeId>) = invalid_children
                    .into_iter()
                    .partition(|id| tree.parent(*id) == Some(root));
                clean_invalid_nodes(&mut tree, &nested, &self.schema, root, &mut on_create);
                args.invalid = !top_level.is_empty();
                if args.invalid {
                    log::debug!(
                        target: "quokka.repair",
                        "{} top-level node(s) are not valid inside <{root_name}>",
                        top_level.len()
                    );
                }
            } else {
                clean_invalid_nodes(
                    &mut tree,
                    &invalid_children,
                    &self.schema,
                    root,
                    &mut on_create,
                );
            }
        }

        // STEP 5
        let block_name = args
            .forced_root_block
            .as_ref()
            .unwrap_or(&self.settings.forced_root_block)
            .block_name()
            .map(str::to_string);
        if let Some(block_name) = block_name
            && (root_name == "body" || args.is_root_content)
        {
            add_root_blocks(
                &mut tree,
                &self.schema,
                root,
                &block_name,
                &self.settings.forced_root_block_attrs,
                &mut on_create,
            );
        }

        // STEP 6
        if !args.invalid {
            matches.run(&mut tree, args);
        }

        tree
    }

    /// Match and run the registered filters over the subtree at `id`.
    pub fn filter_node(&self, tree: &mut AstTree, id: NodeId, args: &mut ParserArgs) {
        let mut matches = FilterMatches::new(&self.node_filters, &self.attribute_filters);
        {
            let mut match_finder =
                |tree: &mut AstTree, node: NodeId| matches.match_node(tree, node);
            let mut pre: [&mut Visitor<'_>; 1] = [&mut match_finder];
            walk_tree(tree, id, &mut pre, &mut []);
        }
        matches.run(tree, args);
    }

    /// Parse `html` inside a `<body>` and sanitize it.
    ///
    /// A raw-content root (such as `textarea`) is spelled out around the
    /// markup so its content parses as text; that element is returned.
    fn parse_and_sanitize(&self, html: &str, root_name: &str, format: Format) -> NativeNode {
        let is_special_root = self.schema.is_special(root_name);
        let mut body = if is_special_root {
            parse_body(&format!("<{root_name}>{html}</{root_name}>"), format)
        } else {
            parse_body(html, format)
        };

        let mut policy = SchemaPolicy::new(&self.schema, &self.settings);
        sanitize(&mut body, &mut policy);

        if is_special_root {
            body.children
                .into_iter()
                .find(|child| child.kind == NativeKind::Element)
                .unwrap_or_else(|| NativeNode::element(root_name))
        } else {
            body
        }
    }
}
