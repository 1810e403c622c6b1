//! Helpers shared by the whitespace, repair and filter passes.

use std::collections::HashSet;

use quokka_ast::{AstTree, BOGUS_ATTR, NodeId};
use quokka_schema::{EmptyPolicy, Schema};

use crate::args::ParserArgs;
use crate::settings::ParserSettings;

/// Structural containers treated as blocks by the normalization passes.
const STRUCTURAL_BLOCKS: &[&str] = &[
    "script", "style", "head", "html", "body", "title", "meta", "param",
];

/// The non-breaking space used as padding.
pub const NBSP: &str = "\u{a0}";

/// The schema's block elements plus the structural containers.
#[must_use]
pub fn block_elements(schema: &Schema) -> HashSet<String> {
    schema
        .block_elements()
        .iter()
        .cloned()
        .chain(STRUCTURAL_BLOCKS.iter().map(|name| (*name).to_string()))
        .collect()
}

/// Returns true for ASCII whitespace (space, tab, CR, LF).
#[must_use]
pub const fn is_whitespace_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Strip leading ASCII whitespace.
#[must_use]
pub fn trim_start_whitespace(text: &str) -> &str {
    text.trim_start_matches(is_whitespace_char)
}

/// Strip trailing ASCII whitespace.
#[must_use]
pub fn trim_end_whitespace(text: &str) -> &str {
    text.trim_end_matches(is_whitespace_char)
}

/// Returns true if the node's only child is a single non-breaking space.
#[must_use]
pub fn is_padded_with_nbsp(tree: &AstTree, id: NodeId) -> bool {
    tree.only_child(id)
        .is_some_and(|child| tree.is_text(child) && tree.value(child) == Some(NBSP))
}

/// Returns true for an element whose rule pads it and which is padded.
#[must_use]
pub fn is_padded(schema: &Schema, tree: &AstTree, id: NodeId) -> bool {
    tree.is_element(id)
        && schema
            .element_rule(tree.name(id))
            .is_some_and(|rule| rule.empty == EmptyPolicy::Pad)
        && is_padded_with_nbsp(tree, id)
}

/// Schema-aware emptiness: padded children count as content.
#[must_use]
pub fn is_empty(schema: &Schema, tree: &AstTree, id: NodeId) -> bool {
    tree.is_empty_node(
        id,
        schema.non_empty_elements(),
        schema.whitespace_elements(),
        |tree, node| is_padded(schema, tree, node),
    )
}

/// Returns true if `prev` exists and breaks the line (a block or `<br>`).
#[must_use]
pub fn is_line_break_node(
    tree: &AstTree,
    prev: Option<NodeId>,
    block_elements: &HashSet<String>,
) -> bool {
    prev.is_some_and(|node| {
        let name = tree.name(node);
        name == "br" || block_elements.contains(name)
    })
}

/// Replace the node's content with padding.
///
/// Blocks get a `<br>` when `pad_empty_with_br` is set or the content is
/// being inserted (then the `<br>` is bogus); everything else gets a single
/// non-breaking space.
pub fn padd_empty_node(
    tree: &mut AstTree,
    id: NodeId,
    settings: &ParserSettings,
    args: &ParserArgs,
    is_block: bool,
) {
    let br_preferred = settings.pad_empty_with_br || args.insert;
    tree.empty(id);
    if br_preferred && is_block {
        let br = tree.create_element("br");
        if args.insert {
            tree.set_attr(br, BOGUS_ATTR, "1");
        }
        tree.append(id, br);
    } else {
        let text = tree.create_text(NBSP);
        tree.append(id, text);
    }
}

#[cfg(test)]
mod tests {
    use quokka_ast::NodeKind;

    use super::*;

    #[test]
    fn test_padding_kinds() {
        let schema = Schema::html5();
        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let p = tree.create_element("p");
        tree.append(NodeId::ROOT, p);

        padd_empty_node(&mut tree, p, &ParserSettings::default(), &ParserArgs::default(), true);
        assert!(is_padded_with_nbsp(&tree, p));
        assert!(is_padded(&schema, &tree, p));
        assert!(!is_empty(&schema, &tree, p));

        let insert = ParserArgs {
            insert: true,
            ..ParserArgs::default()
        };
        padd_empty_node(&mut tree, p, &ParserSettings::default(), &insert, true);
        let br = tree.only_child(p).unwrap();
        assert_eq!(tree.name(br), "br");
        assert_eq!(tree.attr(br, BOGUS_ATTR), Some("1"));
    }

    #[test]
    fn test_trim_helpers_keep_nbsp() {
        assert_eq!(trim_start_whitespace(" \t\na "), "a ");
        assert_eq!(trim_end_whitespace(" a\u{a0} \r\n"), " a\u{a0}");
    }
}
