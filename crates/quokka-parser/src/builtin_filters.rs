//! Filters every parser registers according to its settings.

use std::collections::HashSet;
use std::sync::LazyLock;

use quokka_ast::{AstTree, INTERNAL_ATTR, NodeId};
use quokka_schema::{EmptyPolicy, Schema};
use regex::Regex;

use crate::args::ParserArgs;
use crate::dom_parser::DomParser;
use crate::settings::ParserSettings;
use crate::utils::{NBSP, is_empty, padd_empty_node};

static NOOPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bnoopener\b").expect("valid regex"));

/// Register the built-in filters enabled by the parser's settings.
pub fn register(parser: &mut DomParser) {
    let settings = parser.settings().clone();

    if settings.remove_trailing_brs {
        let schema = parser.shared_schema();
        let filter_settings = settings.clone();
        parser.add_node_filter("br", move |tree, nodes, _, args| {
            remove_trailing_brs(tree, nodes, &schema, &filter_settings, args);
        });
    }

    if !settings.allow_unsafe_link_target {
        parser.add_attribute_filter("href", |tree, nodes, _, _| {
            for &node in nodes.iter().rev() {
                add_noopener(tree, node);
            }
        });
    }

    if !settings.allow_html_in_named_anchor {
        parser.add_attribute_filter("id,name", |tree, nodes, _, _| {
            for &node in nodes.iter().rev() {
                move_named_anchor_children(tree, node);
            }
        });
    }

    if settings.fix_list_elements {
        parser.add_node_filter("ul,ol", |tree, nodes, _, _| {
            for &node in nodes.iter().rev() {
                fix_nested_list(tree, node);
            }
        });
    }
}

/// Remove `<br>` elements that end a block, and turn a `<br>` that is the
/// only content of an inline chain into a non-breaking space.
fn remove_trailing_brs(
    tree: &mut AstTree,
    nodes: &[NodeId],
    schema: &Schema,
    settings: &ParserSettings,
    args: &ParserArgs,
) {
    let mut block_elements: HashSet<&str> =
        schema.block_elements().iter().map(String::as_str).collect();
    let _ = block_elements.insert("body");

    for &node in nodes {
        let Some(parent) = tree.parent(node) else {
            continue;
        };

        if block_elements.contains(tree.name(parent)) && tree.last_child(parent) == Some(node) {
            // A <br> after another <br> (bookmarks aside) is an intended
            // empty line.
            let mut prev = tree.prev(node);
            while let Some(sibling) = prev {
                let is_bookmark = tree.name(sibling) == "span"
                    && tree.attr(sibling, INTERNAL_ATTR) == Some("bookmark");
                if !is_bookmark {
                    break;
                }
                prev = tree.prev(sibling);
            }
            if prev.is_some_and(|sibling| tree.name(sibling) == "br") {
                continue;
            }

            tree.remove(node);
            if is_empty(schema, tree, parent)
                && let Some(rule) = schema.element_rule(tree.name(parent))
            {
                match rule.empty {
                    EmptyPolicy::Remove => tree.remove(parent),
                    EmptyPolicy::Pad => padd_empty_node(tree, parent, settings, args, true),
                    EmptyPolicy::Keep => {}
                }
            }
        } else {
            let mut last_parent = node;
            let mut current = Some(parent);
            while let Some(ancestor) = current {
                if tree.first_child(ancestor) != Some(last_parent)
                    || tree.last_child(ancestor) != Some(last_parent)
                {
                    break;
                }
                last_parent = ancestor;
                if block_elements.contains(tree.name(ancestor)) {
                    break;
                }
                current = tree.parent(ancestor);
            }

            if current == Some(last_parent) {
                let text = tree.create_text(NBSP);
                tree.replace(node, text);
            }
        }
    }
}

/// Add `noopener` to the `rel` of a link that opens a new browsing context.
fn add_noopener(tree: &mut AstTree, node: NodeId) {
    if tree.name(node) != "a" || tree.attr(node, "target") != Some("_blank") {
        return;
    }
    let rel = tree.attr(node, "rel").unwrap_or_default().trim();
    if NOOPENER.is_match(rel) {
        return;
    }
    let mut parts: Vec<&str> = rel.split(' ').filter(|part| !part.is_empty()).collect();
    parts.push("noopener");
    parts.sort_unstable();
    let rel = parts.join(" ");
    tree.set_attr(node, "rel", rel);
}

/// Move the content of a named anchor (no `href`) after it.
fn move_named_anchor_children(tree: &mut AstTree, node: NodeId) {
    if tree.name(node) != "a" || tree.first_child(node).is_none() || tree.has_attr(node, "href") {
        return;
    }
    if tree.parent(node).is_none() {
        return;
    }
    let mut sibling = tree.last_child(node);
    while let Some(child) = sibling {
        sibling = tree.prev(child);
        tree.insert_after(child, node);
    }
}

/// Put a list nested directly in a list into the preceding `li`, or a new
/// unstyled one.
fn fix_nested_list(tree: &mut AstTree, node: NodeId) {
    let Some(parent) = tree.parent(node) else {
        return;
    };
    if !matches!(tree.name(parent), "ul" | "ol") {
        return;
    }
    if let Some(prev) = tree.prev(node)
        && tree.name(prev) == "li"
    {
        tree.append(prev, node);
    } else {
        let li = tree.create_element("li");
        tree.set_attr(li, "style", "list-style-type: none");
        tree.wrap(node, li);
    }
}

#[cfg(test)]
mod tests {
    use quokka_ast::NodeKind;

    use super::*;

    fn element(tree: &mut AstTree, parent: NodeId, name: &str) -> NodeId {
        let id = tree.create_element(name);
        tree.append(parent, id);
        id
    }

    #[test]
    fn test_noopener_is_added_once() {
        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let a = element(&mut tree, NodeId::ROOT, "a");
        tree.set_attr(a, "target", "_blank");
        tree.set_attr(a, "rel", " nofollow ");

        add_noopener(&mut tree, a);
        assert_eq!(tree.attr(a, "rel"), Some("nofollow noopener"));
        add_noopener(&mut tree, a);
        assert_eq!(tree.attr(a, "rel"), Some("nofollow noopener"));
    }

    #[test]
    fn test_named_anchor_children_move_out() {
        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let a = element(&mut tree, NodeId::ROOT, "a");
        tree.set_attr(a, "name", "top");
        let b = element(&mut tree, a, "b");
        let text = tree.create_text("x");
        tree.append(a, text);

        move_named_anchor_children(&mut tree, a);

        assert!(tree.first_child(a).is_none());
        assert_eq!(tree.next(a), Some(b));
        assert_eq!(tree.next(b), Some(text));
    }

    #[test]
    fn test_nested_list_joins_previous_item() {
        let mut tree = AstTree::new("body", NodeKind::DocumentFragment);
        let ul = element(&mut tree, NodeId::ROOT, "ul");
        let li = element(&mut tree, ul, "li");
        let nested = element(&mut tree, ul, "ol");
        let other = element(&mut tree, NodeId::ROOT, "ol");
        let orphan = element(&mut tree, other, "ul");

        fix_nested_list(&mut tree, nested);
        fix_nested_list(&mut tree, orphan);

        assert_eq!(tree.parent(nested), Some(li));
        let wrapper = tree.parent(orphan).unwrap();
        assert_eq!(tree.name(wrapper), "li");
        assert_eq!(tree.parent(wrapper), Some(other));
        assert_eq!(tree.attr(wrapper, "style"), Some("list-style-type: none"));
    }
}
