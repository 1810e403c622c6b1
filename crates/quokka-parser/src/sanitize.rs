//! Hook-driven sanitizer over the native parse tree.
//!
//! [`sanitize`] owns the traversal and a few unconditional hardening rules;
//! all allow-list policy is delegated to a [`SanitizeHooks`] implementation.

use std::sync::LazyLock;

use quokka_ast::Attribute;
use regex::Regex;

use crate::native::{NativeKind, NativeNode};

static MARKUP_IN_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[/\w]").expect("valid regex"));
static UNSAFE_ATTRIBUTE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)((--!?|\])>)|</(style|title)").expect("valid regex"));

/// What to do with an element after the element hook ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVerdict {
    /// Keep the element and sanitize its attributes and children.
    Keep,
    /// Replace the element with its children, which are then sanitized.
    Unwrap,
    /// Drop the element and everything inside it.
    Remove,
}

/// One attribute offered to [`SanitizeHooks::on_attribute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCandidate {
    /// Attribute name.
    pub name: String,
    /// Attribute value; the hook may rewrite it.
    pub value: String,
    /// Keep the attribute, subject to the built-in value checks.
    pub keep: bool,
    /// Keep the attribute unconditionally.
    pub force_keep: bool,
}

/// Policy callbacks consulted by [`sanitize`].
pub trait SanitizeHooks {
    /// Called for every element and comment before its attributes and
    /// children. May edit the node in place.
    fn on_element(&mut self, node: &mut NativeNode) -> NodeVerdict;

    /// Called for every attribute of a kept element. The hook decides by
    /// setting `keep` / `force_keep`.
    fn on_attribute(&mut self, element: &NativeNode, candidate: &mut AttributeCandidate);

    /// Called once an element's attributes are sanitized.
    fn after_attributes(&mut self, _node: &mut NativeNode) -> NodeVerdict {
        NodeVerdict::Keep
    }
}

/// Sanitize the children of `root` in place.
///
/// Processing instructions and comments containing markup are always
/// removed. Unwrapped children are spliced into the parent and visited in
/// turn.
pub fn sanitize<H: SanitizeHooks>(root: &mut NativeNode, hooks: &mut H) {
    let mut index = 0;
    while index < root.children.len() {
        let child = &mut root.children[index];
        let verdict = match child.kind {
            NativeKind::ProcessingInstruction => NodeVerdict::Remove,
            NativeKind::Text => NodeVerdict::Keep,
            NativeKind::Comment => match hooks.on_element(child) {
                NodeVerdict::Keep if MARKUP_IN_COMMENT.is_match(&child.value) => {
                    NodeVerdict::Remove
                }
                verdict => verdict,
            },
            NativeKind::Element => match hooks.on_element(child) {
                NodeVerdict::Keep => {
                    sanitize_attributes(child, hooks);
                    hooks.after_attributes(child)
                }
                verdict => verdict,
            },
        };

        match verdict {
            NodeVerdict::Keep => {
                sanitize(&mut root.children[index], hooks);
                index += 1;
            }
            NodeVerdict::Unwrap => {
                log::trace!(target: "quokka.sanitize", "unwrapping <{}>", root.children[index].name);
                let children = std::mem::take(&mut root.children[index].children);
                let _ = root.children.splice(index..=index, children);
            }
            NodeVerdict::Remove => {
                log::trace!(target: "quokka.sanitize", "removing {}", root.children[index].name);
                let _ = root.children.remove(index);
            }
        }
    }
}

fn sanitize_attributes<H: SanitizeHooks>(element: &mut NativeNode, hooks: &mut H) {
    let mut kept = Vec::with_capacity(element.attributes.len());
    for attr in &element.attributes {
        let value = if attr.name == "value" {
            attr.value.clone()
        } else {
            attr.value.trim().to_string()
        };
        let mut candidate = AttributeCandidate {
            name: attr.name.clone(),
            value,
            keep: false,
            force_keep: false,
        };
        hooks.on_attribute(element, &mut candidate);

        let accepted = candidate.force_keep
            || (candidate.keep && !UNSAFE_ATTRIBUTE_VALUE.is_match(&candidate.value));
        if accepted {
            kept.push(Attribute::new(candidate.name, candidate.value));
        } else {
            log::trace!(
                target: "quokka.sanitize",
                "dropping attribute {} on <{}>",
                attr.name,
                element.name
            );
        }
    }
    element.attributes = kept;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Keeps everything except `<x>` (unwrapped), `<gone>` (removed) and
    /// `on*` attributes.
    struct TestHooks;

    impl SanitizeHooks for TestHooks {
        fn on_element(&mut self, node: &mut NativeNode) -> NodeVerdict {
            match node.name.as_str() {
                "x" => NodeVerdict::Unwrap,
                "gone" => NodeVerdict::Remove,
                _ => NodeVerdict::Keep,
            }
        }

        fn on_attribute(&mut self, _element: &NativeNode, candidate: &mut AttributeCandidate) {
            candidate.keep = !candidate.name.starts_with("on");
        }
    }

    fn element(name: &str, children: Vec<NativeNode>) -> NativeNode {
        let mut node = NativeNode::element(name);
        node.children = children;
        node
    }

    fn names(node: &NativeNode) -> Vec<&str> {
        node.children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_unwrapped_children_are_revisited() {
        let inner = element("x", vec![element("b", vec![]), element("gone", vec![])]);
        let mut root = element("body", vec![element("i", vec![]), inner]);

        sanitize(&mut root, &mut TestHooks);

        assert_eq!(names(&root), ["i", "b"]);
    }

    #[test]
    fn test_attribute_hardening() {
        let mut p = NativeNode::element("p");
        p.set_attr("onclick", "x()");
        p.set_attr("title", "  padded ");
        p.set_attr("value", " kept ");
        p.set_attr("class", "a--> b");
        let mut root = element("body", vec![p]);

        sanitize(&mut root, &mut TestHooks);

        let p = &root.children[0];
        assert_eq!(p.attr("onclick"), None);
        assert_eq!(p.attr("title"), Some("padded"));
        assert_eq!(p.attr("value"), Some(" kept "));
        assert_eq!(p.attr("class"), None);
    }

    #[test]
    fn test_comments_with_markup_removed() {
        let mut safe = NativeNode::text("");
        safe.kind = NativeKind::Comment;
        safe.value = " note ".to_string();
        let mut markup = safe.clone();
        markup.value = "</p><img>".to_string();
        let mut root = element("body", vec![safe, markup]);

        sanitize(&mut root, &mut TestHooks);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].value, " note ");
    }
}
