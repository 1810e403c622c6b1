//! Conversions of presentational elements into their styled equivalents.
//!
//! [§ 16.2 Non-conforming features](https://html.spec.whatwg.org/multipage/obsolete.html#non-conforming-features)

use quokka_ast::{AstTree, NodeId};

use crate::dom_parser::DomParser;
use crate::styles::StyleDeclarations;

/// Register the legacy conversions when `inline_styles` is enabled.
pub fn register(parser: &mut DomParser) {
    let settings = parser.settings();
    if !settings.inline_styles {
        return;
    }

    if settings.convert_fonts_to_spans {
        let font_sizes: Vec<String> = settings
            .font_sizes()
            .into_iter()
            .map(str::to_string)
            .collect();
        parser.add_node_filter("font", move |tree, nodes, _, _| {
            for &node in nodes {
                font_to_span(tree, node, &font_sizes);
            }
        });
    }

    parser.add_node_filter("strike", |tree, nodes, _, _| {
        for &node in nodes {
            tree.set_name(node, "s");
        }
    });
}

/// Rename a `font` to `span`, moving `color`, `face` and `size` into its
/// `style`.
fn font_to_span(tree: &mut AstTree, node: NodeId, font_sizes: &[String]) {
    let mut styles = StyleDeclarations::parse(tree.attr(node, "style").unwrap_or_default());

    if let Some(color) = tree.attr(node, "color") {
        styles.set("color", color);
    }
    if let Some(face) = tree.attr(node, "face") {
        styles.set("font-family", face);
    }
    if let Some(size) = tree
        .attr(node, "size")
        .and_then(|size| size.trim().parse::<usize>().ok())
        .and_then(|size| size.checked_sub(1))
        .and_then(|index| font_sizes.get(index))
    {
        styles.set("font-size", size);
    }

    tree.set_name(node, "span");
    if styles.is_empty() {
        tree.remove_attr(node, "style");
    } else {
        tree.set_attr(node, "style", styles.serialize());
    }
    for name in ["color", "face", "size"] {
        tree.remove_attr(node, name);
    }
}
