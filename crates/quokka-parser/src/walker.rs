//! The single traversal primitive shared by every normalization pass.

use quokka_ast::{AstTree, NodeId};

/// A pass callback. Visitors may mutate the tree, including detaching the
/// node they are given.
pub type Visitor<'a> = dyn FnMut(&mut AstTree, NodeId) + 'a;

/// Walk the subtree under `root` once.
///
/// # Algorithm
///
/// STEP 1: Step through the subtree in pre-order, running every pre-visitor
/// on each node and recording the order.
///
/// STEP 2: If a pre-visitor detached the node (and it is not `root`), it is
/// left out of the record and stepping resumes from the last attached node.
///
/// STEP 3: Replay the record backwards, running every post-visitor, so
/// children are visited before their parents.
pub fn walk_tree(
    tree: &mut AstTree,
    root: NodeId,
    pre_visitors: &mut [&mut Visitor<'_>],
    post_visitors: &mut [&mut Visitor<'_>],
) {
    let mut traverse_order = Vec::new();

    // STEP 1
    let mut current = Some(root);
    let mut last_node = root;
    while let Some(node) = current {
        for visit in pre_visitors.iter_mut() {
            if node != root && tree.is_detached(node) {
                break;
            }
            visit(tree, node);
        }

        // STEP 2
        let resume_from = if node != root && tree.is_detached(node) {
            last_node
        } else {
            traverse_order.push(node);
            node
        };
        last_node = resume_from;
        current = tree.walk(resume_from, Some(root));
    }

    // STEP 3
    for &node in traverse_order.iter().rev() {
        for visit in post_visitors.iter_mut() {
            visit(tree, node);
        }
    }
}
