//! Reduced-error post-pruning.

use crate::dataset::Dataset;
use crate::node::Node;
use crate::predict::accuracy;

/// Prune `node` bottom-up against a held-out `validation` set.
///
/// Children are pruned first. An internal node is then replaced by a leaf
/// carrying its majority class whenever that leaf scores at least as well
/// on `validation` as the (already pruned) subtree; ties collapse. Each
/// decision is final: the pass is greedy and never revisits a kept subtree.
///
/// The class attribute is taken from `validation`. With an empty validation
/// set every comparison ties at 0.0, so the whole tree collapses to a leaf.
#[must_use]
pub fn prune(node: Node, validation: &Dataset) -> Node {
    match node {
        Node::Leaf { .. } => node,
        Node::Internal {
            attribute,
            children,
            majority,
            depth,
            n_examples,
        } => {
            let children = children
                .into_iter()
                .map(|(value, child)| (value, prune(child, validation)))
                .collect();
            let subtree = Node::Internal {
                attribute,
                children,
                majority,
                depth,
                n_examples,
            };

            let candidate = subtree.collapsed();
            let subtree_accuracy = accuracy(&subtree, validation);
            let leaf_accuracy = accuracy(&candidate, validation);
            if leaf_accuracy >= subtree_accuracy {
                candidate
            } else {
                subtree
            }
        }
    }
}
