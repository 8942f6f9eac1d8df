//! Prediction and accuracy for fitted trees.

use crate::dataset::{Dataset, Example};
use crate::node::Node;

impl Node {
    /// Predict the class label of `example`.
    ///
    /// Walks down from this node following the example's attribute values.
    /// When the example's value has no child (unseen at training time, or
    /// the attribute is absent), the current node's majority class is
    /// returned instead.
    #[must_use]
    pub fn predict<'a>(&'a self, example: &Example) -> &'a str {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { label, .. } => return label,
                Node::Internal {
                    attribute,
                    children,
                    majority,
                    ..
                } => match example.get(attribute).and_then(|value| children.get(value)) {
                    Some(child) => node = child,
                    None => return majority,
                },
            }
        }
    }
}

/// Fraction of `dataset` examples whose predicted label equals their class.
///
/// An empty dataset has accuracy 0.0.
#[must_use]
pub fn accuracy(node: &Node, dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let correct = dataset
        .examples()
        .iter()
        .filter(|example| node.predict(example) == dataset.label_of(example))
        .count();
    correct as f64 / dataset.len() as f64
}
