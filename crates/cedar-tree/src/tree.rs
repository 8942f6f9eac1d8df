use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::{
    config::{RunConfig, StoppingRules},
    dataset::{Dataset, group_by},
    node::Node,
    split::{UNKNOWN_LABEL, best_attribute, class_counts, separates},
};

/// Grow an ID3 tree on `dataset`, applying the stopping rules that `config`
/// puts in effect.
///
/// `depth` is the depth assigned to the returned node; pass 0 for a root.
#[instrument(skip_all, fields(n_examples = dataset.len(), depth))]
pub fn build_id3(dataset: &Dataset, config: &RunConfig, depth: usize) -> Node {
    let rules = config.stopping_rules();
    let root = grow(dataset, &rules, depth);
    debug!(
        n_nodes = root.n_nodes(),
        n_leaves = root.n_leaves(),
        height = root.height(),
        "id3 tree built"
    );
    root
}

/// Recursively grow a tree under explicit stopping rules.
///
/// Checks run in a fixed order: purity, depth and size limits, exhausted
/// attributes, no usable split, gain threshold. Only then is the node split
/// on the attribute with the greatest information gain.
pub fn grow(dataset: &Dataset, rules: &StoppingRules, depth: usize) -> Node {
    let examples = dataset.examples();
    let n_examples = examples.len();
    let counts = class_counts(examples, dataset.class_attribute());
    let majority = counts.majority().unwrap_or(UNKNOWN_LABEL).to_string();

    // An empty set counts as pure and takes the unknown label.
    if counts.n_distinct() <= 1 {
        return Node::majority_leaf(majority, depth, n_examples);
    }

    let depth_reached = rules.max_depth.is_some_and(|max_depth| depth >= max_depth);
    let too_few = rules
        .min_examples_to_split
        .is_some_and(|min_examples| n_examples < min_examples);
    if depth_reached || too_few {
        return Node::majority_leaf(majority, depth, n_examples);
    }

    let attributes = dataset.attributes();
    let Some(best) = best_attribute(examples, attributes, dataset.class_attribute()) else {
        return Node::majority_leaf(majority, depth, n_examples);
    };

    // Zero gain with every remaining attribute constant: no split can
    // separate these examples.
    if best.gain <= 0.0 && !attributes.iter().any(|a| separates(examples, a)) {
        return Node::majority_leaf(majority, depth, n_examples);
    }

    if rules.min_info_gain.is_some_and(|min_gain| best.gain < min_gain) {
        return Node::majority_leaf(majority, depth, n_examples);
    }

    let attribute = best.attribute.to_string();
    let mut children = BTreeMap::new();
    for (value, subset) in group_by(examples, &attribute) {
        let child = if subset.is_empty() {
            Node::majority_leaf(majority.clone(), depth + 1, 0)
        } else {
            grow(&dataset.without_attribute(&attribute, subset), rules, depth + 1)
        };
        children.insert(value, child);
    }

    Node::Internal {
        attribute,
        children,
        majority,
        depth,
        n_examples,
    }
}
