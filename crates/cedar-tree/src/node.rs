use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// A node of an ID3 decision tree.
///
/// Children are owned by their parent, keyed by the attribute value observed
/// in the training examples that reached the node. A value with no child is
/// not a lookup failure: prediction falls back to the node's `majority`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// A terminal node.
    Leaf {
        /// Predicted class label.
        label: String,
        /// Majority class of the training examples that reached this node.
        majority: String,
        /// Distance from the root (root is 0).
        depth: usize,
        /// Number of training examples that reached this node.
        n_examples: usize,
    },
    /// A node splitting on one nominal attribute.
    Internal {
        /// Attribute tested at this node.
        attribute: String,
        /// One child per observed value of `attribute`.
        children: BTreeMap<String, Node>,
        /// Majority class of the training examples that reached this node.
        majority: String,
        /// Distance from the root (root is 0).
        depth: usize,
        /// Number of training examples that reached this node.
        n_examples: usize,
    },
}

impl Node {
    /// Create a leaf predicting `label`.
    #[must_use]
    pub fn leaf(label: impl Into<String>, majority: impl Into<String>, depth: usize, n_examples: usize) -> Self {
        Node::Leaf {
            label: label.into(),
            majority: majority.into(),
            depth,
            n_examples,
        }
    }

    /// Create a leaf predicting its own majority class.
    #[must_use]
    pub fn majority_leaf(majority: impl Into<String>, depth: usize, n_examples: usize) -> Self {
        let majority = majority.into();
        Node::Leaf {
            label: majority.clone(),
            majority,
            depth,
            n_examples,
        }
    }

    /// The leaf that would replace this node if its subtree were collapsed.
    #[must_use]
    pub fn collapsed(&self) -> Self {
        Node::majority_leaf(self.majority(), self.depth(), self.n_examples())
    }

    /// Return the majority class of the training examples at this node.
    #[must_use]
    pub fn majority(&self) -> &str {
        match self {
            Node::Leaf { majority, .. } | Node::Internal { majority, .. } => majority,
        }
    }

    /// Return the depth of this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { depth, .. } | Node::Internal { depth, .. } => *depth,
        }
    }

    /// Return the number of training examples that reached this node.
    #[must_use]
    pub fn n_examples(&self) -> usize {
        match self {
            Node::Leaf { n_examples, .. } | Node::Internal { n_examples, .. } => *n_examples,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Return the number of direct children (0 for a leaf).
    #[must_use]
    pub fn n_children(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { children, .. } => children.len(),
        }
    }

    /// Return the total number of nodes in this subtree.
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { children, .. } => 1 + children.values().map(Node::n_nodes).sum::<usize>(),
        }
    }

    /// Return the number of leaves in this subtree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { children, .. } => children.values().map(Node::n_leaves).sum(),
        }
    }

    /// Return the number of levels below this node (0 for a leaf).
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { children, .. } => {
                1 + children.values().map(Node::height).max().unwrap_or(0)
            }
        }
    }

    /// Render the subtree as depth-indented text.
    ///
    /// ```text
    /// [outlook] (maj=yes)
    ///   - overcast:
    ///     [LEAF] yes
    ///   - sunny:
    ///     [humidity] (maj=no)
    ///       - high:
    ///         [LEAF] no
    /// ```
    ///
    /// Children appear in ascending value order; every level adds two
    /// spaces before the `- value:` line and two more before the child.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn render_into<W: Write>(&self, out: &mut W, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            Node::Leaf { label, .. } => writeln!(out, "{pad}[LEAF] {label}"),
            Node::Internal {
                attribute,
                children,
                majority,
                ..
            } => {
                writeln!(out, "{pad}[{attribute}] (maj={majority})")?;
                for (value, child) in children {
                    writeln!(out, "{pad}  - {value}:")?;
                    child.render_into(out, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render_into(f, 0)
    }
}
