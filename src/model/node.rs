//! Node module for knowledge tree representation.

use crate::model::tree::NodeIndex;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// Represents a node of a [KnowledgeTree](crate::model::KnowledgeTree).
///
/// A node is either:
/// - **Internal**: two children; the label is a yes/no question whose
///   affirmative answer leads to the left child
/// - **Leaf**: no children; the label names a candidate object
///
/// A node with exactly one child is *degenerate*. The text format can
/// express it, so it is representable here, but it violates the tree
/// invariants and is reported by verification and traversals.
///
/// # Invariants (of a verified tree)
/// - `index` is the position of this node in the tree arena
/// - `left` and `right` are either both `Some` or both `None`
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Node {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Question (internal node) or object name (leaf)
    label: String,
    /// Child for the answer "yes"
    left: Option<NodeIndex>,
    /// Child for the answer "no"
    right: Option<NodeIndex>,
}

impl Node {
    /// Creates a new leaf.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `label` - Name of the candidate object
    pub fn new_leaf(index: NodeIndex, label: String) -> Self {
        Node {
            index,
            label,
            left: None,
            right: None,
        }
    }

    /// Creates a new node with the given (possibly absent) children.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `label` - The question (or object name if both children are absent)
    /// * `left` - Child for the answer "yes"
    /// * `right` - Child for the answer "no"
    pub fn new(
        index: NodeIndex,
        label: String,
        left: Option<NodeIndex>,
        right: Option<NodeIndex>,
    ) -> Self {
        Node {
            index,
            label,
            left,
            right,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the label of this node.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the left ("yes") child, if present.
    pub fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    /// Returns the right ("no") child, if present.
    pub fn right(&self) -> Option<NodeIndex> {
        self.right
    }

    /// Returns both children if this node is internal.
    pub fn children(&self) -> Option<(NodeIndex, NodeIndex)> {
        match (self.left, self.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }

    /// Returns whether this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Returns whether this node has two children.
    pub fn is_internal(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Returns whether this node has exactly one child.
    pub fn is_degenerate(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }

    pub(crate) fn set_label(&mut self, label: String) -> String {
        std::mem::replace(&mut self.label, label)
    }

    pub(crate) fn set_children(&mut self, left: NodeIndex, right: NodeIndex) {
        self.left = Some(left);
        self.right = Some(right);
    }
}
