//! Callback interface for external tree dumpers.

use crate::model::node::Node;
use crate::model::path::Branch;

/// Visitor called once per reachable node by
/// [KnowledgeTree::walk](crate::model::KnowledgeTree::walk),
/// parents before children and left before right.
///
/// Implementors get the node (label and child indices), its depth
/// (root is `0`), and the branch that led to it (`None` for the root).
/// See [DotVisitor](crate::dot::DotVisitor) for an example.
pub trait TreeVisitor {
    fn visit(&mut self, node: &Node, depth: usize, branch: Option<Branch>);
}

impl<F> TreeVisitor for F
where
    F: FnMut(&Node, usize, Option<Branch>),
{
    fn visit(&mut self, node: &Node, depth: usize, branch: Option<Branch>) {
        self(node, depth, branch)
    }
}
