//! Recording and replaying decision paths through a knowledge tree.
//!
//! * [locate] finds the [ChoicePath] leading to an object
//! * [render] replays a path into the [Property]s of the object it leads to
//! * [contrast] splits two paths at their divergence point into shared and
//!   distinct properties
//!
//! All functions expect a [verified](KnowledgeTree::verify) tree, but still
//! report nodes with exactly one child as [TraceError::UnexpectedNode]
//! instead of silently mismatching.

use crate::model::{Branch, ChoicePath, KnowledgeTree, Node, NodeIndex};
use std::fmt;
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// Node does not have the shape the path requires,
    /// e.g. a step from a leaf or a path ending on a question.
    #[error("Unexpected node {0} while following path")]
    UnexpectedNode(NodeIndex),

    #[error("Index {0} does not refer to a node of this tree")]
    InvalidIndex(NodeIndex),
}

/// A question on a path, affirmed (taken left) or negated (taken right).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub question: String,
    pub affirmed: bool,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.affirmed {
            write!(f, "{}", self.question)
        } else {
            write!(f, "not {}", self.question)
        }
    }
}

/// Properties collected while replaying a path, and the node it ended on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub properties: Vec<Property>,
    pub node: NodeIndex,
}

impl Rendering {
    /// Properties as comma-separated phrase, e.g. `alive, not barks`.
    pub fn phrase(&self) -> String {
        join_properties(&self.properties)
    }
}

/// Joins properties into a comma-separated phrase.
pub fn join_properties(properties: &[Property]) -> String {
    properties
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Locate
// ============================================================================
/// Finds the path from the root to the first leaf labeled `target`
/// (case-insensitive), trying left before right at every question.
///
/// # Returns
/// * `Ok(Some(path))` - Path to the first matching leaf
/// * `Ok(None)` - No leaf is labeled `target`
/// * `Err(TraceError)` - A node with exactly one child was reached
///
/// # Example
/// ```
/// use twentyq::lisp::parse_str;
/// use twentyq::model::Branch;
/// use twentyq::tracer::locate;
///
/// let tree = parse_str("(\"alive\" (\"barks\" (\"dog\") (\"cat\")) (\"rock\"))")?;
/// let path = locate(&tree, "Cat")?.unwrap();
/// assert_eq!(path.as_slice(), &[Branch::Left, Branch::Right]);
/// assert!(locate(&tree, "kea")?.is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn locate(tree: &KnowledgeTree, target: &str) -> Result<Option<ChoicePath>, TraceError> {
    let target = target.to_lowercase();
    let max_depth = tree.num_nodes();

    let mut path = ChoicePath::new();
    // (node, number of steps to reach it, step taken to reach it)
    let mut stack: Vec<(NodeIndex, usize, Option<Branch>)> = vec![(tree.root_index(), 0, None)];

    while let Some((index, depth, branch)) = stack.pop() {
        // Retract the steps into the abandoned subtree, then take this one
        path.truncate(depth.saturating_sub(1));
        if let Some(branch) = branch {
            path.push(branch);
        }

        let node = node_at(tree, index)?;
        if node.is_degenerate() || depth > max_depth {
            return Err(TraceError::UnexpectedNode(index));
        }

        match node.children() {
            None => {
                if node.label().to_lowercase() == target {
                    trace!(%path, index, "Located object");
                    return Ok(Some(path));
                }
            }
            Some((left, right)) => {
                // Push right first, so left is searched first
                stack.push((right, depth + 1, Some(Branch::Right)));
                stack.push((left, depth + 1, Some(Branch::Left)));
            }
        }
    }

    Ok(None)
}

// ============================================================================
// Render
// ============================================================================
/// Replays `path[start_index..]` starting at `start`, without requiring the
/// path to end on a leaf.
///
/// # Errors
/// [TraceError::UnexpectedNode] if a step is taken from a node
/// that is not a question.
pub fn walk_path(
    tree: &KnowledgeTree,
    start: NodeIndex,
    path: &ChoicePath,
    start_index: usize,
) -> Result<Rendering, TraceError> {
    let mut current = start;
    let mut properties = Vec::with_capacity(path.len().saturating_sub(start_index));

    for &step in path.as_slice().iter().skip(start_index) {
        let node = node_at(tree, current)?;
        let Some((left, right)) = node.children() else {
            return Err(TraceError::UnexpectedNode(current));
        };

        properties.push(Property {
            question: node.label().to_string(),
            affirmed: step.is_affirmative(),
        });
        current = match step {
            Branch::Left => left,
            Branch::Right => right,
        };
    }

    Ok(Rendering {
        properties,
        node: current,
    })
}

/// Replays `path[start_index..]` starting at `start`; the path has to end on a leaf.
///
/// # Errors
/// [TraceError::UnexpectedNode] if a step is taken from a node that is not a
/// question, or the path ends on a node that is not a leaf.
pub fn render_from(
    tree: &KnowledgeTree,
    start: NodeIndex,
    path: &ChoicePath,
    start_index: usize,
) -> Result<Rendering, TraceError> {
    let rendering = walk_path(tree, start, path, start_index)?;
    if !node_at(tree, rendering.node)?.is_leaf() {
        return Err(TraceError::UnexpectedNode(rendering.node));
    }
    Ok(rendering)
}

/// Replays the full `path` from the root into the properties of the leaf it leads to.
pub fn render(tree: &KnowledgeTree, path: &ChoicePath) -> Result<Rendering, TraceError> {
    render_from(tree, tree.root_index(), path, 0)
}

// ============================================================================
// Contrast
// ============================================================================
/// Properties of two objects, split at the divergence point of their paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contrast {
    /// Properties both objects share
    pub shared: Vec<Property>,
    /// Remaining properties of the first object
    pub first: Vec<Property>,
    /// Remaining properties of the second object
    pub second: Vec<Property>,
}

/// Renders the common prefix of both paths once as shared properties,
/// then each remainder from the divergence point.
pub fn contrast(
    tree: &KnowledgeTree,
    first: &ChoicePath,
    second: &ChoicePath,
) -> Result<Contrast, TraceError> {
    let shared_len = first.divergence(second);
    let shared_path = ChoicePath::from(first.as_slice()[..shared_len].to_vec());

    let shared = walk_path(tree, tree.root_index(), &shared_path, 0)?;
    let branch_point = shared.node;
    let first = render_from(tree, branch_point, first, shared_len)?;
    let second = render_from(tree, branch_point, second, shared_len)?;

    Ok(Contrast {
        shared: shared.properties,
        first: first.properties,
        second: second.properties,
    })
}

fn node_at(tree: &KnowledgeTree, index: NodeIndex) -> Result<&Node, TraceError> {
    tree.get(index).ok_or(TraceError::InvalidIndex(index))
}
