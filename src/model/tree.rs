//! Provides the knowledge tree.
//!
//! Provides core data structures for representing the knowledge base:
//! * [KnowledgeTree] - Binary tree of questions and objects using the arena
//!   pattern
//! * [NodeIndex] as type used to index nodes in the tree
//! * Pre- and post-order iterators, and the [TreeVisitor] walk

use crate::model::node::Node;
use crate::model::path::Branch;
use crate::model::tree_error::TreeError;
use crate::model::visitor::TreeVisitor;
use std::fmt;
use tracing::debug;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: NodeIndex = usize::MAX;

/// Label of the single root of a tree created without backing text.
pub const DEFAULT_PLACEHOLDER_LABEL: &str = "unknown";

/// Maximum number of bytes of a label.
pub const DEFAULT_MAX_LABEL_LEN: usize = 100;

/// Maximum number of nested nodes, counting the root.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A binary knowledge tree represented using the arena pattern on [Node].
///
/// Internal nodes hold yes/no questions (yes leads left, no leads right),
/// leaves hold names of candidate objects.
///
/// # Structure
/// - All nodes are stored in the arena and referenced by [NodeIndex].
/// - The tree owns all of its nodes; children are indices, never shared
///   references. Since indices *can* alias, the invariants below are
///   checked by [`verify()`](KnowledgeTree::verify) rather than assumed.
/// - The arena may contain nodes not reachable from the root (e.g. during
///   construction); all operations only consider reachable nodes.
///
/// # Invariants
/// 1. Every reachable node has zero or two children.
/// 2. No node is reachable from itself.
/// 3. No node is reachable along two different paths.
///
/// # Construction
/// Trees are created with [`new()`](KnowledgeTree::new) as single leaf, or
/// bottom-up with [`with_capacity()`](KnowledgeTree::with_capacity),
/// [`add_leaf()`](KnowledgeTree::add_leaf),
/// [`add_node()`](KnowledgeTree::add_node), and
/// [`set_root()`](KnowledgeTree::set_root), as the reader does.
/// After construction, the only structural mutation is
/// [`split()`](KnowledgeTree::split).
#[derive(Debug, Clone)]
pub struct KnowledgeTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,

    /// Index of the root of this tree
    root_index: NodeIndex,

    /// Maximum number of bytes of labels added by splitting
    max_label_len: usize,

    /// Maximum number of nested nodes splitting may produce
    max_depth: usize,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl KnowledgeTree {
    /// Creates a tree consisting of a single leaf labeled `label`.
    pub fn new<S: Into<String>>(label: S) -> Self {
        let mut tree = Self::with_capacity(1);
        let root = tree.add_leaf(label);
        tree.set_root(root);
        tree
    }

    /// Creates a tree with a single leaf labeled [DEFAULT_PLACEHOLDER_LABEL],
    /// used when no backing text exists.
    pub fn placeholder() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_LABEL)
    }

    /// Creates an empty tree (no root set yet) with capacity for `num_nodes` nodes.
    pub fn with_capacity(num_nodes: usize) -> Self {
        KnowledgeTree {
            nodes: Vec::with_capacity(num_nodes),
            root_index: NO_ROOT_SET_INDEX,
            max_label_len: DEFAULT_MAX_LABEL_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum number of bytes of labels added by [split](Self::split).
    pub fn with_max_label_len(mut self, max_label_len: usize) -> Self {
        self.max_label_len = max_label_len;
        self
    }

    /// Returns the maximum number of bytes of labels added by [split](Self::split).
    pub fn max_label_len(&self) -> usize {
        self.max_label_len
    }

    /// Sets the maximum number of nested nodes (counting the root)
    /// [split](Self::split) may produce, i.e. leaves stay at depth
    /// `max_depth - 1` or less.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    pub fn add_leaf<S: Into<String>>(&mut self, label: S) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes.push(Node::new_leaf(index, label.into()));
        index
    }

    /// Adds a node with the given (possibly absent) children,
    /// assigning a unique index, which gets returned.
    ///
    /// Children are not checked here; see [verify](Self::verify).
    pub fn add_node<S: Into<String>>(
        &mut self,
        label: S,
        left: Option<NodeIndex>,
        right: Option<NodeIndex>,
    ) -> NodeIndex {
        let index = self.nodes.len();
        self.nodes
            .push(Node::new(index, label.into(), left, right));
        index
    }

    /// Makes the node at `index` the root.
    pub fn set_root(&mut self, index: NodeIndex) {
        self.root_index = index;
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root node.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Node {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self[index]
    }

    /// Returns the number of nodes in the arena, reachable or not.
    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns a reference to the node at the given index, or `None` if out of bounds.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index)
    }

    /// Returns the number of nodes reachable from the root.
    pub fn num_nodes(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of reachable leaves, i.e. known objects.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of reachable internal nodes, i.e. questions.
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter().filter(|n| n.is_internal()).count()
    }

    /// Returns the number of edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        self.walk(&mut |_: &Node, depth: usize, _: Option<Branch>| {
            height = height.max(depth);
        });
        height
    }

    /// Returns the labels of all reachable leaves,
    /// left before right.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.label())
            .collect()
    }

    /// Releases all nodes; the tree is left without root.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_index = NO_ROOT_SET_INDEX;
    }

    /// Checks whether both trees have the same shape and labels,
    /// regardless of how their nodes are laid out in the arena.
    pub fn same_shape(&self, other: &KnowledgeTree) -> bool {
        let mut lhs = Vec::new();
        self.walk(&mut |n: &Node, depth: usize, branch: Option<Branch>| {
            lhs.push((n.label().to_string(), depth, branch, n.left().is_some(), n.right().is_some()))
        });
        let mut rhs = Vec::new();
        other.walk(&mut |n: &Node, depth: usize, branch: Option<Branch>| {
            rhs.push((n.label().to_string(), depth, branch, n.left().is_some(), n.right().is_some()))
        });
        lhs == rhs
    }
}

// ============================================================================
// Verification & Mutation (pub)
// ============================================================================
/// State of a node during [KnowledgeTree::verify].
#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    Unseen,
    /// Pushed onto the stack, not expanded yet
    Pending,
    /// On the path from the root to the current node
    Active,
    Done,
}

impl KnowledgeTree {
    /// Validates the structure reachable from the root.
    ///
    /// Checks:
    /// - Root and all child indices are within the arena
    /// - Every node has zero or two children ([TreeError::DegenerateNode])
    /// - No node is its own descendant ([TreeError::CycledNode])
    /// - No node is reachable twice, including both children of a node
    ///   being the same node ([TreeError::CommonHeir])
    ///
    /// A leaf has both children absent, which is valid and not aliasing.
    pub fn verify(&self) -> Result<(), TreeError> {
        if self.root_index >= self.nodes.len() {
            return Err(TreeError::InvalidIndex(self.root_index));
        }

        let mut state = vec![VisitState::Unseen; self.nodes.len()];
        let mut stack = vec![(self.root_index, false)]; // (index, expanded)
        state[self.root_index] = VisitState::Pending;

        while let Some((index, expanded)) = stack.pop() {
            if expanded {
                state[index] = VisitState::Done;
                continue;
            }

            state[index] = VisitState::Active;
            stack.push((index, true));

            let node = &self.nodes[index];
            if node.is_degenerate() {
                return Err(TreeError::DegenerateNode(index));
            }

            let Some((left, right)) = node.children() else {
                continue;
            };
            if left == index || right == index {
                return Err(TreeError::CycledNode(index));
            }
            if left == right {
                return Err(TreeError::CommonHeir(index));
            }

            // Push right first, so left is processed first
            for child in [right, left] {
                if child >= self.nodes.len() {
                    return Err(TreeError::InvalidIndex(child));
                }
                match state[child] {
                    VisitState::Unseen => {
                        state[child] = VisitState::Pending;
                        stack.push((child, false));
                    }
                    VisitState::Active => return Err(TreeError::CycledNode(child)),
                    VisitState::Pending | VisitState::Done => {
                        return Err(TreeError::CommonHeir(child));
                    }
                }
            }
        }

        Ok(())
    }

    /// Splits a leaf into a question with two new leaves.
    ///
    /// The node at `leaf` keeps its index and gets `question` as label; its
    /// new left ("yes") child is a leaf labeled `new_object`, its new right
    /// ("no") child is a leaf with the node's previous label. Paths recorded
    /// to `leaf` therefore stay valid.
    ///
    /// Labels are truncated to [max_label_len](Self::max_label_len) bytes.
    /// A leaf whose new children would be nested more than
    /// [max_depth](Self::max_depth) nodes deep is not split, so a written
    /// tree can always be read back with the same limit.
    ///
    /// # Returns
    /// The indices of the new (left, right) leaves.
    ///
    /// # Errors
    /// * [TreeError::InvalidIndex] - `leaf` is not a node of this tree
    /// * [TreeError::UnexpectedNode] - `leaf` has children
    /// * [TreeError::InvalidLabel] - a label contains `"`
    /// * [TreeError::DepthExceeded] - `leaf` is at the deepest allowed level
    /// * [TreeError::AllocationFailure] - the arena cannot grow
    pub fn split(
        &mut self,
        leaf: NodeIndex,
        new_object: &str,
        question: &str,
    ) -> Result<(NodeIndex, NodeIndex), TreeError> {
        let node = self.nodes.get(leaf).ok_or(TreeError::InvalidIndex(leaf))?;
        if !node.is_leaf() {
            return Err(TreeError::UnexpectedNode(leaf));
        }
        let new_object = checked_label(new_object, self.max_label_len)?;
        let question = checked_label(question, self.max_label_len)?;
        if self.depth_of(leaf).is_some_and(|depth| depth + 1 >= self.max_depth) {
            return Err(TreeError::DepthExceeded(leaf, self.max_depth));
        }

        self.nodes
            .try_reserve(2)
            .map_err(|_| TreeError::AllocationFailure)?;

        let old_label = self.nodes[leaf].set_label(question.to_string());
        debug!(leaf, %old_label, %new_object, %question, "Splitting leaf");

        let yes = self.add_leaf(new_object);
        let no = self.add_leaf(old_label);
        self.nodes[leaf].set_children(yes, no);

        Ok((yes, no))
    }
}

impl KnowledgeTree {
    /// Returns the depth of the node at `index`, or `None` if it is not
    /// reachable from the root.
    fn depth_of(&self, index: NodeIndex) -> Option<usize> {
        let mut found = None;
        self.walk(&mut |node: &Node, depth: usize, _: Option<Branch>| {
            if node.index() == index {
                found = Some(depth);
            }
        });
        found
    }
}

/// Truncates `label` to at most `max_len` bytes on a character boundary.
///
/// # Example
/// ```
/// use twentyq::model::tree::truncate_label;
///
/// assert_eq!(truncate_label("platypus", 5), "platy");
/// assert_eq!(truncate_label("ёж", 3), "ё");
/// assert_eq!(truncate_label("kea", 5), "kea");
/// ```
pub fn truncate_label(label: &str, max_len: usize) -> &str {
    if label.len() <= max_len {
        return label;
    }
    let mut end = max_len;
    while !label.is_char_boundary(end) {
        end -= 1;
    }
    &label[..end]
}

fn checked_label(label: &str, max_len: usize) -> Result<&str, TreeError> {
    if label.contains('"') {
        return Err(TreeError::InvalidLabel(label.to_string()));
    }
    Ok(truncate_label(label, max_len))
}

impl std::ops::Index<NodeIndex> for KnowledgeTree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Visual representation of the tree.
///
/// # Example Output
/// ```text
/// Knowledge tree with 2 objects (3 nodes total):
/// [0] "is it alive?"
///   ├─ yes: [1] "dog"
///   └─ no:  [2] "rock"
/// ```
impl fmt::Display for KnowledgeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Knowledge tree with {} objects ({} nodes total):",
            self.num_leaves(),
            self.num_nodes()
        )?;

        if !self.is_root_set() {
            return writeln!(f, "(No root set)");
        }

        let mut result = Ok(());
        self.walk(&mut |node: &Node, depth: usize, branch: Option<Branch>| {
            if result.is_err() {
                return;
            }
            let indent = "  ".repeat(depth);
            let connector = match branch {
                None => String::new(),
                Some(Branch::Left) => "├─ yes: ".to_string(),
                Some(Branch::Right) => "└─ no:  ".to_string(),
            };
            result = writeln!(f, "{}{}[{}] \"{}\"", indent, connector, node.index(), node.label());
        });
        result
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl KnowledgeTree {
    /// Returns an iterator over the tree in pre-order (parents before children,
    /// left before right), i.e. the order in which objects are looked up.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Calls `visitor` for every reachable node in pre-order, with its depth
    /// and the branch leading to it.
    ///
    /// Each node is visited at most once, even if the tree violates its
    /// invariants.
    pub fn walk<V: TreeVisitor + ?Sized>(&self, visitor: &mut V) {
        if !self.is_valid_index(self.root_index) {
            return;
        }

        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(NodeIndex, usize, Option<Branch>)> = vec![(self.root_index, 0, None)];

        while let Some((index, depth, branch)) = stack.pop() {
            if visited[index] {
                continue;
            }
            visited[index] = true;

            let node = &self.nodes[index];
            visitor.visit(node, depth, branch);

            // Push right first, so left is processed first
            if let Some(right) = node.right().filter(|&r| self.is_valid_index(r)) {
                stack.push((right, depth + 1, Some(Branch::Right)));
            }
            if let Some(left) = node.left().filter(|&l| self.is_valid_index(l)) {
                stack.push((left, depth + 1, Some(Branch::Left)));
            }
        }
    }

    fn is_valid_index(&self, index: NodeIndex) -> bool {
        index < self.nodes.len()
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without
/// recursion. Each reachable node is yielded exactly once.
pub struct PreOrderIter<'a> {
    tree: &'a KnowledgeTree,
    stack: Vec<NodeIndex>,
    visited: Vec<bool>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a KnowledgeTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_valid_index(tree.root_index) {
            stack.push(tree.root_index);
        }
        PreOrderIter {
            tree,
            stack,
            visited: vec![false; tree.nodes.len()],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = self.stack.pop()?;
            if self.visited[index] {
                continue;
            }
            self.visited[index] = true;

            let node = &self.tree.nodes[index];
            for child in [node.right(), node.left()].into_iter().flatten() {
                if self.tree.is_valid_index(child) {
                    self.stack.push(child);
                }
            }
            return Some(node);
        }
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// Each reachable node is yielded after all its descendants.
pub struct PostOrderIter<'a> {
    tree: &'a KnowledgeTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
    visited: Vec<bool>,
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a KnowledgeTree) -> Self {
        let mut stack = Vec::new();
        if tree.is_valid_index(tree.root_index) {
            stack.push((tree.root_index, false));
        }
        PostOrderIter {
            tree,
            stack,
            visited: vec![false; tree.nodes.len()],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree.nodes[index];

            if children_visited {
                return Some(node);
            }
            if self.visited[index] {
                continue;
            }
            self.visited[index] = true;

            self.stack.push((index, true));
            for child in [node.right(), node.left()].into_iter().flatten() {
                if self.tree.is_valid_index(child) && !self.visited[child] {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animals() -> KnowledgeTree {
        let mut tree = KnowledgeTree::with_capacity(5);
        let dog = tree.add_leaf("dog");
        let cat = tree.add_leaf("cat");
        let barks = tree.add_node("barks", Some(dog), Some(cat));
        let rock = tree.add_leaf("rock");
        let root = tree.add_node("alive", Some(barks), Some(rock));
        tree.set_root(root);
        tree
    }

    #[test]
    fn test_counts() {
        let tree = animals();
        assert_eq!(tree.num_nodes(), 5);
        assert_eq!(tree.num_leaves(), 3);
        assert_eq!(tree.num_internal(), 2);
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.leaf_labels(), vec!["dog", "cat", "rock"]);
    }

    #[test]
    fn test_iteration_orders() {
        let tree = animals();
        let pre: Vec<&str> = tree.pre_order_iter().map(|n| n.label()).collect();
        assert_eq!(pre, vec!["alive", "barks", "dog", "cat", "rock"]);
        let post: Vec<&str> = tree.post_order_iter().map(|n| n.label()).collect();
        assert_eq!(post, vec!["dog", "cat", "barks", "rock", "alive"]);
    }

    #[test]
    fn test_verify_detects_back_edge() {
        let mut tree = KnowledgeTree::with_capacity(3);
        let leaf = tree.add_leaf("leaf");
        // Node 1 points to node 2, which points back to node 1
        tree.add_node("q1", Some(leaf), Some(2));
        tree.add_node("q2", Some(1), Some(leaf));
        tree.set_root(1);
        assert!(matches!(
            tree.verify(),
            Err(TreeError::CycledNode(1)) | Err(TreeError::CommonHeir(_))
        ));
    }

    #[test]
    fn test_verify_detects_self_child() {
        let mut tree = KnowledgeTree::with_capacity(2);
        let leaf = tree.add_leaf("leaf");
        tree.add_node("q", Some(1), Some(leaf));
        tree.set_root(1);
        assert_eq!(tree.verify(), Err(TreeError::CycledNode(1)));
    }

    #[test]
    fn test_iterators_terminate_on_cycle() {
        let mut tree = KnowledgeTree::with_capacity(2);
        let leaf = tree.add_leaf("leaf");
        tree.add_node("q", Some(1), Some(leaf));
        tree.set_root(1);
        assert_eq!(tree.pre_order_iter().count(), 2);
        assert_eq!(tree.post_order_iter().count(), 2);
    }

    #[test]
    fn test_display() {
        let tree = KnowledgeTree::new("kea");
        let dump = tree.to_string();
        assert!(dump.starts_with("Knowledge tree with 1 objects (1 nodes total):"));
        assert!(dump.contains("[0] \"kea\""));
    }
}
