//! Writing knowledge trees in nested-parenthesis format.

use crate::config::Config;
use crate::lisp::defs::NIL;
use crate::model::{KnowledgeTree, NodeIndex};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Extra buffer per node in the text length/capacity estimate
const BUFFER_CHARS_PER_NODE: usize = 8;

/// Order in which a node's label is written relative to its children.
///
/// Only [Traversal::Prefix] output can be read back; the other orders are
/// meant for diagnostic dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// `("label" left right)`
    #[default]
    Prefix,
    /// `(left "label" right)`
    Infix,
    /// `(left right "label")`
    Postfix,
}

// =#========================================================================#=
// LISP WRITER
// =#========================================================================$=
/// Writer (configuration) for knowledge trees in nested-parenthesis format.
///
/// # Example
/// ```
/// use twentyq::lisp::{LispWriter, Traversal};
/// use twentyq::model::KnowledgeTree;
///
/// let mut tree = KnowledgeTree::new("rock");
/// tree.split(0, "dog", "is it alive?").unwrap();
///
/// let writer = LispWriter::new(Traversal::Prefix);
/// assert_eq!(
///     writer.write(&tree),
///     "(\"is it alive?\" (\"dog\" nil nil) (\"rock\" nil nil))"
/// );
/// let writer = writer.with_compact_leaves(true);
/// assert_eq!(writer.write(&tree), "(\"is it alive?\" (\"dog\") (\"rock\"))");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LispWriter {
    traversal: Traversal,
    compact_leaves: bool,
}

impl LispWriter {
    /// Creates a writer for the given traversal order,
    /// writing absent children of leaves as `nil`.
    pub fn new(traversal: Traversal) -> Self {
        Self {
            traversal,
            compact_leaves: false,
        }
    }

    /// Creates a prefix writer with leaf style taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Traversal::Prefix).with_compact_leaves(config.compact_leaves)
    }

    /// Whether leaves are written as `("label")` instead of `("label" nil nil)`.
    /// Nodes with exactly one child always get an explicit `nil`.
    pub fn with_compact_leaves(mut self, compact_leaves: bool) -> Self {
        self.compact_leaves = compact_leaves;
        self
    }

    /// Returns the text representation of `tree`.
    ///
    /// A tree without root is written as `nil`. In an unverified tree, a
    /// node reached a second time is written as `nil`.
    pub fn write(&self, tree: &KnowledgeTree) -> String {
        if !tree.is_root_set() {
            return NIL.to_string();
        }

        let estimated_capacity = tree
            .pre_order_iter()
            .map(|n| n.label().len() + BUFFER_CHARS_PER_NODE)
            .sum();
        let mut text = String::with_capacity(estimated_capacity);
        self.build(tree, &mut text, tree.root_index());
        text
    }

    /// Writes the text representation of `tree` to `writer`, followed by a newline.
    pub fn write_to<W: Write>(&self, writer: W, tree: &KnowledgeTree) -> io::Result<()> {
        let mut writer = BufWriter::new(writer);
        writer.write_all(self.write(tree).as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Creates (or truncates) the file at `path` and writes `tree` into it.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, tree: &KnowledgeTree) -> io::Result<()> {
        self.write_to(File::create(path)?, tree)
    }

    // Builds the text from an explicit stack of pending steps
    fn build(&self, tree: &KnowledgeTree, text: &mut String, root: NodeIndex) {
        let mut visited = vec![false; tree.arena_len()];
        let mut steps = vec![Step::Node(Some(root))];

        while let Some(step) = steps.pop() {
            let index = match step {
                Step::Node(index) => index,
                Step::Label(index) => {
                    push_label(text, tree[index].label());
                    continue;
                }
                Step::Char(c) => {
                    text.push(c);
                    continue;
                }
            };

            // Absent, out of bounds, or already written: nil
            let node = match index.and_then(|i| tree.get(i)) {
                Some(node) if !visited[node.index()] => node,
                _ => {
                    text.push_str(NIL);
                    continue;
                }
            };
            visited[node.index()] = true;

            text.push('(');
            if node.is_leaf() && self.compact_leaves {
                push_label(text, node.label());
                text.push(')');
                continue;
            }

            let label = Step::Label(node.index());
            let left = Step::Node(node.left());
            let right = Step::Node(node.right());
            // Pushed in reverse
            let order = match self.traversal {
                Traversal::Prefix => [right, Step::Char(' '), left, Step::Char(' '), label],
                Traversal::Infix => [right, Step::Char(' '), label, Step::Char(' '), left],
                Traversal::Postfix => [label, Step::Char(' '), right, Step::Char(' '), left],
            };
            steps.push(Step::Char(')'));
            steps.extend(order);
        }
    }
}

/// Pending piece of output while writing a tree.
enum Step {
    Node(Option<NodeIndex>),
    Label(NodeIndex),
    Char(char),
}

fn push_label(text: &mut String, label: &str) {
    text.push('"');
    text.push_str(label);
    text.push('"');
}

/// Returns the text representation of `tree` in the given traversal order,
/// with explicit `nil` for absent children.
pub fn to_lisp(tree: &KnowledgeTree, traversal: Traversal) -> String {
    LispWriter::new(traversal).write(tree)
}
