//! Graphviz DOT export of knowledge trees.
//!
//! Only produces the DOT text; rendering it to an image is up to the caller
//! (e.g. `dot -Tpng tree.dot -o tree.png`).

use crate::model::{Branch, KnowledgeTree, Node, TreeVisitor};
use std::fmt::Write;

/// [TreeVisitor] collecting DOT statements for every visited node and edge.
#[derive(Debug, Default)]
pub struct DotVisitor {
    nodes: String,
    edges: String,
}

impl DotVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps the collected statements into a complete digraph.
    pub fn finish(self) -> String {
        let mut dot = String::with_capacity(self.nodes.len() + self.edges.len() + 200);
        dot.push_str("digraph knowledge {\n");
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    nodesep=0.1;\n");
        dot.push_str("    node [color=\"darkblue\", fontsize=14];\n");
        dot.push_str("    edge [color=\"darkblue\", fontsize=12];\n");
        dot.push_str(&self.nodes);
        dot.push_str(&self.edges);
        dot.push_str("}\n");
        dot
    }
}

impl TreeVisitor for DotVisitor {
    fn visit(&mut self, node: &Node, depth: usize, _branch: Option<Branch>) {
        let (shape, fill) = if node.is_leaf() {
            ("box", "lightgreen")
        } else if node.is_internal() {
            ("Mrecord", "lightblue")
        } else {
            ("Mrecord", "salmon")
        };

        // Writing to a String cannot fail
        let _ = writeln!(
            self.nodes,
            "    n{} [shape={}, style=filled, fillcolor=\"{}\", label=\"{}\"]; // depth {}",
            node.index(),
            shape,
            fill,
            escape_dot(node.label()),
            depth
        );

        for (child, branch) in [(node.left(), Branch::Left), (node.right(), Branch::Right)] {
            if let Some(child) = child {
                let _ = writeln!(
                    self.edges,
                    "    n{} -> n{} [label=\"{}\"];",
                    node.index(),
                    child,
                    branch
                );
            }
        }
    }
}

/// Returns the DOT representation of all nodes reachable from the root.
///
/// # Example
/// ```
/// use twentyq::dot::to_dot;
/// use twentyq::lisp::parse_str;
///
/// let tree = parse_str("(\"is it alive?\" (\"dog\") (\"rock\"))")?;
/// let dot = to_dot(&tree);
/// assert!(dot.starts_with("digraph knowledge {"));
/// assert!(dot.contains("n2 -> n0 [label=\"yes\"];"));
/// # Ok::<(), twentyq::parser::ParsingError>(())
/// ```
pub fn to_dot(tree: &KnowledgeTree) -> String {
    let mut visitor = DotVisitor::new();
    tree.walk(&mut visitor);
    visitor.finish()
}

/// Escapes characters with special meaning in DOT labels.
fn escape_dot(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '"' | '\\' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
