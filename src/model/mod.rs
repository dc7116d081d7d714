//! Data model for binary knowledge trees.
//!
//! # Tree representation
//! Trees are represented by [KnowledgeTree], which uses the arena pattern to
//! store [Node]s, referenced by [NodeIndex]. Internal nodes hold yes/no
//! questions, leaves hold names of candidate objects.
//!
//! # Paths
//! A [ChoicePath] records the [Branch]es taken from the root to a node;
//! see [crate::tracer] for recording and replaying paths.
//!
//! # Mutation
//! The only structural change after construction is
//! [`KnowledgeTree::split`], which turns a leaf into a question with two
//! new leaves.
//!
//! # Diagnostics
//! External dumpers implement [TreeVisitor] and call [`KnowledgeTree::walk`].

pub mod node;
pub mod path;
pub mod tree;
pub mod tree_error;
pub mod visitor;

pub use node::Node;
pub use path::{Branch, ChoicePath};
pub use tree::{KnowledgeTree, NodeIndex};
pub use tree_error::TreeError;
pub use visitor::TreeVisitor;
