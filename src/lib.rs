//! Twentyq is a twenty-questions engine backed by a persistent binary
//! knowledge tree.
//!
//! Internal nodes of the tree hold yes/no questions, leaves hold the objects
//! the engine knows. The tree is stored as nested-parenthesis text and grows
//! whenever the engine guesses wrong.
//! Core functionality provided:
//! - Text codec: read and write knowledge trees, see [crate::lisp].
//! - Tree model: arena-based [KnowledgeTree] with structural verification and
//!   in-place learning ([`KnowledgeTree::split`]), see [crate::model].
//! - Path tracer: locate objects, replay the path to an object into its
//!   properties, and contrast two objects, see [crate::tracer].
//! - Sessions: guess, describe, and compare over any [Console](session::Console),
//!   see [crate::session].
//! - Diagnostics: text dump ([KnowledgeTree] implements `Display`) and
//!   Graphviz DOT export, see [crate::dot].
//! - Configurability: label and nesting limits, placeholder label, and leaf
//!   style from a TOML file, see [crate::config].
//!
//! Limitations:
//! - Labels cannot contain `"`; there is no escaping
//! - Single-threaded; one knowledge base per file
//!
//! # Usage patterns
//! 1. Quick functions with default settings: [parse_str], [to_lisp].
//! 2. [KnowledgeBase] for a tree together with its file and [Config].
//!
//! ## Example
//!
//! ```
//! use twentyq::{Traversal, parse_str, to_lisp};
//! use twentyq::tracer::{locate, render};
//!
//! let mut tree = parse_str("(\"is it alive?\" (\"dog\") (\"rock\"))")?;
//! let dog = tree.root().left().unwrap();
//! tree.split(dog, "cat", "does it meow?")?;
//!
//! let path = locate(&tree, "cat")?.unwrap();
//! assert_eq!(render(&tree, &path)?.phrase(), "is it alive?, does it meow?");
//! assert_eq!(
//!     to_lisp(&tree, Traversal::Prefix),
//!     "(\"is it alive?\" (\"does it meow?\" (\"cat\" nil nil) (\"dog\" nil nil)) (\"rock\" nil nil))"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod dot;
pub mod knowledge_base;
pub mod lisp;
pub mod model;
pub mod parser;
pub mod session;
pub mod tracer;

pub use config::Config;
pub use knowledge_base::KnowledgeBase;
pub use lisp::{Traversal, parse_str, to_lisp};
pub use model::KnowledgeTree;
