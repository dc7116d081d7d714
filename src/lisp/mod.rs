//! Reader and writer for the nested-parenthesis knowledge format.
//!
//! This module provides [LispParser] to read a knowledge tree and
//! [LispWriter] to write it back.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a string into a [KnowledgeTree]
//! * [`parse_file`] - parses a file, failing if it does not exist
//! * [`read_file`] - parses a file, tolerating its absence
//!
//! # Format
//! The format has the following simple grammar:
//! * `node ::= 'nil' | '(' label [node node] ')'`
//! * `label ::= '"' bytes '"'`
//!
//! Furthermore:
//! * Whitespace (including newlines) can occur between any two tokens
//! * `nil` may be followed directly by `)`, as in `("kea" nil nil)`
//! * `("kea")` is shorthand for `("kea" nil nil)`
//! * Labels are taken verbatim, without any escaping, so they cannot
//!   contain `"`, and must close within the maximum label length
//! * Empty input denotes a tree with a single placeholder root
//!
//! Example: `("is it alive?" ("does it bark?" ("dog") ("cat")) ("rock"))`

mod defs;
pub mod parser;
pub mod writer;

pub use crate::model::tree::DEFAULT_MAX_DEPTH;
pub use parser::LispParser;
pub use writer::{LispWriter, Traversal, to_lisp};

use crate::config::Config;
use crate::model::KnowledgeTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a knowledge tree from a string using default settings.
///
/// # Example
/// ```
/// use twentyq::lisp::parse_str;
///
/// let tree = parse_str("(\"is it alive?\" (\"dog\") (\"rock\"))")?;
/// assert_eq!(tree.num_leaves(), 2);
///
/// let empty = parse_str("")?;
/// assert_eq!(empty.root().label(), "unknown");
/// # Ok::<(), twentyq::parser::ParsingError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(text: S) -> Result<KnowledgeTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(text.as_ref());
    LispParser::new().parse_tree(&mut byte_parser)
}

/// Parses a knowledge tree from the file at `path` with limits from `config`.
///
/// # Errors
/// An IO error if the file cannot be read, including when it does not exist.
pub fn parse_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<KnowledgeTree, ParsingError> {
    let mut byte_parser = ByteParser::from_file(path.as_ref())?;
    let tree = LispParser::from_config(config).parse_tree(&mut byte_parser)?;
    debug!(path = %path.as_ref().display(), nodes = tree.num_nodes(), "Read knowledge file");
    Ok(tree)
}

/// Parses a knowledge tree from the file at `path`, or returns a tree with
/// a single placeholder root if there is no such file.
pub fn read_file<P: AsRef<Path>>(path: P, config: &Config) -> Result<KnowledgeTree, ParsingError> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "No knowledge file yet, starting from placeholder");
        return Ok(KnowledgeTree::new(config.placeholder_label.clone())
            .with_max_label_len(config.max_label_len)
            .with_max_depth(config.max_depth));
    }
    parse_file(path, config)
}

/// Writes `tree` to the file at `path` in prefix order, leaf style taken from `config`.
pub fn write_file<P: AsRef<Path>>(
    path: P,
    tree: &KnowledgeTree,
    config: &Config,
) -> std::io::Result<()> {
    LispWriter::from_config(config).write_file(path, tree)
}
