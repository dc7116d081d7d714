//! Reader for the nested-parenthesis knowledge format.
//!
//! This module provides the [LispParser] struct, which reads a single tree
//! from a [ByteParser].

use crate::config::Config;
use crate::lisp::defs::{CLOSE, NIL, OPEN, TOKEN_DELIMITERS};
use crate::model::tree::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_LABEL_LEN, DEFAULT_PLACEHOLDER_LABEL};
use crate::model::{KnowledgeTree, NodeIndex};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use tracing::debug;

// =#========================================================================#=
// LISP PARSER
// =#========================================================================$=
/// Parser (configuration) for knowledge trees in nested-parenthesis format.
///
/// # Construction
/// * [`new()`](Self::new) - default limits and placeholder label
/// * [`from_config(config)`](Self::from_config) - limits from a [Config]
///
/// # Configuration
/// * [`with_max_label_len(n)`](Self::with_max_label_len)
///     - A closing `"` must follow within `n` bytes of label.
/// * [`with_max_depth(n)`](Self::with_max_depth)
///     - Input nesting more than `n` nodes deep is rejected. Trees read
///       carry the same limit for [split](KnowledgeTree::split).
/// * [`with_placeholder_label(label)`](Self::with_placeholder_label)
///     - Label of the single root returned for empty input.
///
/// # Example
/// ```
/// use twentyq::lisp::LispParser;
/// use twentyq::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("(\"is it alive?\" (\"dog\") (\"rock\" nil nil))");
/// let tree = LispParser::new().parse_tree(&mut byte_parser).unwrap();
///
/// assert_eq!(tree.root().label(), "is it alive?");
/// assert_eq!(tree.leaf_labels(), vec!["dog", "rock"]);
/// ```
#[derive(Debug, Clone)]
pub struct LispParser {
    max_label_len: usize,
    max_depth: usize,
    placeholder_label: String,
}

impl Default for LispParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl LispParser {
    /// Creates a new [LispParser] with default limits.
    pub fn new() -> Self {
        Self {
            max_label_len: DEFAULT_MAX_LABEL_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            placeholder_label: DEFAULT_PLACEHOLDER_LABEL.to_string(),
        }
    }

    /// Creates a new [LispParser] with limits taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_max_label_len(config.max_label_len)
            .with_max_depth(config.max_depth)
            .with_placeholder_label(config.placeholder_label.clone())
    }

    pub fn with_max_label_len(mut self, max_label_len: usize) -> Self {
        self.max_label_len = max_label_len;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_placeholder_label(mut self, label: String) -> Self {
        self.placeholder_label = label;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl LispParser {
    /// Parses a whole knowledge tree from the given [ByteParser].
    ///
    /// Empty (or whitespace-only) input and a bare `nil` yield a tree with a
    /// single placeholder root. Anything but whitespace after the root node
    /// is an error.
    ///
    /// # Returns
    /// * `Ok(KnowledgeTree)` - The parsed tree, not verified yet
    /// * `Err(ParsingError)` - If the input is malformed
    pub fn parse_tree<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<KnowledgeTree, ParsingError> {
        let mut tree = KnowledgeTree::with_capacity(16)
            .with_max_label_len(self.max_label_len)
            .with_max_depth(self.max_depth);

        parser.skip_whitespace();
        if parser.is_eof() {
            debug!("Empty input, using placeholder root");
            return Ok(self.placeholder());
        }

        let root = self.parse_root(parser, &mut tree)?;

        parser.skip_whitespace();
        if !parser.is_eof() {
            return Err(ParsingError::from_parser(
                ParsingErrorType::TrailingInput,
                parser,
            ));
        }

        match root {
            Some(root) => {
                tree.set_root(root);
                Ok(tree)
            }
            None => {
                debug!("Input is a bare nil, using placeholder root");
                Ok(self.placeholder())
            }
        }
    }

    fn placeholder(&self) -> KnowledgeTree {
        KnowledgeTree::new(self.placeholder_label.clone())
            .with_max_label_len(self.max_label_len)
            .with_max_depth(self.max_depth)
    }
}

// ============================================================================
// Parsing
// ============================================================================
/// A present node whose children are still being read.
struct PendingNode {
    label: String,
    /// `None` until the left child (possibly `nil`) is complete
    left: Option<Option<NodeIndex>>,
}

impl LispParser {
    /// Parses the root node (present or `nil`) and everything below it,
    /// adding present nodes to the tree children first.
    ///
    /// Nesting is tracked on an explicit stack of [PendingNode]s rather
    /// than the call stack.
    fn parse_root<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        tree: &mut KnowledgeTree,
    ) -> Result<Option<NodeIndex>, ParsingError> {
        let mut stack: Vec<PendingNode> = Vec::new();

        'nodes: loop {
            parser.skip_whitespace();
            let mut done = if parser.peek_is(OPEN) {
                if stack.len() >= self.max_depth {
                    return Err(ParsingError::from_parser(
                        ParsingErrorType::NestingTooDeep(self.max_depth),
                        parser,
                    ));
                }
                match self.parse_node_head(parser)? {
                    (label, true) => Some(tree.add_leaf(label)),
                    (label, false) => {
                        stack.push(PendingNode { label, left: None });
                        continue 'nodes;
                    }
                }
            } else {
                self.parse_nil(parser)?;
                None
            };

            // Hand the finished node to its parent, closing every parent
            // that now has both children
            while let Some(mut pending) = stack.pop() {
                let Some(left) = pending.left else {
                    pending.left = Some(done);
                    stack.push(pending);
                    continue 'nodes;
                };

                parser.skip_whitespace();
                if !parser.consume_if(CLOSE) {
                    return Err(ParsingError::missing_closing_bracket(parser));
                }
                done = Some(tree.add_node(pending.label, left, done));
            }

            return Ok(done);
        }
    }

    /// Parses `("label"` and, for the leaf shorthand `("label")`, the `)`.
    /// - Expects parser at opening `(`
    ///
    /// # Returns
    /// The label, and whether the node was closed as a leaf
    fn parse_node_head<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<(String, bool), ParsingError> {
        parser.next_byte(); // consume '('
        parser.skip_whitespace();
        let label = parser.parse_quoted_label(self.max_label_len)?;

        parser.skip_whitespace();
        let closed = parser.consume_if(CLOSE);
        Ok((label, closed))
    }

    /// Parses the token `nil`, which may be directly followed by `)`.
    /// The `)` is left for the caller.
    fn parse_nil<B: ByteSource>(&self, parser: &mut ByteParser<B>) -> Result<(), ParsingError> {
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        let start = parser.position();
        let mut token = parser.parse_token(TOKEN_DELIMITERS);
        if token.eq_ignore_ascii_case(NIL) {
            return Ok(());
        }

        if token.is_empty() {
            // Sitting on a delimiter, e.g. a stray ')'
            token = parser.next_byte().map(|b| (b as char).to_string()).unwrap_or_default();
        }
        Err(ParsingError::at(
            ParsingErrorType::UnexpectedToken(token),
            start,
            parser,
        ))
    }
}
