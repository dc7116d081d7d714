//! Error types for reading knowledge files.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing the nested-parenthesis format.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use thiserror::Error;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================€=
/// Error types that can occur while reading a knowledge file.
///
/// Every kind except [IoError](ParsingErrorType::IoError) describes
/// malformed input, see [is_invalid_syntax](ParsingErrorType::is_invalid_syntax).
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    #[error("IO error - {0}")]
    IoError(String),
    #[error("Unexpected end of file")]
    UnexpectedEOF,
    #[error("Expected '\"' at start of label")]
    MissingOpeningQuote,
    #[error("No closing '\"' within {0} bytes of label")]
    UnterminatedLabel(usize),
    #[error("Label is not valid UTF-8")]
    InvalidLabelEncoding,
    #[error("Expected ')' after node")]
    MissingClosingBracket,
    #[error("Unexpected token {0:?}, expected '(' or 'nil'")]
    UnexpectedToken(String),
    #[error("Unexpected input after root node")]
    TrailingInput,
    #[error("Nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl ParsingErrorType {
    /// Returns whether this kind reports malformed input
    /// (as opposed to failing to read it at all).
    pub fn is_invalid_syntax(&self) -> bool {
        !matches!(self, ParsingErrorType::IoError(_))
    }
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and following bytes).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and the current parser state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &ByteParser<S>) -> Self {
        Self::at(kind, parser.position(), parser)
    }

    /// Create a ParsingError reported at `position`,
    /// with context taken from the current parser state
    pub fn at<S: ByteSource>(
        kind: ParsingErrorType,
        position: usize,
        parser: &ByteParser<S>,
    ) -> Self {
        Self {
            kind,
            position,
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for UnexpectedEOF
    pub fn unexpected_eof<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEOF, parser)
    }

    /// Convenience constructor for MissingClosingBracket
    pub fn missing_closing_bracket<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::MissingClosingBracket, parser)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Shorthand for `self.kind().is_invalid_syntax()`
    pub fn is_invalid_syntax(&self) -> bool {
        self.kind.is_invalid_syntax()
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorType::IoError(err.to_string()),
            position: 0,
            context: String::new(),
        }
    }
}
