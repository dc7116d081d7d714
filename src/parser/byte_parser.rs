//! Low-level byte-by-byte parser for knowledge files.
//!
//! This module provides [ByteParser] for text-based formats with support
//! for peeking, consuming, token matching, and double-quoted label parsing.
//! Used as the foundation for the [lisp](crate::lisp) reader.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::path::Path;

/// Opening and closing delimiter of a label.
pub const LABEL_QUOTE: u8 = b'"';

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser with support for peeking, consuming, and token matching.
///
/// It operates on byte sources and treats structural tokens as ASCII, while
/// label contents are collected as raw bytes and decoded as UTF-8.
///
/// # Example
/// ```
/// use twentyq::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  ( \"is it alive?\" nil nil)");
/// parser.skip_whitespace();
/// assert!(parser.consume_if(b'('));
/// parser.skip_whitespace();
/// let label = parser.parse_quoted_label(100).unwrap();
/// assert_eq!(label, "is it alive?");
/// parser.skip_whitespace();
/// assert!(parser.consume_if_word("nil"));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a new `ByteParser` from a byte slice by copying it into a Vec.
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a new `ByteParser` from a string by copying it into a Vec.
    pub fn for_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` over the full contents of a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParsingError> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new `ByteParser` from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips (consumes) all consecutive ASCII whitespace, including newlines.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Checks if the current byte matches `ch` (case-insensitive for ASCII).
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek()
            .is_some_and(|b| b.eq_ignore_ascii_case(&ch))
    }

    /// Checks if the following bytes match the given byte sequence (case-insensitive).
    ///
    /// This is a peek operation - the parser position is not changed.
    #[inline]
    pub fn peek_is_sequence(&self, sequence: &[u8]) -> bool {
        let context = self.source.peek_slice(sequence.len());
        context.len() == sequence.len() && context.eq_ignore_ascii_case(sequence)
    }

    /// Checks if the following bytes match the given word (case-insensitive).
    pub fn peek_is_word(&self, word: &str) -> bool {
        self.peek_is_sequence(word.as_bytes())
    }

    /// Consumes the current byte if it matches `ch` (case-insensitive).
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes the next bytes if they match the given byte sequence (case-insensitive).
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }

        for _ in 0..sequence.len() {
            self.next_byte();
        }

        true
    }

    /// Consumes the next bytes if they match the given word (case-insensitive).
    pub fn consume_if_word(&mut self, word: &str) -> bool {
        self.consume_if_sequence(word.as_bytes())
    }

    /// Returns whether the parser sits on a token boundary,
    /// i.e. at EOF, whitespace, or one of the given delimiters.
    pub fn at_token_boundary(&self, delimiters: &[u8]) -> bool {
        match self.peek() {
            None => true,
            Some(b) => b.is_ascii_whitespace() || delimiters.contains(&b),
        }
    }

    /// Consumes bytes until EOF, whitespace or any of the given delimiters
    /// and returns them as (lossy) string. Used to report unexpected tokens.
    pub fn parse_token(&mut self, delimiters: &[u8]) -> String {
        let mut token = Vec::new();
        while !self.at_token_boundary(delimiters) {
            if let Some(b) = self.next_byte() {
                token.push(b);
            }
        }
        String::from_utf8_lossy(&token).into_owned()
    }

    /// Parses a label enclosed in double quotes.
    ///
    /// Expects the parser at the opening quote. No escape processing takes
    /// place: the label ends at the next `"`, which has to be found within
    /// `max_len` bytes.
    ///
    /// # Arguments
    /// * `max_len` - Maximum number of bytes of the label (excluding quotes)
    ///
    /// # Returns
    /// The label without the enclosing quotes
    ///
    /// # Errors
    /// * `MissingOpeningQuote` - The parser is not at a `"`
    /// * `UnterminatedLabel` - No closing quote within `max_len` bytes or before EOF
    /// * `InvalidLabelEncoding` - The label is not valid UTF-8
    pub fn parse_quoted_label(&mut self, max_len: usize) -> Result<String, ParsingError> {
        if !self.consume_if(LABEL_QUOTE) {
            return Err(ParsingError::from_parser(
                ParsingErrorType::MissingOpeningQuote,
                self,
            ));
        }

        let start = self.position();
        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(LABEL_QUOTE) => break,
                Some(_) if label.len() == max_len => {
                    return Err(ParsingError::at(
                        ParsingErrorType::UnterminatedLabel(max_len),
                        start,
                        self,
                    ));
                }
                Some(b) => label.push(b),
                None => {
                    return Err(ParsingError::at(
                        ParsingErrorType::UnterminatedLabel(max_len),
                        start,
                        self,
                    ));
                }
            }
        }

        String::from_utf8(label).map_err(|_| {
            ParsingError::at(ParsingErrorType::InvalidLabelEncoding, start, self)
        })
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(self.source.peek_slice(k)).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace() {
        let mut parser = ByteParser::for_str(" \r  \t\n \t x y");
        parser.skip_whitespace();
        assert_eq!(parser.peek(), Some(b'x'));

        parser.next_byte();
        parser.skip_whitespace();
        assert_eq!(parser.peek(), Some(b'y'));
    }

    #[test]
    fn test_consume_if_word_is_case_insensitive() {
        let mut parser = ByteParser::for_str("NiL)");
        assert!(parser.consume_if_word("nil"));
        assert_eq!(parser.peek(), Some(b')'));
        assert!(parser.at_token_boundary(b"()"));
    }

    #[test]
    fn test_quoted_label_exactly_max_len() {
        let mut parser = ByteParser::for_str("\"abcd\" rest");
        assert_eq!(parser.parse_quoted_label(4).unwrap(), "abcd");
        assert_eq!(parser.position(), 6);
    }

    #[test]
    fn test_quoted_label_too_long() {
        let mut parser = ByteParser::for_str("\"abcde\"");
        let err = parser.parse_quoted_label(4).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnterminatedLabel(4));
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn test_quoted_label_unclosed() {
        let mut parser = ByteParser::for_str("\"Kea");
        let err = parser.parse_quoted_label(100).unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::UnterminatedLabel(_)));
    }

    #[test]
    fn test_quoted_label_requires_quote() {
        let mut parser = ByteParser::for_str("missing_quotes)");
        let err = parser.parse_quoted_label(100).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::MissingOpeningQuote);
        assert_eq!(parser.position(), 0);
    }

    #[test]
    fn test_quoted_label_keeps_utf8() {
        let mut parser = ByteParser::for_str("\"ёжик\"");
        assert_eq!(parser.parse_quoted_label(100).unwrap(), "ёжик");
    }

    #[test]
    fn test_parse_token_stops_at_delimiter() {
        let mut parser = ByteParser::for_str("nothing) more");
        assert_eq!(parser.parse_token(b"()"), "nothing");
        assert_eq!(parser.peek(), Some(b')'));
    }
}
