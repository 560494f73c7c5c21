//! Low-level byte-by-byte parser for ASCII-delimited text.
//!
//! This module provides [ByteParser] with support for peeking, consuming,
//! comment and whitespace skipping, and quote-aware label parsing. It is the
//! foundation of the Newick parser.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over a borrowed string.
///
/// All structural characters of Newick are ASCII, so the parser works on bytes
/// and only turns label bytes back into strings (lossless for UTF-8 labels,
/// since a multibyte sequence never contains an ASCII delimiter).
///
/// # Example
/// ```
/// use rootwick::parser::byte_parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [a comment] (A,B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.parse_label(b"(),:;").unwrap(), "A");
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` reading the given string.
    pub fn for_str(input: &'a str) -> Self {
        Self { input: input.as_bytes(), pos: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of input
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.next();
            } else {
                break;
            }
        }
    }

    /// Parses a bracketed comment `[...]` if present and returns its content.
    ///
    /// # Returns
    /// * `Ok(Some(content))` - A comment was found and consumed
    /// * `Ok(None)` - No comment at current position
    ///
    /// # Errors
    /// Returns an error if a comment starts with `[` but doesn't have a closing `]`.
    pub fn parse_comment(&mut self) -> Result<Option<String>, ParsingError> {
        if !self.consume_if(b'[') {
            return Ok(None);
        }

        let start = self.pos;
        while let Some(b) = self.next() {
            if b == b']' {
                let content = &self.input[start..self.pos - 1];
                return Ok(Some(String::from_utf8_lossy(content).into_owned()));
            }
        }

        Err(ParsingError::unclosed_comment(self))
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.parse_comment()?.is_some() {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte equals `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Returns whether the end of input has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let end = (self.pos + k).min(self.input.len());
        let start = self.pos.min(end);
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Quoted labels start with a single quote. An empty string is returned if
    /// the current byte is already a delimiter (anonymous node).
    ///
    /// # Arguments
    /// * `delimiters` - Bytes that end an unquoted label
    ///
    /// # Errors
    /// Returns an error if a quoted label is never closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes with escape support.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes within
    /// the label are escaped by doubling them (e.g., `'Wilson''s'` becomes `Wilson's`).
    ///
    /// # Errors
    /// Returns an error if the quoted label is not properly closed
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next(); // consume opening '

        let mut label = Vec::new();
        loop {
            match self.next() {
                Some(b'\'') => {
                    // Doubled quote is an escaped quote, otherwise end of label
                    if self.consume_if(b'\'') {
                        label.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b),
                None => return Err(ParsingError::unclosed_quote(self)),
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters or whitespace is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let start = self.pos;

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) || b.is_ascii_whitespace() {
                break;
            }
            self.next();
        }

        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Consumes bytes as long as `accept` holds and returns them as string.
    pub fn consume_while(&mut self, accept: impl Fn(u8) -> bool) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !accept(b) {
                break;
            }
            self.next();
        }

        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    const DELIMITERS: &[u8] = b"()[],:;";

    #[test]
    fn test_skip_comment_and_whitespace() {
        let mut parser = ByteParser::for_str(" \n[one] [two]\t(");
        parser.skip_comment_and_whitespace().unwrap();
        assert_eq!(parser.peek(), Some(b'('));
    }

    #[test]
    fn test_parse_comment_content() {
        let mut parser = ByteParser::for_str("[&rate=0.5]:1");
        assert_eq!(parser.parse_comment().unwrap().as_deref(), Some("&rate=0.5"));
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn test_unclosed_comment() {
        let mut parser = ByteParser::for_str("[never closed");
        let err = parser.skip_comment_and_whitespace().unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedComment);
    }

    #[test]
    fn test_quoted_label_with_escaped_quote() {
        let mut parser = ByteParser::for_str("'Baillon''s Crake':0.1");
        assert_eq!(parser.parse_label(DELIMITERS).unwrap(), "Baillon's Crake");
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn test_unclosed_quote() {
        let mut parser = ByteParser::for_str("'Kea");
        let err = parser.parse_label(DELIMITERS).unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::UnclosedQuote);
    }

    #[test]
    fn test_unquoted_label_stops_at_delimiter() {
        let mut parser = ByteParser::for_str("Pūkeko,Takahē");
        assert_eq!(parser.parse_label(DELIMITERS).unwrap(), "Pūkeko");
        assert!(parser.consume_if(b','));
        assert_eq!(parser.parse_label(DELIMITERS).unwrap(), "Takahē");
        assert!(parser.is_eof());
    }

    #[test]
    fn test_empty_label_at_delimiter() {
        let mut parser = ByteParser::for_str(",B");
        assert_eq!(parser.parse_label(DELIMITERS).unwrap(), "");
        assert_eq!(parser.position(), 0);
    }
}
