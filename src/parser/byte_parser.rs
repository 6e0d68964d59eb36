//! Low-level byte-by-byte parser for ASCII text.
//!
//! [ByteParser] offers peeking, consuming, case-insensitive pattern matching,
//! and quote-aware label parsing over any [ByteSource]. It is the foundation
//! both the Nexus and the Newick parser build on.

use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for ASCII text.
///
/// Operates on any [ByteSource], so the same code path handles in-memory
/// inputs and streamed files. All keyword matching is case-insensitive,
/// matching how Nexus keywords appear in the wild.
///
/// # Example
/// ```
/// use mrcascan::parser::ByteParser;
///
/// let mut parser = ByteParser::from_str("Begin TREES;");
/// parser.skip_whitespace();
/// assert!(parser.consume_if_word("BEGIN"));
/// parser.skip_whitespace();
/// assert!(parser.peek_is_word("trees"));
/// ```
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl ByteParser<InMemoryByteSource> {
    /// Creates a parser over a copy of the given bytes.
    pub fn from_bytes(input: &[u8]) -> Self {
        Self::new(InMemoryByteSource::from_vec(input.to_vec()))
    }

    /// Creates a parser over a copy of the given string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(input: &str) -> Self {
        Self::from_bytes(input.as_bytes())
    }

    /// Creates a parser reading the whole file into memory.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(InMemoryByteSource::from_file(path)?))
    }
}

impl ByteParser<crate::parser::buffered_byte_source::BufferedByteSource> {
    /// Creates a parser streaming the file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file_buffered<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(
            crate::parser::buffered_byte_source::BufferedByteSource::from_file(path)?,
        ))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a parser over the given byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it; `None` at EOF.
    #[inline(always)]
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek()
    }

    /// Returns the current byte and advances past it; `None` at EOF.
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Skips all consecutive whitespace (space, tab, newline, carriage
    /// return).
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips a bracketed comment `[...]` if one starts at the current
    /// position.
    ///
    /// Note that extended-Newick annotations start with `[&`; callers that
    /// want to keep annotations must check for that prefix before calling
    /// this.
    ///
    /// # Returns
    /// Whether a comment was consumed.
    ///
    /// # Errors
    /// Returns an error if the comment is never closed.
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if self.consume_if(b'[') {
            if !self.consume_until(b']', ConsumeMode::Inclusive) {
                return Err(ParsingError::unclosed_comment(self));
            }
            return Ok(true);
        }

        Ok(false)
    }

    /// Skips whitespace and comments until the next meaningful byte.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Checks if the current byte matches `ch`, case-insensitively.
    pub fn peek_is(&mut self, ch: u8) -> bool {
        self.peek()
            .is_some_and(|b| b.eq_ignore_ascii_case(&ch))
    }

    /// Checks if the following bytes match `word`, case-insensitively,
    /// without advancing.
    pub fn peek_is_word(&mut self, word: &str) -> bool {
        self.peek_is_sequence(word.as_bytes())
    }

    /// Checks if the following bytes match `sequence`, case-insensitively,
    /// without advancing.
    #[inline]
    pub fn peek_is_sequence(&mut self, sequence: &[u8]) -> bool {
        let context = self.source.peek_slice(sequence.len());

        context.len() >= sequence.len()
            && context
                .iter()
                .zip(sequence.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    /// Consumes the current byte if it matches `ch` (case-insensitive).
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Consumes the next bytes if they match `word` (case-insensitive).
    pub fn consume_if_word(&mut self, word: &str) -> bool {
        self.consume_if_sequence(word.as_bytes())
    }

    /// Consumes the next bytes if they match `sequence` (case-insensitive).
    pub fn consume_if_sequence(&mut self, sequence: &[u8]) -> bool {
        if !self.peek_is_sequence(sequence) {
            return false;
        }

        for _ in 0..sequence.len() {
            self.next_byte();
        }

        true
    }

    /// Consumes bytes until `target` is found.
    ///
    /// # Returns
    /// `true` if the target was found, `false` if EOF was reached first.
    pub fn consume_until(&mut self, target: u8, mode: ConsumeMode) -> bool {
        while let Some(b) = self.peek() {
            if b == target {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return true;
            }
            self.next_byte();
        }
        false
    }

    /// Consumes bytes until any of `targets` is found.
    ///
    /// # Returns
    /// The byte that was found, or `None` if EOF was reached first.
    pub fn consume_until_any(&mut self, targets: &[u8], mode: ConsumeMode) -> Option<u8> {
        while let Some(b) = self.peek() {
            if targets.contains(&b) {
                if mode == ConsumeMode::Inclusive {
                    self.next_byte();
                }
                return Some(b);
            }
            self.next_byte();
        }
        None
    }

    /// Consumes bytes until the next bytes match `word` (case-insensitive).
    ///
    /// # Returns
    /// `true` if the word was found, `false` if EOF was reached first.
    pub fn consume_until_word(&mut self, word: &str, mode: ConsumeMode) -> bool {
        self.consume_until_sequence(word.as_bytes(), mode)
    }

    /// Consumes bytes until the next bytes match `sequence`
    /// (case-insensitive).
    pub fn consume_until_sequence(&mut self, sequence: &[u8], mode: ConsumeMode) -> bool {
        loop {
            if self.is_eof() {
                return false;
            }

            if self.peek_is_sequence(sequence) {
                if mode == ConsumeMode::Inclusive {
                    for _ in 0..sequence.len() {
                        self.next_byte();
                    }
                }
                return true;
            }

            self.next_byte();
        }
    }

    /// Returns whether the end of data has been reached.
    pub fn is_eof(&mut self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Seeks to the given byte offset.
    pub fn set_position(&mut self, pos: usize) {
        self.source.set_position(pos);
    }

    /// Returns up to `k` bytes from the current position for error context.
    pub fn get_context(&mut self, k: usize) -> Vec<u8> {
        self.source.get_context(k)
    }

    /// Returns up to `k` bytes from the current position as a string, with
    /// invalid UTF-8 replaced.
    pub fn get_context_as_string(&mut self, k: usize) -> String {
        String::from_utf8_lossy(&self.get_context(k)).into_owned()
    }

    /// Parses a label, quoted or unquoted, ending at any of `delimiters`
    /// for the unquoted case.
    ///
    /// # Errors
    /// Returns an error on an unclosed comment or quote.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek() == Some(b'\'') {
            self.parse_quoted_label()
        } else {
            self.parse_unquoted_label(delimiters)
        }
    }

    /// Parses a label enclosed in single quotes, with internal quotes
    /// escaped by doubling (`'Wilson''s'` parses to `Wilson's`).
    ///
    /// Assumes the opening quote has not been consumed yet.
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next_byte(); // opening '

        let mut label = String::new();
        loop {
            match self.next_byte() {
                None => return Err(ParsingError::unclosed_quote(self)),
                Some(b'\'') => {
                    // Doubled quote is an escaped quote, single one ends the label
                    if self.peek() == Some(b'\'') {
                        label.push('\'');
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b as char),
            }
        }

        Ok(label)
    }

    /// Parses an unquoted label until any of `delimiters` is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        let mut label = String::new();

        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            label.push(b as char);
            self.next_byte();
        }

        Ok(label)
    }

    /// Parses a decimal number, accepting sign, fraction, and exponent
    /// (e.g. `1.5E-5`).
    ///
    /// # Errors
    /// Returns an error if no valid number starts at the current position.
    pub fn parse_number(&mut self) -> Result<f64, ParsingError> {
        let mut text = String::new();

        if self.peek() == Some(b'-') || self.peek() == Some(b'+') {
            text.push(self.next_byte().unwrap_or(b'+') as char);
        }
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || b == b'.' {
                text.push(b as char);
                self.next_byte();
            } else {
                break;
            }
        }
        if self.peek_is(b'e') {
            text.push('e');
            self.next_byte();
            if self.peek() == Some(b'-') || self.peek() == Some(b'+') {
                text.push(self.next_byte().unwrap_or(b'+') as char);
            }
            while let Some(b) = self.peek() {
                if b.is_ascii_digit() {
                    text.push(b as char);
                    self.next_byte();
                } else {
                    break;
                }
            }
        }

        text.parse::<f64>().map_err(|_| {
            ParsingError::invalid_newick_string(self, format!("expected a number, got '{text}'"))
        })
    }
}

/// Whether `consume_until` style methods consume the target or stop before
/// it.
///
/// # Examples
/// ```
/// use mrcascan::parser::{ByteParser, ConsumeMode};
///
/// let mut parser = ByteParser::from_str("TREE t1 = (A:1,B:1);");
///
/// // Inclusive: position ends up after '='
/// parser.consume_until(b'=', ConsumeMode::Inclusive);
/// parser.skip_whitespace();
/// assert_eq!(parser.peek(), Some(b'('));
///
/// // Exclusive: position ends up at ';'
/// parser.consume_until(b';', ConsumeMode::Exclusive);
/// assert_eq!(parser.peek(), Some(b';'));
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ConsumeMode {
    /// Consume the target along with everything before it.
    Inclusive,

    /// Stop before the target without consuming it.
    Exclusive,
}
