//! Error type for Nexus and Newick parsing.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use std::error::Error;
use std::fmt;

/// Number of bytes of input included as context in error messages
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// The kinds of errors that can occur while parsing tree files.
#[derive(PartialEq, Debug, Clone)]
pub enum ParsingErrorType {
    IoError(String),
    UnexpectedEof,
    MissingNexusHeader,
    InvalidBlockStructure(String),
    InvalidTaxaBlock(String),
    InvalidTreesBlock(String),
    InvalidTranslateCommand,
    UnclosedComment,
    UnclosedQuote,
    InvalidNewickString(String),
    NegativeEdgeLength(f64),
    NonFiniteEdgeLength(f64),
    UnresolvedLabel(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error carrying the byte position and surrounding input as context.
#[derive(Debug)]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

impl ParsingError {
    /// Creates an error from a kind and the current parser state.
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &mut ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    pub fn unexpected_eof<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnexpectedEof, parser)
    }

    pub fn missing_nexus_header<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::MissingNexusHeader, parser)
    }

    pub fn invalid_block_structure<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidBlockStructure(msg), parser)
    }

    pub fn invalid_taxa_block<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidTaxaBlock(msg), parser)
    }

    pub fn invalid_trees_block<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidTreesBlock(msg), parser)
    }

    pub fn invalid_translate_command<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::InvalidTranslateCommand, parser)
    }

    pub fn unclosed_comment<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    pub fn unclosed_quote<S: ByteSource>(parser: &mut ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedQuote, parser)
    }

    pub fn invalid_newick_string<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::InvalidNewickString(msg), parser)
    }

    pub fn negative_edge_length<S: ByteSource>(parser: &mut ByteParser<S>, value: f64) -> Self {
        Self::from_parser(ParsingErrorType::NegativeEdgeLength(value), parser)
    }

    pub fn non_finite_edge_length<S: ByteSource>(parser: &mut ByteParser<S>, value: f64) -> Self {
        Self::from_parser(ParsingErrorType::NonFiniteEdgeLength(value), parser)
    }

    pub fn unresolved_label<S: ByteSource>(parser: &mut ByteParser<S>, msg: String) -> Self {
        Self::from_parser(ParsingErrorType::UnresolvedLabel(msg), parser)
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Returns the byte position where the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            ParsingErrorType::IoError(msg) => write!(f, "IO error - {msg}")?,
            ParsingErrorType::UnexpectedEof => write!(f, "Unexpected end of file")?,
            ParsingErrorType::MissingNexusHeader => {
                write!(f, "File does not start with #NEXUS header")?
            }
            ParsingErrorType::InvalidBlockStructure(msg) => {
                write!(f, "Invalid block structure - {msg}")?
            }
            ParsingErrorType::InvalidTaxaBlock(msg) => {
                write!(f, "Invalid TAXA block format - {msg}")?
            }
            ParsingErrorType::InvalidTreesBlock(msg) => {
                write!(f, "Invalid TREES block format - {msg}")?
            }
            ParsingErrorType::InvalidTranslateCommand => {
                write!(f, "Invalid TRANSLATE command - likely inconsistent with TAXA block")?
            }
            ParsingErrorType::UnclosedComment => write!(f, "Unclosed comment")?,
            ParsingErrorType::UnclosedQuote => write!(f, "Unclosed quoted label")?,
            ParsingErrorType::InvalidNewickString(msg) => {
                write!(f, "Invalid newick string: {msg}")?
            }
            ParsingErrorType::NegativeEdgeLength(value) => {
                write!(f, "Negative edge length: {value}")?
            }
            ParsingErrorType::NonFiniteEdgeLength(value) => {
                write!(f, "Edge length overflows its numeric range: {value}")?
            }
            ParsingErrorType::UnresolvedLabel(msg) => {
                write!(f, "Could not resolve label - {msg}")?
            }
        }

        write!(f, " at position {}", self.position)?;

        if !self.context.is_empty() {
            write!(
                f,
                "\n  Context (next {} bytes): {}",
                self.context.len(),
                self.context
            )?;
        }

        Ok(())
    }
}

impl Error for ParsingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
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
