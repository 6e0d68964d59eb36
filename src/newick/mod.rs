//! Newick format parser for phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick strings into [Tree]s
//! over a shared [TaxonSet](crate::model::TaxonSet). It may be used directly
//! on plain Newick files or by the Nexus parser for the tree statements of a
//! TREES block.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_file`] - parses a whole file into a [TreeSet]
//! * [`parse_str`] - parses a string of one or more trees into a [TreeSet]
//!
//! # Full API
//! For more control, configure a [NewickParser] and provide data via a
//! [ByteParser]:
//! * [`NewickParser::parse_tree`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//! * [`NewickParser::into_iter`] - obtain a lazy iterator over trees
//!
//! # Format
//! The Newick grammar, with multifurcations allowed:
//! * `tree ::= node ';'`
//! * `node ::= leaf | internal`
//! * `internal ::= '(' node (',' node)+ ')' [edge_length]`
//! * `leaf ::= label [edge_length]`
//! * `edge_length ::= ':' number`
//!
//! Whitespace and `[...]` comments can occur between elements. In the
//! extended format, a node may carry an annotation block like
//! `[&rate=0.5,posterior=0.99]` before its edge length; these are skipped
//! as comments unless [NewickParser::with_annotations] is set.

mod defs;
pub mod parser;

pub use parser::{NewickIterator, NewickParser};

use crate::model::{Tree, TreeSet};
use crate::parser::byte_parser::ByteParser;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a Newick file eagerly into a [TreeSet].
///
/// Expects a semicolon-separated list of Newick strings; trees may share
/// lines or span several, and `[...]` comments and whitespace are fine.
///
/// # Errors
/// Returns an error if the file cannot be read or any tree is malformed.
///
/// # Example
/// ```no_run
/// use mrcascan::newick::parse_file;
///
/// let trees = parse_file("posterior.trees")?;
/// println!("Parsed {} trees over {} taxa", trees.len(), trees.taxa().len());
/// # Ok::<(), mrcascan::parser::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TreeSet, ParsingError> {
    let byte_parser = ByteParser::from_file_buffered(path)?;
    let mut parser = NewickParser::new();
    let trees = parser.parse_all(byte_parser)?;
    Ok(TreeSet::from_parts(parser.into_taxa(), trees))
}

/// Parses a string of one or more Newick trees into a [TreeSet].
///
/// # Errors
/// Returns an error if any tree is malformed.
///
/// # Example
/// ```
/// use mrcascan::newick::parse_str;
///
/// let trees = parse_str("((A:1,B:1):1,C:2);").unwrap();
/// assert_eq!(trees.len(), 1);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<TreeSet, ParsingError> {
    let byte_parser = ByteParser::from_str(newick.as_ref());
    let mut parser = NewickParser::new();
    let trees = parser.parse_all(byte_parser)?;
    Ok(TreeSet::from_parts(parser.into_taxa(), trees))
}

/// Parses a single Newick tree, discarding the taxon mapping.
///
/// Useful in tests and for quick structural checks; for analysis, prefer
/// [parse_str] so labels stay resolvable.
pub fn parse_single<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::from_str(newick.as_ref());
    let mut parser = NewickParser::new();
    parser.parse_tree(&mut byte_parser)
}
