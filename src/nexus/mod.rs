//! Nexus format parser for posterior tree samples.
//!
//! Nexus files wrap their content in blocks (`BEGIN <name>; ... END;`).
//! This parser reads the TAXA block (taxon count and labels) and the TREES
//! block (optional TRANSLATE command plus one `TREE <name> = <newick>;`
//! statement per sampled tree); other blocks are skipped. All keywords are
//! matched case-insensitively.
//!
//! # Quick API
//! * [`parse_file`] - parses a whole file into a [TreeSet] with defaults
//!
//! # Full API
//! Configure a [NexusParserBuilder] for burnin, skip-first, lazy parsing,
//! annotations, or an explicit [ReadStrategy], then drive the resulting
//! [NexusParser].

pub mod defs;
pub mod parser;

pub use defs::NexusBlock;
pub use parser::{Burnin, NexusParser, NexusParserBuilder, ReadStrategy};

use crate::model::TreeSet;
use crate::parser::ParsingError;
use std::path::Path;

/// Parses a Nexus file eagerly into a [TreeSet], with no burnin and default
/// settings.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid Nexus.
///
/// # Example
/// ```no_run
/// use mrcascan::nexus::parse_file;
///
/// let trees = parse_file("posterior.trees")?;
/// println!("{} trees over {} taxa", trees.len(), trees.taxa().len());
/// # Ok::<(), mrcascan::parser::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<TreeSet, ParsingError> {
    NexusParserBuilder::for_file(path).build()?.into_tree_set()
}
