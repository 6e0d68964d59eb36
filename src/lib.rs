//! Mrcascan compares the MRCA (most-recent-common-ancestor) age of a taxon
//! pair across posterior phylogenetic tree samples.
//!
//! Given two posterior samples over the same taxa, inferred under different
//! assumptions (say, with and without a geographic prior), the question is
//! whether one sample dates or constrains a pair's common ancestor
//! differently than the other. This crate covers that workflow end to end:
//! - Nexus: parse the TAXA and TREES blocks of Nexus files, with burnin,
//!   skip-first, and eager/lazy retrieval (see [crate::nexus]).
//! - Newick: parse plain Newick files or strings, including multifurcating
//!   trees and `[&key=value]` annotations (see [crate::newick]).
//! - Analysis: MRCA age distributions per taxon pair, a direct-relatedness
//!   restriction, shared-range histograms, and keyed dispersion comparison
//!   (see [crate::analysis]).
//!
//! Trees use the arena pattern: each [Tree](model::Tree) stores its nodes in
//! a vector and refers to them by index, and all trees of a
//! [TreeSet](model::TreeSet) share one [TaxonSet](model::TaxonSet) so leaves
//! can be matched across trees by taxon id.
//!
//! # Example
//! ```no_run
//! use mrcascan::analysis::{binned_comparison, mrca_ages};
//! use mrcascan::nexus::{Burnin, NexusParserBuilder};
//!
//! let plain = NexusParserBuilder::for_file("plain.trees")
//!     .with_burnin(Burnin::Fraction(0.1))
//!     .build()?
//!     .into_tree_set()?;
//! let geo = NexusParserBuilder::for_file("geo_prior.trees")
//!     .with_burnin(Burnin::Fraction(0.1))
//!     .build()?
//!     .into_tree_set()?;
//!
//! let ages_plain = mrca_ages(&plain, "Hittite", "Luwian")?;
//! let ages_geo = mrca_ages(&geo, "Hittite", "Luwian")?;
//! let histograms = binned_comparison(&[&ages_plain.ages, &ages_geo.ages], 30, None);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod analysis;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;

use crate::model::TreeSet;
use crate::parser::parsing_error::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Nexus API
// ============================================================================
/// Parses a Nexus file with default settings into a [TreeSet].
///
/// See [`nexus::parse_file`] for full documentation.
pub fn parse_nexus_file<P: AsRef<Path>>(path: P) -> Result<TreeSet, ParsingError> {
    nexus::parse_file(path)
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a string of one or more Newick trees with default settings into a
/// [TreeSet].
///
/// See [`newick::parse_str`] for full documentation.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<TreeSet, ParsingError> {
    newick::parse_str(newick)
}

/// Parses a file containing a semicolon-separated list of Newick strings
/// with default settings into a [TreeSet].
///
/// See [`newick::parse_file`] for full documentation.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<TreeSet, ParsingError> {
    newick::parse_file(path)
}
