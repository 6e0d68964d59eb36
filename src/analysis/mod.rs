//! MRCA age analysis over posterior tree samples.
//!
//! The entry points are [mrca_ages] and [mrca_ages_directly_related], which
//! map a [TreeSet](crate::model::TreeSet) and a pair of taxon labels to the
//! empirical distribution of the pair's MRCA age across the sample. The
//! [compare] submodule turns such distributions into binned frequency counts
//! and dispersion summaries for side-by-side comparison of samples inferred
//! under different assumptions.

pub mod compare;
pub mod mrca;

pub use compare::{binned_comparison, lower_dispersion_share, std_dev, Histogram, DEFAULT_NUM_BINS};
pub use mrca::{mrca_ages, mrca_ages_directly_related, MrcaAges};

use std::error::Error;
use std::fmt;

// =#========================================================================#=
// ANALYSIS ERROR
// =#========================================================================#=
/// Errors from MRCA age analysis.
///
/// Per-tree data gaps (a taxon missing from one tree) are not errors, they
/// are skips counted in [MrcaAges::num_skipped]. Errors are reserved for
/// malformed trees, which indicate corrupted input rather than an expected
/// sampling artifact.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A tree's structure is inconsistent (bad indices, parent/child
    /// mismatch, missing root).
    InvalidTree { tree_index: usize },
    /// A non-root node lacks an edge length, so node ages are undefined.
    MissingEdgeLengths { tree_index: usize },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AnalysisError::InvalidTree { tree_index } => {
                write!(f, "Tree {tree_index} has an inconsistent structure")
            }
            AnalysisError::MissingEdgeLengths { tree_index } => {
                write!(
                    f,
                    "Tree {tree_index} is missing edge lengths, node ages are undefined"
                )
            }
        }
    }
}

impl Error for AnalysisError {}
