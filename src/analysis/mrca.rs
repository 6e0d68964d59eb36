//! MRCA age distributions for a taxon pair across a posterior sample.

use crate::analysis::AnalysisError;
use crate::model::{NodeId, TaxonId, Tree, TreeSet};
use rayon::prelude::*;

// =#========================================================================#=
// MRCA AGES
// =#========================================================================#=
/// The MRCA age distribution of one taxon pair over one tree set.
///
/// `ages` holds one value per tree that yielded a defined MRCA, in input
/// tree order. Trees that contributed no value (a queried taxon absent, or
/// the direct-relatedness restriction failed) are counted in `num_skipped`
/// so the exclusion is observable rather than silent data loss:
/// `ages.len() + num_skipped` equals the size of the tree set.
#[derive(Debug, Clone, PartialEq)]
pub struct MrcaAges {
    /// One MRCA age per contributing tree, in input tree order
    pub ages: Vec<f64>,
    /// Number of trees that contributed no value
    pub num_skipped: usize,
}

impl MrcaAges {
    /// Returns whether no tree contributed a value.
    pub fn is_empty(&self) -> bool {
        self.ages.is_empty()
    }
}

/// Computes the MRCA age of taxa `a` and `b` in every tree of the set.
///
/// Per tree, independently: locate the two leaves, find their MRCA, and
/// take `root_height - age(MRCA)` (ages measured as distance to the deepest
/// descendant leaf). A tree missing either taxon contributes no value and
/// is counted as skipped; it is not an error and not a zero. Trees are
/// processed in parallel; output order is input tree order regardless.
///
/// # Errors
/// Returns an error for a structurally inconsistent tree or one whose
/// non-root nodes lack edge lengths. These abort the whole computation
/// since they indicate corrupted input.
///
/// # Example
/// ```
/// use mrcascan::analysis::mrca_ages;
/// use mrcascan::newick::parse_str;
///
/// let trees = parse_str("((A:1,B:1):2,C:3); ((A:2,C:2):1,B:3);").unwrap();
/// let result = mrca_ages(&trees, "A", "B").unwrap();
/// assert_eq!(result.ages, vec![2.0, 0.0]);
/// assert_eq!(result.num_skipped, 0);
/// ```
pub fn mrca_ages(set: &TreeSet, a: &str, b: &str) -> Result<MrcaAges, AnalysisError> {
    collect_mrca_ages(set, a, b, false)
}

/// As [mrca_ages], but restricted to trees in which the pair is directly
/// related: the MRCA's descendant leaves are exactly `{a, b}`.
///
/// This separates "these two taxa are each other's closest relative in this
/// sample" from "these two taxa share some ancestor at some depth", which
/// holds in every tree and is therefore uninformative. Trees failing the
/// test are counted as skipped.
///
/// # Errors
/// Same as [mrca_ages].
pub fn mrca_ages_directly_related(
    set: &TreeSet,
    a: &str,
    b: &str,
) -> Result<MrcaAges, AnalysisError> {
    collect_mrca_ages(set, a, b, true)
}

/// Shared per-tree map over the set, parallelized with rayon. Collecting
/// into an index-aligned vector keeps output order equal to input order.
fn collect_mrca_ages(
    set: &TreeSet,
    a: &str,
    b: &str,
    require_directly_related: bool,
) -> Result<MrcaAges, AnalysisError> {
    let taxon_a = set.taxa().index_of(a);
    let taxon_b = set.taxa().index_of(b);

    // A label unknown to the whole set means every tree lacks it
    let (taxon_a, taxon_b) = match (taxon_a, taxon_b) {
        (Some(ta), Some(tb)) => (ta, tb),
        _ => {
            return Ok(MrcaAges {
                ages: Vec::new(),
                num_skipped: set.len(),
            });
        }
    };

    let per_tree: Vec<Option<f64>> = set
        .trees()
        .par_iter()
        .enumerate()
        .map(|(index, tree)| tree_mrca_age(tree, index, taxon_a, taxon_b, require_directly_related))
        .collect::<Result<_, AnalysisError>>()?;

    let num_skipped = per_tree.iter().filter(|age| age.is_none()).count();
    let ages = per_tree.into_iter().flatten().collect();

    Ok(MrcaAges { ages, num_skipped })
}

/// Computes one tree's contribution: `Ok(None)` is a skip, `Err` a
/// malformed tree.
fn tree_mrca_age(
    tree: &Tree,
    tree_index: usize,
    taxon_a: TaxonId,
    taxon_b: TaxonId,
    require_directly_related: bool,
) -> Result<Option<f64>, AnalysisError> {
    if !tree.is_valid() {
        return Err(AnalysisError::InvalidTree { tree_index });
    }
    if !tree.edge_lengths_complete() {
        return Err(AnalysisError::MissingEdgeLengths { tree_index });
    }

    let (leaf_a, leaf_b) = match (tree.leaf_of(taxon_a), tree.leaf_of(taxon_b)) {
        (Some(la), Some(lb)) => (la, lb),
        _ => return Ok(None),
    };

    let mrca = mrca_of(tree, leaf_a, leaf_b);

    if require_directly_related && tree.num_leaves_under(mrca) != 2 {
        return Ok(None);
    }

    let ages = tree.node_ages();
    Ok(Some(ages[tree.root_id()] - ages[mrca]))
}

/// Finds the MRCA of two nodes by intersecting their ancestor chains: walk
/// one node's path to the root, then walk up from the other until hitting
/// it.
fn mrca_of(tree: &Tree, x: NodeId, y: NodeId) -> NodeId {
    let mut on_path_to_root = vec![false; tree.num_nodes()];

    let mut current = x;
    on_path_to_root[current] = true;
    while let Some(parent) = tree[current].parent() {
        on_path_to_root[parent] = true;
        current = parent;
    }

    let mut current = y;
    loop {
        if on_path_to_root[current] {
            return current;
        }
        match tree[current].parent() {
            Some(parent) => current = parent,
            // y's walk always meets x's path at the root
            None => return current,
        }
    }
}
