//! A posterior sample of trees over one shared taxon set.

use crate::model::taxon_set::TaxonSet;
use crate::model::tree::Tree;

// =#========================================================================#=
// TREE SET
// =#========================================================================#=
/// A collection of trees (e.g. a posterior sample from an MCMC run) whose
/// leaves all reference the same [TaxonSet].
///
/// Parsers intern every leaf label in the shared set, so the same label
/// resolves to the same [TaxonId](crate::model::TaxonId) in every tree. This
/// is what allows per-tree values of two sets to be compared by taxon pair.
#[derive(Debug, Default)]
pub struct TreeSet {
    taxa: TaxonSet,
    trees: Vec<Tree>,
}

impl TreeSet {
    /// Creates an empty tree set.
    pub fn new() -> Self {
        TreeSet {
            taxa: TaxonSet::new(),
            trees: Vec::new(),
        }
    }

    /// Assembles a tree set from a taxon set and the trees parsed over it.
    pub fn from_parts(taxa: TaxonSet, trees: Vec<Tree>) -> Self {
        TreeSet { taxa, trees }
    }

    /// Appends a tree.
    pub fn push(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    /// Returns the shared taxon set.
    pub fn taxa(&self) -> &TaxonSet {
        &self.taxa
    }

    /// Returns the trees of this set.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Returns the number of trees.
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Returns whether this set contains no trees.
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Returns an iterator over the trees.
    pub fn iter(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }
}

impl std::ops::Index<usize> for TreeSet {
    type Output = Tree;

    fn index(&self, index: usize) -> &Self::Output {
        &self.trees[index]
    }
}

impl<'a> IntoIterator for &'a TreeSet {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}
