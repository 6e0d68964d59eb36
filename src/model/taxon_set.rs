//! Taxon label storage shared across the trees of a posterior sample.

use std::collections::HashMap;
use std::fmt;

/// Index of a taxon in a [TaxonSet].
pub type TaxonId = usize;

// =#========================================================================#=
// TAXON SET
// =#========================================================================#=
/// Bidirectional mapping between taxon labels and compact [TaxonId]s.
///
/// All trees of a tree set share one [TaxonSet]; each leaf stores only a
/// [TaxonId]. Labels are deduplicated, so inserting the same label twice
/// returns the same id.
///
/// # Example
/// ```
/// use mrcascan::model::TaxonSet;
///
/// let mut taxa = TaxonSet::with_capacity(3);
/// let kea = taxa.get_or_insert("Nestor notabilis");
/// let kaka = taxa.get_or_insert("Nestor meridionalis");
/// assert_eq!(taxa.get_or_insert("Nestor notabilis"), kea);
/// assert_ne!(kea, kaka);
/// assert_eq!(taxa.label(kea), Some("Nestor notabilis"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxonSet {
    /// Unique labels, position = [TaxonId]
    labels: Vec<String>,
    /// Reverse lookup label -> [TaxonId]
    map: HashMap<String, TaxonId>,
}

impl TaxonSet {
    /// Creates an empty taxon set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty taxon set with pre-allocated capacity.
    pub fn with_capacity(num_taxa: usize) -> Self {
        TaxonSet {
            labels: Vec::with_capacity(num_taxa),
            map: HashMap::with_capacity(num_taxa),
        }
    }

    /// Returns the id for `label`, inserting it if not present yet.
    pub fn get_or_insert(&mut self, label: &str) -> TaxonId {
        if let Some(&id) = self.map.get(label) {
            id
        } else {
            let id = self.labels.len();
            self.labels.push(label.to_string());
            self.map.insert(label.to_string(), id);
            id
        }
    }

    /// Returns the id for `label` if it is present.
    pub fn index_of(&self, label: &str) -> Option<TaxonId> {
        self.map.get(label).copied()
    }

    /// Returns the label for `id` if it is in range.
    pub fn label(&self, id: TaxonId) -> Option<&str> {
        self.labels.get(id).map(|s| s.as_str())
    }

    /// Returns whether `label` is present.
    pub fn contains(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of taxa.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns all labels, indexed by [TaxonId].
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl fmt::Display for TaxonSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TaxonSet ({} taxa):", self.labels.len())?;
        for (id, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", id, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<TaxonId> for TaxonSet {
    type Output = str;

    fn index(&self, id: TaxonId) -> &Self::Output {
        &self.labels[id]
    }
}
