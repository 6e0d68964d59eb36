//! Data model: taxa, nodes, trees, tree sets, and node annotations.

pub mod annotation;
pub mod node;
pub mod taxon_set;
pub mod tree;
pub mod tree_set;

pub use annotation::{AnnotationValue, Annotations};
pub use node::{EdgeLength, Node, NodeId};
pub use taxon_set::{TaxonId, TaxonSet};
pub use tree::Tree;
pub use tree_set::TreeSet;
