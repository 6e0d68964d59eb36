//! Node module for the arena tree representation.

use crate::model::taxon_set::TaxonId;
use std::ops::Deref;

/// Index of a node in a tree arena.
pub type NodeId = usize;

/// *During construction only*, parent of a node that has not been wired up yet.
const NO_PARENT_SET: NodeId = usize::MAX;

// =#========================================================================#=
// NODE
// =#========================================================================#=
/// A node in a rooted phylogenetic tree.
///
/// A node is either:
/// - **Root**: no parent, two or more children
/// - **Inner**: parent and two or more children, no taxon
/// - **Leaf**: parent and a taxon, no children
///
/// # Invariants
/// - `id` is the node's index in the tree arena
/// - `edge_length` is the length of the edge to the parent; non-negative and
///   finite if present (enforced by [EdgeLength])
/// - `children` holds at least two entries for Root and Inner nodes
/// - `parent` is `NO_PARENT_SET` only while the tree is being built
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Root of the tree.
    Root {
        /// Index of this node in the tree arena
        id: NodeId,
        /// Indices of the child nodes (two or more)
        children: Vec<NodeId>,
        /// Optional root edge length (rare, but allowed in Newick)
        edge_length: Option<EdgeLength>,
    },
    /// Internal node (has parent and children, no taxon).
    Inner {
        /// Index of this node in the tree arena
        id: NodeId,
        /// Index of the parent node
        parent: NodeId,
        /// Indices of the child nodes (two or more)
        children: Vec<NodeId>,
        /// Length of the edge to the parent
        edge_length: Option<EdgeLength>,
    },
    /// Leaf node (has parent and a taxon, no children).
    Leaf {
        /// Index of this node in the tree arena
        id: NodeId,
        /// Index of the parent node
        parent: NodeId,
        /// Taxon this leaf represents
        taxon: TaxonId,
        /// Length of the edge to the parent
        edge_length: Option<EdgeLength>,
    },
}

impl Node {
    /// Creates a new root node.
    pub fn new_root(id: NodeId, children: Vec<NodeId>, edge_length: Option<EdgeLength>) -> Self {
        Node::Root {
            id,
            children,
            edge_length,
        }
    }

    /// Creates a new internal node; parent is wired up later by the tree.
    pub fn new_inner(id: NodeId, children: Vec<NodeId>, edge_length: Option<EdgeLength>) -> Self {
        Node::Inner {
            id,
            parent: NO_PARENT_SET,
            children,
            edge_length,
        }
    }

    /// Creates a new leaf node; parent is wired up later by the tree.
    pub fn new_leaf(id: NodeId, taxon: TaxonId, edge_length: Option<EdgeLength>) -> Self {
        Node::Leaf {
            id,
            parent: NO_PARENT_SET,
            taxon,
            edge_length,
        }
    }

    /// Returns the index of this node in the arena.
    pub fn id(&self) -> NodeId {
        match self {
            Node::Root { id, .. } | Node::Inner { id, .. } | Node::Leaf { id, .. } => *id,
        }
    }

    /// Returns the children of this node, or `None` for a leaf.
    pub fn children(&self) -> Option<&[NodeId]> {
        match self {
            Node::Root { children, .. } | Node::Inner { children, .. } => Some(children),
            Node::Leaf { .. } => None,
        }
    }

    /// Returns the taxon of this node if it is a leaf, else `None`.
    pub fn taxon(&self) -> Option<TaxonId> {
        match self {
            Node::Leaf { taxon, .. } => Some(*taxon),
            _ => None,
        }
    }

    /// Returns the length of the edge to the parent, if set.
    pub fn edge_length(&self) -> Option<EdgeLength> {
        match self {
            Node::Root { edge_length, .. }
            | Node::Inner { edge_length, .. }
            | Node::Leaf { edge_length, .. } => *edge_length,
        }
    }

    /// Returns whether this node has an [EdgeLength].
    pub fn has_edge_length(&self) -> bool {
        self.edge_length().is_some()
    }

    /// Returns `true` if this node is the root.
    pub fn is_root(&self) -> bool {
        matches!(self, Node::Root { .. })
    }

    /// Returns `true` if this node is an internal node.
    pub fn is_inner(&self) -> bool {
        matches!(self, Node::Inner { .. })
    }

    /// Returns `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Returns the index of the parent, or `None` for the root
    /// (or while the parent has not been set during construction).
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Inner { parent, .. } | Node::Leaf { parent, .. } => {
                if *parent == NO_PARENT_SET {
                    None
                } else {
                    Some(*parent)
                }
            }
            Node::Root { .. } => None,
        }
    }

    /// Returns `true` if this node has a parent set.
    pub fn has_parent(&self) -> bool {
        match self {
            Node::Inner { parent, .. } | Node::Leaf { parent, .. } => *parent != NO_PARENT_SET,
            Node::Root { .. } => false,
        }
    }

    /// Sets the parent of a non-root node.
    ///
    /// # Panics
    /// Panics if called on the root.
    pub fn set_parent(&mut self, new_parent: NodeId) {
        match self {
            Node::Root { .. } => panic!("Cannot set parent on root node"),
            Node::Inner { parent, .. } | Node::Leaf { parent, .. } => *parent = new_parent,
        }
    }
}

// =#========================================================================#=
// EDGE LENGTH
// =#========================================================================#=
/// Edge length in a phylogenetic tree, in time/divergence units.
///
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLength(f64);

impl EdgeLength {
    /// Creates a new edge length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite. Parsers validate values
    /// before calling this, turning bad input into errors instead.
    pub fn new(length: f64) -> Self {
        assert!(
            length >= 0.0,
            "Edge length must be non-negative, got {}",
            length
        );
        assert!(length.is_finite(), "Edge length must be finite, got {}", length);
        EdgeLength(length)
    }
}

impl Deref for EdgeLength {
    type Target = f64;

    fn deref(&self) -> &f64 {
        &self.0
    }
}
