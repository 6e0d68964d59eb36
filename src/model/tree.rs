//! Rooted phylogenetic tree over a shared taxon set.
//!
//! [Tree] stores its nodes in an arena ([Node] values referenced by [NodeId])
//! for cache-friendly traversal and to avoid reference cycles. Leaves carry
//! [TaxonId]s into the [TaxonSet](crate::model::TaxonSet) shared by all trees
//! of a sample. Trees may be multifurcating: internal nodes have two or more
//! children.

use crate::model::annotation::{AnnotationValue, Annotations};
use crate::model::node::{EdgeLength, Node, NodeId};
use crate::model::taxon_set::TaxonId;

/// Float comparison tolerance for ultrametricity checks
const EPSILON: f64 = 1e-7;

/// *During construction only*, index for unset root.
const NO_ROOT_SET: NodeId = usize::MAX;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted (possibly multifurcating) phylogenetic tree.
///
/// # Structure
/// - All nodes (root, inner, leaves) live in the arena, referenced by [NodeId].
/// - No ordering of indices is guaranteed (leaves need not come first).
/// - Edge lengths are optional, but non-negative and finite when present.
/// - An optional [Annotations] store holds per-node metadata parsed from
///   extended Newick.
///
/// # Construction
/// Parsers build trees bottom-up: [add_leaf](Self::add_leaf) and
/// [add_inner](Self::add_inner) return the new node's id, and
/// [add_root](Self::add_root) completes the tree. Structural soundness can be
/// checked afterwards with [is_valid](Self::is_valid).
///
/// Once part of a [TreeSet](crate::model::TreeSet), trees are never mutated;
/// all analysis functions are read-only.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<Node>,
    /// Index of the root
    root: NodeId,
    /// Name of the tree; set when parsed from a Nexus TREE command
    name: Option<String>,
    /// Per-node annotations, if any were parsed
    annotations: Option<Annotations>,
}

// ============================================================================
// Construction & Accessors
// ============================================================================
impl Tree {
    /// Creates an empty tree with capacity hinted by the expected number
    /// of leaves.
    pub fn with_leaf_capacity(num_leaves: usize) -> Self {
        Tree {
            nodes: Vec::with_capacity(2 * num_leaves.max(1)),
            root: NO_ROOT_SET,
            name: None,
            annotations: None,
        }
    }

    /// Adds a leaf for `taxon`, returning its id.
    pub fn add_leaf(&mut self, taxon: TaxonId, edge_length: Option<EdgeLength>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new_leaf(id, taxon, edge_length));
        id
    }

    /// Adds an internal node with the given children, returning its id.
    ///
    /// The children's parent links are set to the new node.
    pub fn add_inner(&mut self, children: Vec<NodeId>, edge_length: Option<EdgeLength>) -> NodeId {
        let id = self.nodes.len();
        for &child in &children {
            self.nodes[child].set_parent(id);
        }
        self.nodes.push(Node::new_inner(id, children, edge_length));
        id
    }

    /// Adds the root with the given children, completing the tree.
    pub fn add_root(&mut self, children: Vec<NodeId>, edge_length: Option<EdgeLength>) -> NodeId {
        let id = self.nodes.len();
        for &child in &children {
            self.nodes[child].set_parent(id);
        }
        self.nodes.push(Node::new_root(id, children, edge_length));
        self.root = id;
        id
    }

    /// Sets the name of this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns the name of this tree, if set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Adds an annotation value for a node, creating the annotation store
    /// on first use.
    pub fn annotate(&mut self, key: String, node: NodeId, value: AnnotationValue) {
        self.annotations
            .get_or_insert_with(Annotations::new)
            .add(key, node, value);
    }

    /// Returns the annotation store, or `None` for a plain tree.
    pub fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }

    /// Returns whether the root has been set, i.e. construction finished.
    pub fn is_root_set(&self) -> bool {
        self.root != NO_ROOT_SET
    }

    /// Returns the root node.
    ///
    /// # Panics
    /// Panics if the root has not been set yet.
    pub fn root(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Returns the id of the root.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Returns the number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of internal (non-root, non-leaf) nodes.
    pub fn num_inner(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_inner()).count()
    }

    /// Returns the leaf carrying `taxon`, or `None` if the taxon does not
    /// occur in this tree.
    pub fn leaf_of(&self, taxon: TaxonId) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.taxon() == Some(taxon))
            .map(|n| n.id())
    }

    /// Checks whether all non-root nodes have an edge length set.
    ///
    /// Node ages are only defined when this holds.
    pub fn edge_lengths_complete(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.is_root() || n.has_edge_length())
    }

    /// Returns the sum of all edge lengths.
    pub fn total_edge_length(&self) -> f64 {
        self.nodes
            .iter()
            .filter_map(|n| n.edge_length())
            .map(|l| *l)
            .sum()
    }
}

// ============================================================================
// Ages & structural checks
// ============================================================================
impl Tree {
    /// Computes the age of every node: its distance, in edge-length units,
    /// to the deepest leaf beneath it. Leaves have age 0; the root's age is
    /// the tree height.
    ///
    /// For non-ultrametric trees this takes the maximum over children rather
    /// than assuming all leaves are equidistant.
    ///
    /// # Panics
    /// Panics if a non-root node is missing its edge length; check
    /// [edge_lengths_complete](Self::edge_lengths_complete) first.
    pub fn node_ages(&self) -> Vec<f64> {
        let mut ages = vec![0.0; self.nodes.len()];
        for node in self.post_order() {
            if let Some(children) = node.children() {
                let mut age: f64 = 0.0;
                for &child in children {
                    let step = *self.nodes[child]
                        .edge_length()
                        .expect("node age undefined without edge lengths");
                    age = age.max(ages[child] + step);
                }
                ages[node.id()] = age;
            }
        }
        ages
    }

    /// Returns the height of the tree: the distance from the root to its
    /// deepest leaf.
    ///
    /// # Panics
    /// See [node_ages](Self::node_ages).
    pub fn root_height(&self) -> f64 {
        self.node_ages()[self.root]
    }

    /// Checks if the tree is ultrametric (all leaves equidistant from the
    /// root, within floating point tolerance).
    ///
    /// # Panics
    /// See [node_ages](Self::node_ages).
    pub fn is_ultrametric(&self) -> bool {
        let ages = self.node_ages();
        for node in &self.nodes {
            if let Some(children) = node.children() {
                let depths: Vec<f64> = children
                    .iter()
                    .map(|&c| {
                        let step = *self.nodes[c]
                            .edge_length()
                            .expect("ultrametricity undefined without edge lengths");
                        ages[c] + step
                    })
                    .collect();
                if depths
                    .iter()
                    .any(|d| (d - depths[0]).abs() > EPSILON)
                {
                    return false;
                }
            }
        }
        true
    }

    /// Counts the leaves in the subtree rooted at `node`.
    pub fn num_leaves_under(&self, node: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match self.nodes[id].children() {
                None => count += 1,
                Some(children) => stack.extend_from_slice(children),
            }
        }
        count
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root is set, in bounds, and the only Root node
    /// - Node ids match their arena positions
    /// - Children are in bounds and point back to their parent
    /// - Non-root nodes have a parent that lists them as a child
    /// - Root and Inner nodes have at least two children
    pub fn is_valid(&self) -> bool {
        if self.root == NO_ROOT_SET || self.root >= self.nodes.len() {
            return false;
        }
        if !self.nodes[self.root].is_root() {
            return false;
        }

        let mut found_root = false;
        for (id, node) in self.nodes.iter().enumerate() {
            if node.id() != id {
                return false;
            }

            if node.is_root() {
                if found_root {
                    return false;
                }
                found_root = true;
                if node.has_parent() {
                    return false;
                }
            } else {
                match node.parent() {
                    None => return false,
                    Some(parent) => {
                        if parent >= self.nodes.len() {
                            return false;
                        }
                        let listed = self.nodes[parent]
                            .children()
                            .is_some_and(|cs| cs.contains(&id));
                        if !listed {
                            return false;
                        }
                    }
                }
            }

            if let Some(children) = node.children() {
                if children.len() < 2 {
                    return false;
                }
                for &child in children {
                    if child >= self.nodes.len() || self.nodes[child].parent() != Some(id) {
                        return false;
                    }
                }
            }
        }

        true
    }
}

impl std::ops::Index<NodeId> for Tree {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id]
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before
    /// parents). Useful for aggregating from the leaves upward, e.g. when
    /// computing node ages.
    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before
    /// children).
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }
}

/// Stack-based post-order traversal (children before parents).
pub struct PostOrder<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeId, bool)>, // (id, children_visited)
}

impl<'a> PostOrder<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root, false));
        }
        PostOrder { tree, stack }
    }
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((id, children_visited)) = self.stack.pop() {
            let node = &self.tree[id];
            if children_visited || node.is_leaf() {
                return Some(node);
            }
            self.stack.push((id, true));
            if let Some(children) = node.children() {
                for &child in children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

/// Stack-based pre-order traversal (parents before children).
pub struct PreOrder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrder<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root);
        }
        PreOrder { tree, stack }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree[id];
        if let Some(children) = node.children() {
            for &child in children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((A:1,B:1):2,C:3); leaves at ids 0,1 and 3.
    fn small_tree() -> Tree {
        let mut tree = Tree::with_leaf_capacity(3);
        let a = tree.add_leaf(0, Some(EdgeLength::new(1.0)));
        let b = tree.add_leaf(1, Some(EdgeLength::new(1.0)));
        let ab = tree.add_inner(vec![a, b], Some(EdgeLength::new(2.0)));
        let c = tree.add_leaf(2, Some(EdgeLength::new(3.0)));
        tree.add_root(vec![ab, c], None);
        tree
    }

    #[test]
    fn test_node_ages() {
        let tree = small_tree();
        let ages = tree.node_ages();
        assert_eq!(ages[0], 0.0);
        assert_eq!(ages[2], 1.0); // inner (A,B)
        assert_eq!(ages[tree.root_id()], 3.0);
        assert_eq!(tree.root_height(), 3.0);
    }

    #[test]
    fn test_post_order_visits_children_first() {
        let tree = small_tree();
        let order: Vec<NodeId> = tree.post_order().map(|n| n.id()).collect();
        let pos = |id: NodeId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(0) < pos(2));
        assert!(pos(1) < pos(2));
        assert!(pos(2) < pos(tree.root_id()));
    }

    #[test]
    fn test_pre_order_visits_parents_first() {
        let tree = small_tree();
        let order: Vec<NodeId> = tree.pre_order().map(|n| n.id()).collect();
        assert_eq!(order.len(), tree.num_nodes());
        assert_eq!(order[0], tree.root_id());
        let pos = |id: NodeId| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(2) < pos(0));
        assert!(pos(2) < pos(1));
    }

    #[test]
    fn test_total_edge_length() {
        let tree = small_tree();
        assert_eq!(tree.total_edge_length(), 7.0);
    }

    #[test]
    fn test_is_valid_and_ultrametric() {
        let tree = small_tree();
        assert!(tree.is_valid());
        assert!(tree.is_ultrametric());
    }

    #[test]
    fn test_num_leaves_under() {
        let tree = small_tree();
        assert_eq!(tree.num_leaves_under(tree.root_id()), 3);
        assert_eq!(tree.num_leaves_under(2), 2);
        assert_eq!(tree.num_leaves_under(0), 1);
    }
}
