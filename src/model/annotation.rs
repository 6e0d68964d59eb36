//! Per-node annotations parsed from extended Newick (`[&key=value,...]`).
//!
//! Provides [Annotations], a column store of [AnnotationValue]s keyed by
//! annotation name and indexed by [NodeId]. A [Tree](crate::model::Tree)
//! carrying annotations is the crate's "annotated tree" capability: plain
//! trees return `None` from `annotations()`, annotated ones return the store.

use crate::model::NodeId;
use std::collections::HashMap;

// =#========================================================================#=
// ANNOTATIONS
// =#========================================================================#=
/// Node annotations for multiple keys.
///
/// Each key holds one column parallel to the tree's node arena; columns grow
/// on demand, so annotations can be added while the tree is still being built.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    columns: HashMap<String, Vec<Option<AnnotationValue>>>,
}

impl Annotations {
    /// Creates an empty annotation store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a single annotation value for a node.
    ///
    /// Returns `None` if the key does not exist or the node has no value
    /// for it.
    pub fn get(&self, key: &str, node: NodeId) -> Option<AnnotationValue> {
        self.columns
            .get(key)
            .and_then(|column| column.get(node).cloned().flatten())
    }

    /// Returns the full column for a key, one entry per node, or `None` if
    /// the key does not exist. The column may be shorter than the arena if
    /// trailing nodes carry no value.
    pub fn column(&self, key: &str) -> Option<&[Option<AnnotationValue>]> {
        self.columns.get(key).map(|c| c.as_slice())
    }

    /// Adds an annotation value for a node, growing the column as needed.
    pub fn add(&mut self, key: String, node: NodeId, value: AnnotationValue) {
        let column = self.columns.entry(key).or_default();
        if column.len() <= node {
            column.resize(node + 1, None);
        }
        column[node] = Some(value);
    }

    /// Returns whether no annotation has been stored.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the annotation keys present.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}

// =#========================================================================#=
// ANNOTATION VALUE
// =#========================================================================#=
/// A parsed annotation value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// Floating point value
    Float(f64),
    /// Integer value
    Int(i64),
    /// Anything that parses as neither
    String(String),
}

impl AnnotationValue {
    /// Parses a raw value string, trying integer, then float, then falling
    /// back to a string.
    pub fn parse(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            AnnotationValue::Int(v)
        } else if let Ok(v) = raw.parse::<f64>() {
            AnnotationValue::Float(v)
        } else {
            AnnotationValue::String(raw.to_string())
        }
    }
}

impl From<f64> for AnnotationValue {
    fn from(v: f64) -> Self {
        AnnotationValue::Float(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::String(v.to_string())
    }
}
