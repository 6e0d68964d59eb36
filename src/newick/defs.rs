//! Constants for Newick parsing.

/// Bytes that terminate an unquoted Newick label
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b",;:()[]' \t\n\r";

/// Leaf count assumed before the first tree has been parsed
pub(crate) const DEFAULT_NUM_LEAVES_GUESS: usize = 32;
