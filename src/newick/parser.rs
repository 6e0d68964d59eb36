//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse files or single strings, as well as lazy parsing via a
//! [NewickIterator].

use crate::model::annotation::AnnotationValue;
use crate::model::{EdgeLength, NodeId, TaxonId, TaxonSet, Tree};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;
use std::collections::HashMap;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick format phylogenetic trees.
///
/// Owns the [TaxonSet] that leaf labels are interned into, so every tree
/// parsed by the same parser shares one taxon numbering. After parsing,
/// retrieve the set via [into_taxa](Self::into_taxa).
///
/// Trees may be multifurcating: any internal node can have two or more
/// children.
///
/// # Configuration
/// * [`with_num_leaves(n)`](Self::with_num_leaves) - pre-sizes trees;
///   otherwise the count is taken from the first parsed tree.
/// * [`with_annotations()`](Self::with_annotations) - parses `[&key=value]`
///   blocks into node annotations instead of skipping them as comments.
/// * [`with_translation(map)`](Self::with_translation) - resolves labels
///   through a token map, as set up from a Nexus `TRANSLATE` command.
///
/// # Parsing
/// * [`parse_tree`](Self::parse_tree) - parse a single tree
/// * [`parse_all`](Self::parse_all) - parse all trees eagerly
/// * [`into_iter`](Self::into_iter) - parse trees lazily
///
/// # Example
/// ```
/// use mrcascan::newick::NewickParser;
/// use mrcascan::parser::ByteParser;
///
/// let input = "((A:1.0,B:1.0):0.5,C:1.5);";
/// let mut byte_parser = ByteParser::from_str(input);
/// let mut parser = NewickParser::new();
///
/// let tree = parser.parse_tree(&mut byte_parser).unwrap();
/// let taxa = parser.into_taxa();
/// assert_eq!(taxa.len(), 3);
/// ```
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
    taxa: TaxonSet,
    translation: Option<HashMap<String, TaxonId>>,
    parse_annotations: bool,
}

// ============================================================================
// Construction & Configuration, Deconstruction (pub)
// ============================================================================
impl NewickParser {
    /// Creates a parser with a fresh taxon set and verbatim label
    /// resolution.
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            taxa: TaxonSet::new(),
            translation: None,
            parse_annotations: false,
        }
    }

    /// Creates a parser over an existing taxon set, e.g. one filled from a
    /// Nexus TAXA block.
    pub fn with_taxa(taxa: TaxonSet) -> Self {
        Self {
            taxa,
            ..Self::new()
        }
    }

    /// Sets the expected number of leaves per tree, for pre-allocation.
    ///
    /// If not set, the count of the first parsed tree is used for the rest.
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }

    pub(crate) fn set_taxa(&mut self, taxa: TaxonSet) {
        self.taxa = taxa;
    }

    pub(crate) fn set_num_leaves(&mut self, num_leaves: usize) {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
    }

    /// Configures the parser to resolve leaf labels through a token map,
    /// as set up from a Nexus `TRANSLATE` command. Labels missing from the
    /// map become parse errors.
    pub fn with_translation(mut self, translation: HashMap<String, TaxonId>) -> Self {
        self.translation = Some(translation);
        self
    }

    pub(crate) fn set_translation(&mut self, translation: HashMap<String, TaxonId>) {
        self.translation = Some(translation);
    }

    /// Configures the parser to keep `[&key=value,...]` node annotations.
    pub fn with_annotations(mut self) -> Self {
        self.parse_annotations = true;
        self
    }

    pub(crate) fn set_parse_annotations(&mut self, parse_annotations: bool) {
        self.parse_annotations = parse_annotations;
    }

    /// Consumes the parser and returns the taxon set accumulated while
    /// parsing.
    pub fn into_taxa(self) -> TaxonSet {
        self.taxa
    }

    /// Returns the taxon set accumulated so far.
    pub fn taxa(&self) -> &TaxonSet {
        &self.taxa
    }
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Consumes the parser and returns an iterator over trees from the byte
    /// source.
    ///
    /// The parser can be retrieved again via [NewickIterator::into_parser].
    pub fn into_iter<B: ByteSource>(self, byte_parser: ByteParser<B>) -> NewickIterator<B> {
        NewickIterator {
            byte_parser,
            parser: self,
            done: false,
        }
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Errors
    /// Returns the first parse error encountered.
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_tree(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Errors
    /// Returns an error if the Newick string is malformed, an edge length
    /// is negative, or a label cannot be resolved.
    pub fn parse_tree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Tree, ParsingError> {
        self.parse_named_tree(parser, None)
    }

    /// Parses a single Newick tree and gives it the provided name.
    pub(crate) fn parse_named_tree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree_name: Option<String>,
    ) -> Result<Tree, ParsingError> {
        let mut tree = Tree::with_leaf_capacity(self.num_leaves);

        if let Some(name) = tree_name {
            tree.set_name(name);
        }

        // Reset the leaf count if it is not known yet, so the actual count
        // can be tracked during this parse
        if !self.know_num_leaves {
            self.num_leaves = 0;
        }

        self.parse_root(parser, &mut tree)?;

        // A full tree has been parsed, so the leaf count is now known
        self.know_num_leaves = true;

        Ok(tree)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses the root `(child,child,...)[annotation][:edge_length];` and
    /// completes the tree.
    fn parse_root<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let children = self.parse_children(parser, tree)?;

        let annotations = if self.parse_annotations {
            self.parse_annotations(parser)?
        } else {
            None
        };

        // Root may carry an edge length, usually 0.0, often none
        let edge_length = self.parse_edge_length(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {next_char:?}"),
            ));
        }

        let root_id = tree.add_root(children, edge_length);
        self.add_annotations(tree, annotations, root_id);

        Ok(())
    }

    /// Parses a node (internal or leaf) and returns its id. Dispatches on
    /// whether the next byte opens a child list.
    fn parse_node<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<NodeId, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek_is(b'(') {
            self.parse_internal_node(parser, tree)
        } else {
            self.parse_leaf(parser, tree)
        }
    }

    /// Parses `(child,child,...)[annotation][:edge_length]` and adds the
    /// internal node to the tree.
    fn parse_internal_node<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<NodeId, ParsingError> {
        let children = self.parse_children(parser, tree)?;
        let annotations = if self.parse_annotations {
            self.parse_annotations(parser)?
        } else {
            None
        };
        let edge_length = self.parse_edge_length(parser)?;

        let id = tree.add_inner(children, edge_length);
        self.add_annotations(tree, annotations, id);

        Ok(id)
    }

    /// Parses a parenthesized child list `(child,child,...)` and returns the
    /// children's ids. At least two children are required; trees may be
    /// multifurcating, so there is no upper limit.
    fn parse_children<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<Vec<NodeId>, ParsingError> {
        // Callers have skipped comments and whitespace already
        if !parser.consume_if(b'(') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {next_char:?}"),
            ));
        }

        let mut children = vec![self.parse_node(parser, tree)?];

        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b',') {
                children.push(self.parse_node(parser, tree)?);
            } else {
                break;
            }
        }

        if !parser.consume_if(b')') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ',' or ')' in child list but found {next_char:?}"),
            ));
        }

        if children.len() < 2 {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Internal node with fewer than two children".to_string(),
            ));
        }

        Ok(children)
    }

    /// Parses `label[annotation][:edge_length]` and adds the leaf to the
    /// tree.
    fn parse_leaf<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<NodeId, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Empty leaf label".to_string(),
            ));
        }
        let taxon = self.resolve_label(parser, &label)?;

        let annotations = if self.parse_annotations {
            self.parse_annotations(parser)?
        } else {
            None
        };
        let edge_length = self.parse_edge_length(parser)?;

        if !self.know_num_leaves {
            self.num_leaves += 1;
        }

        let id = tree.add_leaf(taxon, edge_length);
        self.add_annotations(tree, annotations, id);

        Ok(id)
    }

    /// Resolves a leaf label to a [TaxonId], either through the translation
    /// map or by interning it into the taxon set.
    fn resolve_label<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        label: &str,
    ) -> Result<TaxonId, ParsingError> {
        match &self.translation {
            Some(translation) => translation.get(label).copied().ok_or_else(|| {
                ParsingError::unresolved_label(
                    parser,
                    format!("'{label}' not in translation table"),
                )
            }),
            None => Ok(self.taxa.get_or_insert(label)),
        }
    }

    /// Parses an optional edge length `[:number]`, with scientific notation
    /// supported (e.g. `1.5e-10`).
    ///
    /// # Errors
    /// Returns an error on a malformed, negative, or non-finite value.
    fn parse_edge_length<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<EdgeLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let value = parser.parse_number()?;
        if value < 0.0 {
            return Err(ParsingError::negative_edge_length(parser, value));
        }
        // A literal like 1e999 overflows to infinity during conversion
        if !value.is_finite() {
            return Err(ParsingError::non_finite_edge_length(parser, value));
        }

        Ok(Some(EdgeLength::new(value)))
    }

    /// Parses an annotation block `[&key=value,...]` if present.
    ///
    /// A `[` not followed by `&` is a regular comment and left for the
    /// comment skipping to handle.
    fn parse_annotations<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<HashMap<String, AnnotationValue>>, ParsingError> {
        parser.skip_whitespace();
        if !parser.consume_if_sequence(b"[&") {
            return Ok(None);
        }

        let mut annotations = HashMap::new();

        loop {
            let key = parser.parse_unquoted_label(b"=")?;
            if key.is_empty() {
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    "Empty annotation key".to_string(),
                ));
            }

            parser.next_byte(); // consume '='

            let value_str = parser.parse_unquoted_label(b",]")?;
            if value_str.is_empty() {
                return Err(ParsingError::invalid_newick_string(
                    parser,
                    format!("Empty annotation value for key '{key}'"),
                ));
            }
            annotations.insert(key, AnnotationValue::parse(&value_str));

            // ',' means more pairs, ']' means end
            if !parser.consume_if(b',') {
                break;
            }
        }

        if !parser.consume_if(b']') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                "Expected ']' at end of annotation block".to_string(),
            ));
        }

        Ok(Some(annotations))
    }

    fn add_annotations(
        &mut self,
        tree: &mut Tree,
        annotations: Option<HashMap<String, AnnotationValue>>,
        node: NodeId,
    ) {
        if let Some(annots) = annotations {
            for (key, value) in annots {
                tree.annotate(key, node, value);
            }
        }
    }
}

// =#========================================================================#=
// NEWICK ITERATOR (lazy parser)
// =#========================================================================#=
/// Iterator to parse Newick trees lazily.
///
/// Created by [NewickParser::into_iter]. Yields `Result<Tree, ParsingError>`
/// for each tree. After iteration, retrieve the parser (and with it the
/// taxon set) via [into_parser](Self::into_parser).
pub struct NewickIterator<B: ByteSource> {
    parser: NewickParser,
    byte_parser: ByteParser<B>,
    done: bool,
}

impl<B: ByteSource> NewickIterator<B> {
    /// Consumes the iterator and returns the underlying [NewickParser].
    pub fn into_parser(self) -> NewickParser {
        self.parser
    }
}

impl<B: ByteSource> Iterator for NewickIterator<B> {
    type Item = Result<Tree, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parser.parse_tree(&mut self.byte_parser) {
            Ok(tree) => {
                // Prepare for the next call: skip trailing whitespace and
                // comments, then check EOF
                if let Err(e) = self.byte_parser.skip_comment_and_whitespace() {
                    self.done = true;
                    return Some(Err(e));
                }

                if self.byte_parser.is_eof() {
                    self.done = true;
                }

                Some(Ok(tree))
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
