//! Structs and logic to parse Nexus tree files.
//!
//! This module provides the [NexusParserBuilder] and [NexusParser] structs,
//! which offer methods to parse Nexus files with different configurations.

use crate::model::{TaxonId, TaxonSet, Tree, TreeSet};
use crate::newick::NewickParser;
use crate::nexus::defs::*;
use crate::parser::buffered_byte_source::BufferedByteSource;
use crate::parser::byte_parser::{ByteParser, ConsumeMode};
use crate::parser::byte_source::ByteSource;
use crate::parser::in_memory_byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParsingError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// =#========================================================================#=
// PARSING MODE
// =#========================================================================#=
/// Mode of [NexusParser] when parsing the TREES block: eager or lazy.
enum TreeParsingMode {
    /// Eagerly parse all trees upfront and store them
    Eager { trees: Vec<Tree> },
    /// Lazily parse trees as requested without storing them
    Lazy {
        /// Byte position where the first tree to parse begins (for reset)
        start_byte_pos: usize,
    },
}

// =#========================================================================#=
// BURNIN
// =#========================================================================#=
/// Specifies how many initial trees of a posterior sample to discard.
///
/// MCMC samplers need some iterations before the chain has converged, so the
/// first portion of a tree file is conventionally dropped before analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Burnin {
    /// Skip a fixed number of trees.
    Count(usize),

    /// Skip a fraction of the total trees, rounded down.
    ///
    /// Must be in the range `[0.0, 1.0)`; behaviour undefined otherwise.
    Fraction(f64),
}

impl Burnin {
    /// Resolves the burnin to an absolute number of trees to skip.
    pub(crate) fn count_for(&self, num_total_trees: usize) -> usize {
        match self {
            Burnin::Count(n) => *n,
            Burnin::Fraction(p) => (num_total_trees as f64 * p).floor() as usize,
        }
    }

    /// Whether the burnin is large enough that an extra counting pass to
    /// skip trees unparsed beats parsing them all and discarding.
    pub(crate) fn significant(&self) -> bool {
        const SIGNIFICANT_BURNIN_THRESHOLD: usize = 100;

        match self {
            Burnin::Count(n) => *n >= SIGNIFICANT_BURNIN_THRESHOLD,
            Burnin::Fraction(p) => *p >= 0.05,
        }
    }
}

// =#========================================================================#=
// READ STRATEGY
// =#========================================================================#=
/// Controls how the file is read during parsing.
///
/// The default [Automatic](ReadStrategy::Automatic) picks based on file
/// size; override via
/// [with_buffered_source()](NexusParserBuilder::with_buffered_source) or
/// [with_in_memory_source()](NexusParserBuilder::with_in_memory_source).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReadStrategy {
    /// Read the file in chunks through a buffered I/O reader.
    Buffered,

    /// Load the entire file into a contiguous byte buffer before parsing.
    InMemory,

    /// Pick between the two based on file size. This is the default.
    Automatic,
}

// =#========================================================================#=
// NEXUS PARSER BUILDER
// =#========================================================================#=
/// Builder for configuring and creating a [NexusParser].
///
/// Configure how the Nexus file should be parsed, then call
/// [`build()`](Self::build) to create an initialized [NexusParser] ready
/// for tree retrieval.
///
/// # Configuration Options
/// * **Parsing mode**: [`eager()`](Self::eager) parses and stores all trees
///   during build (default); [`lazy()`](Self::lazy) parses on demand.
/// * **Skip first**: [`with_skip_first()`](Self::with_skip_first) drops the
///   very first tree, e.g. the start tree of an MCMC run in a file of
///   10001 samples.
/// * **Burnin**: [`with_burnin()`](Self::with_burnin) drops an initial count
///   or fraction of trees. Applied after skip-first.
/// * **Annotations**: [`with_annotations()`](Self::with_annotations) keeps
///   `[&key=value,...]` node annotations instead of skipping them.
/// * **Read strategy**: [`with_buffered_source()`](Self::with_buffered_source)
///   or [`with_in_memory_source()`](Self::with_in_memory_source).
///
/// # Example
/// ```no_run
/// use mrcascan::nexus::{Burnin, NexusParserBuilder};
///
/// let mut parser = NexusParserBuilder::for_file("passeriformes.trees")
///     .with_burnin(Burnin::Fraction(0.1))
///     .build()?;
///
/// while let Some(tree) = parser.next_tree_ref() {
///     println!("Tree height: {}", tree.root_height());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct NexusParserBuilder {
    eager: bool,
    path: PathBuf,
    read_strategy: ReadStrategy,
    burnin: Burnin,
    skip_first: bool,
    parse_annotations: bool,
}

impl NexusParserBuilder {
    /// Creates a builder for the given file with default settings: eager
    /// mode, no burnin, first tree not skipped, annotations dropped.
    ///
    /// The file is opened on [`build()`](Self::build).
    pub fn for_file<P: AsRef<Path>>(path: P) -> Self {
        NexusParserBuilder {
            eager: true,
            path: path.as_ref().to_path_buf(),
            read_strategy: ReadStrategy::Automatic,
            burnin: Burnin::Count(0),
            skip_first: false,
            parse_annotations: false,
        }
    }

    /// Parse and store all trees during [`build()`](Self::build). Allows
    /// repeated passes at the cost of holding the whole sample in memory.
    ///
    /// This is the default mode.
    pub fn eager(mut self) -> Self {
        self.eager = true;
        self
    }

    /// Parse trees one at a time via [NexusParser::next_tree]. Uses little
    /// memory but requires reparsing for multiple passes.
    pub fn lazy(mut self) -> Self {
        self.eager = false;
        self
    }

    /// Discards initial trees as burnin.
    ///
    /// If combined with [with_skip_first()](Self::with_skip_first), the
    /// first tree is skipped and burnin applies to the rest.
    pub fn with_burnin(mut self, burnin: Burnin) -> Self {
        self.burnin = burnin;
        self
    }

    /// Skips the very first tree of the file.
    pub fn with_skip_first(mut self) -> Self {
        self.skip_first = true;
        self
    }

    /// Keeps `[&key=value,...]` node annotations instead of treating them
    /// as comments.
    pub fn with_annotations(mut self) -> Self {
        self.parse_annotations = true;
        self
    }

    /// Reads the file in chunks through a buffered reader, keeping memory
    /// usage low regardless of file size.
    pub fn with_buffered_source(mut self) -> Self {
        self.read_strategy = ReadStrategy::Buffered;
        self
    }

    /// Loads the entire file into memory before parsing, avoiding repeated
    /// I/O for small and moderately sized files.
    pub fn with_in_memory_source(mut self) -> Self {
        self.read_strategy = ReadStrategy::InMemory;
        self
    }

    /// Builds and initializes the [NexusParser].
    ///
    /// This parses the header, the TAXA block, and the TRANSLATE command
    /// (if present), counts and skips trees per the skip-first and burnin
    /// settings, and in eager mode parses all remaining trees.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a valid Nexus
    /// file, or (in eager mode) any tree fails to parse.
    pub fn build(self) -> Result<NexusParser, ParsingError> {
        /// File size threshold for the automatic read strategy. Smaller
        /// files are read into memory, larger ones streamed.
        const AUTO_IN_MEMORY_THRESHOLD: u64 = 100 * 1024 * 1024; // 100 MB

        let use_buffered = match self.read_strategy {
            ReadStrategy::Buffered => true,
            ReadStrategy::InMemory => false,
            ReadStrategy::Automatic => {
                let file_size = std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);
                file_size >= AUTO_IN_MEMORY_THRESHOLD
            }
        };

        let mut newick_parser = NewickParser::new();
        newick_parser.set_parse_annotations(self.parse_annotations);

        let mode = if self.eager {
            TreeParsingMode::Eager { trees: Vec::new() }
        } else {
            TreeParsingMode::Lazy { start_byte_pos: 0 }
        };

        if use_buffered {
            let byte_parser = ByteParser::from_file_buffered(&self.path)?;
            let mut inner = NexusParserInner {
                mode,
                newick_parser,
                byte_parser,
                burnin: self.burnin,
                skip_first: self.skip_first,
                num_taxa: 0,
                num_total_trees: 0,
                num_trees: 0,
                start_tree_pos: 0,
                tree_pos: 0,
            };
            inner.init()?;
            Ok(NexusParser::Buffered(inner))
        } else {
            let byte_parser = ByteParser::from_file(&self.path)?;
            let mut inner = NexusParserInner {
                mode,
                newick_parser,
                byte_parser,
                burnin: self.burnin,
                skip_first: self.skip_first,
                num_taxa: 0,
                num_total_trees: 0,
                num_trees: 0,
                start_tree_pos: 0,
                tree_pos: 0,
            };
            inner.init()?;
            Ok(NexusParser::InMemory(inner))
        }
    }
}

// =#========================================================================#=
// NEXUS PARSER
// =#========================================================================#=
/// Parser for Nexus phylogenetic tree files, as written by BEAST2, MrBayes,
/// RevBayes, and friends.
///
/// Created via [NexusParserBuilder]. In eager mode (the default), all trees
/// are parsed during build; iterate them with
/// [next_tree_ref()](Self::next_tree_ref) or extract everything with
/// [into_tree_set()](Self::into_tree_set). In lazy mode, parse on demand
/// with [next_tree()](Self::next_tree) and rewind with
/// [reset()](Self::reset).
///
/// # Example
/// ```no_run
/// use mrcascan::nexus::{Burnin, NexusParserBuilder};
///
/// let parser = NexusParserBuilder::for_file("jacanidae.trees")
///     .with_burnin(Burnin::Count(1000))
///     .build()?;
///
/// println!("{} of {} trees kept", parser.num_trees(), parser.num_total_trees());
/// let trees = parser.into_tree_set()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[allow(private_interfaces)]
pub enum NexusParser {
    /// Parser with buffered file reads
    Buffered(NexusParserInner<BufferedByteSource>),
    /// Parser with the whole file in memory
    InMemory(NexusParserInner<InMemoryByteSource>),
}

/// Helper macro to delegate a method call to the inner parser variant.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            NexusParser::Buffered(inner) => inner.$method($($arg),*),
            NexusParser::InMemory(inner) => inner.$method($($arg),*),
        }
    };
}

impl NexusParser {
    /// Rewinds to the first tree (respecting skip-first and burnin).
    pub fn reset(&mut self) {
        delegate!(self, reset)
    }

    /// Consumes this parser and returns trees and taxa as a [TreeSet].
    ///
    /// In lazy mode, this parses all remaining trees first.
    pub fn into_tree_set(self) -> Result<TreeSet, ParsingError> {
        delegate!(self, into_tree_set)
    }

    /// Returns the number of taxa from the TAXA block.
    pub fn num_taxa(&self) -> usize {
        delegate!(self, num_taxa)
    }

    /// Returns the taxon set built from the TAXA block.
    pub fn taxa(&self) -> &TaxonSet {
        delegate!(self, taxa)
    }

    /// Returns the number of trees kept, i.e. without skipped and burnin
    /// trees.
    pub fn num_trees(&self) -> usize {
        delegate!(self, num_trees)
    }

    /// Returns the total number of trees, including skipped and burnin
    /// trees.
    pub fn num_total_trees(&self) -> usize {
        delegate!(self, num_total_trees)
    }

    /// Returns a reference to the next tree.
    ///
    /// Eager mode only; in lazy mode trees are not stored, so this always
    /// returns `None`.
    pub fn next_tree_ref(&mut self) -> Option<&Tree> {
        delegate!(self, next_tree_ref)
    }

    /// Parses and returns the next tree.
    ///
    /// Lazy mode only; in eager mode this returns `Ok(None)`, use
    /// [next_tree_ref()](Self::next_tree_ref) or
    /// [into_tree_set()](Self::into_tree_set) instead.
    pub fn next_tree(&mut self) -> Result<Option<Tree>, ParsingError> {
        delegate!(self, next_tree)
    }
}

// =#========================================================================#=
// NEXUS PARSER INNER
// =#========================================================================#=
/// Inner of [NexusParser]; the outer enum erases the byte source type.
struct NexusParserInner<B: ByteSource> {
    /// Mode to parse trees
    mode: TreeParsingMode,
    /// Used for every tree statement, owns the taxon set
    newick_parser: NewickParser,
    /// Accessor to the underlying bytes being parsed
    byte_parser: ByteParser<B>,

    /// Whether to skip the first tree
    skip_first: bool,
    /// Amount of burnin to discard
    burnin: Burnin,

    /// Number of taxa per the TAXA block
    num_taxa: usize,
    /// Total number of `TREE` statements in the file
    num_total_trees: usize,
    /// Number of `TREE` statements kept after skipping
    /// - Invariant: `num_trees + start_tree_pos = num_total_trees`
    num_trees: usize,
    /// First `TREE` statement to keep (0-indexed)
    start_tree_pos: usize,
    /// Position of the `TREE` statement the next retrieval returns
    /// - Invariant: `start_tree_pos <= tree_pos <= num_total_trees`
    tree_pos: usize,
}

// ============================================================================
// Initialization & State (private)
// ============================================================================
impl<B: ByteSource> NexusParserInner<B> {
    /// Initializes the parser: header, TAXA block, TRANSLATE command, tree
    /// counting and skipping, and in eager mode, parsing of all kept trees.
    fn init(&mut self) -> Result<(), ParsingError> {
        self.parse_nexus_header()?;

        self.skip_until_block(NexusBlock::Taxa)?;
        let taxa = self.parse_taxa_block()?;

        self.skip_until_block(NexusBlock::Trees)?;
        let translation = self.parse_translate_command(&taxa)?;

        self.newick_parser.set_taxa(taxa);
        self.newick_parser.set_num_leaves(self.num_taxa);
        if let Some(translation) = translation {
            self.newick_parser.set_translation(translation);
        }

        self.byte_parser.skip_comment_and_whitespace()?;

        // Lazy mode always needs a counting pass. Eager mode only profits
        // from one when the burnin is big enough that skipping unparsed
        // trees beats parsing everything and discarding.
        let is_eager = matches!(self.mode, TreeParsingMode::Eager { .. });
        let use_two_pass = !is_eager || self.burnin.significant();

        if use_two_pass {
            let total_trees = self.count_trees()?;
            self.configure_tree_counts(total_trees);

            for _ in 0..self.start_tree_pos {
                self.skip_tree()?;
            }

            if is_eager {
                let mut trees = Vec::with_capacity(self.num_trees);
                while let Some(tree) = self.parse_single_tree()? {
                    trees.push(tree);
                }
                self.mode = TreeParsingMode::Eager { trees };
            } else {
                // Remember where the kept trees start so reset() can rewind
                let start_byte_pos = self.byte_parser.position();
                self.mode = TreeParsingMode::Lazy { start_byte_pos };
            }
        } else {
            // One pass: parse everything, then drop the skipped prefix
            let mut all_trees = Vec::new();
            while let Some(tree) = self.parse_single_tree()? {
                all_trees.push(tree);
            }
            self.configure_tree_counts(all_trees.len());

            if self.start_tree_pos > 0 {
                all_trees.drain(..self.start_tree_pos.min(all_trees.len()));
            }
            self.mode = TreeParsingMode::Eager { trees: all_trees };
        }

        Ok(())
    }

    /// Sets the tree count fields from the total count and the skip-first
    /// and burnin configuration.
    fn configure_tree_counts(&mut self, num_total_trees: usize) {
        self.num_total_trees = num_total_trees;

        let mut skip_count = 0;
        if self.skip_first && num_total_trees > 0 {
            skip_count = 1;
        }
        skip_count += self.burnin.count_for(num_total_trees - skip_count);

        self.num_trees = num_total_trees.saturating_sub(skip_count);
        self.start_tree_pos = skip_count;
        self.tree_pos = skip_count;
    }

    /// Rewinds to the first kept tree.
    fn reset(&mut self) {
        self.tree_pos = self.start_tree_pos;

        // In lazy mode, also rewind the byte parser
        if let TreeParsingMode::Lazy { start_byte_pos } = self.mode {
            self.byte_parser.set_position(start_byte_pos);
        }
    }
}

// ============================================================================
// Deconstruction & Accessors
// ============================================================================
impl<B: ByteSource> NexusParserInner<B> {
    fn into_tree_set(mut self) -> Result<TreeSet, ParsingError> {
        match self.mode {
            TreeParsingMode::Eager { trees } => {
                Ok(TreeSet::from_parts(self.newick_parser.into_taxa(), trees))
            }
            TreeParsingMode::Lazy { .. } => {
                let mut trees = Vec::with_capacity(self.num_trees);
                self.reset();
                while let Some(tree) = self.next_tree()? {
                    trees.push(tree);
                }
                Ok(TreeSet::from_parts(self.newick_parser.into_taxa(), trees))
            }
        }
    }

    fn num_taxa(&self) -> usize {
        self.num_taxa
    }

    fn taxa(&self) -> &TaxonSet {
        self.newick_parser.taxa()
    }

    fn num_trees(&self) -> usize {
        self.num_trees
    }

    fn num_total_trees(&self) -> usize {
        self.num_total_trees
    }

    fn next_tree_ref(&mut self) -> Option<&Tree> {
        match &self.mode {
            TreeParsingMode::Eager { trees } => {
                if self.tree_pos < self.start_tree_pos + self.num_trees {
                    let tree = &trees[self.tree_pos - self.start_tree_pos];
                    self.tree_pos += 1;
                    Some(tree)
                } else {
                    None
                }
            }
            TreeParsingMode::Lazy { .. } => None,
        }
    }

    fn next_tree(&mut self) -> Result<Option<Tree>, ParsingError> {
        match &self.mode {
            // Already parsed, use next_tree_ref() instead
            TreeParsingMode::Eager { .. } => Ok(None),
            TreeParsingMode::Lazy { .. } => {
                if self.tree_pos >= self.start_tree_pos + self.num_trees {
                    return Ok(None);
                }

                let tree = self.parse_single_tree()?;
                if tree.is_none() {
                    return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
                }
                self.tree_pos += 1;
                Ok(tree)
            }
        }
    }
}

// ============================================================================
// Parsing helpers (private)
// ============================================================================
impl<B: ByteSource> NexusParserInner<B> {
    /// Parses the `#NEXUS` header at the start of the file.
    fn parse_nexus_header(&mut self) -> Result<(), ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;

        if !self.byte_parser.consume_if_sequence(NEXUS_HEADER) {
            return Err(ParsingError::missing_nexus_header(&mut self.byte_parser));
        }

        Ok(())
    }

    /// Skips blocks until the target block's `BEGIN <name>;` header has
    /// been consumed.
    fn skip_until_block(&mut self, target: NexusBlock) -> Result<(), ParsingError> {
        loop {
            if self.byte_parser.is_eof() {
                return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
            }

            if self.detect_next_block()? == target {
                return Ok(());
            }

            self.skip_to_block_end()?;
        }
    }

    /// Consumes the next `BEGIN <name>;` header and returns the block type.
    fn detect_next_block(&mut self) -> Result<NexusBlock, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;

        if !self.byte_parser.consume_if_sequence(BLOCK_BEGIN) {
            return Err(ParsingError::invalid_block_structure(
                &mut self.byte_parser,
                String::from("Expected 'BEGIN' of next block."),
            ));
        }
        self.byte_parser.skip_comment_and_whitespace()?;

        let block_name = self.byte_parser.parse_unquoted_label(b";")?;
        self.byte_parser.next_byte(); // the ';'

        Ok(NexusBlock::from_name(block_name.trim()))
    }

    /// Skips forward until `END;` has been consumed.
    fn skip_to_block_end(&mut self) -> Result<(), ParsingError> {
        if !self
            .byte_parser
            .consume_until_sequence(BLOCK_END, ConsumeMode::Inclusive)
        {
            return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
        }

        Ok(())
    }

    /// Parses the TAXA block into a [TaxonSet].
    ///
    /// Expects `DIMENSIONS NTAX=<n>;` followed by `TAXLABELS <labels>;`,
    /// and checks the label count against the declared `ntax` value.
    fn parse_taxa_block(&mut self) -> Result<TaxonSet, ParsingError> {
        self.parse_taxa_block_ntax()?;
        let taxa = self.parse_taxa_block_labels()?;
        self.skip_to_block_end()?;

        Ok(taxa)
    }

    /// Parses `DIMENSIONS NTAX=<n>;` and stores the count.
    fn parse_taxa_block_ntax(&mut self) -> Result<(), ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if_sequence(DIMENSIONS) {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                String::from("Expected 'DIMENSIONS' in TAXA block."),
            ));
        }

        self.byte_parser.skip_whitespace();
        if !self.byte_parser.consume_if_sequence(NTAX) {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                String::from("Expected 'NTAX' in TAXA block."),
            ));
        }

        self.byte_parser.skip_whitespace();
        if !self.byte_parser.consume_if(b'=') {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                String::from("Expected '=' in TAXA block."),
            ));
        }

        self.byte_parser.skip_whitespace();
        let ntax_str = self.byte_parser.parse_unquoted_label(b";")?;
        let ntax: usize = ntax_str.trim().parse().map_err(|_| {
            ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                format!("Cannot parse ntax value: {ntax_str}"),
            )
        })?;
        self.byte_parser.next_byte(); // the ';'

        self.num_taxa = ntax;
        Ok(())
    }

    /// Parses `TAXLABELS <label> <label> ...;` into a [TaxonSet].
    fn parse_taxa_block_labels(&mut self) -> Result<TaxonSet, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if_sequence(TAXLABELS) {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                String::from("Expected 'TAXLABELS' in TAXA block."),
            ));
        }

        let mut taxa = TaxonSet::with_capacity(self.num_taxa);
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;

            // Semicolon ends the command
            if self.byte_parser.peek() == Some(b';') {
                self.byte_parser.next_byte();
                break;
            }

            let label = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;
            if !label.is_empty() {
                taxa.get_or_insert(&label);
            }
        }

        if taxa.len() != self.num_taxa {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                format!(
                    "Number of parsed labels ({}) did not match ntax value ({}).",
                    taxa.len(),
                    self.num_taxa
                ),
            ));
        }

        Ok(taxa)
    }

    /// Parses the `TRANSLATE` command of the TREES block, if present, into
    /// a token-to-taxon map.
    ///
    /// Every value must be a label from the TAXA block, and the map must
    /// cover all taxa. Returns `None` when the block starts directly with a
    /// `TREE` statement.
    fn parse_translate_command(
        &mut self,
        taxa: &TaxonSet,
    ) -> Result<Option<HashMap<String, TaxonId>>, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if_sequence(TRANSLATE) {
            // No TRANSLATE is fine if the next statement is a TREE
            return if self.byte_parser.peek_is_sequence(TREE) {
                Ok(None)
            } else {
                Err(ParsingError::invalid_trees_block(
                    &mut self.byte_parser,
                    String::from("Expected 'TRANSLATE' or first 'TREE' in TREES block."),
                ))
            };
        }

        let mut map: HashMap<String, TaxonId> = HashMap::with_capacity(self.num_taxa);
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;

            let token = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;

            if !self.byte_parser.consume_if(b' ') {
                return Err(ParsingError::invalid_trees_block(
                    &mut self.byte_parser,
                    String::from("Expected ' ' between token and label."),
                ));
            }

            let label = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;
            self.byte_parser.skip_whitespace();

            let taxon = match taxa.index_of(&label) {
                Some(taxon) => taxon,
                None => {
                    return Err(ParsingError::invalid_translate_command(
                        &mut self.byte_parser,
                    ));
                }
            };
            map.insert(token, taxon);

            // ',' means more pairs, ';' ends the command
            if self.byte_parser.consume_if(b',') {
                continue;
            }
            if self.byte_parser.consume_if(b';') {
                break;
            }
            let char = self.byte_parser.peek().map(char::from);
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                format!("Unexpected char {char:?} in TRANSLATE."),
            ));
        }

        if map.len() != self.num_taxa {
            return Err(ParsingError::invalid_translate_command(
                &mut self.byte_parser,
            ));
        }

        Ok(Some(map))
    }

    /// Parses a single `TREE <name> = [&R] <newick>;` statement.
    ///
    /// # Returns
    /// `Ok(None)` when the block's `END;` is reached instead.
    fn parse_single_tree(&mut self) -> Result<Option<Tree>, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;

        if self.byte_parser.peek_is_sequence(BLOCK_END) {
            return Ok(None);
        }

        if !self.byte_parser.consume_if_sequence(TREE) {
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                String::from("Expected 'TREE' in tree statement."),
            ));
        }

        let name = self.byte_parser.parse_label(NEXUS_LABEL_DELIMITERS)?;

        self.byte_parser.skip_whitespace();
        if !self.byte_parser.consume_if(b'=') {
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                String::from("Expected '=' after tree name in tree statement."),
            ));
        }

        // The optional rootedness marker "[&R]"/"[&U]" is skipped as a comment
        self.byte_parser.skip_comment_and_whitespace()?;

        let tree = self
            .newick_parser
            .parse_named_tree(&mut self.byte_parser, Some(name))?;
        Ok(Some(tree))
    }

    /// Skips a single `TREE` statement without parsing its Newick string.
    ///
    /// # Returns
    /// `Ok(false)` when the block's `END;` is reached instead.
    fn skip_tree(&mut self) -> Result<bool, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;

        if self.byte_parser.peek_is_sequence(BLOCK_END) {
            return Ok(false);
        }

        if !self.byte_parser.consume_if_sequence(TREE) {
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                String::from("Expected 'TREE' in tree statement."),
            ));
        }

        if !self
            .byte_parser
            .consume_until(b'=', ConsumeMode::Inclusive)
        {
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                String::from("Expected '=' in tree statement."),
            ));
        }

        self.byte_parser.skip_comment_and_whitespace()?;

        // The Newick string runs until its semicolon
        if !self.byte_parser.consume_until(b';', ConsumeMode::Inclusive) {
            return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
        }

        Ok(true)
    }

    /// Counts the trees in the TREES block without parsing them, then
    /// restores the parser position.
    fn count_trees(&mut self) -> Result<usize, ParsingError> {
        let saved_pos = self.byte_parser.position();

        let mut count = 0;
        while self.skip_tree()? {
            count += 1;
        }

        self.byte_parser.set_position(saved_pos);

        Ok(count)
    }
}
