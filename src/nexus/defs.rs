//! Nexus format constants and block definitions.

/// Nexus label delimiters: comma, semicolon, whitespace
pub(crate) const NEXUS_LABEL_DELIMITERS: &[u8] = b" ,;\t\n\r";

/// Nexus file header
pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";

/// Block begin keyword
pub(crate) const BLOCK_BEGIN: &[u8] = b"Begin";

/// Block end keyword, with semicolon
pub(crate) const BLOCK_END: &[u8] = b"End;";

/// TAXA block dimensions command
pub(crate) const DIMENSIONS: &[u8] = b"Dimensions";

/// Number-of-taxa parameter of the dimensions command
pub(crate) const NTAX: &[u8] = b"ntax";

/// Taxon list command
pub(crate) const TAXLABELS: &[u8] = b"Taxlabels";

/// TREES block translate command
pub(crate) const TRANSLATE: &[u8] = b"Translate";

/// Individual tree statement keyword
pub(crate) const TREE: &[u8] = b"tree";

/// Nexus block types.
#[derive(Debug, PartialEq, Clone)]
pub enum NexusBlock {
    Taxa,
    Trees,
    Data,
    Characters,
    Distances,
    Sets,
    Assumptions,
    UnknownBlock(String),
}

impl NexusBlock {
    /// Parses a block name (case-insensitive) into its variant.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "taxa" => NexusBlock::Taxa,
            "trees" => NexusBlock::Trees,
            "data" => NexusBlock::Data,
            "characters" => NexusBlock::Characters,
            "distances" => NexusBlock::Distances,
            "sets" => NexusBlock::Sets,
            "assumptions" => NexusBlock::Assumptions,
            _ => NexusBlock::UnknownBlock(name.to_string()),
        }
    }
}
