//! Low-level byte parsing shared by the Nexus and Newick parsers.
pub mod buffered_byte_source;
pub mod byte_parser;
pub mod byte_source;
pub mod in_memory_byte_source;
pub mod parsing_error;

pub use buffered_byte_source::BufferedByteSource;
pub use byte_parser::{ByteParser, ConsumeMode};
pub use byte_source::ByteSource;
pub use in_memory_byte_source::InMemoryByteSource;
pub use parsing_error::{ParsingError, ParsingErrorType};
