//! Byte source abstraction used by the low-level parser.

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================#=
/// Interface over different ways of accessing byte data during parsing.
///
/// Implementations cover in-memory data ([InMemoryByteSource]) and streamed
/// files ([BufferedByteSource]), so the same parser logic works for small
/// inputs loaded whole and for large files read from disk.
///
/// [InMemoryByteSource]: crate::parser::InMemoryByteSource
/// [BufferedByteSource]: crate::parser::BufferedByteSource
pub trait ByteSource {
    /// Peeks at the current byte without consuming it; `None` at EOF.
    fn peek(&mut self) -> Option<u8>;

    /// Returns the current byte and advances past it; `None` at EOF.
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns a slice of up to `k` bytes from the current position without
    /// advancing. May return fewer bytes near EOF.
    fn peek_slice(&mut self, k: usize) -> &[u8];

    /// Returns up to `k` bytes from the current position, for error context.
    fn get_context(&mut self, k: usize) -> Vec<u8>;

    /// Returns the current byte offset in the stream.
    fn position(&self) -> usize;

    /// Seeks to the given byte offset.
    fn set_position(&mut self, pos: usize);

    /// Returns whether the end of data has been reached.
    fn is_eof(&mut self) -> bool;
}
