//! Streaming byte source backed by a [BufReader].

use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use crate::parser::byte_source::ByteSource;

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================#=
/// Byte source streaming a file through a [BufReader].
///
/// Use this for files too large to load into memory whole. A small owned
/// buffer supports peeking across the underlying reader's chunk boundary.
pub struct BufferedByteSource {
    /// Underlying reader, handles fetching chunks from the file
    reader: BufReader<File>,

    /// Own buffer for multi-byte peeks
    peek_buffer: Vec<u8>,

    /// Current absolute position in the stream
    pos: usize,

    /// Set when a seek fails; the stream position is then unknown, so the
    /// source reads as exhausted rather than continuing at a wrong offset
    seek_failed: bool,
}

impl BufferedByteSource {
    /// Sized for the keyword peeks the format parsers do, e.g. `#NEXUS`
    /// or `TRANSLATE`.
    const PEEK_BUFFER_CAPACITY: usize = 16;

    /// Opens a file for streaming.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<BufferedByteSource> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            peek_buffer: Vec::with_capacity(Self::PEEK_BUFFER_CAPACITY),
            pos: 0,
            seek_failed: false,
        })
    }
}

impl ByteSource for BufferedByteSource {
    fn peek(&mut self) -> Option<u8> {
        if self.seek_failed {
            return None;
        }
        let buf = self.reader.fill_buf().ok()?;
        buf.first().copied()
    }

    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.reader.consume(1);
        self.pos += 1;
        Some(byte)
    }

    fn peek_slice(&mut self, k: usize) -> &[u8] {
        self.peek_buffer.clear();
        if self.seek_failed {
            return &self.peek_buffer;
        }

        let buf = match self.reader.fill_buf() {
            Ok(b) => b,
            Err(_) => return &self.peek_buffer,
        };

        if buf.len() >= k {
            // Common case: the reader's buffer already covers the peek
            self.peek_buffer.extend_from_slice(&buf[..k]);
        } else {
            // Peek crosses the chunk boundary: take what is there, pull more,
            // then seek back so the peek stays non-consuming
            self.peek_buffer.extend_from_slice(buf);
            let mut consumed = buf.len();
            self.reader.consume(consumed);

            while self.peek_buffer.len() < k {
                let buf = match self.reader.fill_buf() {
                    Ok([]) => break, // EOF
                    Ok(b) => b,
                    Err(_) => break,
                };
                let need = k - self.peek_buffer.len();
                let take = need.min(buf.len());
                self.peek_buffer.extend_from_slice(&buf[..take]);
                self.reader.consume(take);
                consumed += take;
            }

            if self.reader.seek(SeekFrom::Current(-(consumed as i64))).is_err() {
                self.seek_failed = true;
                self.peek_buffer.clear();
            }
        }

        &self.peek_buffer
    }

    fn get_context(&mut self, k: usize) -> Vec<u8> {
        self.peek_slice(k).to_vec()
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn set_position(&mut self, pos: usize) {
        // An absolute seek re-establishes a known position
        match self.reader.seek(SeekFrom::Start(pos as u64)) {
            Ok(_) => {
                self.seek_failed = false;
                self.pos = pos;
            }
            Err(_) => self.seek_failed = true,
        }
    }

    fn is_eof(&mut self) -> bool {
        if self.seek_failed {
            return true;
        }
        match self.reader.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(_) => true,
        }
    }
}
