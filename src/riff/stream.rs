//! Sequential reader for top-level chunks

use super::{Chunk, Tag};
use crate::error::{Error, Result};
use crate::io::BufferSlice;
use byteorder::{BigEndian, ByteOrder};
use std::io::{self, Read};
use tracing::debug;

/// Reads top-level chunks one after another from a byte stream
///
/// Each record is a 4-byte tag, a 4-byte big-endian size and exactly `size`
/// payload bytes, which are copied into a new buffer. The stream is never
/// seeked. Unlike nested lists there is no lenient recovery here: a record
/// cut short by the end of the stream is a [`Error::Truncated`] error.
pub struct ChunkReader<R> {
    inner: R,
    chunks_read: u64,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    /// Create a reader over `inner`
    pub fn new(inner: R) -> Self {
        ChunkReader {
            inner,
            chunks_read: 0,
            done: false,
        }
    }

    /// Read the next chunk
    ///
    /// Returns `Ok(None)` when the stream ends cleanly on a chunk boundary.
    pub fn read_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut tag = [0u8; 4];
        match fill(&mut self.inner, &mut tag)? {
            0 => return Ok(None),
            4 => {}
            have => return Err(Error::truncated(4, have as u64)),
        }
        let tag = Tag::new(tag);

        let mut size = [0u8; 4];
        let have = fill(&mut self.inner, &mut size)?;
        if have < size.len() {
            return Err(Error::truncated(4, have as u64));
        }
        let size = BigEndian::read_u32(&size);

        let mut payload = Vec::new();
        let have = self
            .inner
            .by_ref()
            .take(u64::from(size))
            .read_to_end(&mut payload)?;
        if (have as u64) < u64::from(size) {
            return Err(Error::truncated(u64::from(size), have as u64));
        }

        self.chunks_read += 1;
        debug!(tag = %tag, size, index = self.chunks_read, "read top-level chunk");

        Chunk::parse(tag, Box::new(BufferSlice::from_vec(payload))).map(Some)
    }

    /// Number of chunks returned so far
    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Release the underlying stream
    pub fn close(self) {
        drop(self.inner);
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_chunk() {
            Ok(Some(chunk)) => Some(Ok(chunk)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Read until `buf` is full or the stream ends, returning the byte count
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}
