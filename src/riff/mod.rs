//! RIFF-family chunk trees
//!
//! A chunk is a 4-byte tag, a 4-byte size and `size` bytes of payload.
//! Chunks tagged `RIFF` or `LIST` are containers: their payload starts with
//! a 4-byte list type followed by further chunks, parsed recursively into a
//! tree whose nodes keep zero-copy slices over their payload bytes.
//!
//! ```rust
//! use riffscope_lib::io::{BufferSlice, DataSlice};
//! use riffscope_lib::riff::Chunk;
//!
//! let mut payload = b"INFO".to_vec();
//! payload.extend_from_slice(b"INAM");
//! payload.extend_from_slice(&4u32.to_le_bytes());
//! payload.extend_from_slice(b"test");
//!
//! let chunk = Chunk::parse("LIST".parse()?, Box::new(BufferSlice::from_vec(payload)))?;
//! assert_eq!(chunk.list_type().unwrap(), "INFO");
//! assert_eq!(chunk.children()[0].tag(), "INAM");
//! # Ok::<(), riffscope_lib::Error>(())
//! ```

pub mod chunk;
pub mod stream;
pub mod summary;

pub use chunk::{read_chunks, Chunk, DataChunk, ListChunk};
pub use stream::ChunkReader;
pub use summary::ChunkSummary;

use crate::error::{Error, Result};
use crate::io::DataSlice;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Tag of a top-level RIFF container
pub const RIFF_TAG: Tag = Tag::new(*b"RIFF");
/// Tag of a nested list container
pub const LIST_TAG: Tag = Tag::new(*b"LIST");

/// A four-character chunk tag
///
/// The raw 4 bytes are kept as read. The logical name stops at the first
/// NUL byte, so `b"R\0\0\0"` names the tag `"R"`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag([u8; 4]);

impl Tag {
    /// Create a tag from its raw bytes
    pub const fn new(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }

    /// Read a tag from the cursor, always consuming exactly 4 bytes
    pub fn read_from(slice: &mut dyn DataSlice) -> Result<Self> {
        let mut bytes = [0u8; 4];
        slice.copy_into(&mut bytes)?;
        Ok(Tag(bytes))
    }

    /// Raw tag bytes
    pub fn bytes(&self) -> [u8; 4] {
        self.0
    }

    /// Logical name: the bytes up to the first NUL
    pub fn as_str(&self) -> Cow<'_, str> {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(4);
        String::from_utf8_lossy(&self.0[..end])
    }

    /// Whether chunks with this tag hold nested chunks (`RIFF` or `LIST`)
    pub fn is_container(&self) -> bool {
        *self == RIFF_TAG || *self == LIST_TAG
    }
}

impl From<[u8; 4]> for Tag {
    fn from(bytes: [u8; 4]) -> Self {
        Tag(bytes)
    }
}

impl From<&[u8; 4]> for Tag {
    fn from(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }
}

impl FromStr for Tag {
    type Err = Error;

    /// Parse up to 4 bytes of text, padding short names with NUL
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || s.len() > 4 {
            return Err(Error::invalid_input(format!(
                "chunk tag must be 1 to 4 bytes, got {:?}",
                s
            )));
        }
        let mut bytes = [0u8; 4];
        bytes[..s.len()].copy_from_slice(s.as_bytes());
        Ok(Tag(bytes))
    }
}

impl PartialEq<str> for Tag {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Tag {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({:?})", self.as_str())
    }
}
