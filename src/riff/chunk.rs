//! Chunk nodes and recursive list parsing

use super::Tag;
use crate::error::Result;
use crate::io::{BoxedSlice, ByteOrder, DataSlice};
use tracing::debug;

/// A leaf chunk: a tag and an opaque payload
#[derive(Debug)]
pub struct DataChunk {
    tag: Tag,
    payload: BoxedSlice,
}

impl DataChunk {
    /// Store the tag and payload as given
    pub fn new(tag: Tag, payload: BoxedSlice) -> Self {
        DataChunk { tag, payload }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn payload(&self) -> &dyn DataSlice {
        self.payload.as_ref()
    }

    /// Take ownership of the payload slice
    pub fn into_payload(self) -> BoxedSlice {
        self.payload
    }
}

/// A container chunk (`RIFF` or `LIST`) and its parsed children
#[derive(Debug)]
pub struct ListChunk {
    tag: Tag,
    list_type: Tag,
    payload: BoxedSlice,
    children: Vec<Chunk>,
}

impl ListChunk {
    /// Parse a container payload
    ///
    /// The payload is rewound and switched to little-endian, its first 4
    /// bytes become the list type, and the rest is parsed leniently with
    /// [`read_chunks`]. Only a payload too short for the list type is an
    /// error.
    pub fn new(tag: Tag, mut payload: BoxedSlice) -> Result<Self> {
        payload.reset()?;
        payload.set_byte_order(ByteOrder::LittleEndian);
        let list_type = Tag::read_from(payload.as_mut())?;
        let children = read_chunks(payload.as_mut());

        Ok(ListChunk {
            tag,
            list_type,
            payload,
            children,
        })
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The 4-byte type at the start of the payload, e.g. `WAVE` or `INFO`
    pub fn list_type(&self) -> Tag {
        self.list_type
    }

    /// The whole payload, list type included
    pub fn payload(&self) -> &dyn DataSlice {
        self.payload.as_ref()
    }

    pub fn children(&self) -> &[Chunk] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Chunk> {
        self.children
    }
}

/// A node of a chunk tree
#[derive(Debug)]
pub enum Chunk {
    Data(DataChunk),
    List(ListChunk),
}

impl Chunk {
    /// Build a node for `tag`, descending into container tags
    pub fn parse(tag: Tag, payload: BoxedSlice) -> Result<Self> {
        if tag.is_container() {
            Ok(Chunk::List(ListChunk::new(tag, payload)?))
        } else {
            Ok(Chunk::Data(DataChunk::new(tag, payload)))
        }
    }

    pub fn tag(&self) -> Tag {
        match self {
            Chunk::Data(chunk) => chunk.tag(),
            Chunk::List(chunk) => chunk.tag(),
        }
    }

    pub fn payload(&self) -> &dyn DataSlice {
        match self {
            Chunk::Data(chunk) => chunk.payload(),
            Chunk::List(chunk) => chunk.payload(),
        }
    }

    /// Payload length in bytes
    pub fn size(&self) -> Result<u64> {
        self.payload().len()
    }

    /// A fresh view over the payload with its own cursor at 0
    pub fn open_payload(&self) -> Result<BoxedSlice> {
        let payload = self.payload();
        payload.slice(0, payload.len()?)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Chunk::List(_))
    }

    pub fn as_list(&self) -> Option<&ListChunk> {
        match self {
            Chunk::List(chunk) => Some(chunk),
            Chunk::Data(_) => None,
        }
    }

    pub fn list_type(&self) -> Option<Tag> {
        self.as_list().map(ListChunk::list_type)
    }

    /// Child chunks; empty for leaf chunks
    pub fn children(&self) -> &[Chunk] {
        match self {
            Chunk::List(chunk) => chunk.children(),
            Chunk::Data(_) => &[],
        }
    }

    /// Whether `tag` names this chunk, by its own tag or by its list type
    pub fn matches(&self, tag: Tag) -> bool {
        self.tag() == tag || self.list_type() == Some(tag)
    }

    /// First direct child matching `tag`
    pub fn find(&self, tag: Tag) -> Option<&Chunk> {
        self.children().iter().find(|child| child.matches(tag))
    }

    /// Follow a path of tags down from this chunk
    pub fn find_path(&self, path: &[Tag]) -> Option<&Chunk> {
        path.iter().try_fold(self, |chunk, &tag| chunk.find(tag))
    }

    /// Depth-first traversal yielding `(depth, chunk)`, starting with `self` at depth 0
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(0, self)],
        }
    }
}

/// Depth-first iterator over a chunk tree
pub struct Iter<'a> {
    stack: Vec<(usize, &'a Chunk)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Chunk);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, chunk) = self.stack.pop()?;
        self.stack
            .extend(chunk.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, chunk))
    }
}

/// Parse consecutive chunks from the cursor to the end of `slice`
///
/// Sizes are read in the slice's current byte order. Parsing stops quietly
/// at the first header, payload or nested list that cannot be read; the
/// chunks collected up to that point are returned and the rest is dropped.
pub fn read_chunks(slice: &mut dyn DataSlice) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    loop {
        match slice.has_remaining() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                debug!(error = %err, "stopping chunk list: length unavailable");
                break;
            }
        }

        let offset = slice.position();
        match read_chunk(slice) {
            Ok(chunk) => chunks.push(chunk),
            Err(err) => {
                debug!(
                    offset,
                    parsed = chunks.len(),
                    error = %err,
                    "dropping malformed chunk data"
                );
                break;
            }
        }
    }

    chunks
}

fn read_chunk(slice: &mut dyn DataSlice) -> Result<Chunk> {
    let tag = Tag::read_from(slice)?;
    let size = slice.read_u32()?;
    let payload = slice.slice_next(u64::from(size))?;
    Chunk::parse(tag, payload)
}
