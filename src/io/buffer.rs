//! Slices over in-memory buffers

use super::{check_range, BoxedSlice, ByteOrder, DataSlice};
use crate::error::{Error, Result};
use bytes::Bytes;

/// A slice backed by a reference-counted byte buffer
///
/// The [`Bytes`] handle is itself the base-offset/length window, so
/// sub-slicing shares the same allocation.
#[derive(Debug, Clone)]
pub struct BufferSlice {
    data: Bytes,
    position: u64,
    byte_order: ByteOrder,
}

impl BufferSlice {
    /// Create a new slice over the given bytes
    pub fn new(data: Bytes) -> Self {
        BufferSlice {
            data,
            position: 0,
            byte_order: ByteOrder::BigEndian,
        }
    }

    /// Create a slice from a vector
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Self::new(Bytes::from(vec))
    }

    /// Create a slice over static data
    pub fn from_static(data: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(data))
    }

    /// Create an empty slice
    pub fn empty() -> Self {
        Self::new(Bytes::new())
    }

    /// The bytes covered by this slice (cheap, reference counted)
    pub fn as_bytes(&self) -> &Bytes {
        &self.data
    }

    /// Zero-copy sub-slice that keeps the concrete buffer type
    pub fn sub_slice(&self, offset: u64, length: u64) -> Result<BufferSlice> {
        check_range(offset, length, self.data.len() as u64)?;
        let start = offset as usize;
        let end = start + length as usize;

        Ok(BufferSlice {
            data: self.data.slice(start..end),
            position: 0,
            byte_order: self.byte_order,
        })
    }

    fn byte_len(&self) -> u64 {
        self.data.len() as u64
    }
}

impl Default for BufferSlice {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<u8>> for BufferSlice {
    fn from(vec: Vec<u8>) -> Self {
        Self::from_vec(vec)
    }
}

impl From<Bytes> for BufferSlice {
    fn from(data: Bytes) -> Self {
        Self::new(data)
    }
}

impl DataSlice for BufferSlice {
    fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.byte_len() {
            return Err(Error::out_of_bounds(offset, 0, self.byte_len()));
        }
        self.position = offset;
        Ok(())
    }

    fn read(&mut self) -> Result<u8> {
        let value = self.read_at(self.position)?;
        self.position += 1;
        Ok(value)
    }

    fn read_at(&self, offset: u64) -> Result<u8> {
        usize::try_from(offset)
            .ok()
            .and_then(|index| self.data.get(index).copied())
            .ok_or_else(|| Error::out_of_bounds(offset, 1, self.byte_len().saturating_sub(offset)))
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn len(&self) -> Result<u64> {
        Ok(self.byte_len())
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    fn slice(&self, offset: u64, length: u64) -> Result<BoxedSlice> {
        Ok(Box::new(self.sub_slice(offset, length)?))
    }
}
