//! Random-access data slices
//!
//! A [`DataSlice`] is a bounded, byte-addressable region with its own read
//! cursor and byte order. Three backings implement it:
//!
//! - [`BufferSlice`]: an in-memory [`bytes::Bytes`] window
//! - [`FileSlice`]: a random-access file handle
//! - [`ViewSlice`]: a zero-copy window into any other slice
//!
//! Sub-slicing never copies backing bytes, and every slice keeps its own
//! cursor and byte order, so sibling views never disturb each other.
//!
//! ```rust
//! use riffscope_lib::io::{BufferSlice, ByteOrder, DataSlice};
//!
//! let mut slice = BufferSlice::from_vec(vec![0x01, 0x02, 0x03, 0x04]);
//! assert_eq!(slice.read_u32()?, 0x0102_0304);
//!
//! slice.reset()?;
//! slice.set_byte_order(ByteOrder::LittleEndian);
//! assert_eq!(slice.read_u32()?, 0x0403_0201);
//! # Ok::<(), riffscope_lib::Error>(())
//! ```

pub mod buffer;
pub mod file;
pub mod view;

pub use buffer::BufferSlice;
pub use file::{FileSlice, RandomAccessFile};
pub use view::ViewSlice;

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder as Endian, LittleEndian};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom};

/// An owned, type-erased slice
pub type BoxedSlice = Box<dyn DataSlice>;

/// Byte order used to assemble multi-byte reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Most significant byte first
    #[default]
    BigEndian,
    /// Least significant byte first
    LittleEndian,
}

impl ByteOrder {
    /// Decode a `u16` from the first two bytes of `buf`
    pub fn decode_u16(self, buf: &[u8]) -> u16 {
        match self {
            ByteOrder::BigEndian => BigEndian::read_u16(buf),
            ByteOrder::LittleEndian => LittleEndian::read_u16(buf),
        }
    }

    /// Decode a `u32` from the first four bytes of `buf`
    pub fn decode_u32(self, buf: &[u8]) -> u32 {
        match self {
            ByteOrder::BigEndian => BigEndian::read_u32(buf),
            ByteOrder::LittleEndian => LittleEndian::read_u32(buf),
        }
    }

    /// Decode a `u64` from the first eight bytes of `buf`
    pub fn decode_u64(self, buf: &[u8]) -> u64 {
        match self {
            ByteOrder::BigEndian => BigEndian::read_u64(buf),
            ByteOrder::LittleEndian => LittleEndian::read_u64(buf),
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::BigEndian => write!(f, "big-endian"),
            ByteOrder::LittleEndian => write!(f, "little-endian"),
        }
    }
}

/// Common read interface shared by every slice backing
///
/// Offsets are relative to the start of the slice. Every access outside
/// `[0, len)` fails with [`Error::OutOfBounds`]; nothing is clamped.
pub trait DataSlice: fmt::Debug + Send + Sync {
    /// Move the cursor to `offset`. Seeking to exactly `len` is allowed.
    fn seek(&mut self, offset: u64) -> Result<()>;

    /// Read the byte at the cursor and advance the cursor by one
    fn read(&mut self) -> Result<u8>;

    /// Read the byte at an absolute offset without moving the cursor
    fn read_at(&self, offset: u64) -> Result<u8>;

    /// Current cursor position
    fn position(&self) -> u64;

    /// Total length in bytes
    fn len(&self) -> Result<u64>;

    /// Whether the slice holds no bytes at all
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Byte order used for multi-byte reads
    fn byte_order(&self) -> ByteOrder;

    /// Set the byte order for subsequent multi-byte reads on this slice only
    fn set_byte_order(&mut self, order: ByteOrder);

    /// Zero-copy sub-view over `[offset, offset + length)`
    ///
    /// The returned slice starts with this slice's byte order; later
    /// changes on either side do not propagate. The cursor of `self` is
    /// not moved.
    fn slice(&self, offset: u64, length: u64) -> Result<BoxedSlice>;

    /// Release the backing store. Only meaningful for file-backed roots.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Restore the cursor to 0 and the byte order to big-endian
    fn reset(&mut self) -> Result<()> {
        self.seek(0)?;
        self.set_byte_order(ByteOrder::BigEndian);
        Ok(())
    }

    /// Advance the cursor by `count` bytes
    fn skip(&mut self, count: u64) -> Result<()> {
        let position = self.position();
        let target = position
            .checked_add(count)
            .ok_or_else(|| Error::out_of_bounds(position, count, self.remaining().unwrap_or(0)))?;
        self.seek(target)
    }

    /// Bytes between the cursor and the end of the slice
    fn remaining(&self) -> Result<u64> {
        Ok(self.len()?.saturating_sub(self.position()))
    }

    /// Whether any unread bytes remain
    fn has_remaining(&self) -> Result<bool> {
        Ok(self.remaining()? > 0)
    }

    /// Sub-view of `length` bytes starting at the cursor; the cursor moves
    /// past the sliced region as if the bytes had been read.
    fn slice_next(&mut self, length: u64) -> Result<BoxedSlice> {
        let start = self.position();
        let sub = self.slice(start, length)?;
        self.seek(start + length)?;
        Ok(sub)
    }

    /// Read exactly `dest.len()` bytes from the cursor
    ///
    /// Either the whole region is filled and the cursor advances, or an
    /// error is returned with `dest` and the cursor left untouched.
    fn copy_into(&mut self, dest: &mut [u8]) -> Result<()> {
        let start = self.position();
        let need = dest.len() as u64;
        let available = self.remaining()?;
        if need > available {
            return Err(Error::out_of_bounds(start, need, available));
        }

        let mut scratch = vec![0u8; dest.len()];
        fill(self, &mut scratch)?;
        dest.copy_from_slice(&scratch);
        Ok(())
    }

    /// Copy `length` bytes starting at `offset` into a new, detached buffer slice
    fn copy_out(&self, offset: u64, length: u64) -> Result<BufferSlice> {
        check_range(offset, length, self.len()?)?;

        let mut data = Vec::with_capacity(length as usize);
        for at in offset..offset + length {
            data.push(self.read_at(at)?);
        }
        Ok(BufferSlice::from_vec(data))
    }

    /// Read one byte; any non-zero value is `true`
    fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read()? != 0)
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.read()
    }

    fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read()? as i8)
    }

    fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        fill(self, &mut buf)?;
        Ok(self.byte_order().decode_u16(&buf))
    }

    fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        fill(self, &mut buf)?;
        Ok(self.byte_order().decode_u32(&buf))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    fn read_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        fill(self, &mut buf)?;
        Ok(self.byte_order().decode_u64(&buf))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(self.read_u64()? as i64)
    }

    /// Reinterprets the bits of a 32-bit integer read
    fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    /// Reinterprets the bits of a 64-bit integer read
    fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }
}

/// Fill `buf` with successive single-byte reads, rewinding the cursor if
/// any of them fails.
fn fill<S: DataSlice + ?Sized>(slice: &mut S, buf: &mut [u8]) -> Result<()> {
    let start = slice.position();
    for slot in buf.iter_mut() {
        match slice.read() {
            Ok(byte) => *slot = byte,
            Err(err) => {
                let _ = slice.seek(start);
                return Err(err);
            }
        }
    }
    Ok(())
}

/// Checks that `[offset, offset + length)` fits inside `total` bytes
pub(crate) fn check_range(offset: u64, length: u64, total: u64) -> Result<()> {
    match offset.checked_add(length) {
        Some(end) if end <= total => Ok(()),
        _ => Err(Error::out_of_bounds(
            offset,
            length,
            total.saturating_sub(offset),
        )),
    }
}

/// Adapts a slice's cursor to [`std::io::Read`] and [`std::io::Seek`]
///
/// Reads are clamped to the bytes left in the slice and return `Ok(0)` at
/// the end, so the slice can be handed to std or `byteorder` consumers.
pub struct SliceReader<'a> {
    slice: &'a mut dyn DataSlice,
}

impl<'a> SliceReader<'a> {
    /// Wrap a slice, reading from its current cursor
    pub fn new(slice: &'a mut dyn DataSlice) -> Self {
        SliceReader { slice }
    }

    /// Get the wrapped slice back
    pub fn into_inner(self) -> &'a mut dyn DataSlice {
        self.slice
    }
}

impl Read for SliceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.slice.remaining()?;
        let count = usize::try_from(remaining).map_or(buf.len(), |r| r.min(buf.len()));
        self.slice.copy_into(&mut buf[..count])?;
        Ok(count)
    }
}

impl Seek for SliceReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let (base, delta) = match pos {
            SeekFrom::Start(offset) => (0, offset as i128),
            SeekFrom::End(delta) => (self.slice.len()?, delta as i128),
            SeekFrom::Current(delta) => (self.slice.position(), delta as i128),
        };

        let target = u64::try_from(base as i128 + delta).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )
        })?;
        self.slice.seek(target)?;
        Ok(target)
    }
}
