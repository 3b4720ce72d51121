//! Zero-copy views into other slices

use super::{check_range, BoxedSlice, ByteOrder, DataSlice};
use crate::error::{Error, Result};
use std::sync::Arc;

/// A window of `length` bytes starting at `base` inside another slice
///
/// Every read is forwarded to the underlying slice's `read_at`, so views
/// nest to any depth with one offset translation per level. Closing a view
/// never closes what it points at.
#[derive(Debug, Clone)]
pub struct ViewSlice {
    underlying: Arc<dyn DataSlice>,
    base: u64,
    length: u64,
    position: u64,
    byte_order: ByteOrder,
}

impl ViewSlice {
    /// Create a view over `underlying`
    ///
    /// The range is taken as given; callers check it against the
    /// underlying length before constructing the view.
    pub(crate) fn new(underlying: Arc<dyn DataSlice>, base: u64, length: u64, byte_order: ByteOrder) -> Self {
        ViewSlice {
            underlying,
            base,
            length,
            position: 0,
            byte_order,
        }
    }

    /// Create a view over `[base, base + length)` of `underlying`, checking
    /// the range first
    pub fn over(underlying: Arc<dyn DataSlice>, base: u64, length: u64) -> Result<Self> {
        check_range(base, length, underlying.len()?)?;
        let byte_order = underlying.byte_order();
        Ok(Self::new(underlying, base, length, byte_order))
    }

    /// Offset of this view inside the slice it wraps
    pub fn base(&self) -> u64 {
        self.base
    }
}

impl DataSlice for ViewSlice {
    fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.length {
            return Err(Error::out_of_bounds(offset, 0, self.length));
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
        if offset >= self.length {
            return Err(Error::out_of_bounds(offset, 1, self.length.saturating_sub(offset)));
        }
        let absolute = self
            .base
            .checked_add(offset)
            .ok_or_else(|| Error::out_of_bounds(offset, 1, self.length - offset))?;
        self.underlying.read_at(absolute)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn len(&self) -> Result<u64> {
        Ok(self.length)
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    fn slice(&self, offset: u64, length: u64) -> Result<BoxedSlice> {
        check_range(offset, length, self.length)?;
        Ok(Box::new(ViewSlice::new(
            Arc::new(self.clone()),
            offset,
            length,
            self.byte_order,
        )))
    }
}
