//! Slices over random-access files
//!
//! A [`FileSlice`] keeps a logical cursor that is independent of the OS-level
//! file position. Bytes are fetched through a small read-ahead window shared
//! by the slice and all of its views. Every refill of that window asks the
//! handle where its position really is and seeks only when it differs from
//! the requested offset, so a caller moving the handle's offset through a
//! cloned descriptor never shifts what gets read.

use super::{check_range, BoxedSlice, ByteOrder, DataSlice, ViewSlice};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// Bytes fetched from the handle per refill
const READ_AHEAD: usize = 8 * 1024;

/// A random-access byte store usable as the root of a [`FileSlice`]
pub trait RandomAccessFile: Read + Seek + Send {
    /// Current size of the store in bytes, queried fresh on every call
    fn current_size(&mut self) -> io::Result<u64>;
}

impl RandomAccessFile for File {
    fn current_size(&mut self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl<T: AsRef<[u8]> + Send> RandomAccessFile for Cursor<T> {
    fn current_size(&mut self) -> io::Result<u64> {
        Ok(self.get_ref().as_ref().len() as u64)
    }
}

fn closed() -> Error {
    Error::backing_unavailable("file handle has been closed")
}

/// Handle shared between a file slice and every view derived from it
struct FileState {
    handle: Option<Box<dyn RandomAccessFile>>,
    /// Bytes last read from the handle, starting at `window_start`
    window: Vec<u8>,
    window_start: u64,
}

impl FileState {
    fn new(handle: Box<dyn RandomAccessFile>) -> Self {
        FileState {
            handle: Some(handle),
            window: Vec::new(),
            window_start: 0,
        }
    }

    fn handle(&mut self) -> Result<&mut Box<dyn RandomAccessFile>> {
        self.handle.as_mut().ok_or_else(closed)
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.handle()?.current_size()?)
    }

    fn buffered(&self, offset: u64) -> Option<u8> {
        let index = usize::try_from(offset.checked_sub(self.window_start)?).ok()?;
        self.window.get(index).copied()
    }

    /// Replace the window with up to `READ_AHEAD` bytes starting at `offset`
    fn refill(&mut self, offset: u64) -> Result<()> {
        self.window.clear();
        let handle = self.handle.as_mut().ok_or_else(closed)?;

        let actual = handle.stream_position()?;
        if actual != offset {
            trace!(from = actual, to = offset, "seeking file handle");
            handle.seek(SeekFrom::Start(offset))?;
        }

        self.window.resize(READ_AHEAD, 0);
        let mut filled = 0;
        while filled < READ_AHEAD {
            match handle.read(&mut self.window[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.window.clear();
                    return Err(e.into());
                }
            }
        }
        self.window.truncate(filled);
        self.window_start = offset;
        Ok(())
    }

    fn read_byte(&mut self, offset: u64) -> Result<u8> {
        self.handle()?;
        if let Some(byte) = self.buffered(offset) {
            return Ok(byte);
        }

        self.refill(offset)?;
        if let Some(byte) = self.buffered(offset) {
            return Ok(byte);
        }

        let size = self.size()?;
        if offset >= size {
            Err(Error::out_of_bounds(offset, 1, size.saturating_sub(offset)))
        } else {
            Err(Error::truncated(1, 0))
        }
    }

    fn close(&mut self) {
        self.handle.take();
        self.window = Vec::new();
    }
}

/// A slice backed by a random-access file handle
///
/// The caller keeps responsibility for the handle's lifetime: it stays open
/// until [`DataSlice::close`] is called on this slice or the last slice
/// sharing it is dropped. Sub-slices are [`ViewSlice`]s over this file.
pub struct FileSlice {
    state: Arc<Mutex<FileState>>,
    position: u64,
    byte_order: ByteOrder,
}

impl FileSlice {
    /// Wrap an already opened handle
    pub fn new<F: RandomAccessFile + 'static>(file: F) -> Self {
        FileSlice {
            state: Arc::new(Mutex::new(FileState::new(Box::new(file)))),
            position: 0,
            byte_order: ByteOrder::BigEndian,
        }
    }

    /// Open a file for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(file))
    }

    /// Whether the underlying handle has been released
    pub fn is_closed(&self) -> bool {
        self.state.lock().handle.is_none()
    }

    /// Another slice over the same handle, used as the target of views
    fn share(&self) -> FileSlice {
        FileSlice {
            state: Arc::clone(&self.state),
            position: 0,
            byte_order: self.byte_order,
        }
    }
}

impl fmt::Debug for FileSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSlice")
            .field("position", &self.position)
            .field("byte_order", &self.byte_order)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl DataSlice for FileSlice {
    fn seek(&mut self, offset: u64) -> Result<()> {
        let size = self.len()?;
        if offset > size {
            return Err(Error::out_of_bounds(offset, 0, size));
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
        self.state.lock().read_byte(offset)
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn len(&self) -> Result<u64> {
        self.state.lock().size()
    }

    fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    fn set_byte_order(&mut self, order: ByteOrder) {
        self.byte_order = order;
    }

    fn slice(&self, offset: u64, length: u64) -> Result<BoxedSlice> {
        check_range(offset, length, self.len()?)?;
        Ok(Box::new(ViewSlice::new(
            Arc::new(self.share()),
            offset,
            length,
            self.byte_order,
        )))
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().close();
        self.position = 0;
        Ok(())
    }
}
