//! Error types for riffscope

use thiserror::Error;

/// Result type alias for riffscope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for riffscope
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Seek, read or slice request outside the valid region of a slice
    #[error("Out of bounds: {len} byte(s) at offset {offset}, only {available} available")]
    OutOfBounds { offset: u64, len: u64, available: u64 },

    /// Source ended before the requested number of bytes was available
    #[error("Truncated: need {need} byte(s), have {have}")]
    Truncated { need: u64, have: u64 },

    /// File handle closed or otherwise inaccessible
    #[error("Backing store unavailable: {0}")]
    BackingUnavailable(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

impl Error {
    /// Create an out-of-bounds error
    pub fn out_of_bounds(offset: u64, len: u64, available: u64) -> Self {
        Error::OutOfBounds {
            offset,
            len,
            available,
        }
    }

    /// Create a truncation error
    pub fn truncated(need: u64, have: u64) -> Self {
        Error::Truncated { need, have }
    }

    /// Create a backing-unavailable error
    pub fn backing_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::BackingUnavailable(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// Whether this error is a bounds violation
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Error::OutOfBounds { .. })
    }

    /// Whether this error reports a source that ended early
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;

        match err {
            Error::Io(e) => e,
            Error::Truncated { .. } => std::io::Error::new(ErrorKind::UnexpectedEof, err),
            Error::OutOfBounds { .. } | Error::InvalidInput(_) => {
                std::io::Error::new(ErrorKind::InvalidInput, err)
            }
            other => std::io::Error::new(ErrorKind::Other, other),
        }
    }
}
