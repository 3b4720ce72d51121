//! riffscope - random-access byte slices and RIFF chunk parsing
//!
//! riffscope reads binary containers through a single cursor abstraction
//! that can sit on top of an in-memory buffer, a random-access file or a
//! window into another slice, and builds chunk trees for RIFF-family
//! formats (WAV, AVI, WebP and friends) on top of it.
//!
//! # Architecture
//!
//! - `io`: the `DataSlice` trait with buffer, file and view backings
//! - `riff`: chunk tags, the lenient nested-list parser, the sequential
//!   top-level reader and printable summaries
//! - `error`: the shared error type

pub mod error;
pub mod io;
pub mod riff;

pub use error::{Error, Result};

/// riffscope version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Configuration for the riffscope library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize the riffscope library with the given configuration
///
/// Installs a global tracing subscriber writing to stderr when either flag
/// is set. Installing a second subscriber in the same process fails with
/// [`Error::Init`].
pub fn init(config: Config) -> Result<()> {
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt()
            .with_env_filter(level)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| Error::Init(format!("Failed to initialize logging: {}", e)))?;
    }

    Ok(())
}
