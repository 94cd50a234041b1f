pub mod error;
pub mod json;
pub mod container;
pub mod dir;
pub mod fixtures;

pub use dir::TraceDir;
pub use error::{Result, TraceFileError};

use std::path::Path;
use tracecheck::EventStore;

/// On-disk encodings of an [`EventStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Pretty-printed JSON (`.json`).
    Json,
    /// Checksummed binary container (`.trace`).
    Container,
}

impl Format {
    pub const EXTENSIONS: [&'static str; 2] = ["json", "trace"];

    /// Pick the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("trace") => Ok(Format::Container),
            _ => Err(TraceFileError::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Container => "trace",
        }
    }
}

/// Read a store, choosing the decoder by extension.
pub fn load(path: impl AsRef<Path>) -> Result<EventStore> {
    let path = path.as_ref();
    match Format::from_path(path)? {
        Format::Json => json::read_store(path),
        Format::Container => container::read_store(path),
    }
}

/// Write a store, choosing the encoder by extension.
pub fn save(path: impl AsRef<Path>, store: &EventStore) -> Result<()> {
    let path = path.as_ref();
    match Format::from_path(path)? {
        Format::Json => json::write_store(path, store),
        Format::Container => container::write_store(path, store),
    }
}
