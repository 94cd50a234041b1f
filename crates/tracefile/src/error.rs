use thiserror::Error;
use std::io;
use tracecheck::EventError;

#[derive(Error, Debug)]
pub enum TraceFileError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported container version: {0}")]
    UnsupportedVersion(u32),
    #[error("Checksum mismatch: expected {expected:016x}, found {found:016x}")]
    ChecksumMismatch {
        expected: u64,
        found: u64,
    },
    #[error("Event count mismatch: header says {expected}, body holds {found}")]
    CountMismatch {
        expected: u64,
        found: u64,
    },
    #[error("Truncated container: {0} bytes")]
    Truncated(usize),
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Invalid event: {0}")]
    InvalidEvent(#[from] EventError),
    #[error("Unknown trace format: {0}")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, TraceFileError>;
