//! Binary trace container.
//!
//! ```text
//! [Header: 16 bytes][bincode(EventStore)][CRC64(body): u64 LE]
//! ```
//!
//! Header: magic `TRCK`, version u32 (1), event count u64. All little-endian.

use crate::error::{Result, TraceFileError};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest;
use memmap2::Mmap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracecheck::EventStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub event_count: u64,
}

impl ContainerHeader {
    pub const SIZE: usize = 4 + 4 + 8; // 16 bytes
    pub const MAGIC: [u8; 4] = *b"TRCK";
    pub const VERSION: u32 = 1;

    pub fn new(event_count: u64) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            event_count,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.magic)?;
        writer.write_u32::<LittleEndian>(self.version)?;
        writer.write_u64::<LittleEndian>(self.event_count)?;
        Ok(())
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != Self::MAGIC {
            return Err(TraceFileError::InvalidMagic);
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != Self::VERSION {
            return Err(TraceFileError::UnsupportedVersion(version));
        }
        let event_count = reader.read_u64::<LittleEndian>()?;

        Ok(Self {
            magic,
            version,
            event_count,
        })
    }
}

pub fn compute_crc64(data: &[u8]) -> u64 {
    let mut digest = Digest::new();
    digest.write(data);
    digest.sum64()
}

pub fn encode(store: &EventStore) -> Result<Vec<u8>> {
    let body = bincode::serde::encode_to_vec(store, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(ContainerHeader::SIZE + body.len() + 8);
    ContainerHeader::new(store.len() as u64).write_to(&mut buf)?;
    buf.extend_from_slice(&body);
    buf.write_u64::<LittleEndian>(compute_crc64(&body))?;
    Ok(buf)
}

/// Split a container into header and body, verifying the checksum.
pub fn verify(bytes: &[u8]) -> Result<(ContainerHeader, &[u8])> {
    if bytes.len() < ContainerHeader::SIZE + 8 {
        return Err(TraceFileError::Truncated(bytes.len()));
    }
    let header = ContainerHeader::read_from(&bytes[..ContainerHeader::SIZE])?;

    let (content, mut trailer) = bytes.split_at(bytes.len() - 8);
    let body = &content[ContainerHeader::SIZE..];
    let stored = trailer.read_u64::<LittleEndian>()?;
    let computed = compute_crc64(body);
    if stored != computed {
        return Err(TraceFileError::ChecksumMismatch {
            expected: stored,
            found: computed,
        });
    }
    Ok((header, body))
}

pub fn decode(bytes: &[u8]) -> Result<EventStore> {
    let (header, body) = verify(bytes)?;
    let (store, _): (EventStore, _) = bincode::serde::decode_from_slice(body, bincode::config::standard())?;
    if store.len() as u64 != header.event_count {
        return Err(TraceFileError::CountMismatch {
            expected: header.event_count,
            found: store.len() as u64,
        });
    }
    store.validate()?;
    Ok(store)
}

pub fn write_store(path: impl AsRef<Path>, store: &EventStore) -> Result<()> {
    let bytes = encode(store)?;
    let mut file = File::create(path)?;
    file.write_all(&bytes)?;
    file.sync_data()?;
    Ok(())
}

pub fn read_store(path: impl AsRef<Path>) -> Result<EventStore> {
    let file = File::open(path)?;
    // Read-only mapping; the file is not modified while the store is decoded.
    let mmap = unsafe { Mmap::map(&file)? };
    decode(&mmap)
}

pub fn read_header(path: impl AsRef<Path>) -> Result<ContainerHeader> {
    let file = File::open(path)?;
    ContainerHeader::read_from(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracecheck::scenario::sample::{subscription_trace, Variant};

    #[test]
    fn test_header_serialization() {
        let header = ContainerHeader::new(42);
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        assert_eq!(bytes.len(), ContainerHeader::SIZE);

        let decoded = ContainerHeader::read_from(&bytes[..]).unwrap();
        assert_eq!(header, decoded);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = [0u8; ContainerHeader::SIZE];
        bytes[0..4].copy_from_slice(b"BADM");
        let result = ContainerHeader::read_from(&bytes[..]);
        assert!(matches!(result, Err(TraceFileError::InvalidMagic)));
    }

    #[test]
    fn test_store_survives_container() {
        let store = subscription_trace("c", Variant::Valid).unwrap();
        let bytes = encode(&store).unwrap();
        assert_eq!(decode(&bytes).unwrap(), store);
    }

    #[test]
    fn test_corruption_detected() {
        let store = subscription_trace("c", Variant::Valid).unwrap();
        let mut bytes = encode(&store).unwrap();
        let mid = ContainerHeader::SIZE + 3;
        bytes[mid] ^= 0xff;
        assert!(matches!(decode(&bytes), Err(TraceFileError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(decode(b"TRCK"), Err(TraceFileError::Truncated(4))));
    }

    #[test]
    fn test_unsupported_version() {
        let store = subscription_trace("c", Variant::Valid).unwrap();
        let mut bytes = encode(&store).unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(decode(&bytes), Err(TraceFileError::UnsupportedVersion(2))));
    }
}
