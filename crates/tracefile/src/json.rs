use crate::error::Result;
use std::fs;
use std::path::Path;
use tracecheck::EventStore;

/// Parse a JSON trace and re-check record invariants.
pub fn from_str(json: &str) -> Result<EventStore> {
    let store: EventStore = serde_json::from_str(json)?;
    store.validate()?;
    Ok(store)
}

pub fn read_store(path: impl AsRef<Path>) -> Result<EventStore> {
    let json = fs::read_to_string(path)?;
    from_str(&json)
}

pub fn write_store(path: impl AsRef<Path>, store: &EventStore) -> Result<()> {
    let json = serde_json::to_string_pretty(store)?;
    fs::write(path, json)?;
    Ok(())
}
