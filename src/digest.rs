// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Deterministic trace fingerprints.

use crate::event::{EventRecord, FieldValue};
use crate::store::EventStore;

/// BLAKE3 hash of the store contents.
///
/// Covers session id, and every record's name, timestamp, process identity
/// and fields, in capture order. Strings are length-prefixed so that
/// `["ab", "c"]` and `["a", "bc"]` hash differently.
pub fn store_digest(store: &EventStore) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();

    update_str(&mut hasher, store.session());
    hasher.update(&(store.len() as u64).to_le_bytes());

    for record in store.records() {
        update_record(&mut hasher, record);
    }

    *hasher.finalize().as_bytes()
}

/// Hex form of [`store_digest`].
pub fn store_digest_hex(store: &EventStore) -> String {
    blake3::Hash::from(store_digest(store)).to_hex().to_string()
}

fn update_record(hasher: &mut blake3::Hasher, record: &EventRecord) {
    update_str(hasher, record.name());
    hasher.update(&record.timestamp().to_le_bytes());
    update_str(hasher, record.process_identity());

    // BTreeMap iteration: canonical key order
    for (key, value) in record.fields() {
        update_str(hasher, key);
        match value {
            FieldValue::Int(v) => {
                hasher.update(&[0]);
                hasher.update(&v.to_le_bytes());
            }
            FieldValue::Str(s) => {
                hasher.update(&[1]);
                update_str(hasher, s);
            }
            FieldValue::Handle(h) => {
                hasher.update(&[2]);
                hasher.update(&h.to_le_bytes());
            }
        }
    }
    hasher.update(&[0xff]); // record terminator
}

fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}
