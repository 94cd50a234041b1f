// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event records: the atomic unit of a recorded trace.
//!
//! # Invariants
//! - `name` is never empty
//! - field keys are unique within a record
//! - records are immutable once built

use crate::error::{CheckError, EventError};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single typed field value.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Int(i64),
    Str(String),
    /// Pointer-sized opaque identity (object address, resource id).
    Handle(u64),
}

/// Shape of a [`FieldValue`], used in type diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int,
    Str,
    Handle,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Int => "integer",
            FieldKind::Str => "string",
            FieldKind::Handle => "handle",
        }
    }
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Int(_) => FieldKind::Int,
            FieldValue::Str(_) => FieldKind::Str,
            FieldValue::Handle(_) => FieldKind::Handle,
        }
    }

    /// Numeric value as a wide signed integer, if the value is numeric.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            FieldValue::Int(v) => Some(*v as i128),
            FieldValue::Handle(v) => Some(*v as i128),
            FieldValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Identity equality used for correlation.
    ///
    /// Integers and handles denoting the same number refer to the same
    /// object; strings compare by content; a string never matches a number.
    pub fn same_identity(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Str(a), FieldValue::Str(b)) => a == b,
            (FieldValue::Str(_), _) | (_, FieldValue::Str(_)) => false,
            _ => self.as_integer() == other.as_integer(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Str(s) => write!(f, "{:?}", s),
            FieldValue::Handle(h) => write!(f, "0x{:x}", h),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

/// One instrumentation-point observation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    name: String,
    /// Monotonic capture time in nanoseconds.
    timestamp: u64,
    process_identity: String,
    #[serde(deserialize_with = "unique_fields")]
    fields: BTreeMap<String, FieldValue>,
}

/// Field map deserializer that rejects a repeated key instead of keeping the last value.
fn unique_fields<'de, D>(deserializer: D) -> Result<BTreeMap<String, FieldValue>, D::Error>
where
    D: Deserializer<'de>,
{
    struct UniqueFields;

    impl<'de> Visitor<'de> for UniqueFields {
        type Value = BTreeMap<String, FieldValue>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of uniquely keyed field values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut fields = BTreeMap::new();
            while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                if fields.contains_key(&key) {
                    return Err(de::Error::custom(EventError::DuplicateField(key)));
                }
                fields.insert(key, value);
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(UniqueFields)
}

impl EventRecord {
    /// Start building a record. Fails on an empty name.
    pub fn builder(name: impl Into<String>, timestamp: u64) -> Result<EventBuilder, EventError> {
        let name = name.into();
        if name.is_empty() {
            return Err(EventError::EmptyName);
        }
        Ok(EventBuilder {
            record: EventRecord {
                name,
                timestamp,
                process_identity: String::new(),
                fields: BTreeMap::new(),
            },
        })
    }

    /// Re-check record invariants after deserialization.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.name.is_empty() {
            return Err(EventError::EmptyName);
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn process_identity(&self) -> &str {
        &self.process_identity
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Field lookup that reports a missing field as a check failure.
    pub fn field(&self, field: &str) -> Result<&FieldValue, CheckError> {
        self.fields.get(field).ok_or_else(|| CheckError::FieldMissing {
            field: field.to_string(),
            record: Box::new(self.clone()),
        })
    }
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @{}ns [{}]", self.name, self.timestamp, self.process_identity)?;
        let mut first = true;
        for (k, v) in &self.fields {
            write!(f, "{}{}={}", if first { " " } else { ", " }, k, v)?;
            first = false;
        }
        Ok(())
    }
}

/// Builder enforcing unique field keys.
#[derive(Debug)]
pub struct EventBuilder {
    record: EventRecord,
}

impl EventBuilder {
    pub fn process(mut self, identity: impl Into<String>) -> Self {
        self.record.process_identity = identity.into();
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Result<Self, EventError> {
        let key = key.into();
        if self.record.fields.contains_key(&key) {
            return Err(EventError::DuplicateField(key));
        }
        self.record.fields.insert(key, value.into());
        Ok(self)
    }

    pub fn handle(self, key: impl Into<String>, value: u64) -> Result<Self, EventError> {
        self.field(key, FieldValue::Handle(value))
    }

    pub fn build(self) -> EventRecord {
        self.record
    }
}
