// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use crate::event::{EventRecord, FieldValue};
use thiserror::Error;

/// Rejected record construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event name must not be empty")]
    EmptyName,
    #[error("Duplicate field key: {0}")]
    DuplicateField(String),
}

/// Cardinality, coverage, ordering or equality mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionFailure {
    pub message: String,
    pub records: Vec<EventRecord>,
}

/// A failed check. Every variant carries the offending record(s).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    /// Query touched a field the record does not have (schema error).
    #[error("Field '{field}' missing on {}", .record.name())]
    FieldMissing {
        field: String,
        record: Box<EventRecord>,
    },

    #[error("Invalid handle in '{field}' of {}: {value}", .record.name())]
    InvalidHandle {
        field: String,
        value: FieldValue,
        record: Box<EventRecord>,
    },

    #[error("Invalid value in '{field}' of {}: expected {expected}, found {value}", .record.name())]
    InvalidValue {
        field: String,
        expected: &'static str,
        value: FieldValue,
        record: Box<EventRecord>,
    },

    #[error("{}", .0.message)]
    Assertion(AssertionFailure),
}

impl CheckError {
    pub fn assertion(message: impl Into<String>, records: Vec<EventRecord>) -> Self {
        CheckError::Assertion(AssertionFailure {
            message: message.into(),
            records,
        })
    }

    /// Records the failure is about.
    pub fn records(&self) -> Vec<&EventRecord> {
        match self {
            CheckError::FieldMissing { record, .. }
            | CheckError::InvalidHandle { record, .. }
            | CheckError::InvalidValue { record, .. } => vec![record.as_ref()],
            CheckError::Assertion(failure) => failure.records.iter().collect(),
        }
    }
}

pub type CheckResult<T> = std::result::Result<T, CheckError>;
