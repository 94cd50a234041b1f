// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! tracecheck: correlation and invariant validation over recorded instrumentation traces.
//!
//! An [`store::EventStore`] holds the ordered events of one recorded session.
//! [`query`] narrows it into views, [`assert`] checks invariants over those
//! views, and [`case`] runs a whole fail-fast sequence of checks against a
//! session obtained from a [`case::SessionRecorder`].

pub mod config;
pub mod error;
pub mod event;
pub mod store;
pub mod query;
pub mod assert;
pub mod case;
pub mod plan;
pub mod scenario;
pub mod digest;

pub use error::{CheckError, CheckResult, EventError};
pub use event::{EventRecord, FieldKind, FieldValue};
pub use store::{EventStore, Events};

#[cfg(test)]
pub mod tests;
