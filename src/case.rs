// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Test Case orchestration.
//!
//! A case obtains the store for its session from a [`SessionRecorder`],
//! checks event coverage and process presence, then runs its correlation
//! checks. The first failing check ends the run and becomes the verdict.

use crate::assert;
use crate::config::CaseConfig;
use crate::digest::store_digest_hex;
use crate::error::{CheckError, CheckResult};
use crate::event::EventRecord;
use crate::store::{EventStore, Events};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("No recorded session matches '{0}'")]
    SessionNotFound(String),
    #[error("Invalid trace for session '{session}': {reason}")]
    InvalidTrace { session: String, reason: String },
    #[error("Recorder backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Source of recorded sessions.
pub trait SessionRecorder {
    /// Load the store for `session` (an exact identifier or a prefix).
    fn load(&self, session: &str) -> Result<EventStore, RecorderError>;
}

/// Recorder over stores already held in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    stores: BTreeMap<String, EventStore>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, store: EventStore) {
        self.stores.insert(store.session().to_string(), store);
    }
}

impl SessionRecorder for MemoryRecorder {
    fn load(&self, session: &str) -> Result<EventStore, RecorderError> {
        if let Some(store) = self.stores.get(session) {
            return Ok(store.clone());
        }
        // Prefix match: latest session name wins
        self.stores
            .iter()
            .rev()
            .find(|(name, _)| name.starts_with(session))
            .map(|(_, store)| store.clone())
            .ok_or_else(|| RecorderError::SessionNotFound(session.to_string()))
    }
}

/// What a scenario sees while checking.
pub struct CaseContext<'s> {
    pub config: &'s CaseConfig,
    pub store: &'s EventStore,
}

impl<'s> CaseContext<'s> {
    pub fn events(&self) -> Events<'s> {
        self.store.all()
    }

    pub fn named(&self, name: &str) -> Events<'s> {
        self.store.all().by_name(name)
    }
}

/// A test case: configuration plus domain-specific correlation checks.
pub trait Scenario {
    fn config(&self) -> &CaseConfig;

    /// Correlation checks, run after coverage has passed.
    fn check(&self, ctx: &CaseContext<'_>) -> CheckResult<()>;
}

/// The first violated invariant of a failed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub message: String,
    pub records: Vec<EventRecord>,
}

impl From<CheckError> for Failure {
    fn from(e: CheckError) -> Self {
        Self {
            message: e.to_string(),
            records: e.records().into_iter().cloned().collect(),
        }
    }
}

/// Outcome of one case run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub session: String,
    pub digest: String,
    pub events: usize,
    pub passed: bool,
    pub failure: Option<Failure>,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        let short: String = self.digest.chars().take(16).collect();
        writeln!(f, "{} {} ({} events, digest {})", status, self.session, self.events, short)?;
        if let Some(failure) = &self.failure {
            writeln!(f, "  {}", failure.message)?;
            for record in &failure.records {
                writeln!(f, "    {}", record)?;
            }
        }
        Ok(())
    }
}

/// Load the scenario's session from `recorder` and evaluate it.
pub fn run<S, R>(scenario: &S, recorder: &R) -> Result<Verdict, RecorderError>
where
    S: Scenario + ?Sized,
    R: SessionRecorder + ?Sized,
{
    let config = scenario.config();
    let store = recorder.load(&config.session)?;
    tracing::debug!(session = store.session(), events = store.len(), "session loaded");
    Ok(evaluate(scenario, &store))
}

/// Evaluate a scenario against an already loaded store.
pub fn evaluate<S: Scenario + ?Sized>(scenario: &S, store: &EventStore) -> Verdict {
    let config = scenario.config();
    let ctx = CaseContext { config, store };

    let outcome = preconditions(&ctx).and_then(|_| scenario.check(&ctx));

    let verdict = Verdict {
        session: store.session().to_string(),
        digest: store_digest_hex(store),
        events: store.len(),
        passed: outcome.is_ok(),
        failure: outcome.err().map(Failure::from),
    };

    match &verdict.failure {
        None => tracing::info!(session = %verdict.session, "case passed"),
        Some(failure) => tracing::info!(session = %verdict.session, reason = %failure.message, "case failed"),
    }
    verdict
}

fn preconditions(ctx: &CaseContext<'_>) -> CheckResult<()> {
    let all = ctx.events();
    assert::assert_events_present(&all, ctx.config.expected_events.iter().map(String::as_str))?;
    assert::assert_processes_present(&all, ctx.config.processes.iter().map(String::as_str))
}
