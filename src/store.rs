// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Store and views over it.
//!
//! The store owns the records of one recorded session in capture order and is
//! never mutated after construction. Every query produces an [`Events`] view:
//! a list of capture indices into the store's backing slice, so narrowing a
//! view never copies records.

use crate::config::MAX_REPORTED_RECORDS;
use crate::error::{CheckResult, EventError};
use crate::event::EventRecord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ordered, immutable collection of the records of one session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStore {
    session: String,
    events: Vec<EventRecord>,
}

impl EventStore {
    /// Build a store, checking every record's invariants.
    pub fn new(session: impl Into<String>, events: Vec<EventRecord>) -> Result<Self, EventError> {
        let store = Self {
            session: session.into(),
            events,
        };
        store.validate()?;
        Ok(store)
    }

    /// Re-check record invariants, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), EventError> {
        self.events.iter().try_for_each(EventRecord::validate)
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&EventRecord> {
        self.events.get(index)
    }

    /// The full store as a view, in capture order.
    pub fn all(&self) -> Events<'_> {
        Events {
            records: &self.events,
            indices: (0..self.events.len()).collect(),
        }
    }

    /// Occurrences per event name, sorted by name.
    pub fn name_counts(&self) -> Vec<(&str, usize)> {
        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for event in &self.events {
            *counts.entry(event.name()).or_insert(0) += 1;
        }
        let mut counts: Vec<_> = counts.into_iter().collect();
        counts.sort_unstable_by(|a, b| a.0.cmp(b.0));
        counts
    }

    /// Distinct process identities that emitted at least one event.
    pub fn process_identities(&self) -> BTreeSet<&str> {
        self.events.iter().map(EventRecord::process_identity).collect()
    }
}

impl<'a> From<&'a EventStore> for Events<'a> {
    fn from(store: &'a EventStore) -> Self {
        store.all()
    }
}

/// An ordered subset of an [`EventStore`].
#[derive(Clone, Debug)]
pub struct Events<'a> {
    records: &'a [EventRecord],
    indices: Vec<usize>,
}

impl<'a> Events<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EventRecord> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Records paired with their capture index in the store.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &'a EventRecord)> + '_ {
        let records = self.records;
        self.indices.iter().map(move |&i| (i, &records[i]))
    }

    pub fn first(&self) -> Option<&'a EventRecord> {
        self.get(0)
    }

    /// The record, if the view holds exactly one.
    pub fn only(&self) -> Option<&'a EventRecord> {
        match self.indices.as_slice() {
            [i] => Some(&self.records[*i]),
            _ => None,
        }
    }

    pub fn get(&self, position: usize) -> Option<&'a EventRecord> {
        self.indices.get(position).map(|&i| &self.records[i])
    }

    /// Capture indices of the view, in order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Owned copies of (at most a handful of) records, for failure reports.
    pub fn report(&self) -> Vec<EventRecord> {
        self.iter().take(MAX_REPORTED_RECORDS).cloned().collect()
    }

    pub(crate) fn filter<F>(&self, mut keep: F) -> Events<'a>
    where
        F: FnMut(&EventRecord) -> bool,
    {
        Events {
            records: self.records,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&self.records[i]))
                .collect(),
        }
    }

    pub(crate) fn try_filter<F>(&self, mut keep: F) -> CheckResult<Events<'a>>
    where
        F: FnMut(&EventRecord) -> CheckResult<bool>,
    {
        let mut indices = Vec::new();
        for &i in &self.indices {
            if keep(&self.records[i])? {
                indices.push(i);
            }
        }
        Ok(Events {
            records: self.records,
            indices,
        })
    }

    /// Records in either view, in capture order, without duplicates.
    pub(crate) fn union(&self, other: &Events<'a>) -> Events<'a> {
        let mut indices: Vec<usize> = self.indices.iter().chain(other.indices.iter()).copied().collect();
        indices.sort_unstable();
        indices.dedup();
        Events {
            records: self.records,
            indices,
        }
    }

    /// Same records, caller-chosen order. Used to check order independence.
    pub fn permuted(&self, order: &[usize]) -> Events<'a> {
        Events {
            records: self.records,
            indices: order.iter().filter_map(|&p| self.indices.get(p).copied()).collect(),
        }
    }
}
