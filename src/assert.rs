// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Assertion Layer.
//!
//! Each assertion returns `Ok` on pass or a [`CheckError`] naming what was
//! violated and carrying the offending records. Assertions are small and
//! orthogonal; test cases chain them through named intermediate views.

use crate::error::{CheckError, CheckResult};
use crate::event::{EventRecord, FieldKind, FieldValue};
use crate::query;
use crate::store::Events;
use std::collections::BTreeSet;

/// Every name in `expected` occurs at least once. Extra names are fine.
pub fn assert_events_present<'s, I>(events: &Events<'_>, expected: I) -> CheckResult<()>
where
    I: IntoIterator<Item = &'s str>,
{
    let seen: BTreeSet<&str> = events.iter().map(EventRecord::name).collect();
    let missing: Vec<&str> = expected.into_iter().filter(|name| !seen.contains(name)).collect();
    if missing.is_empty() {
        tracing::debug!(seen = seen.len(), "event coverage satisfied");
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("missing expected events: {}", missing.join(", ")),
        Vec::new(),
    ))
}

/// The view holds exactly `expected` records.
pub fn assert_count(events: &Events<'_>, expected: usize, context: &str) -> CheckResult<()> {
    if events.len() == expected {
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("{}: expected {} events, found {}", context, expected, events.len()),
        events.report(),
    ))
}

/// The view holds at least `minimum` records.
pub fn assert_count_at_least(events: &Events<'_>, minimum: usize, context: &str) -> CheckResult<()> {
    if events.len() >= minimum {
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("{}: expected at least {} events, found {}", context, minimum, events.len()),
        events.report(),
    ))
}

/// Each named field holds a non-zero integer handle.
pub fn assert_handle_valid<S: AsRef<str>>(record: &EventRecord, fields: &[S]) -> CheckResult<()> {
    for name in fields {
        let name = name.as_ref();
        let value = record.field(name)?;
        let valid = matches!(value.as_integer(), Some(v) if v > 0);
        if !valid {
            return Err(CheckError::InvalidHandle {
                field: name.to_string(),
                value: value.clone(),
                record: Box::new(record.clone()),
            });
        }
    }
    Ok(())
}

/// The field is an integer `>= 0`; zero denotes the system default depth.
pub fn assert_queue_depth_valid(record: &EventRecord, field: &str) -> CheckResult<()> {
    let value = record.field(field)?;
    match value.as_integer() {
        Some(v) if v >= 0 => Ok(()),
        _ => Err(CheckError::InvalidValue {
            field: field.to_string(),
            expected: "non-negative integer",
            value: value.clone(),
            record: Box::new(record.clone()),
        }),
    }
}

/// The field is a string of non-zero length.
pub fn assert_non_empty_string(record: &EventRecord, field: &str) -> CheckResult<()> {
    let value = record.field(field)?;
    match value.as_str() {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(CheckError::InvalidValue {
            field: field.to_string(),
            expected: "non-empty string",
            value: value.clone(),
            record: Box::new(record.clone()),
        }),
    }
}

/// The field holds a value of the given kind.
pub fn assert_field_type(record: &EventRecord, field: &str, kind: FieldKind) -> CheckResult<()> {
    let value = record.field(field)?;
    if value.kind() == kind {
        return Ok(());
    }
    Err(CheckError::InvalidValue {
        field: field.to_string(),
        expected: kind.name(),
        value: value.clone(),
        record: Box::new(record.clone()),
    })
}

/// The field equals `expected` (identity equality, so `Int(5)` matches `Handle(5)`).
pub fn assert_field_equals(record: &EventRecord, field: &str, expected: &FieldValue, context: &str) -> CheckResult<()> {
    let value = record.field(field)?;
    if value.same_identity(expected) {
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("{}: field '{}' is {}, expected {}", context, field, value, expected),
        vec![record.clone()],
    ))
}

/// Exactly one record of kind `target_name` in `targets` carries the same
/// `field` value as `source`. Returns that record.
pub fn assert_matching_field<'a>(
    source: &EventRecord,
    field: &str,
    target_name: &str,
    targets: &Events<'a>,
) -> CheckResult<&'a EventRecord> {
    let matches = assert_matching_field_count(source, field, target_name, targets, 1)?;
    matches
        .first()
        .ok_or_else(|| CheckError::assertion("matching record vanished", vec![source.clone()]))
}

/// Exactly `expected` records of kind `target_name` in `targets` carry the
/// same `field` value as `source`. Returns the matching view.
///
/// The result depends only on the set of target records, not their order.
pub fn assert_matching_field_count<'a>(
    source: &EventRecord,
    field: &str,
    target_name: &str,
    targets: &Events<'a>,
    expected: usize,
) -> CheckResult<Events<'a>> {
    let value = source.field(field)?;
    let matches = query::by_name(targets, target_name).by_field_value(field, value)?;
    if matches.len() == expected {
        tracing::debug!(field, kind = target_name, %value, "correlation matched");
        return Ok(matches);
    }
    let mut records = vec![source.clone()];
    records.extend(matches.report());
    Err(CheckError::assertion(
        format!(
            "expected {} {} event(s) with {} = {} (from {}), found {}",
            expected,
            target_name,
            field,
            value,
            source.name(),
            matches.len()
        ),
        records,
    ))
}

/// Every identity in `processes` emitted at least one event.
pub fn assert_processes_present<'s, I>(events: &Events<'_>, processes: I) -> CheckResult<()>
where
    I: IntoIterator<Item = &'s str>,
{
    let seen: BTreeSet<&str> = events.iter().map(EventRecord::process_identity).collect();
    let missing: Vec<&str> = processes.into_iter().filter(|p| !seen.contains(p)).collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("no events from processes: {}", missing.join(", ")),
        Vec::new(),
    ))
}

/// Timestamps never decrease across the view.
pub fn assert_events_ordered(events: &Events<'_>, context: &str) -> CheckResult<()> {
    let mut prev: Option<&EventRecord> = None;
    for event in events.iter() {
        if let Some(p) = prev {
            if event.timestamp() < p.timestamp() {
                return Err(CheckError::assertion(
                    format!("{}: {} at {}ns precedes {} at {}ns", context, event.name(), event.timestamp(), p.name(), p.timestamp()),
                    vec![p.clone(), event.clone()],
                ));
            }
        }
        prev = Some(event);
    }
    Ok(())
}

/// The record was captured at or after `timestamp`.
pub fn assert_event_after(record: &EventRecord, timestamp: u64, context: &str) -> CheckResult<()> {
    if record.timestamp() >= timestamp {
        return Ok(());
    }
    Err(CheckError::assertion(
        format!("{}: {} at {}ns is before {}ns", context, record.name(), record.timestamp(), timestamp),
        vec![record.clone()],
    ))
}

/// The view holds exactly one record; returns it.
pub fn assert_single<'a>(events: &Events<'a>, context: &str) -> CheckResult<&'a EventRecord> {
    assert_count(events, 1, context)?;
    events
        .only()
        .ok_or_else(|| CheckError::assertion(context.to_string(), Vec::new()))
}
