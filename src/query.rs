// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Query Layer: pure, composable filters over an [`Events`] view.
//!
//! Every function accepts the full store view or any previously derived view
//! and returns a new view in the same relative order.

use crate::error::CheckResult;
use crate::event::{EventRecord, FieldValue};
use crate::store::Events;

/// Records whose name equals `name`. No match is an empty view, not an error.
pub fn by_name<'a>(events: &Events<'a>, name: &str) -> Events<'a> {
    events.filter(|e| e.name() == name)
}

/// Records whose `field` is identity-equal to `value`.
///
/// A record lacking `field` aborts the query with `FieldMissing`; narrow the
/// view to a single event kind with [`by_name`] first.
pub fn by_field_value<'a>(events: &Events<'a>, field: &str, value: &FieldValue) -> CheckResult<Events<'a>> {
    events.try_filter(|e| Ok(e.field(field)?.same_identity(value)))
}

/// Records emitted by `identity`.
pub fn by_process_identity<'a>(events: &Events<'a>, identity: &str) -> Events<'a> {
    events.filter(|e| e.process_identity() == identity)
}

/// Value of `field` on `record`, or `FieldMissing`.
pub fn field<'r>(record: &'r EventRecord, field: &str) -> CheckResult<&'r FieldValue> {
    record.field(field)
}

impl<'a> Events<'a> {
    pub fn by_name(&self, name: &str) -> Events<'a> {
        by_name(self, name)
    }

    pub fn by_field_value(&self, field: &str, value: &FieldValue) -> CheckResult<Events<'a>> {
        by_field_value(self, field, value)
    }

    pub fn by_process_identity(&self, identity: &str) -> Events<'a> {
        by_process_identity(self, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CheckError;
    use crate::store::EventStore;

    fn store() -> EventStore {
        let events = vec![
            EventRecord::builder("init", 1).unwrap().process("a").handle("h", 5).unwrap().build(),
            EventRecord::builder("use", 2).unwrap().process("a").field("h", 5i64).unwrap().build(),
            EventRecord::builder("init", 3).unwrap().process("b").handle("h", 6).unwrap().build(),
            EventRecord::builder("other", 4).unwrap().process("b").build(),
        ];
        EventStore::new("q", events).unwrap()
    }

    #[test]
    fn test_by_name_keeps_order_and_allows_empty() {
        let store = store();
        let all = store.all();
        assert_eq!(by_name(&all, "init").indices(), &[0, 2]);
        assert!(by_name(&all, "missing").is_empty());
    }

    #[test]
    fn test_by_field_value_composes() {
        let store = store();
        let inits = store.all().by_name("init");
        let matched = inits.by_field_value("h", &FieldValue::Int(5)).unwrap();
        assert_eq!(matched.indices(), &[0]);
        let from_b = inits.by_process_identity("b");
        assert_eq!(from_b.indices(), &[2]);
    }

    #[test]
    fn test_by_field_value_propagates_missing_field() {
        let store = store();
        let err = store.all().by_field_value("h", &FieldValue::Handle(5)).unwrap_err();
        assert!(matches!(err, CheckError::FieldMissing { ref field, .. } if field == "h"));
    }

    #[test]
    fn test_field_accessor() {
        let store = store();
        let rec = store.get(1).unwrap();
        assert_eq!(field(rec, "h").unwrap(), &FieldValue::Int(5));
        assert!(field(rec, "x").is_err());
    }
}
