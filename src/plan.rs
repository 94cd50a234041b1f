// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Declarative check plans.
//!
//! A plan is the JSON form of a test case: the [`CaseConfig`] plus an ordered
//! list of steps. `select` steps narrow the store into labelled views; later
//! steps validate or cross-reference those views. Execution is fail-fast,
//! exactly like a scenario written in Rust.
//!
//! ```json
//! {
//!   "case": { "session": "session-test-subscription-creation",
//!             "expected_events": ["ros2:rcl_subscription_init"] },
//!   "steps": [
//!     { "op": "select", "label": "sub", "event": "ros2:rcl_subscription_init",
//!       "filter": { "topic_name": { "str": "/the_topic" } }, "count": 1 },
//!     { "op": "field_equals", "label": "sub", "field": "queue_depth", "value": { "int": 10 } }
//!   ]
//! }
//! ```

use crate::assert;
use crate::case::{CaseContext, Scenario};
use crate::config::CaseConfig;
use crate::error::{CheckError, CheckResult};
use crate::event::{EventRecord, FieldValue};
use crate::store::Events;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Plan parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Step {step} uses label '{label}' before it is selected")]
    UnknownLabel { step: usize, label: String },
    #[error("Step {step} selects label '{label}' twice")]
    DuplicateLabel { step: usize, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Narrow by event name, then optional process and field values, into `label`.
    Select {
        label: String,
        event: String,
        /// Narrow an earlier label instead of the whole store.
        #[serde(default)]
        from: Option<String>,
        #[serde(default)]
        process: Option<String>,
        #[serde(default)]
        filter: BTreeMap<String, FieldValue>,
        /// Required cardinality of the result.
        #[serde(default)]
        count: Option<usize>,
        #[serde(default)]
        context: Option<String>,
    },
    HandlesValid {
        label: String,
        fields: Vec<String>,
    },
    QueueDepthValid {
        label: String,
        field: String,
    },
    NonEmpty {
        label: String,
        field: String,
    },
    /// `label` must hold one record whose `field` equals `value`.
    FieldEquals {
        label: String,
        field: String,
        value: FieldValue,
        #[serde(default)]
        context: Option<String>,
    },
    /// Cross-reference every record in `source` into `targets`; each must
    /// match exactly `count` records.
    Match {
        source: String,
        field: String,
        target_event: String,
        targets: String,
        #[serde(default = "one")]
        count: usize,
        /// Cardinality used instead of `count` when the case runs intra-process.
        #[serde(default)]
        intra_process_count: Option<usize>,
        /// Store the matched records under this label.
        #[serde(default)]
        save: Option<String>,
    },
    /// Timestamps never decrease within `label`.
    Ordered {
        label: String,
    },
}

fn one() -> usize {
    1
}

impl Step {
    fn reads(&self) -> Vec<&str> {
        match self {
            Step::Select { from, .. } => from.iter().map(String::as_str).collect(),
            Step::HandlesValid { label, .. }
            | Step::QueueDepthValid { label, .. }
            | Step::NonEmpty { label, .. }
            | Step::FieldEquals { label, .. }
            | Step::Ordered { label } => vec![label.as_str()],
            Step::Match { source, targets, .. } => vec![source.as_str(), targets.as_str()],
        }
    }

    fn writes(&self) -> Option<&str> {
        match self {
            Step::Select { label, .. } => Some(label),
            Step::Match { save, .. } => save.as_deref(),
            _ => None,
        }
    }
}

/// A test case loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub case: CaseConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let plan: Plan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Every label is selected once and before it is read.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut known: BTreeSet<&str> = BTreeSet::new();
        for (step, s) in self.steps.iter().enumerate() {
            if let Some(label) = s.reads().into_iter().find(|l| !known.contains(l)) {
                return Err(PlanError::UnknownLabel {
                    step,
                    label: label.to_string(),
                });
            }
            if let Some(label) = s.writes() {
                if !known.insert(label) {
                    return Err(PlanError::DuplicateLabel {
                        step,
                        label: label.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

struct Labels<'s> {
    views: FxHashMap<String, Events<'s>>,
}

impl<'s> Labels<'s> {
    fn view(&self, label: &str) -> CheckResult<&Events<'s>> {
        self.views
            .get(label)
            .ok_or_else(|| CheckError::assertion(format!("label '{}' was never selected", label), Vec::new()))
    }

    fn single(&self, label: &str) -> CheckResult<&'s EventRecord> {
        assert::assert_single(self.view(label)?, &format!("label '{}' must hold exactly one event", label))
    }
}

impl Scenario for Plan {
    fn config(&self) -> &CaseConfig {
        &self.case
    }

    fn check(&self, ctx: &CaseContext<'_>) -> CheckResult<()> {
        let mut labels = Labels {
            views: FxHashMap::default(),
        };

        for (i, step) in self.steps.iter().enumerate() {
            tracing::debug!(step = i, ?step, "plan step");
            match step {
                Step::Select {
                    label,
                    event,
                    from,
                    process,
                    filter,
                    count,
                    context,
                } => {
                    let base = match from {
                        Some(from) => labels.view(from)?.clone(),
                        None => ctx.events(),
                    };
                    let mut view = base.by_name(event);
                    if let Some(process) = process {
                        view = view.by_process_identity(process);
                    }
                    for (field, value) in filter {
                        view = view.by_field_value(field, value)?;
                    }
                    if let Some(count) = count {
                        let context = context.clone().unwrap_or_else(|| format!("select '{}'", label));
                        assert::assert_count(&view, *count, &context)?;
                    }
                    labels.views.insert(label.clone(), view);
                }
                Step::HandlesValid { label, fields } => {
                    for event in labels.view(label)?.iter() {
                        assert::assert_handle_valid(event, fields.as_slice())?;
                    }
                }
                Step::QueueDepthValid { label, field } => {
                    for event in labels.view(label)?.iter() {
                        assert::assert_queue_depth_valid(event, field)?;
                    }
                }
                Step::NonEmpty { label, field } => {
                    for event in labels.view(label)?.iter() {
                        assert::assert_non_empty_string(event, field)?;
                    }
                }
                Step::FieldEquals {
                    label,
                    field,
                    value,
                    context,
                } => {
                    let record = labels.single(label)?;
                    let context = context.clone().unwrap_or_else(|| format!("'{}' of '{}'", field, label));
                    assert::assert_field_equals(record, field, value, &context)?;
                }
                Step::Match {
                    source,
                    field,
                    target_event,
                    targets,
                    count,
                    intra_process_count,
                    save,
                } => {
                    let expected = match intra_process_count {
                        Some(n) if ctx.config.intra_process => *n,
                        _ => *count,
                    };
                    let sources = labels.view(source)?;
                    assert::assert_count_at_least(sources, 1, &format!("match source '{}'", source))?;
                    let targets = labels.view(targets)?;
                    let mut matched: Option<Events<'_>> = None;
                    for record in sources.iter() {
                        let found = assert::assert_matching_field_count(record, field, target_event, targets, expected)?;
                        matched = Some(match matched {
                            Some(acc) => acc.union(&found),
                            None => found,
                        });
                    }
                    if let (Some(save), Some(matched)) = (save, matched) {
                        labels.views.insert(save.clone(), matched);
                    }
                }
                Step::Ordered { label } => {
                    assert::assert_events_ordered(labels.view(label)?, &format!("events of '{}'", label))?;
                }
            }
        }
        Ok(())
    }
}
