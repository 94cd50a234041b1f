// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants and per-case declarations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `rclcpp_subscription_init` records expected per rcl subscription handle
/// when intra-process communication is disabled.
pub const SUBSCRIPTION_FANOUT: usize = 1;

/// Same count with intra-process communication enabled: rclcpp creates an
/// additional intra-process subscription sharing the rcl handle.
pub const SUBSCRIPTION_FANOUT_INTRA_PROCESS: usize = 2;

/// Number of records included in a failure report before truncating.
pub const MAX_REPORTED_RECORDS: usize = 8;

/// What a test case declares up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Session identifier or prefix handed to the recorder.
    pub session: String,
    /// Event names that must each occur at least once.
    #[serde(default)]
    pub expected_events: BTreeSet<String>,
    /// Process identities (logical component instances) under test.
    #[serde(default)]
    pub processes: BTreeSet<String>,
    /// Whether the traced system ran with intra-process communication.
    #[serde(default)]
    pub intra_process: bool,
}

impl CaseConfig {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            expected_events: BTreeSet::new(),
            processes: BTreeSet::new(),
            intra_process: false,
        }
    }

    pub fn with_events<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_events.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_processes<I, S>(mut self, identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.processes.extend(identities.into_iter().map(Into::into));
        self
    }

    pub fn intra_process(mut self, enabled: bool) -> Self {
        self.intra_process = enabled;
        self
    }

    /// Expected `rclcpp_subscription_init` records per rcl subscription handle.
    pub fn subscription_fanout(&self) -> usize {
        if self.intra_process {
            SUBSCRIPTION_FANOUT_INTRA_PROCESS
        } else {
            SUBSCRIPTION_FANOUT
        }
    }
}
