// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Synthetic subscription traces for demos and tests.

use super::ros2::*;
use super::subscription::{DEFAULT_NODE, DEFAULT_QUEUE_DEPTH, DEFAULT_TOPIC};
use crate::error::EventError;
use crate::event::{EventRecord, FieldValue};
use crate::store::EventStore;

/// Which shape of trace to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Well-formed chain; passes the default scenario.
    Valid,
    /// A second `rclcpp_subscription_init` shares the rcl subscription handle.
    DuplicateRclcppInit,
    /// The test subscription reports `queue_depth = -1`.
    NegativeQueueDepth,
    /// Chain as produced with intra-process communication enabled.
    IntraProcess,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Valid,
        Variant::DuplicateRclcppInit,
        Variant::NegativeQueueDepth,
        Variant::IntraProcess,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Valid => "valid",
            Variant::DuplicateRclcppInit => "duplicate-rclcpp-init",
            Variant::NegativeQueueDepth => "negative-queue-depth",
            Variant::IntraProcess => "intra-process",
        }
    }
}

struct Clock(u64);

impl Clock {
    fn tick(&mut self) -> u64 {
        self.0 += 1_000;
        self.0
    }
}

/// Build a subscription trace for `session`.
///
/// Besides the chain under test the trace carries the noise a real session
/// has: another node with its own subscription on a different topic.
pub fn subscription_trace(session: &str, variant: Variant) -> Result<EventStore, EventError> {
    let mut clock = Clock(1_600_000_000_000);
    let mut events = Vec::new();

    // Unrelated node
    events.push(
        EventRecord::builder(RCL_NODE_INIT, clock.tick())?
            .process("other_node")
            .handle("node_handle", 0x5500)?
            .handle("rmw_handle", 0x5510)?
            .field("node_name", "other_node")?
            .field("namespace", "/")?
            .build(),
    );
    events.extend(chain(&mut clock, "other_node", 0x5500, "/rosout_agg", 0x6600, 0x6700, 0x6800, 1000)?);

    // Node under test
    events.push(
        EventRecord::builder(RCL_NODE_INIT, clock.tick())?
            .process(DEFAULT_NODE)
            .handle("node_handle", 0x1000)?
            .handle("rmw_handle", 0x1010)?
            .field("node_name", DEFAULT_NODE)?
            .field("namespace", "/")?
            .build(),
    );
    let depth = match variant {
        Variant::NegativeQueueDepth => -1,
        _ => DEFAULT_QUEUE_DEPTH,
    };
    events.extend(chain(&mut clock, DEFAULT_NODE, 0x1000, DEFAULT_TOPIC, 0x2000, 0x3000, 0x4000, depth)?);

    match variant {
        Variant::DuplicateRclcppInit => {
            events.push(
                EventRecord::builder(RCLCPP_SUBSCRIPTION_INIT, clock.tick())?
                    .process(DEFAULT_NODE)
                    .handle("subscription_handle", 0x2000)?
                    .handle("subscription", 0x3100)?
                    .build(),
            );
        }
        Variant::IntraProcess => {
            events.push(
                EventRecord::builder(RCLCPP_SUBSCRIPTION_INIT, clock.tick())?
                    .process(DEFAULT_NODE)
                    .handle("subscription_handle", 0x2000)?
                    .handle("subscription", 0x3100)?
                    .build(),
            );
            events.push(
                EventRecord::builder(RCLCPP_SUBSCRIPTION_CALLBACK_ADDED, clock.tick())?
                    .process(DEFAULT_NODE)
                    .handle("subscription", 0x3100)?
                    .handle("callback", 0x4100)?
                    .build(),
            );
        }
        Variant::Valid | Variant::NegativeQueueDepth => {}
    }

    EventStore::new(session, events)
}

#[allow(clippy::too_many_arguments)]
fn chain(
    clock: &mut Clock,
    process: &str,
    node: u64,
    topic: &str,
    rcl_sub: u64,
    rclcpp_sub: u64,
    callback: u64,
    depth: i64,
) -> Result<Vec<EventRecord>, EventError> {
    Ok(vec![
        EventRecord::builder(RCL_SUBSCRIPTION_INIT, clock.tick())?
            .process(process)
            .handle("subscription_handle", rcl_sub)?
            .handle("node_handle", node)?
            .handle("rmw_subscription_handle", rcl_sub + 0x10)?
            .field("topic_name", topic)?
            .field("queue_depth", FieldValue::Int(depth))?
            .build(),
        EventRecord::builder(RCLCPP_SUBSCRIPTION_INIT, clock.tick())?
            .process(process)
            .handle("subscription_handle", rcl_sub)?
            .handle("subscription", rclcpp_sub)?
            .build(),
        EventRecord::builder(RCLCPP_SUBSCRIPTION_CALLBACK_ADDED, clock.tick())?
            .process(process)
            .handle("subscription", rclcpp_sub)?
            .handle("callback", callback)?
            .build(),
    ])
}
