// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Subscription creation chain.
//!
//! ```text
//! rcl_node_init            node_handle ─────────┐
//! rcl_subscription_init    node_handle ◄────────┘, subscription_handle ─┐
//! rclcpp_subscription_init subscription_handle ◄─────────────────────────┘, subscription ─┐
//! rclcpp_subscription_callback_added                          subscription ◄─────────────┘
//! ```
//!
//! Each hop is checked by narrowing: event kind, then a literal value known
//! to the test (topic, node), then cardinality, then a cross-reference on
//! the handle carried to the next kind.

use super::ros2::*;
use crate::assert::{
    assert_count, assert_field_equals, assert_handle_valid, assert_matching_field, assert_matching_field_count,
    assert_non_empty_string, assert_queue_depth_valid, assert_single,
};
use crate::case::{CaseContext, Scenario};
use crate::config::CaseConfig;
use crate::error::CheckResult;
use crate::event::FieldValue;

pub const DEFAULT_SESSION_PREFIX: &str = "session-test-subscription-creation";
pub const DEFAULT_NODE: &str = "test_subscription";
pub const DEFAULT_TOPIC: &str = "/the_topic";
pub const DEFAULT_QUEUE_DEPTH: i64 = 10;

/// Handle fields every `rcl_subscription_init` must carry, as emitted by ROS 2.
pub const RCL_SUBSCRIPTION_HANDLES: &[&str] = &["subscription_handle", "node_handle", "rmw_subscription_handle"];

#[derive(Debug, Clone)]
pub struct SubscriptionScenario {
    config: CaseConfig,
    node: String,
    topic: String,
    queue_depth: i64,
    rcl_handle_fields: Vec<String>,
}

impl Default for SubscriptionScenario {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_PREFIX, DEFAULT_NODE, DEFAULT_TOPIC, DEFAULT_QUEUE_DEPTH)
    }
}

impl SubscriptionScenario {
    pub fn new(session: impl Into<String>, node: impl Into<String>, topic: impl Into<String>, queue_depth: i64) -> Self {
        let node = node.into();
        let config = CaseConfig::new(session)
            .with_events([
                RCL_NODE_INIT,
                RCL_SUBSCRIPTION_INIT,
                RCLCPP_SUBSCRIPTION_INIT,
                RCLCPP_SUBSCRIPTION_CALLBACK_ADDED,
            ])
            .with_processes([node.clone()]);
        Self {
            config,
            node,
            topic: topic.into(),
            queue_depth,
            rcl_handle_fields: RCL_SUBSCRIPTION_HANDLES.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn intra_process(mut self, enabled: bool) -> Self {
        self.config = self.config.intra_process(enabled);
        self
    }

    /// Replace the handle fields checked on `rcl_subscription_init`.
    /// `subscription_handle` and `node_handle` are always needed for correlation.
    pub fn with_rcl_handle_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rcl_handle_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.config.session = session.into();
        self
    }
}

impl Scenario for SubscriptionScenario {
    fn config(&self) -> &CaseConfig {
        &self.config
    }

    fn check(&self, ctx: &CaseContext<'_>) -> CheckResult<()> {
        let rcl_sub_inits = ctx.named(RCL_SUBSCRIPTION_INIT);
        let rclcpp_sub_inits = ctx.named(RCLCPP_SUBSCRIPTION_INIT);
        let callbacks_added = ctx.named(RCLCPP_SUBSCRIPTION_CALLBACK_ADDED);

        // Field shapes
        for event in rcl_sub_inits.iter() {
            assert_handle_valid(event, self.rcl_handle_fields.as_slice())?;
            assert_queue_depth_valid(event, "queue_depth")?;
            assert_non_empty_string(event, "topic_name")?;
        }
        for event in rclcpp_sub_inits.iter() {
            assert_handle_valid(event, &["subscription_handle", "subscription"])?;
        }
        for event in callbacks_added.iter() {
            assert_handle_valid(event, &["subscription", "callback"])?;
        }

        // Test topic
        let topic = FieldValue::Str(self.topic.clone());
        let test_sub_inits = rcl_sub_inits.by_field_value("topic_name", &topic)?;
        let sub_init = assert_single(&test_sub_inits, "cannot find test topic name")?;

        assert_field_equals(
            sub_init,
            "queue_depth",
            &FieldValue::Int(self.queue_depth),
            "sub_init event does not have expected queue depth value",
        )?;

        // Node handle: node_init -> rcl_subscription_init
        let node_inits = ctx.named(RCL_NODE_INIT).by_process_identity(&self.node);
        assert_count(&node_inits, 1, "none or more than 1 node_init event")?;
        if let Some(node_init) = node_inits.first() {
            assert_matching_field(node_init, "node_handle", RCL_SUBSCRIPTION_INIT, &rcl_sub_inits)?;
        }

        // Subscription handle: rcl -> rclcpp. Intra-process adds a second rclcpp subscription.
        let rclcpp_matches = assert_matching_field_count(
            sub_init,
            "subscription_handle",
            RCLCPP_SUBSCRIPTION_INIT,
            &rclcpp_sub_inits,
            self.config.subscription_fanout(),
        )?;

        // Subscription pointer: rclcpp_subscription_init -> callback_added, one per rclcpp subscription
        for rclcpp_sub_init in rclcpp_matches.iter() {
            assert_matching_field(rclcpp_sub_init, "subscription", RCLCPP_SUBSCRIPTION_CALLBACK_ADDED, &callbacks_added)?;
        }

        Ok(())
    }
}
