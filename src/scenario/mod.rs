// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Built-in test cases.

pub mod sample;
pub mod subscription;

pub use subscription::SubscriptionScenario;

/// Event names emitted by the ROS 2 tracing instrumentation.
pub mod ros2 {
    pub const RCL_NODE_INIT: &str = "ros2:rcl_node_init";
    pub const RCL_SUBSCRIPTION_INIT: &str = "ros2:rcl_subscription_init";
    pub const RCLCPP_SUBSCRIPTION_INIT: &str = "ros2:rclcpp_subscription_init";
    pub const RCLCPP_SUBSCRIPTION_CALLBACK_ADDED: &str = "ros2:rclcpp_subscription_callback_added";
}

/// Names of the scenarios the CLI can run without a plan file.
pub const BUILTIN: &[&str] = &["subscription"];
