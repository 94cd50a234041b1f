// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::assert::assert_queue_depth_valid;
use crate::case::{evaluate, run, MemoryRecorder};
use crate::error::CheckError;
use crate::event::{EventRecord, FieldValue};
use crate::scenario::ros2::*;
use crate::scenario::sample::{subscription_trace, Variant};
use crate::scenario::SubscriptionScenario;
use crate::store::EventStore;

/// The minimal four-event chain: node 5, rcl subscription 9, rclcpp subscription 100.
/// Carries only the handles needed for correlation.
fn minimal_chain() -> Vec<EventRecord> {
    vec![
        EventRecord::builder(RCL_NODE_INIT, 1).unwrap()
            .process("N")
            .handle("node_handle", 5).unwrap()
            .build(),
        EventRecord::builder(RCL_SUBSCRIPTION_INIT, 2).unwrap()
            .process("N")
            .handle("subscription_handle", 9).unwrap()
            .handle("node_handle", 5).unwrap()
            .field("topic_name", "/t").unwrap()
            .field("queue_depth", 10i64).unwrap()
            .build(),
        EventRecord::builder(RCLCPP_SUBSCRIPTION_INIT, 3).unwrap()
            .process("N")
            .handle("subscription_handle", 9).unwrap()
            .handle("subscription", 100).unwrap()
            .build(),
        EventRecord::builder(RCLCPP_SUBSCRIPTION_CALLBACK_ADDED, 4).unwrap()
            .process("N")
            .handle("subscription", 100).unwrap()
            .handle("callback", 200).unwrap()
            .build(),
    ]
}

fn chain_scenario(topic: &str, queue_depth: i64) -> SubscriptionScenario {
    SubscriptionScenario::new("chain", "N", topic, queue_depth).with_rcl_handle_fields(["subscription_handle", "node_handle"])
}

fn minimal_scenario() -> SubscriptionScenario {
    chain_scenario("/t", 10)
}

#[test]
fn test_minimal_chain_passes() {
    let store = EventStore::new("chain", minimal_chain()).unwrap();
    let verdict = evaluate(&minimal_scenario(), &store);
    assert!(verdict.passed, "{}", verdict);
}

#[test]
fn test_ros2_handle_fields_require_rmw_handle() {
    let store = EventStore::new("chain", minimal_chain()).unwrap();
    let scenario = SubscriptionScenario::new("chain", "N", "/t", 10);
    let verdict = evaluate(&scenario, &store);
    assert_eq!(
        verdict.failure.unwrap().message,
        "Field 'rmw_subscription_handle' missing on ros2:rcl_subscription_init"
    );
}

#[test]
fn test_second_rclcpp_init_breaks_exactly_one() {
    let mut events = minimal_chain();
    events.push(
        EventRecord::builder(RCLCPP_SUBSCRIPTION_INIT, 5).unwrap()
            .process("N")
            .handle("subscription_handle", 9).unwrap()
            .handle("subscription", 101).unwrap()
            .build(),
    );
    let store = EventStore::new("chain", events).unwrap();
    let verdict = evaluate(&minimal_scenario(), &store);
    assert!(!verdict.passed);
    let failure = verdict.failure.unwrap();
    assert!(failure.message.contains("expected 1 ros2:rclcpp_subscription_init"), "{}", failure.message);
    assert!(failure.message.ends_with("found 2"));
    // source record plus both matches
    assert_eq!(failure.records.len(), 3);
}

#[test]
fn test_negative_queue_depth_rejected() {
    let mut events = minimal_chain();
    events[1] = EventRecord::builder(RCL_SUBSCRIPTION_INIT, 2).unwrap()
        .process("N")
        .handle("subscription_handle", 9).unwrap()
        .handle("node_handle", 5).unwrap()
        .field("topic_name", "/t").unwrap()
        .field("queue_depth", -1i64).unwrap()
        .build();

    let err = assert_queue_depth_valid(&events[1], "queue_depth").unwrap_err();
    assert!(matches!(err, CheckError::InvalidValue { ref value, .. } if *value == FieldValue::Int(-1)));

    let store = EventStore::new("chain", events).unwrap();
    let verdict = evaluate(&minimal_scenario(), &store);
    assert!(!verdict.passed);
    assert!(verdict.failure.unwrap().message.contains("queue_depth"));
}

#[test]
fn test_wrong_queue_depth_value() {
    let store = EventStore::new("chain", minimal_chain()).unwrap();
    let scenario = chain_scenario("/t", 5);
    let verdict = evaluate(&scenario, &store);
    assert_eq!(
        verdict.failure.unwrap().message,
        "sub_init event does not have expected queue depth value: field 'queue_depth' is 10, expected 5"
    );
}

#[test]
fn test_unknown_topic() {
    let store = EventStore::new("chain", minimal_chain()).unwrap();
    let scenario = chain_scenario("/elsewhere", 10);
    let verdict = evaluate(&scenario, &store);
    assert_eq!(verdict.failure.unwrap().message, "cannot find test topic name: expected 1 events, found 0");
}

#[test]
fn test_missing_event_kind_fails_coverage() {
    let mut events = minimal_chain();
    events.pop();
    let store = EventStore::new("chain", events).unwrap();
    let verdict = evaluate(&minimal_scenario(), &store);
    assert_eq!(
        verdict.failure.unwrap().message,
        "missing expected events: ros2:rclcpp_subscription_callback_added"
    );
}

#[test]
fn test_sample_variants() {
    let mut recorder = MemoryRecorder::new();
    for variant in Variant::ALL {
        let session = format!("session-test-subscription-creation-{}", variant.name());
        recorder.insert(subscription_trace(&session, variant).unwrap());
    }

    let verdict_for = |variant: Variant, intra: bool| {
        let scenario = SubscriptionScenario::default()
            .with_session(format!("session-test-subscription-creation-{}", variant.name()))
            .intra_process(intra);
        run(&scenario, &recorder).unwrap()
    };

    assert!(verdict_for(Variant::Valid, false).passed);
    assert!(!verdict_for(Variant::DuplicateRclcppInit, false).passed);
    assert!(!verdict_for(Variant::NegativeQueueDepth, false).passed);
    assert!(!verdict_for(Variant::IntraProcess, false).passed);
    assert!(verdict_for(Variant::IntraProcess, true).passed);
    // intra-process expects two rclcpp subscriptions, each with its own callback
    assert!(!verdict_for(Variant::DuplicateRclcppInit, true).passed);
    assert!(!verdict_for(Variant::Valid, true).passed);
}
