// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::assert::{assert_count, assert_handle_valid, assert_matching_field, assert_matching_field_count, assert_queue_depth_valid};
use crate::case::evaluate;
use crate::digest::store_digest;
use crate::event::{EventRecord, FieldValue};
use crate::scenario::sample::{subscription_trace, Variant};
use crate::scenario::SubscriptionScenario;
use crate::store::EventStore;

fn trace() -> EventStore {
    subscription_trace("props", Variant::DuplicateRclcppInit).unwrap()
}

fn single(name: &str, value: FieldValue) -> EventRecord {
    EventRecord::builder(name, 0).unwrap().field("f", value).unwrap().build()
}

#[test]
fn test_count_by_name_is_reflexive() {
    let store = trace();
    for (name, count) in store.name_counts() {
        assert_count(&store.all().by_name(name), count, name).unwrap();
    }
    assert_count(&store.all().by_name("never-emitted"), 0, "absent").unwrap();
}

#[test]
fn test_matching_field_ignores_target_order() {
    let store = trace();
    let all = store.all();
    let source = all.by_name("ros2:rcl_subscription_init").get(1).unwrap();
    let targets = all.by_name("ros2:rclcpp_subscription_init");
    let n = targets.len();

    // every rotation and the reversal of the target view
    let mut orders: Vec<Vec<usize>> = (0..n).map(|r| (0..n).map(|i| (i + r) % n).collect()).collect();
    orders.push((0..n).rev().collect());

    let baseline = assert_matching_field_count(source, "subscription_handle", "ros2:rclcpp_subscription_init", &targets, 2)
        .map(|m| m.len())
        .map_err(|e| e.to_string());
    for order in orders {
        let permuted = targets.permuted(&order);
        let result = assert_matching_field_count(source, "subscription_handle", "ros2:rclcpp_subscription_init", &permuted, 2)
            .map(|m| m.len())
            .map_err(|e| e.to_string());
        assert_eq!(result.is_ok(), baseline.is_ok());
        let exactly_one = assert_matching_field(source, "subscription_handle", "ros2:rclcpp_subscription_init", &permuted);
        assert!(exactly_one.is_err(), "two matches never satisfy exactly-one");
    }
    assert_eq!(baseline, Ok(2));
}

#[test]
fn test_single_match_is_same_record_in_any_order() {
    let store = subscription_trace("props", Variant::Valid).unwrap();
    let all = store.all();
    let source = all.by_name("ros2:rcl_subscription_init").get(1).unwrap();
    let n = all.len();

    let capture_index = |record: &EventRecord| store.records().iter().position(|r| std::ptr::eq(r, record));

    let mut orders: Vec<Vec<usize>> = (0..n).map(|r| (0..n).map(|i| (i + r) % n).collect()).collect();
    orders.push((0..n).rev().collect());
    orders.push((0..n).step_by(2).chain((1..n).step_by(2)).collect());

    let baseline = assert_matching_field(source, "subscription_handle", "ros2:rclcpp_subscription_init", &all).unwrap();
    let expected = capture_index(baseline);
    assert!(expected.is_some());
    for order in orders {
        let permuted = all.permuted(&order);
        assert_eq!(permuted.len(), n);
        let matched = assert_matching_field(source, "subscription_handle", "ros2:rclcpp_subscription_init", &permuted).unwrap();
        assert_eq!(capture_index(matched), expected, "order {:?}", order);
    }
}

#[test]
fn test_handle_validity_bounds() {
    for v in [1u64, 2, 0xdead_beef, u64::MAX] {
        assert!(assert_handle_valid(&single("e", FieldValue::Handle(v)), &["f"]).is_ok());
    }
    for v in [1i64, 42, i64::MAX] {
        assert!(assert_handle_valid(&single("e", FieldValue::Int(v)), &["f"]).is_ok());
    }
    for bad in [FieldValue::Handle(0), FieldValue::Int(0), FieldValue::Int(i64::MIN), FieldValue::Str("0x10".into())] {
        assert!(assert_handle_valid(&single("e", bad), &["f"]).is_err());
    }
}

#[test]
fn test_queue_depth_bounds() {
    for v in [0i64, 1, 10, i64::MAX] {
        assert!(assert_queue_depth_valid(&single("e", FieldValue::Int(v)), "f").is_ok());
    }
    for v in [-1i64, -10, i64::MIN] {
        assert!(assert_queue_depth_valid(&single("e", FieldValue::Int(v)), "f").is_err());
    }
}

#[test]
fn test_rerun_is_idempotent() {
    let store = trace();
    let digest = store_digest(&store);
    let scenario = SubscriptionScenario::default().with_session("props");

    let first = evaluate(&scenario, &store);
    for _ in 0..3 {
        assert_eq!(evaluate(&scenario, &store), first);
    }
    assert_eq!(store_digest(&store), digest);
}
