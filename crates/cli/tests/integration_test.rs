use std::fs;
use tempfile::tempdir;
use tracecheck::scenario::sample::Variant;
use tracecheck_cli::commands::check::{self, CheckArgs};
use tracecheck_cli::commands::{convert, inspect, timeline, verify};
use tracecheck_tracefile::fixtures::{generate_subscription_traces, session_name};

fn args(dir: &std::path::Path, variant: Variant) -> CheckArgs {
    CheckArgs {
        dir: dir.to_path_buf(),
        session: Some(session_name(variant)),
        ..CheckArgs::default()
    }
}

#[test]
fn test_check_builtin_scenario() {
    let dir = tempdir().unwrap();
    generate_subscription_traces(dir.path()).unwrap();

    let verdict = check::run(&args(dir.path(), Variant::Valid)).unwrap();
    assert!(verdict.passed, "{}", verdict);

    let verdict = check::run(&args(dir.path(), Variant::DuplicateRclcppInit)).unwrap();
    assert!(!verdict.passed);

    let mut intra = args(dir.path(), Variant::IntraProcess);
    intra.intra_process = true;
    assert!(check::run(&intra).unwrap().passed);
}

#[test]
fn test_check_plan_file() {
    let dir = tempdir().unwrap();
    generate_subscription_traces(dir.path()).unwrap();
    let plan = dir.path().join("plan.json");
    fs::write(&plan, include_str!("../../../plans/subscription.json")).unwrap();

    let mut run = args(dir.path(), Variant::Valid);
    run.plan = Some(plan.clone());
    run.json = true;
    assert!(check::run(&run).unwrap().passed);

    let mut run = args(dir.path(), Variant::NegativeQueueDepth);
    run.plan = Some(plan);
    let verdict = check::run(&run).unwrap();
    assert!(!verdict.passed);
    assert!(verdict.failure.unwrap().message.contains("queue_depth"));
}

#[test]
fn test_check_rejects_bad_arguments() {
    let dir = tempdir().unwrap();
    generate_subscription_traces(dir.path()).unwrap();

    let mut unknown = args(dir.path(), Variant::Valid);
    unknown.scenario = Some("publisher".into());
    assert!(check::run(&unknown).is_err());

    let mut missing = args(dir.path(), Variant::Valid);
    missing.session = Some("no-such-session".into());
    assert!(check::run(&missing).is_err());
}

#[test]
fn test_convert_inspect_verify() {
    let dir = tempdir().unwrap();
    let paths = generate_subscription_traces(dir.path()).unwrap();

    let out = dir.path().join("converted.trace");
    convert::run(&paths.json[0], &out).unwrap();
    verify::run(&out).unwrap();
    inspect::run(&out).unwrap();
    inspect::run(&paths.json[0]).unwrap();
    timeline::run(&out, Some("ros2:rcl_node_init"), None).unwrap();

    let mut bytes = fs::read(&out).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xff;
    fs::write(&out, bytes).unwrap();
    assert!(verify::run(&out).is_err());
}
