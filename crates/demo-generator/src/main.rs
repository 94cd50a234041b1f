use anyhow::Result;
use std::path::Path;
use tracecheck::case;
use tracecheck::scenario::sample::Variant;
use tracecheck::scenario::SubscriptionScenario;
use tracecheck_tracefile::fixtures::{generate_subscription_traces, session_name};
use tracecheck_tracefile::TraceDir;

fn main() -> Result<()> {
    let out_dir = Path::new("demo_traces");
    if out_dir.exists() {
        std::fs::remove_dir_all(out_dir)?;
    }

    println!("🎬 Generating subscription sessions...");
    let paths = generate_subscription_traces(out_dir)?;
    println!("1. Wrote {} JSON traces and {} containers", paths.json.len(), paths.container.len());

    // Sanity pass: what the checker will say about each session
    println!("2. Expected verdicts:");
    let traces = TraceDir::new(out_dir);
    for variant in Variant::ALL {
        let scenario = SubscriptionScenario::default()
            .with_session(session_name(variant))
            .intra_process(variant == Variant::IntraProcess);
        let verdict = case::run(&scenario, &traces)?;
        print!("   [{}] {}", variant.name(), verdict);
    }

    println!("✅ Demo traces ready in {}", out_dir.display());
    println!("   Try: tracecheck check --dir {} --session {}", out_dir.display(), session_name(Variant::Valid));
    Ok(())
}
