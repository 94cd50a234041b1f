use anyhow::{bail, Context};
use std::fs;
use std::path::PathBuf;
use tracecheck::case::{self, Scenario, Verdict};
use tracecheck::plan::Plan;
use tracecheck::scenario::subscription::{DEFAULT_NODE, DEFAULT_QUEUE_DEPTH, DEFAULT_SESSION_PREFIX, DEFAULT_TOPIC};
use tracecheck::scenario::{SubscriptionScenario, BUILTIN};
use tracecheck_tracefile::TraceDir;

/// Options for one `check` run.
#[derive(Debug, Clone, Default)]
pub struct CheckArgs {
    pub dir: PathBuf,
    pub scenario: Option<String>,
    pub plan: Option<PathBuf>,
    pub session: Option<String>,
    pub intra_process: bool,
    pub node: Option<String>,
    pub topic: Option<String>,
    pub queue_depth: Option<i64>,
    pub json: bool,
}

/// Run a built-in scenario or a plan file against a trace directory.
pub fn run(args: &CheckArgs) -> anyhow::Result<Verdict> {
    let scenario = build_scenario(args)?;
    let recorder = TraceDir::new(&args.dir);

    let verdict = case::run(scenario.as_ref(), &recorder)
        .with_context(|| format!("Failed to load session from {}", args.dir.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        let mark = if verdict.passed { "✅" } else { "❌" };
        println!("\n{} {}", mark, verdict);
    }
    Ok(verdict)
}

fn build_scenario(args: &CheckArgs) -> anyhow::Result<Box<dyn Scenario>> {
    match (&args.plan, &args.scenario) {
        (Some(_), Some(_)) => bail!("--plan and --scenario are mutually exclusive"),
        (Some(path), None) => {
            let text = fs::read_to_string(path).with_context(|| format!("Failed to read plan {}", path.display()))?;
            let mut plan = Plan::from_json(&text)?;
            if let Some(session) = &args.session {
                plan.case.session = session.clone();
            }
            if args.intra_process {
                plan.case.intra_process = true;
            }
            Ok(Box::new(plan))
        }
        (None, scenario) => {
            let name = scenario.as_deref().unwrap_or("subscription");
            if name != "subscription" {
                bail!("Unknown scenario '{}' (available: {})", name, BUILTIN.join(", "));
            }
            let scenario = SubscriptionScenario::new(
                args.session.as_deref().unwrap_or(DEFAULT_SESSION_PREFIX),
                args.node.as_deref().unwrap_or(DEFAULT_NODE),
                args.topic.as_deref().unwrap_or(DEFAULT_TOPIC),
                args.queue_depth.unwrap_or(DEFAULT_QUEUE_DEPTH),
            )
            .intra_process(args.intra_process);
            Ok(Box::new(scenario))
        }
    }
}
