use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracecheck_cli::commands::check::CheckArgs;
use tracecheck_cli::commands::{check, convert, inspect, timeline, verify};
use tracecheck_cli::telemetry::init_telemetry;

#[derive(Parser)]
#[command(name = "tracecheck")]
#[command(about = "Tracecheck - verify recorded ROS 2 tracing sessions against expected event chains", long_about = None)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a trace: event counts, processes, digest
    Inspect { trace_path: PathBuf },
    /// List the events of a trace in capture order
    Timeline {
        trace_path: PathBuf,

        /// Only events with this name
        #[arg(long, short)]
        name: Option<String>,

        /// Only events from this process identity
        #[arg(long, short)]
        process: Option<String>,
    },
    /// Run a test case against a directory of recorded sessions.
    /// Exits with status 1 when the case fails.
    Check {
        /// Directory holding one trace file per session
        #[arg(long, short)]
        dir: PathBuf,

        /// Built-in scenario to run (default: subscription)
        #[arg(long, short)]
        scenario: Option<String>,

        /// JSON plan file to run instead of a built-in scenario
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Session identifier or prefix (overrides the case default)
        #[arg(long)]
        session: Option<String>,

        /// Expect the fanout of intra-process communication
        #[arg(long)]
        intra_process: bool,

        /// Node name of the built-in scenario
        #[arg(long)]
        node: Option<String>,

        /// Topic name of the built-in scenario
        #[arg(long)]
        topic: Option<String>,

        /// Queue depth of the built-in scenario
        #[arg(long)]
        queue_depth: Option<i64>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a trace between JSON and the binary container
    Convert { input: PathBuf, output: PathBuf },
    /// Verify the checksum of a binary trace container
    Verify { trace_path: PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_telemetry(cli.verbose);

    match cli.command {
        Commands::Inspect { trace_path } => inspect::run(&trace_path)?,
        Commands::Timeline {
            trace_path,
            name,
            process,
        } => timeline::run(&trace_path, name.as_deref(), process.as_deref())?,
        Commands::Check {
            dir,
            scenario,
            plan,
            session,
            intra_process,
            node,
            topic,
            queue_depth,
            json,
        } => {
            let verdict = check::run(&CheckArgs {
                dir,
                scenario,
                plan,
                session,
                intra_process,
                node,
                topic,
                queue_depth,
                json,
            })?;
            if !verdict.passed {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Convert { input, output } => convert::run(&input, &output)?,
        Commands::Verify { trace_path } => verify::run(&trace_path)?,
    }
    Ok(ExitCode::SUCCESS)
}
