use anyhow::Context;
use std::path::Path;

pub fn run(input: &Path, output: &Path) -> anyhow::Result<()> {
    let store = tracecheck_tracefile::load(input)
        .with_context(|| format!("Failed to load trace {}", input.display()))?;
    tracecheck_tracefile::save(output, &store)
        .with_context(|| format!("Failed to write trace {}", output.display()))?;

    tracing::info!(events = store.len(), from = %input.display(), to = %output.display(), "trace converted");
    println!("Converted {} events: {} -> {}", store.len(), input.display(), output.display());
    Ok(())
}
