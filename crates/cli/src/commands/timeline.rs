use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::Path;

pub fn run(trace_path: &Path, name: Option<&str>, process: Option<&str>) -> anyhow::Result<()> {
    let store = tracecheck_tracefile::load(trace_path)?;

    let mut events = store.all();
    if let Some(name) = name {
        events = events.by_name(name);
    }
    if let Some(process) = process {
        events = events.by_process_identity(process);
    }

    // Capture order need not be timestamp order with several producers
    let is_sorted = events.iter().zip(events.iter().skip(1)).all(|(a, b)| a.timestamp() <= b.timestamp());
    if !is_sorted {
        println!("\n⚠️  WARNING: Capture order is not timestamp order.\n");
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Timestamp", "Process", "Event", "Fields"]);

    for (index, event) in events.indexed() {
        let fields = event
            .fields()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            index.to_string(),
            super::format_ns(event.timestamp()),
            event.process_identity().to_string(),
            event.name().to_string(),
            fields,
        ]);
    }

    println!("\nEvent Timeline: {} ({} of {} events)\n", store.session(), events.len(), store.len());
    println!("{table}\n");

    Ok(())
}
