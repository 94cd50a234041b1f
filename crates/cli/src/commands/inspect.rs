use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use std::path::Path;
use tracecheck::digest::store_digest_hex;
use tracecheck_tracefile::{container, Format};

pub fn run(trace_path: &Path) -> anyhow::Result<()> {
    let store = tracecheck_tracefile::load(trace_path)?;

    println!("\nTrace Report: {}", store.session());
    println!("--------------------");

    // 1. Container header, if binary
    if Format::from_path(trace_path)? == Format::Container {
        let header = container::read_header(trace_path)?;
        println!(
            "Format: container v{}, Magic: {}, Events: {}",
            header.version,
            std::str::from_utf8(&header.magic).unwrap_or("BAD"),
            header.event_count
        );
    }

    // 2. Time span
    if let (Some(first), Some(last)) = (store.records().first(), store.records().last()) {
        println!(
            "Span:   {} .. {}",
            super::format_ns(first.timestamp()),
            super::format_ns(last.timestamp())
        );
    }
    println!("Digest: {}", store_digest_hex(&store));

    // 3. Event names
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Event", "Count"]);
    for (name, count) in store.name_counts() {
        table.add_row(vec![name.to_string(), count.to_string()]);
    }
    println!("{table}\n");

    // 4. Processes
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Process", "Events"]);
    for process in store.process_identities() {
        let count = store.all().by_process_identity(process).len();
        table.add_row(vec![process.to_string(), count.to_string()]);
    }
    println!("{table}\n");

    Ok(())
}
