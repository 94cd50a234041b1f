use std::fs;
use std::path::Path;
use tracecheck_tracefile::{container, TraceFileError};

pub fn run(trace_path: &Path) -> anyhow::Result<()> {
    let bytes = fs::read(trace_path)?;

    match container::verify(&bytes) {
        Ok((header, body)) => {
            println!("\n✅ VERIFIED\n");
            println!("Events:        {}", header.event_count);
            println!("Body:          {} bytes", body.len());
            println!("Confidence:    STRONG (CRC64)\n");
            Ok(())
        }
        Err(TraceFileError::ChecksumMismatch { expected, found }) => {
            println!("\n❌ CORRUPTED\n");
            println!("Expected Hash: {:016x}", expected);
            println!("Found Hash:    {:016x}", found);
            Err(TraceFileError::ChecksumMismatch { expected, found }.into())
        }
        Err(e) => Err(e.into()),
    }
}
