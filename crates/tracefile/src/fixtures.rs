use crate::dir::TraceDir;
use crate::error::Result;
use crate::Format;

use std::fs;
use std::path::{Path, PathBuf};
use tracecheck::scenario::sample::{subscription_trace, Variant};
use tracecheck::scenario::subscription::DEFAULT_SESSION_PREFIX;

pub struct TestPaths {
    pub dir: PathBuf,
    /// JSON trace per variant, in `Variant::ALL` order.
    pub json: Vec<PathBuf>,
    /// Binary container per variant, in `Variant::ALL` order.
    pub container: Vec<PathBuf>,
}

/// Session name used for `variant` in generated fixtures.
pub fn session_name(variant: Variant) -> String {
    format!("{}-{}", DEFAULT_SESSION_PREFIX, variant.name())
}

/// Writes every sample subscription trace in both formats under `dir`.
pub fn generate_subscription_traces(dir: &Path) -> Result<TestPaths> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let traces = TraceDir::new(dir);
    let mut json = Vec::new();
    let mut container = Vec::new();

    for variant in Variant::ALL {
        let store = subscription_trace(&session_name(variant), variant)?;
        json.push(traces.save(&store, Format::Json)?);
        container.push(traces.save(&store, Format::Container)?);
    }

    Ok(TestPaths {
        dir: dir.to_path_buf(),
        json,
        container,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fixture_generator() {
        let dir = tempdir().unwrap();
        let paths = generate_subscription_traces(dir.path()).unwrap();

        assert_eq!(paths.json.len(), Variant::ALL.len());
        for (json, bin) in paths.json.iter().zip(&paths.container) {
            assert!(json.exists());
            let header = crate::container::read_header(bin).unwrap();
            assert_eq!(header.version, 1);
            assert_eq!(crate::load(json).unwrap(), crate::load(bin).unwrap());
        }
    }
}
