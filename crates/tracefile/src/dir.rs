use crate::error::Result;
use crate::Format;
use std::fs;
use std::path::{Path, PathBuf};
use tracecheck::case::{RecorderError, SessionRecorder};
use tracecheck::EventStore;

/// A directory of recorded sessions, one trace file per session.
///
/// Sessions resolve by exact file stem first; otherwise the lexicographically
/// last stem starting with the requested prefix wins, so timestamped session
/// names (`session-x-20240101T120000`) pick the latest run.
#[derive(Debug, Clone)]
pub struct TraceDir {
    root: PathBuf,
}

impl TraceDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All trace files in the directory, sorted by path.
    pub fn sessions(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && Format::from_path(&path).is_ok() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Path of the trace file for `session`, if any.
    pub fn resolve(&self, session: &str) -> Result<Option<PathBuf>> {
        for ext in Format::EXTENSIONS {
            let exact = self.root.join(format!("{}.{}", session, ext));
            if exact.is_file() {
                return Ok(Some(exact));
            }
        }

        let candidates: Vec<PathBuf> = self
            .sessions()?
            .into_iter()
            .filter(|p| stem(p).is_some_and(|s| s.starts_with(session)))
            .collect();
        if candidates.len() > 1 {
            tracing::warn!(session, candidates = candidates.len(), "several sessions match prefix, using latest");
        }
        Ok(candidates.into_iter().max_by(|a, b| stem(a).cmp(&stem(b))))
    }

    /// Write `store` as `<root>/<session>.<ext>`.
    pub fn save(&self, store: &EventStore, format: Format) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(format!("{}.{}", store.session(), format.extension()));
        crate::save(&path, store)?;
        Ok(path)
    }
}

fn stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

impl SessionRecorder for TraceDir {
    fn load(&self, session: &str) -> std::result::Result<EventStore, RecorderError> {
        let path = self
            .resolve(session)
            .map_err(|e| RecorderError::Backend(Box::new(e)))?
            .ok_or_else(|| RecorderError::SessionNotFound(session.to_string()))?;

        tracing::debug!(path = %path.display(), "loading trace");
        crate::load(&path).map_err(|e| RecorderError::InvalidTrace {
            session: session.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tracecheck::scenario::sample::{subscription_trace, Variant};

    #[test]
    fn test_prefix_picks_latest() {
        let dir = tempdir().unwrap();
        let traces = TraceDir::new(dir.path());
        traces.save(&subscription_trace("run-20240101", Variant::Valid).unwrap(), Format::Json).unwrap();
        traces.save(&subscription_trace("run-20240102", Variant::Valid).unwrap(), Format::Container).unwrap();

        let store = traces.load("run-").unwrap();
        assert_eq!(store.session(), "run-20240102");

        let store = traces.load("run-20240101").unwrap();
        assert_eq!(store.session(), "run-20240101");
    }

    #[test]
    fn test_missing_session() {
        let dir = tempdir().unwrap();
        let traces = TraceDir::new(dir.path());
        assert!(matches!(traces.load("nothing"), Err(RecorderError::SessionNotFound(_))));
    }

    #[test]
    fn test_corrupt_file_is_invalid_trace() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{ not json").unwrap();
        let traces = TraceDir::new(dir.path());
        assert!(matches!(traces.load("bad"), Err(RecorderError::InvalidTrace { .. })));
    }
}
