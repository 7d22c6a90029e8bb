use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Side effects available to the report pipeline.
///
/// The pipeline never touches stdout, the filesystem, or the clock directly.
pub trait ReportHost {
    /// Primary output channel for the rendered report.
    fn emit(&mut self, rendered: &str) -> io::Result<()>;

    /// Persist one artifact.
    fn write_artifact(&mut self, path: &Path, contents: &str) -> io::Result<()>;

    /// Clock used for artifact names.
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Writes to stdout and the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdHost;

impl ReportHost for StdHost {
    fn emit(&mut self, rendered: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{rendered}")?;
        out.flush()
    }

    fn write_artifact(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)
    }
}

/// Captures everything in memory. Used by tests and embedders that post-process output.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    pub emitted: Vec<String>,
    pub artifacts: BTreeMap<PathBuf, String>,
    pub clock: DateTime<Utc>,
    /// When set, every `write_artifact` call fails.
    pub fail_writes: bool,
}

impl MemoryHost {
    pub fn new(clock: DateTime<Utc>) -> Self {
        Self {
            emitted: Vec::new(),
            artifacts: BTreeMap::new(),
            clock,
            fail_writes: false,
        }
    }
}

impl ReportHost for MemoryHost {
    fn emit(&mut self, rendered: &str) -> io::Result<()> {
        self.emitted.push(rendered.to_string());
        Ok(())
    }

    fn write_artifact(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("write {} denied", path.display()),
            ));
        }
        self.artifacts.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn std_host_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out/report_short.json");

        StdHost.write_artifact(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn memory_host_records_and_can_fail() {
        let mut host = MemoryHost::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        host.emit("hello").unwrap();
        host.write_artifact(Path::new("a.json"), "{}").unwrap();
        assert_eq!(host.emitted, vec!["hello".to_string()]);
        assert_eq!(host.artifacts[Path::new("a.json")], "{}");

        host.fail_writes = true;
        assert!(host.write_artifact(Path::new("b.json"), "{}").is_err());
        assert!(!host.artifacts.contains_key(Path::new("b.json")));
    }
}
