use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use speedgate_types::Strategy;

/// Sibling files written for one persisted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The rendered report.
    pub short: PathBuf,
    /// The raw payload.
    pub full: PathBuf,
}

/// Makes a humanized URL safe for a file name: `.` becomes `-`, `/` becomes `--`.
pub fn sanitize_url(humanized_url: &str) -> String {
    humanized_url.replace('.', "-").replace('/', "--")
}

/// UTC timestamp at second precision with every separator removed: `YYYYMMDDHHMMSS`.
pub fn compact_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S")
        .to_string()
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// `{sanitized-url}_{strategy}_{timestamp}`.
pub fn artifact_stem(humanized_url: &str, strategy: Strategy, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}",
        sanitize_url(humanized_url),
        strategy.as_str(),
        compact_timestamp(now)
    )
}

pub fn artifact_paths(dir: Option<&Path>, stem: &str) -> ArtifactPaths {
    let short = format!("{stem}_short.json");
    let full = format!("{stem}_full.json");
    match dir {
        Some(dir) => ArtifactPaths {
            short: dir.join(short),
            full: dir.join(full),
        },
        None => ArtifactPaths {
            short: PathBuf::from(short),
            full: PathBuf::from(full),
        },
    }
}
