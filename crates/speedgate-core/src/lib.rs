//! Core engine: orchestrates payload extraction + rendering + persistence +
//! threshold gating.

mod artifact;
mod host;
mod json;
mod render;
mod report;

pub use artifact::{ArtifactPaths, artifact_paths, artifact_stem, compact_timestamp, sanitize_url};
pub use host::{MemoryHost, ReportHost, StdHost};
pub use json::render_json;
pub use render::render_cli;
pub use report::{ReportError, ReportPlan, ReportRun, Verdict, render, run_report};
