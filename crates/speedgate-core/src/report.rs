use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, error, info};

use speedgate_domain::{
    ExtractError, GateStatus, LinkStyle, ThresholdGate, ThresholdNotMet, field_data, humanize_url,
    lab_data, opportunities, overview, score_percent,
};
use speedgate_types::{AuditPayload, Format, RenderInput, Strategy, Threshold};

use crate::artifact::{artifact_paths, artifact_stem};
use crate::host::ReportHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub format: Format,
    pub strategy: Strategy,
    /// `None` falls back to [`Threshold::default`].
    pub threshold: Option<Threshold>,
    /// Attach documentation links to opportunity titles.
    pub links: bool,
    /// Persist `_short.json` / `_full.json` artifacts (json format only).
    pub to_file: bool,
    /// Directory for persisted artifacts. Relative to the working directory when unset.
    pub file_path: Option<PathBuf>,
    /// Master switch for persistence; hosts that must never write files clear it.
    pub persistence_enabled: bool,
}

impl Default for ReportPlan {
    fn default() -> Self {
        Self {
            format: Format::Cli,
            strategy: Strategy::Mobile,
            threshold: None,
            links: false,
            to_file: false,
            file_path: None,
            persistence_enabled: true,
        }
    }
}

/// Terminal outcome of a report: the gate decision, separate from tool faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    ThresholdFailed(ThresholdNotMet),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRun {
    pub input: RenderInput,
    pub rendered: String,
    /// Performance score as an integer percentage.
    pub score: u8,
    pub gate: GateStatus,
    pub verdict: Verdict,
    /// Artifacts that were written successfully.
    pub artifacts: Vec<PathBuf>,
}

impl ReportRun {
    pub fn threshold_failure(&self) -> Option<&ThresholdNotMet> {
        match &self.verdict {
            Verdict::Passed => None,
            Verdict::ThresholdFailed(failure) => Some(failure),
        }
    }

    /// 0 when the gate passed, 2 when the threshold was not met.
    pub fn exit_code(&self) -> i32 {
        match self.verdict {
            Verdict::Passed => 0,
            Verdict::ThresholdFailed(_) => 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("payload does not match the expected audit schema: {0}")]
    Payload(#[source] serde_json::Error),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("render {format} report: {source}")]
    Render {
        format: &'static str,
        source: serde_json::Error,
    },

    #[error("emit report: {0}")]
    Emit(#[source] std::io::Error),
}

/// Runs the full pipeline over a raw PSI payload.
///
/// The report is emitted (and persisted, when enabled) before the threshold is
/// checked, so a failing score still produces output. A threshold failure is
/// reported through [`Verdict`], never as an `Err`.
pub fn run_report(
    plan: &ReportPlan,
    raw: &serde_json::Value,
    host: &mut dyn ReportHost,
) -> Result<ReportRun, ReportError> {
    let threshold = plan.threshold.unwrap_or_default();
    let style = link_style(plan.format);
    debug!(
        "Resolved format={} threshold={} links={}",
        plan.format.as_str(),
        threshold,
        plan.links
    );

    let payload = AuditPayload::deserialize(raw).map_err(ReportError::Payload)?;
    let humanized = humanize_url(&payload.id);
    let result = &payload.lighthouse_result;

    let input = RenderInput {
        overview: overview(&humanized, plan.strategy, &payload),
        field_data: field_data(payload.loading_experience.as_ref()),
        lab_data: lab_data(result)?,
        opportunities: opportunities(result, plan.links, style)?,
        threshold,
    };
    debug!(
        "Extracted {} field metric(s), {} lab metric(s), {} opportunit(ies)",
        input.field_data.len(),
        input.lab_data.len(),
        input.opportunities.len()
    );

    let rendered = render(plan.format, &input)?;
    host.emit(&rendered).map_err(ReportError::Emit)?;

    let artifacts = if plan.to_file && plan.format.is_machine_readable() && plan.persistence_enabled
    {
        persist(plan, &humanized, &rendered, raw, host)
    } else {
        Vec::new()
    };

    let score = score_percent(result.categories.performance.score_or_zero());
    let mut gate = ThresholdGate::new(threshold);
    let verdict = match gate.evaluate(score) {
        Ok(()) => Verdict::Passed,
        Err(failure) => Verdict::ThresholdFailed(failure),
    };
    info!(
        "Performance score {} against threshold {}: {}",
        score,
        threshold,
        gate.status().as_str()
    );

    Ok(ReportRun {
        input,
        rendered,
        score,
        gate: gate.status(),
        verdict,
        artifacts,
    })
}

/// Dispatches to the renderer backend for `format`.
pub fn render(format: Format, input: &RenderInput) -> Result<String, ReportError> {
    match format {
        Format::Cli => Ok(crate::render::render_cli(input)),
        Format::Json => crate::json::render_json(input).map_err(|source| ReportError::Render {
            format: format.as_str(),
            source,
        }),
    }
}

fn link_style(format: Format) -> LinkStyle {
    match format {
        Format::Cli => LinkStyle::Terminal,
        Format::Json => LinkStyle::Plain,
    }
}

/// Writes the short and full artifacts. Failures are logged and skipped.
fn persist(
    plan: &ReportPlan,
    humanized: &str,
    rendered: &str,
    raw: &serde_json::Value,
    host: &mut dyn ReportHost,
) -> Vec<PathBuf> {
    let stem = artifact_stem(humanized, plan.strategy, host.now());
    let paths = artifact_paths(plan.file_path.as_deref(), &stem);
    let mut written = Vec::new();

    match host.write_artifact(&paths.short, rendered) {
        Ok(()) => written.push(paths.short),
        Err(err) => error!("failed to write {}: {}", paths.short.display(), err),
    }

    match serde_json::to_string(raw) {
        Ok(full) => match host.write_artifact(&paths.full, &full) {
            Ok(()) => written.push(paths.full),
            Err(err) => error!("failed to write {}: {}", paths.full.display(), err),
        },
        Err(err) => error!("failed to serialize raw payload: {}", err),
    }

    for path in &written {
        info!("Wrote {}", path.display());
    }
    written
}
