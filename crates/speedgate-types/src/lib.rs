//! Data types (payload schema, labeled records, config) for speedgate.
//!
//! This crate is intentionally "dumb": pure DTOs with serde + schemars.

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ── Frozen Vocabulary ──────────────────────────────────────────
// Audit groups referenced from `categories.performance.auditRefs`.
pub const GROUP_METRICS: &str = "metrics";
pub const GROUP_LOAD_OPPORTUNITIES: &str = "load-opportunities";

// `details.type` of audits that carry a savings estimate.
pub const DETAILS_TYPE_OPPORTUNITY: &str = "opportunity";

// Overview labels, in display order.
pub const LABEL_URL: &str = "URL";
pub const LABEL_STRATEGY: &str = "Strategy";
pub const LABEL_PERFORMANCE: &str = "Performance";

/// Score used when neither the CLI, the environment, nor a config file sets one.
pub const DEFAULT_THRESHOLD: u8 = 70;

// ── Records ────────────────────────────────────────────────────

/// One display row: a label and its pre-formatted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LabeledRecord {
    pub label: String,
    pub value: String,
}

impl LabeledRecord {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub type RecordList = Vec<LabeledRecord>;

/// Analysis strategy the payload was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format; selects the renderer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Cli,
    Json,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Cli => "cli",
            Format::Json => "json",
        }
    }

    /// Only the machine-readable format is eligible for file persistence.
    pub fn is_machine_readable(self) -> bool {
        matches!(self, Format::Json)
    }
}

// ── Threshold ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("threshold must be between 0 and 100, got {0}")]
pub struct ThresholdRangeError(pub u32);

/// Minimum acceptable performance score, as an integer percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u8);

impl Threshold {
    pub fn new(value: u32) -> Result<Self, ThresholdRangeError> {
        if value > 100 {
            return Err(ThresholdRangeError(value));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<u8> for Threshold {
    type Error = ThresholdRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(u32::from(value))
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Render input ───────────────────────────────────────────────

/// Everything a renderer backend consumes. Built once per report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderInput {
    pub overview: RecordList,
    pub field_data: RecordList,
    pub lab_data: RecordList,
    pub opportunities: RecordList,
    pub threshold: Threshold,
}

/// Wire shape of the `json` renderer output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub overview: RecordList,
    pub field_data: RecordList,
    pub lab_data: RecordList,
    pub opportunities: RecordList,
    #[schemars(range(max = 100))]
    pub threshold: u8,
}

impl From<&RenderInput> for JsonReport {
    fn from(input: &RenderInput) -> Self {
        Self {
            overview: input.overview.clone(),
            field_data: input.field_data.clone(),
            lab_data: input.lab_data.clone(),
            opportunities: input.opportunities.clone(),
            threshold: input.threshold.get(),
        }
    }
}

// ── Audit payload ──────────────────────────────────────────────
//
// Only the fields the report reads are modelled; unknown fields are ignored
// so the full upstream payload deserializes as-is.

/// Top level of a PageSpeed Insights `runPagespeed` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditPayload {
    /// Page identifier (the analyzed URL).
    pub id: String,
    pub lighthouse_result: LighthouseResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loading_experience: Option<LoadingExperience>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LighthouseResult {
    pub categories: Categories,
    #[serde(default)]
    pub audits: BTreeMap<String, Audit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub performance: PerformanceCategory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceCategory {
    /// Score in `[0, 1]`. Lighthouse sends `null` when the run errored.
    pub score: Option<f64>,
    #[serde(default)]
    pub audit_refs: Vec<AuditRef>,
}

impl PerformanceCategory {
    /// The score, with a missing or `null` score counted as `0`.
    pub fn score_or_zero(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl AuditRef {
    pub fn in_group(&self, group: &str) -> bool {
        self.group.as_deref() == Some(group)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_savings_ms: Option<f64>,
}

/// Real-user (field) data block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadingExperience {
    #[serde(default)]
    pub metrics: BTreeMap<String, FieldMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetric {
    /// 75th percentile, in milliseconds.
    pub percentile: f64,
}

// ── Configuration ──────────────────────────────────────────────

/// The on-disk configuration file (`speedgate.toml`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFile {
    /// Include other config files. Paths are relative to this config file's directory.
    /// Later files override earlier ones field by field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<String>,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_file: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl Defaults {
    /// Field-wise overlay: values set in `other` win.
    pub fn overlay(self, other: Defaults) -> Defaults {
        Defaults {
            threshold: other.threshold.or(self.threshold),
            format: other.format.or(self.format),
            strategy: other.strategy.or(self.strategy),
            links: other.links.or(self.links),
            to_file: other.to_file.or(self.to_file),
            file_path: other.file_path.or(self.file_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_accepts_bounds_and_rejects_above_100() {
        assert_eq!(Threshold::new(0).unwrap().get(), 0);
        assert_eq!(Threshold::new(100).unwrap().get(), 100);
        assert_eq!(Threshold::new(101), Err(ThresholdRangeError(101)));
        assert_eq!(
            Threshold::new(250).unwrap_err().to_string(),
            "threshold must be between 0 and 100, got 250"
        );
    }

    #[test]
    fn threshold_default_is_seventy() {
        assert_eq!(Threshold::default().get(), DEFAULT_THRESHOLD);
        assert_eq!(Threshold::default().to_string(), "70");
    }

    #[test]
    fn payload_deserializes_with_unknown_fields_and_missing_field_data() {
        let json = r#"{
            "id": "https://example.com/",
            "analysisUTCTimestamp": "2024-01-01T00:00:00Z",
            "lighthouseResult": {
                "categories": {
                    "performance": {
                        "score": 0.5,
                        "auditRefs": [{"id": "first-contentful-paint", "weight": 10, "group": "metrics"}]
                    }
                },
                "audits": {
                    "first-contentful-paint": {
                        "title": "First Contentful Paint",
                        "displayValue": "1.2 s",
                        "score": 0.9
                    }
                }
            }
        }"#;

        let payload: AuditPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.id, "https://example.com/");
        assert!(payload.loading_experience.is_none());
        assert!(payload.lighthouse_result.categories.performance.audit_refs[0].in_group("metrics"));
        assert_eq!(
            payload.lighthouse_result.audits["first-contentful-paint"]
                .display_value
                .as_deref(),
            Some("1.2 s")
        );
    }

    #[test]
    fn null_or_missing_score_counts_as_zero() {
        let null: PerformanceCategory = serde_json::from_str(r#"{"score": null}"#).unwrap();
        assert_eq!(null.score, None);
        assert_eq!(null.score_or_zero(), 0.0);

        let missing: PerformanceCategory = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.score_or_zero(), 0.0);

        let set: PerformanceCategory = serde_json::from_str(r#"{"score": 0.42}"#).unwrap();
        assert_eq!(set.score_or_zero(), 0.42);
    }

    #[test]
    fn audit_details_reads_type_and_savings() {
        let json = r#"{"type": "opportunity", "overallSavingsMs": 150.5, "items": []}"#;
        let details: AuditDetails = serde_json::from_str(json).unwrap();
        assert_eq!(details.kind.as_deref(), Some("opportunity"));
        assert_eq!(details.overall_savings_ms, Some(150.5));
    }

    #[test]
    fn json_report_uses_camel_case_keys() {
        let input = RenderInput {
            overview: vec![LabeledRecord::new("URL", "example.com")],
            field_data: vec![],
            lab_data: vec![],
            opportunities: vec![],
            threshold: Threshold::default(),
        };
        let value = serde_json::to_value(JsonReport::from(&input)).unwrap();
        assert!(value.get("fieldData").is_some());
        assert!(value.get("labData").is_some());
        assert_eq!(value["threshold"], 70);
        assert_eq!(value["overview"][0]["label"], "URL");
    }

    #[test]
    fn defaults_overlay_prefers_other() {
        let base = Defaults {
            threshold: Some(50),
            format: Some(Format::Cli),
            links: Some(true),
            ..Defaults::default()
        };
        let other = Defaults {
            threshold: Some(90),
            strategy: Some(Strategy::Desktop),
            ..Defaults::default()
        };

        let merged = base.overlay(other);
        assert_eq!(merged.threshold, Some(90));
        assert_eq!(merged.format, Some(Format::Cli));
        assert_eq!(merged.strategy, Some(Strategy::Desktop));
        assert_eq!(merged.links, Some(true));
    }

    #[test]
    fn only_json_is_machine_readable() {
        assert!(Format::Json.is_machine_readable());
        assert!(!Format::Cli.is_machine_readable());
    }
}
