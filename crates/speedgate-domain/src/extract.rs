//! Extractors: each pulls one slice of the audit payload into a [`RecordList`].

use speedgate_types::{
    AuditPayload, AuditRef, DETAILS_TYPE_OPPORTUNITY, GROUP_LOAD_OPPORTUNITIES, GROUP_METRICS,
    LABEL_PERFORMANCE, LABEL_STRATEGY, LABEL_URL, LabeledRecord, LighthouseResult, LoadingExperience,
    RecordList, Strategy,
};

use crate::format::{format_duration, format_percentage};
use crate::links::{LinkStyle, enrich_title};
use crate::sort::sort_by_label;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("audit '{id}' is referenced by auditRefs but missing from audits")]
    MissingAudit { id: String },

    #[error("metric audit '{id}' has no displayValue")]
    MissingDisplayValue { id: String },
}

/// Summary rows in fixed order: URL, Strategy, Performance. Not sorted.
pub fn overview(humanized_url: &str, strategy: Strategy, payload: &AuditPayload) -> RecordList {
    vec![
        LabeledRecord::new(LABEL_URL, humanized_url),
        LabeledRecord::new(LABEL_STRATEGY, strategy.as_str()),
        LabeledRecord::new(
            LABEL_PERFORMANCE,
            format_percentage(payload.lighthouse_result.categories.performance.score_or_zero()),
        ),
    ]
}

/// Real-user metric percentiles, one row per metric name.
///
/// Absent field data yields an empty list.
pub fn field_data(loading_experience: Option<&LoadingExperience>) -> RecordList {
    let Some(experience) = loading_experience else {
        return Vec::new();
    };

    let records = experience
        .metrics
        .iter()
        .map(|(name, metric)| LabeledRecord::new(name.as_str(), format_duration(metric.percentile)))
        .collect();

    sort_by_label(records)
}

/// Lab metrics: audits referenced from the `metrics` group, with all whitespace
/// removed from their display value (`"1.2 s"` becomes `"1.2s"`).
pub fn lab_data(result: &LighthouseResult) -> Result<RecordList, ExtractError> {
    let mut records = Vec::new();

    for audit_ref in refs_in_group(result, GROUP_METRICS) {
        let audit = result
            .audits
            .get(&audit_ref.id)
            .ok_or_else(|| ExtractError::MissingAudit {
                id: audit_ref.id.clone(),
            })?;
        let display = audit
            .display_value
            .as_deref()
            .ok_or_else(|| ExtractError::MissingDisplayValue {
                id: audit_ref.id.clone(),
            })?;

        let value: String = display
            .chars()
            .filter(|c| !is_display_whitespace(*c))
            .collect();
        records.push(LabeledRecord::new(audit.title.as_str(), value));
    }

    Ok(sort_by_label(records))
}

/// Whitespace as matched by ECMAScript `\s`: Unicode `White_Space`
/// minus NEL (U+0085), plus the byte-order mark (U+FEFF).
fn is_display_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => c.is_whitespace(),
    }
}

/// Load opportunities with a strictly positive savings estimate.
///
/// Labels are link-enriched before sorting, so link markup takes part in the
/// sort key.
pub fn opportunities(
    result: &LighthouseResult,
    links_enabled: bool,
    style: LinkStyle,
) -> Result<RecordList, ExtractError> {
    let mut records = Vec::new();

    for audit_ref in refs_in_group(result, GROUP_LOAD_OPPORTUNITIES) {
        let audit = result
            .audits
            .get(&audit_ref.id)
            .ok_or_else(|| ExtractError::MissingAudit {
                id: audit_ref.id.clone(),
            })?;

        let Some(details) = &audit.details else {
            continue;
        };
        if details.kind.as_deref() != Some(DETAILS_TYPE_OPPORTUNITY) {
            continue;
        }
        let savings = match details.overall_savings_ms {
            Some(ms) if ms > 0.0 => ms,
            _ => continue,
        };

        let label = enrich_title(
            &audit.title,
            audit.description.as_deref(),
            links_enabled,
            style,
        );
        records.push(LabeledRecord::new(label, format_duration(savings)));
    }

    Ok(sort_by_label(records))
}

fn refs_in_group<'a>(
    result: &'a LighthouseResult,
    group: &'a str,
) -> impl Iterator<Item = &'a AuditRef> + 'a {
    result
        .categories
        .performance
        .audit_refs
        .iter()
        .filter(move |r| r.in_group(group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use speedgate_types::{Audit, AuditDetails, FieldMetric};

    fn payload() -> AuditPayload {
        serde_json::from_value(serde_json::json!({
            "id": "https://example.com/",
            "lighthouseResult": {
                "categories": {
                    "performance": {
                        "score": 0.873,
                        "auditRefs": [
                            {"id": "speed-index", "group": "metrics"},
                            {"id": "first-contentful-paint", "group": "metrics"},
                            {"id": "render-blocking-resources", "group": "load-opportunities"},
                            {"id": "unused-css-rules", "group": "load-opportunities"},
                            {"id": "uses-webp-images", "group": "load-opportunities"},
                            {"id": "dom-size", "group": "diagnostics"},
                            {"id": "no-group"}
                        ]
                    }
                },
                "audits": {
                    "speed-index": {"title": "Speed Index", "displayValue": "3.4\u{a0}s"},
                    "first-contentful-paint": {"title": "First Contentful Paint", "displayValue": "1.2 s"},
                    "render-blocking-resources": {
                        "title": "Eliminate render-blocking resources",
                        "description": "Resources are blocking the first paint. [Learn more](https://web.dev/render-blocking-resources/).",
                        "details": {"type": "opportunity", "overallSavingsMs": 1200}
                    },
                    "unused-css-rules": {
                        "title": "Reduce unused CSS",
                        "details": {"type": "opportunity", "overallSavingsMs": 0}
                    },
                    "uses-webp-images": {
                        "title": "Serve images in next-gen formats",
                        "details": {"type": "table", "overallSavingsMs": 500}
                    },
                    "dom-size": {"title": "Avoid an excessive DOM size", "displayValue": "1,200 elements"}
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn overview_has_fixed_order() {
        let p = payload();
        let rows = overview("example.com", Strategy::Desktop, &p);
        assert_eq!(
            rows,
            vec![
                LabeledRecord::new("URL", "example.com"),
                LabeledRecord::new("Strategy", "desktop"),
                LabeledRecord::new("Performance", "87"),
            ]
        );
    }

    #[test]
    fn field_data_formats_percentiles_and_sorts() {
        let mut experience = LoadingExperience::default();
        experience.metrics.insert(
            "LARGEST_CONTENTFUL_PAINT_MS".to_string(),
            FieldMetric { percentile: 2500.0 },
        );
        experience.metrics.insert(
            "FIRST_INPUT_DELAY_MS".to_string(),
            FieldMetric { percentile: 12.0 },
        );

        let rows = field_data(Some(&experience));
        assert_eq!(
            rows,
            vec![
                LabeledRecord::new("FIRST_INPUT_DELAY_MS", "12ms"),
                LabeledRecord::new("LARGEST_CONTENTFUL_PAINT_MS", "2.5s"),
            ]
        );
    }

    #[test]
    fn field_data_empty_or_missing_is_empty() {
        assert!(field_data(None).is_empty());
        assert!(field_data(Some(&LoadingExperience::default())).is_empty());
    }

    #[test]
    fn lab_data_strips_whitespace_and_sorts() {
        let p = payload();
        let rows = lab_data(&p.lighthouse_result).unwrap();
        assert_eq!(
            rows,
            vec![
                LabeledRecord::new("First Contentful Paint", "1.2s"),
                LabeledRecord::new("Speed Index", "3.4s"),
            ]
        );
    }

    #[test]
    fn lab_data_missing_audit_is_an_error() {
        let mut p = payload();
        p.lighthouse_result.audits.remove("speed-index");
        let err = lab_data(&p.lighthouse_result).unwrap_err();
        assert_eq!(
            err,
            ExtractError::MissingAudit {
                id: "speed-index".to_string()
            }
        );
    }

    #[test]
    fn lab_data_missing_display_value_is_an_error() {
        let mut p = payload();
        p.lighthouse_result.audits.insert(
            "speed-index".to_string(),
            Audit {
                title: "Speed Index".to_string(),
                description: None,
                display_value: None,
                details: None,
            },
        );
        assert!(matches!(
            lab_data(&p.lighthouse_result),
            Err(ExtractError::MissingDisplayValue { .. })
        ));
    }

    #[test]
    fn opportunities_keep_only_positive_savings() {
        let p = payload();
        let rows = opportunities(&p.lighthouse_result, false, LinkStyle::Terminal).unwrap();
        assert_eq!(
            rows,
            vec![LabeledRecord::new(
                "Eliminate render-blocking resources",
                "1.2s"
            )]
        );
    }

    #[test]
    fn opportunities_include_one_millisecond_savings() {
        let mut p = payload();
        p.lighthouse_result.audits.insert(
            "unused-css-rules".to_string(),
            Audit {
                title: "Reduce unused CSS".to_string(),
                description: None,
                display_value: None,
                details: Some(AuditDetails {
                    kind: Some("opportunity".to_string()),
                    overall_savings_ms: Some(1.0),
                }),
            },
        );

        let rows = opportunities(&p.lighthouse_result, false, LinkStyle::Terminal).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], LabeledRecord::new("Reduce unused CSS", "1ms"));
    }

    #[test]
    fn opportunities_skip_audits_without_details() {
        let mut p = payload();
        p.lighthouse_result
            .audits
            .get_mut("render-blocking-resources")
            .unwrap()
            .details = None;
        let rows = opportunities(&p.lighthouse_result, false, LinkStyle::Plain).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn opportunities_enrich_labels_when_links_enabled() {
        let p = payload();
        let rows = opportunities(&p.lighthouse_result, true, LinkStyle::Plain).unwrap();
        assert_eq!(
            rows[0].label,
            "Eliminate render-blocking resources (https://web.dev/render-blocking-resources/)"
        );
    }

    #[test]
    fn opportunities_sort_on_enriched_label() {
        let mut p = payload();
        p.lighthouse_result.categories.performance.audit_refs = vec![
            AuditRef {
                id: "b".to_string(),
                group: Some("load-opportunities".to_string()),
            },
            AuditRef {
                id: "a".to_string(),
                group: Some("load-opportunities".to_string()),
            },
        ];
        let opportunity = |title: &str, description: Option<&str>| Audit {
            title: title.to_string(),
            description: description.map(str::to_string),
            display_value: None,
            details: Some(AuditDetails {
                kind: Some("opportunity".to_string()),
                overall_savings_ms: Some(100.0),
            }),
        };
        p.lighthouse_result
            .audits
            .insert("a".to_string(), opportunity("Alpha", None));
        p.lighthouse_result.audits.insert(
            "b".to_string(),
            opportunity("Beta", Some("[Learn more](https://beta.test/)")),
        );

        // The escape byte sorts before any letter, so the linked title comes first
        // even though its visible text sorts last.
        let rows = opportunities(&p.lighthouse_result, true, LinkStyle::Terminal).unwrap();
        assert!(rows[0].label.starts_with('\u{1b}'));
        assert!(rows[0].label.contains("Beta"));
        assert_eq!(rows[1].label, "Alpha");
    }

    #[test]
    fn opportunities_missing_audit_is_an_error() {
        let mut p = payload();
        p.lighthouse_result.audits.remove("uses-webp-images");
        assert_eq!(
            opportunities(&p.lighthouse_result, false, LinkStyle::Plain).unwrap_err(),
            ExtractError::MissingAudit {
                id: "uses-webp-images".to_string()
            }
        );
    }

    #[test]
    fn lab_values_drop_bom_but_keep_nel() {
        let mut p = payload();
        p.lighthouse_result
            .audits
            .get_mut("speed-index")
            .unwrap()
            .display_value = Some("\u{feff}3.4\u{2009}s\u{85}".to_string());

        let rows = lab_data(&p.lighthouse_result).unwrap();
        let speed_index = rows.iter().find(|r| r.label == "Speed Index").unwrap();
        assert_eq!(speed_index.value, "3.4s\u{85}");
    }

    #[test]
    fn sample_fixture_extracts_lab_and_opportunities() {
        let p = speedgate_testkit::sample_payloads::full_typed();

        assert_eq!(
            lab_data(&p.lighthouse_result).unwrap(),
            vec![
                LabeledRecord::new("First Contentful Paint", "1.2s"),
                LabeledRecord::new("Speed Index", "3.1s"),
            ]
        );
        assert_eq!(
            opportunities(&p.lighthouse_result, false, LinkStyle::Plain).unwrap(),
            vec![
                LabeledRecord::new("Eliminate render-blocking resources", "1.2s"),
                LabeledRecord::new("Reduce unused JavaScript", "450ms"),
            ]
        );
        assert_eq!(field_data(p.loading_experience.as_ref()).len(), 3);
    }
}
