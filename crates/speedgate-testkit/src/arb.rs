//! Proptest strategies for generating valid test inputs.
//!
//! Payload strategies are constructive: every generated `auditRef` points at an
//! audit that exists, so extraction never fails on generated input.
//!
//! # Bounds
//!
//! - Max records per list: 12
//! - Max metric audits per payload: 8
//! - Max opportunity audits per payload: 8
//! - Max field metrics per payload: 6

use std::collections::BTreeMap;

use proptest::prelude::*;
use speedgate_types::{
    Audit, AuditDetails, AuditPayload, AuditRef, Categories, FieldMetric, LabeledRecord,
    LighthouseResult, LoadingExperience, PerformanceCategory, RecordList, Strategy as Analysis,
    Threshold,
};

pub const MAX_RECORDS: usize = 12;
pub const MAX_METRIC_AUDITS: usize = 8;
pub const MAX_OPPORTUNITY_AUDITS: usize = 8;
pub const MAX_FIELD_METRICS: usize = 6;

/// Display labels: mixed case so case-sensitive ordering is exercised.
pub fn arb_label() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z][A-Za-z0-9 _-]{0,24}").expect("valid regex")
}

pub fn arb_record_list() -> impl Strategy<Value = RecordList> {
    prop::collection::vec(
        (arb_label(), "[0-9]{1,4}(ms|s)").prop_map(|(l, v)| LabeledRecord::new(l, v)),
        0..=MAX_RECORDS,
    )
}

/// Performance score in `[0, 1]`.
pub fn arb_score() -> impl Strategy<Value = f64> {
    0.0f64..=1.0
}

pub fn arb_threshold() -> impl Strategy<Value = Threshold> {
    (0u32..=100).prop_map(|t| Threshold::new(t).expect("in range"))
}

pub fn arb_strategy() -> impl Strategy<Value = Analysis> {
    prop_oneof![Just(Analysis::Mobile), Just(Analysis::Desktop)]
}

/// Savings estimates, with zero over-represented so the exclusion path is hit.
pub fn arb_savings_ms() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(1.0),
        0.0f64..10_000.0,
    ]
}

fn arb_metric_audit() -> impl Strategy<Value = Audit> {
    (arb_label(), "[0-9]{1,2}(\\.[0-9])? (s|ms)").prop_map(|(title, display)| Audit {
        title,
        description: None,
        display_value: Some(display),
        details: None,
    })
}

fn arb_opportunity_audit() -> impl Strategy<Value = Audit> {
    (
        arb_label(),
        proptest::option::of("[a-z]{1,10}"),
        prop_oneof![Just("opportunity".to_string()), Just("table".to_string())],
        arb_savings_ms(),
    )
        .prop_map(|(title, slug, kind, savings)| Audit {
            title,
            description: slug.map(|s| format!("Details. [Learn more](https://web.dev/{s}/).")),
            display_value: None,
            details: Some(AuditDetails {
                kind: Some(kind),
                overall_savings_ms: Some(savings),
            }),
        })
}

/// A structurally valid payload with consistent refs and audits.
pub fn arb_payload() -> impl Strategy<Value = AuditPayload> {
    (
        arb_score(),
        prop::collection::vec(arb_metric_audit(), 0..=MAX_METRIC_AUDITS),
        prop::collection::vec(arb_opportunity_audit(), 0..=MAX_OPPORTUNITY_AUDITS),
        prop::collection::btree_map("[A-Z_]{3,20}", 0.0f64..20_000.0, 0..=MAX_FIELD_METRICS),
    )
        .prop_map(|(score, metrics, opportunities, field)| {
            let mut audits = BTreeMap::new();
            let mut audit_refs = Vec::new();

            for (i, audit) in metrics.into_iter().enumerate() {
                let id = format!("metric-{i}");
                audit_refs.push(AuditRef {
                    id: id.clone(),
                    group: Some("metrics".to_string()),
                });
                audits.insert(id, audit);
            }
            for (i, audit) in opportunities.into_iter().enumerate() {
                let id = format!("opportunity-{i}");
                audit_refs.push(AuditRef {
                    id: id.clone(),
                    group: Some("load-opportunities".to_string()),
                });
                audits.insert(id, audit);
            }

            let metrics = field
                .into_iter()
                .map(|(name, percentile)| (name, FieldMetric { percentile }))
                .collect();

            AuditPayload {
                id: "https://example.com/".to_string(),
                lighthouse_result: LighthouseResult {
                    categories: Categories {
                        performance: PerformanceCategory {
                            score: Some(score),
                            audit_refs,
                        },
                    },
                    audits,
                },
                loading_experience: Some(LoadingExperience { metrics }),
            }
        })
}
