//! Common test fixtures for speedgate.
//!
//! Payloads are returned as raw JSON so callers can exercise both the typed
//! path and the "persist the raw response" path.

use serde_json::{Value, json};
use speedgate_types::AuditPayload;

/// Collection of sample PSI payloads for testing.
pub mod sample_payloads {
    use super::*;

    /// A mobile run of `https://example.com/page/` scoring 0.87, with field data,
    /// two lab metrics and three load opportunities (one with zero savings).
    pub fn full() -> Value {
        json!({
            "captchaResult": "CAPTCHA_NOT_NEEDED",
            "kind": "pagespeedonline#result",
            "id": "https://example.com/page/",
            "loadingExperience": {
                "id": "https://example.com/page/",
                "metrics": {
                    "LARGEST_CONTENTFUL_PAINT_MS": {"percentile": 2300, "category": "AVERAGE"},
                    "CUMULATIVE_LAYOUT_SHIFT_SCORE": {"percentile": 5, "category": "FAST"},
                    "FIRST_INPUT_DELAY_MS": {"percentile": 0, "category": "FAST"}
                },
                "overall_category": "AVERAGE"
            },
            "lighthouseResult": {
                "requestedUrl": "https://example.com/page/",
                "categories": {
                    "performance": {
                        "id": "performance",
                        "title": "Performance",
                        "score": 0.87,
                        "auditRefs": [
                            {"id": "speed-index", "weight": 10, "group": "metrics"},
                            {"id": "first-contentful-paint", "weight": 10, "group": "metrics"},
                            {"id": "render-blocking-resources", "weight": 0, "group": "load-opportunities"},
                            {"id": "unused-javascript", "weight": 0, "group": "load-opportunities"},
                            {"id": "unminified-css", "weight": 0, "group": "load-opportunities"},
                            {"id": "dom-size", "weight": 0, "group": "diagnostics"}
                        ]
                    }
                },
                "audits": {
                    "speed-index": {
                        "id": "speed-index",
                        "title": "Speed Index",
                        "description": "Speed Index shows how quickly the contents of a page are visibly populated. [Learn more](https://web.dev/speed-index/).",
                        "score": 0.91,
                        "displayValue": "3.1\u{a0}s"
                    },
                    "first-contentful-paint": {
                        "id": "first-contentful-paint",
                        "title": "First Contentful Paint",
                        "description": "First Contentful Paint marks the time at which the first text or image is painted. [Learn more](https://web.dev/first-contentful-paint/).",
                        "score": 0.95,
                        "displayValue": "1.2\u{a0}s"
                    },
                    "render-blocking-resources": {
                        "id": "render-blocking-resources",
                        "title": "Eliminate render-blocking resources",
                        "description": "Resources are blocking the first paint of your page. [Learn more](https://web.dev/render-blocking-resources/).",
                        "score": 0.4,
                        "displayValue": "Potential savings of 1,230\u{a0}ms",
                        "details": {"type": "opportunity", "overallSavingsMs": 1230, "items": []}
                    },
                    "unused-javascript": {
                        "id": "unused-javascript",
                        "title": "Reduce unused JavaScript",
                        "description": "Reduce unused JavaScript and defer loading scripts. [Learn more](https://web.dev/unused-javascript/).",
                        "score": 0.6,
                        "details": {"type": "opportunity", "overallSavingsMs": 450, "items": []}
                    },
                    "unminified-css": {
                        "id": "unminified-css",
                        "title": "Minify CSS",
                        "description": "Minifying CSS files can reduce network payload sizes. [Learn more](https://web.dev/unminified-css/).",
                        "score": 1,
                        "details": {"type": "opportunity", "overallSavingsMs": 0, "items": []}
                    },
                    "dom-size": {
                        "id": "dom-size",
                        "title": "Avoids an excessive DOM size",
                        "displayValue": "512 elements",
                        "details": {"type": "table", "items": []}
                    }
                }
            }
        })
    }

    /// Same as [`full`] but without any `loadingExperience` block.
    pub fn without_field_data() -> Value {
        let mut value = full();
        if let Some(obj) = value.as_object_mut() {
            obj.remove("loadingExperience");
        }
        value
    }

    /// Same as [`full`] but with the given performance score.
    pub fn with_score(score: f64) -> Value {
        let mut value = full();
        value["lighthouseResult"]["categories"]["performance"]["score"] = json!(score);
        value
    }

    /// A payload whose `metrics` group references an audit that does not exist.
    pub fn missing_metric_audit() -> Value {
        let mut value = full();
        if let Some(audits) = value["lighthouseResult"]["audits"].as_object_mut() {
            audits.remove("speed-index");
        }
        value
    }

    /// A payload missing `lighthouseResult` entirely.
    pub fn malformed() -> Value {
        json!({"id": "https://example.com/", "kind": "pagespeedonline#result"})
    }

    /// [`full`] deserialized into the typed schema.
    pub fn full_typed() -> AuditPayload {
        serde_json::from_value(full()).expect("fixture should match the payload schema")
    }
}
