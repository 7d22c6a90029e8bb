//! Fuzz target for the report pipeline.
//!
//! Arbitrary bytes are parsed as JSON and fed through `run_report` for every
//! format. The pipeline must return `Ok` or `Err` and never panic, and a
//! successful run must always record its verdict on the gate.

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;

use speedgate_core::{MemoryHost, ReportPlan, run_report};
use speedgate_domain::GateStatus;
use speedgate_types::{Format, Strategy, Threshold};

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    json: bool,
    desktop: bool,
    links: bool,
    to_file: bool,
    threshold: Option<u8>,
    payload: Vec<u8>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(raw) = serde_json::from_slice::<serde_json::Value>(&input.payload) else {
        return;
    };

    let plan = ReportPlan {
        format: if input.json { Format::Json } else { Format::Cli },
        strategy: if input.desktop {
            Strategy::Desktop
        } else {
            Strategy::Mobile
        },
        threshold: input
            .threshold
            .and_then(|t| Threshold::new(u32::from(t)).ok()),
        links: input.links,
        to_file: input.to_file,
        file_path: None,
        persistence_enabled: true,
    };

    let Some(clock) = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single() else {
        return;
    };
    let mut host = MemoryHost::new(clock);

    if let Ok(run) = run_report(&plan, &raw, &mut host) {
        assert_ne!(run.gate, GateStatus::Pending);
        assert!(run.score <= 100);
        assert_eq!(host.emitted.len(), 1);
    }
});
