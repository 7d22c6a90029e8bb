//! Fuzz target for duration formatting.

#![no_main]

use libfuzzer_sys::fuzz_target;

use speedgate_domain::format_duration;

fuzz_target!(|ms: f64| {
    let out = format_duration(ms);
    assert!(!out.is_empty());
    assert!(!out.contains("NaN") && !out.contains("inf"));
});
