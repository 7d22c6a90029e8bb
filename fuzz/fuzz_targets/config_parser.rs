//! Fuzz target for `speedgate.toml` parsing.
//!
//! Any text must either fail to parse or produce defaults that survive an
//! overlay onto themselves unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;

use speedgate_types::ConfigFile;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = toml::from_str::<ConfigFile>(text) else {
        return;
    };

    let merged = config.defaults.clone().overlay(config.defaults.clone());
    assert_eq!(merged, config.defaults);

    if let Some(threshold) = config.defaults.threshold {
        let _ = speedgate_types::Threshold::new(threshold);
    }
});
