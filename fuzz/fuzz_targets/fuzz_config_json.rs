//! Fuzz target: `MeshConfig::from_json`
//!
//! Arbitrary (possibly non-UTF-8) input must either parse into a validated
//! config or fail with a typed error — never panic, never yield a config
//! that `validate()` would reject.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use greenmesh::config::MeshConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(config) = MeshConfig::from_json(text) {
        assert!(config.validate().is_ok(), "from_json must only return valid configs");
    }
});
