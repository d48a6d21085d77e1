//! Fuzz target: `BridgeConfig::from_json`
//!
//! Feeds arbitrary UTF-8 to the config parser and checks:
//! - No panics under any input
//! - Every accepted document also passes `validate()`
//! - Accepted configs can build a salinity reader
//! - An accepted salinity window fits the watchdog budget
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use higrow::config::BridgeConfig;
use higrow::drivers::watchdog::DEFAULT_TIMEOUT_MS;
use higrow::sensors::filter::FilteredAnalogReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = BridgeConfig::from_json(text) {
        assert!(cfg.validate().is_ok());
        assert!(cfg.salinity_blocking_ms() * 2 <= u64::from(DEFAULT_TIMEOUT_MS));
        assert!(FilteredAnalogReader::new(
            usize::from(cfg.salinity_window),
            cfg.salinity_sample_delay_ms
        )
        .is_ok());
    }
});
