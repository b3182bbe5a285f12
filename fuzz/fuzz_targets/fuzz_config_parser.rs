//! Fuzz target for `itemguard.toml` parsing and resolution.
//!
//! Goal: parsing may fail, but neither parsing nor resolving a parsed
//! config may panic. Out-of-range values become warnings.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use itemguard_settings::{Overrides, parse_config_toml, resolve_config};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = parse_config_toml(text) {
        let resolved = resolve_config(cfg, Overrides::default());
        assert!(!resolved.effective.profile.is_empty());
    }
});
