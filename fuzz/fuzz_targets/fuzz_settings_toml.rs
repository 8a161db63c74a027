//! Fuzz target for settings file parsing.
//!
//! Any input either fails to load or yields settings that pass validation
//! and survive a TOML round trip.

#![no_main]

use inkslot_settings::InkslotSettings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(settings) = InkslotSettings::from_toml_str(text) else {
        return;
    };
    assert!(settings.validate().is_ok());

    if let Ok(rendered) = toml::to_string(&settings) {
        let back = InkslotSettings::from_toml_str(&rendered).expect("rendered settings reload");
        assert_eq!(settings, back);
    }
});
