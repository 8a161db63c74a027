//! Fuzz target for the `run_json` binding entrypoint.
//!
//! Whatever the mode and arguments, the output is a JSON envelope with a
//! boolean `ok` and either `data` or `error`.

#![no_main]

use inkslot_core::ffi::run_json;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

const MAX_INPUT_SIZE: usize = 64 * 1024;
const MODES: [&str; 6] = ["analyze", "placements", "assign", "generate", "version", "bogus"];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > MAX_INPUT_SIZE {
        return;
    }
    let mode = MODES[usize::from(data[0]) % MODES.len()];
    let Ok(args) = std::str::from_utf8(&data[1..]) else {
        return;
    };

    let out = run_json(mode, args);
    let v: Value = serde_json::from_str(&out).expect("envelope is JSON");
    match v["ok"].as_bool() {
        Some(true) => assert!(v.get("data").is_some()),
        Some(false) => assert!(v["error"]["code"].is_string()),
        None => panic!("missing ok flag: {out}"),
    }
});
