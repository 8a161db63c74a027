//! Fuzz target for deterministic traffic-split assignment.
//!
//! Validates:
//! - Buckets stay in 0..100
//! - Assignment is pure and always names a variant from the split

#![no_main]

use inkslot_experiment::{assign_variant, bucket};
use inkslot_types::TrafficSplit;
use libfuzzer_sys::fuzz_target;

const MAX_INPUT_SIZE: usize = 4 * 1024;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 || data.len() > MAX_INPUT_SIZE {
        return;
    }
    let variants = usize::from(data[0] % 6) + 1;
    let (shares, rest) = data[1..].split_at(variants.min(data.len() - 1));
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let (experiment, subject) = text.split_once('|').unwrap_or(("exp", text));

    let split: TrafficSplit = shares
        .iter()
        .enumerate()
        .map(|(i, s)| (format!("v{i}"), f64::from(*s)))
        .collect();

    assert!(bucket(experiment, subject) < 100);
    let chosen = assign_variant(experiment, subject, &split);
    assert_eq!(chosen, assign_variant(experiment, subject, &split));
    match chosen {
        Some(id) => assert!(split.contains(id)),
        None => assert!(split.is_empty()),
    }
});
