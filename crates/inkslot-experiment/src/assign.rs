//! Deterministic traffic bucketing.

use inkslot_types::TrafficSplit;

/// 31-multiplier rolling hash over UTF-16 code units with 32-bit wraparound.
///
/// Matches the string hash used by existing browser-side bucketing, so a
/// subject lands in the same bucket on either side.
pub fn rolling_hash(key: &str) -> i32 {
    key.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Percentile bucket in `0..100` for a subject within an experiment.
pub fn bucket(experiment_id: &str, subject_id: &str) -> u32 {
    rolling_hash(&format!("{subject_id}-{experiment_id}")).unsigned_abs() % 100
}

/// Pick the variant for `subject_id`.
///
/// Walks the split in insertion order and returns the first variant whose
/// cumulative share exceeds the bucket. Falls back to the first variant
/// when rounding leaves a gap at the top. `None` only for an empty split.
pub fn assign_variant<'s>(
    experiment_id: &str,
    subject_id: &str,
    split: &'s TrafficSplit,
) -> Option<&'s str> {
    let percentile = f64::from(bucket(experiment_id, subject_id));
    let mut cumulative = 0.0;
    for (variant, share) in split.iter() {
        cumulative += share;
        if percentile < cumulative {
            return Some(variant);
        }
    }
    split.first()
}
