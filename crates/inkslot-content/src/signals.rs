//! Keyword-dictionary signal detection.

use inkslot_lexicon::KeywordEntry;
use inkslot_math::{clamp_unit, round_f64};
use inkslot_types::Signal;

/// Weight of keyword coverage (fraction of an entry's keywords seen at least once).
pub const COVERAGE_WEIGHT: f64 = 0.7;
/// Weight of the occurrence bonus.
pub const OCCURRENCE_WEIGHT: f64 = 0.5;
/// Occurrences at which the bonus saturates.
pub const OCCURRENCE_SATURATION: f64 = 10.0;

/// Count word-bounded occurrences of `needle` in `haystack`.
///
/// Both sides are expected to be lowercase already. A match only counts
/// when it is not glued to a letter or digit on either side.
pub fn count_term(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .match_indices(needle)
        .filter(|(idx, _)| {
            let before = haystack[..*idx].chars().next_back();
            let after = haystack[idx + needle.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .count()
}

/// Confidence for one dictionary entry, `None` when nothing matched.
pub fn entry_confidence(text_lower: &str, entry: &KeywordEntry) -> Option<f64> {
    if entry.keywords.is_empty() {
        return None;
    }
    let mut matched = 0usize;
    let mut occurrences = 0usize;
    for kw in entry.keywords {
        let n = count_term(text_lower, kw);
        if n > 0 {
            matched += 1;
            occurrences += n;
        }
    }
    if matched == 0 {
        return None;
    }
    let coverage = matched as f64 / entry.keywords.len() as f64;
    let bonus = (occurrences as f64 / OCCURRENCE_SATURATION).min(1.0);
    Some(round_f64(
        clamp_unit(coverage * COVERAGE_WEIGHT + bonus * OCCURRENCE_WEIGHT),
        4,
    ))
}

/// Score every entry, rank by confidence and keep `top_n`.
///
/// The sort is stable, so ties stay in dictionary order.
pub fn detect_signals(text_lower: &str, table: &[KeywordEntry], top_n: usize) -> Vec<Signal> {
    let mut signals: Vec<Signal> = table
        .iter()
        .filter_map(|entry| {
            entry_confidence(text_lower, entry).map(|confidence| Signal {
                name: entry.name.to_string(),
                confidence,
            })
        })
        .collect();
    signals.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    signals.truncate(top_n);
    signals
}
