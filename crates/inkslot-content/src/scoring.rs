//! Document-level scores: sentiment, complexity and audience.

use std::collections::{BTreeMap, BTreeSet};

use inkslot_lexicon::AudienceIndicators;
use inkslot_math::{clamp_unit, round_f64};
use inkslot_types::{Signal, TargetAudience};

use crate::signals::count_term;

const SENTIMENT_SCALE: f64 = 10.0;
const SENTENCE_LENGTH_NORM: f64 = 20.0;
const CODE_BLOCK_NORM: f64 = 10.0;
const SENTENCE_WEIGHT: f64 = 0.3;
const DIVERSITY_WEIGHT: f64 = 0.3;
const CODE_WEIGHT: f64 = 0.4;

/// Map the summed word polarity onto `[0, 1]`, 0.5 being neutral.
pub fn sentiment_score(tokens: &[String], lexicon: &[(&str, i32)]) -> f64 {
    let weights: BTreeMap<&str, i32> = lexicon.iter().copied().collect();
    let raw: i64 = tokens
        .iter()
        .filter_map(|t| weights.get(t.as_str()))
        .map(|w| i64::from(*w))
        .sum();
    round_f64(clamp_unit(raw as f64 / SENTIMENT_SCALE + 0.5), 4)
}

/// Blend of sentence length, lexical repetition and code density.
pub fn complexity_score(tokens: &[String], sentences: usize, code_blocks: usize) -> f64 {
    let total = tokens.len();
    let avg_sentence = if sentences == 0 {
        0.0
    } else {
        total as f64 / sentences as f64
    };
    let repetition = if total == 0 {
        0.0
    } else {
        let unique: BTreeSet<&str> = tokens.iter().map(String::as_str).collect();
        1.0 - unique.len() as f64 / total as f64
    };
    let code_density = (code_blocks as f64 / CODE_BLOCK_NORM).min(1.0);

    let score = (avg_sentence / SENTENCE_LENGTH_NORM).min(1.0) * SENTENCE_WEIGHT
        + repetition * DIVERSITY_WEIGHT
        + code_density * CODE_WEIGHT;
    round_f64(clamp_unit(score), 4)
}

fn votes(text_lower: &str, indicators: &[&str]) -> usize {
    indicators.iter().map(|i| count_term(text_lower, i)).sum()
}

/// Keyword vote between beginner, advanced and research vocabularies.
///
/// Ties resolve research > advanced > beginner. With no votes at all an
/// `education` topic still marks the document as beginner material.
pub fn target_audience(
    text_lower: &str,
    indicators: &AudienceIndicators,
    topics: &[Signal],
) -> TargetAudience {
    let ranked = [
        (TargetAudience::Research, votes(text_lower, indicators.research)),
        (TargetAudience::Advanced, votes(text_lower, indicators.advanced)),
        (TargetAudience::Beginners, votes(text_lower, indicators.beginner)),
    ];

    let mut best: Option<(TargetAudience, usize)> = None;
    for (audience, count) in ranked {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((audience, count)),
        }
    }

    match best {
        Some((audience, _)) => audience,
        None if topics.iter().any(|t| t.name == "education") => TargetAudience::Beginners,
        None => TargetAudience::General,
    }
}
