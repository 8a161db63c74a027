//! Soft relevance scoring for eligible ads.

use inkslot_lexicon::Lexicon;
use inkslot_math::{clamp_unit, mean, round_f64};
use inkslot_types::AdCreative;
use serde::{Deserialize, Serialize};

use crate::PlacementContext;
use crate::targeting::topic_matches;

pub const TECHNOLOGY_WEIGHT: f64 = 0.4;
pub const TOPIC_WEIGHT: f64 = 0.3;
pub const AUDIENCE_WEIGHT: f64 = 0.2;
pub const PERFORMANCE_WEIGHT: f64 = 0.1;

/// Score for a dimension the ad does not target.
pub const NEUTRAL: f64 = 0.5;
pub const AUDIENCE_MISS: f64 = 0.2;
/// Bonus scale applied to the strongest framework tied to a targeted language.
pub const FRAMEWORK_BONUS: f64 = 0.2;
/// CTR treated as a perfect performer.
pub const CTR_SATURATION: f64 = 0.05;
/// Impressions at which historical CTR is fully trusted.
pub const IMPRESSION_VOLUME: f64 = 10_000.0;

/// Per-component relevance of one ad, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelevanceBreakdown {
    pub technology: f64,
    pub topic: f64,
    pub audience: f64,
    pub performance: f64,
    pub total: f64,
}

fn technology_alignment(ctx: &PlacementContext<'_>, ad: &AdCreative, lexicon: &Lexicon) -> f64 {
    let wanted = &ad.targeting.languages;
    if wanted.is_empty() {
        return NEUTRAL;
    }
    let detected = &ctx.analysis.technologies;

    let per_target: Vec<f64> = wanted
        .iter()
        .map(|lang| {
            if ctx
                .language
                .as_deref()
                .is_some_and(|declared| declared.eq_ignore_ascii_case(lang))
            {
                return 1.0;
            }
            detected
                .languages
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(lang))
                .map_or(0.0, |s| s.confidence)
        })
        .collect();

    let framework = detected
        .frameworks
        .iter()
        .filter(|fw| {
            lexicon
                .languages_for_framework(&fw.name)
                .iter()
                .any(|l| wanted.iter().any(|w| w.eq_ignore_ascii_case(l)))
        })
        .map(|fw| fw.confidence)
        .fold(0.0_f64, f64::max);

    clamp_unit(mean(&per_target) + framework * FRAMEWORK_BONUS)
}

fn topic_relevance(ctx: &PlacementContext<'_>, ad: &AdCreative) -> f64 {
    let wanted = &ad.targeting.topics;
    if wanted.is_empty() {
        return NEUTRAL;
    }
    let matched: Vec<f64> = ctx
        .analysis
        .topics
        .iter()
        .filter(|t| wanted.iter().any(|w| topic_matches(&t.name, w)))
        .map(|t| t.confidence)
        .collect();
    clamp_unit(mean(&matched))
}

fn audience_fit(ctx: &PlacementContext<'_>, ad: &AdCreative) -> f64 {
    let wanted = &ad.targeting.audience_types;
    if wanted.is_empty() {
        NEUTRAL
    } else if wanted.contains(&ctx.analysis.target_audience) {
        1.0
    } else {
        AUDIENCE_MISS
    }
}

/// Historical CTR blended toward neutral by impression volume.
pub fn performance_score(ad: &AdCreative) -> f64 {
    let perf = &ad.performance;
    let volume = (perf.impressions as f64 / IMPRESSION_VOLUME).min(1.0);
    let ctr = clamp_unit(perf.ctr / CTR_SATURATION);
    clamp_unit(ctr * volume + NEUTRAL * (1.0 - volume))
}

pub fn score_relevance(
    ctx: &PlacementContext<'_>,
    ad: &AdCreative,
    lexicon: &Lexicon,
) -> RelevanceBreakdown {
    let technology = technology_alignment(ctx, ad, lexicon);
    let topic = topic_relevance(ctx, ad);
    let audience = audience_fit(ctx, ad);
    let performance = performance_score(ad);
    let total = clamp_unit(
        technology * TECHNOLOGY_WEIGHT
            + topic * TOPIC_WEIGHT
            + audience * AUDIENCE_WEIGHT
            + performance * PERFORMANCE_WEIGHT,
    );
    RelevanceBreakdown {
        technology: round_f64(technology, 4),
        topic: round_f64(topic, 4),
        audience: round_f64(audience, 4),
        performance: round_f64(performance, 4),
        total: round_f64(total, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkslot_types::AdPerformance;

    fn ad_with(perf: AdPerformance) -> AdCreative {
        AdCreative {
            id: "a".into(),
            format: inkslot_types::AdFormat::Text,
            content: Default::default(),
            cta_url: "https://example.com".into(),
            targeting: Default::default(),
            performance: perf,
        }
    }

    #[test]
    fn unseen_ads_are_neutral() {
        assert_eq!(performance_score(&ad_with(AdPerformance::default())), 0.5);
    }

    #[test]
    fn proven_ads_use_their_ctr() {
        let perf = AdPerformance {
            impressions: 20_000,
            clicks: 1_000,
            ctr: 0.05,
        };
        assert_eq!(performance_score(&ad_with(perf)), 1.0);

        let weak = AdPerformance {
            impressions: 20_000,
            clicks: 0,
            ctr: 0.0,
        };
        assert_eq!(performance_score(&ad_with(weak)), 0.0);
    }
}
