//! Candidate pairing and greedy selection under count and spacing limits.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use inkslot_lexicon::Lexicon;
use inkslot_math::{clamp_unit, round_f64};
use inkslot_types::{AdCreative, PlacementRecommendation};

use crate::PlacementContext;
use crate::relevance::RelevanceBreakdown;
use crate::render::render_ad;

/// Every (candidate, ad) combination with its combined score and markup.
///
/// `ranked` must already be ordered by relevance; only the first
/// `2 * max_ads` entries are paired.
pub fn pair_candidates(
    ctx: &PlacementContext<'_>,
    ranked: &[(&AdCreative, RelevanceBreakdown)],
    lexicon: &Lexicon,
) -> Vec<PlacementRecommendation> {
    let take = ctx.max_ads.saturating_mul(2);
    let mut pairs = Vec::new();
    for candidate in &ctx.analysis.placement_candidates {
        for (ad, relevance) in ranked.iter().take(take) {
            let combined = clamp_unit(
                ctx.candidate_weight * candidate.score + ctx.relevance_weight * relevance.total,
            );
            pairs.push(PlacementRecommendation {
                ad_creative_id: ad.id.clone(),
                position: candidate.position,
                section: candidate.section.clone(),
                score: round_f64(combined, 4),
                reasoning: format!(
                    "{} | {} ad relevance {:.2} (technology {:.2}, topic {:.2}, audience {:.2}, performance {:.2})",
                    candidate.reasoning,
                    ad.format,
                    relevance.total,
                    relevance.technology,
                    relevance.topic,
                    relevance.audience,
                    relevance.performance
                ),
                format: ad.format,
                rendered_content: render_ad(ad, &candidate.section, lexicon),
            });
        }
    }
    pairs
}

fn by_rank(a: &PlacementRecommendation, b: &PlacementRecommendation) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then(a.position.cmp(&b.position))
        .then_with(|| a.ad_creative_id.cmp(&b.ad_creative_id))
}

/// Pick the final placements.
///
/// Excluded sections are dropped first. Selection is greedy by combined
/// score; a placement is rejected when it sits closer than `min_distance`
/// lines to an accepted one or reuses an accepted creative. The result is
/// ordered by position.
pub fn optimize_placements(
    ctx: &PlacementContext<'_>,
    mut pairs: Vec<PlacementRecommendation>,
) -> Vec<PlacementRecommendation> {
    pairs.retain(|p| !ctx.is_excluded(&p.section));
    pairs.sort_by(by_rank);

    let mut accepted: Vec<PlacementRecommendation> = Vec::new();
    let mut used: BTreeSet<String> = BTreeSet::new();
    for pair in pairs {
        if accepted.len() >= ctx.max_ads {
            break;
        }
        if used.contains(&pair.ad_creative_id) {
            continue;
        }
        if accepted
            .iter()
            .any(|a| a.position.abs_diff(pair.position) < ctx.min_distance)
        {
            continue;
        }
        used.insert(pair.ad_creative_id.clone());
        accepted.push(pair);
    }

    accepted.sort_by(|a, b| {
        a.position
            .cmp(&b.position)
            .then_with(|| a.ad_creative_id.cmp(&b.ad_creative_id))
    });
    accepted
}
