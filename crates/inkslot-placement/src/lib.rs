//! # inkslot-placement
//!
//! **Tier 3 (Placement Optimizer)**
//!
//! Matches an ad inventory to the placement candidates of one analysed
//! document: targeting filter, relevance scoring, candidate pairing and a
//! greedy selection that respects the ad count and line spacing limits.
//!
//! ## What belongs here
//! * Eligibility and relevance rules
//! * Markup templates per ad format
//! * Selection of the final placement list
//!
//! ## What does NOT belong here
//! * Document parsing (use inkslot-content)
//! * Splicing markup into the document (use inkslot-core)

mod context;
mod optimize;
mod relevance;
mod render;
mod targeting;

use inkslot_lexicon::Lexicon;
use inkslot_types::{AdCreative, PlacementRecommendation};
use tracing::{debug, trace};

pub use context::{ALWAYS_EXCLUDED, PlacementContext, allowed_formats};
pub use optimize::{optimize_placements, pair_candidates};
pub use relevance::{
    AUDIENCE_WEIGHT, PERFORMANCE_WEIGHT, RelevanceBreakdown, TECHNOLOGY_WEIGHT, TOPIC_WEIGHT,
    performance_score, score_relevance,
};
pub use render::render_ad;
pub use targeting::{filter_by_targeting, is_eligible};

/// Eligible ads in an allowed format, best relevance first.
///
/// Ties keep inventory order.
pub fn rank_ads<'ad>(
    ctx: &PlacementContext<'_>,
    ads: &'ad [AdCreative],
    lexicon: &Lexicon,
) -> Vec<(&'ad AdCreative, RelevanceBreakdown)> {
    let mut ranked: Vec<(&AdCreative, RelevanceBreakdown)> = filter_by_targeting(ctx, ads)
        .into_iter()
        .filter(|ad| ctx.allows(ad.format))
        .map(|ad| (ad, score_relevance(ctx, ad, lexicon)))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.total
            .partial_cmp(&a.1.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Run the whole optimizer. An empty inventory or no candidates gives an
/// empty list.
pub fn generate_placements(
    ctx: &PlacementContext<'_>,
    ads: &[AdCreative],
    lexicon: &Lexicon,
) -> Vec<PlacementRecommendation> {
    if ads.is_empty() || ctx.analysis.placement_candidates.is_empty() || ctx.max_ads == 0 {
        debug!(
            repository = %ctx.repository_id,
            ads = ads.len(),
            candidates = ctx.analysis.placement_candidates.len(),
            "nothing to place"
        );
        return Vec::new();
    }

    let ranked = rank_ads(ctx, ads, lexicon);
    for (ad, r) in &ranked {
        trace!(ad = %ad.id, total = r.total, "ad relevance");
    }

    let pairs = pair_candidates(ctx, &ranked, lexicon);
    let paired = pairs.len();
    let placements = optimize_placements(ctx, pairs);
    debug!(
        repository = %ctx.repository_id,
        eligible = ranked.len(),
        pairs = paired,
        placed = placements.len(),
        "placements generated"
    );
    placements
}
