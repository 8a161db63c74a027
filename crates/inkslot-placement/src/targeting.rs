//! Hard eligibility rules. A dimension the ad leaves empty never filters.

use inkslot_types::AdCreative;

use crate::PlacementContext;

fn stars_ok(ctx: &PlacementContext<'_>, ad: &AdCreative) -> bool {
    let t = &ad.targeting;
    t.min_stars.is_none_or(|min| ctx.stars >= min) && t.max_stars.is_none_or(|max| ctx.stars <= max)
}

fn language_ok(ctx: &PlacementContext<'_>, ad: &AdCreative) -> bool {
    let wanted = &ad.targeting.languages;
    if wanted.is_empty() {
        return true;
    }
    let declared = ctx.language.iter().map(String::as_str);
    let detected = ctx
        .analysis
        .technologies
        .languages
        .iter()
        .map(|s| s.name.as_str());
    declared
        .chain(detected)
        .any(|have| wanted.iter().any(|w| w.eq_ignore_ascii_case(have)))
}

/// Substring match in either direction, case-insensitive.
pub(crate) fn topic_matches(detected: &str, wanted: &str) -> bool {
    let detected = detected.to_lowercase();
    let wanted = wanted.to_lowercase();
    !wanted.is_empty() && (detected.contains(&wanted) || wanted.contains(&detected))
}

fn topic_ok(ctx: &PlacementContext<'_>, ad: &AdCreative) -> bool {
    let wanted = &ad.targeting.topics;
    wanted.is_empty()
        || ctx
            .analysis
            .topics
            .iter()
            .any(|t| wanted.iter().any(|w| topic_matches(&t.name, w)))
}

fn audience_ok(ctx: &PlacementContext<'_>, ad: &AdCreative) -> bool {
    let wanted = &ad.targeting.audience_types;
    wanted.is_empty() || wanted.contains(&ctx.analysis.target_audience)
}

pub fn is_eligible(ctx: &PlacementContext<'_>, ad: &AdCreative) -> bool {
    stars_ok(ctx, ad) && language_ok(ctx, ad) && topic_ok(ctx, ad) && audience_ok(ctx, ad)
}

/// Keep the ads whose targeting accepts this repository, in inventory order.
pub fn filter_by_targeting<'ad>(
    ctx: &PlacementContext<'_>,
    ads: &'ad [AdCreative],
) -> Vec<&'ad AdCreative> {
    ads.iter().filter(|ad| is_eligible(ctx, ad)).collect()
}
