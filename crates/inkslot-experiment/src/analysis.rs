use inkslot_settings::ExperimentSettings;
use inkslot_types::{
    ExperimentAnalysis, ExperimentConfig, ExperimentEvent, ExperimentMetrics, VariantComparison,
};

use crate::stats::{compute_metrics, two_proportion_test};
use crate::{ExperimentError, ExperimentResult};

pub const INSUFFICIENT_SAMPLE: &str = "Insufficient sample size - continue collecting data";
pub const NO_DIFFERENCE: &str = "No significant difference detected - consider stopping the test";
pub const SMALL_EFFECT: &str = "Significant but small effect - consider business impact";

/// Variant with the highest conversion rate. Ties keep the earlier variant.
pub fn best_variant(metrics: &[ExperimentMetrics]) -> Option<&ExperimentMetrics> {
    metrics.iter().fold(None, |best: Option<&ExperimentMetrics>, m| match best {
        Some(b) if b.conversion_rate >= m.conversion_rate => Some(b),
        _ => Some(m),
    })
}

/// Metrics, baseline comparisons and an overall verdict for one experiment.
///
/// The first variant is the baseline. Fewer than two variants is a
/// computation error.
pub fn analyze_experiment(
    config: &ExperimentConfig,
    events: &[ExperimentEvent],
    settings: &ExperimentSettings,
) -> ExperimentResult<ExperimentAnalysis> {
    if config.variants.len() < 2 {
        return Err(ExperimentError::Computation(format!(
            "{} has {} variant(s), at least 2 are required",
            config.id,
            config.variants.len()
        )));
    }

    let metrics = compute_metrics(config.variant_ids(), events);
    let baseline = &metrics[0];
    let comparisons: Vec<VariantComparison> = metrics[1..]
        .iter()
        .map(|m| VariantComparison {
            baseline: baseline.variant.clone(),
            variant: m.variant.clone(),
            result: two_proportion_test(
                baseline,
                m,
                config.confidence_level,
                settings.sample_cap,
            ),
        })
        .collect();

    let total: u64 = metrics.iter().map(|m| m.impressions).sum();
    let required = config
        .min_sample_size
        .saturating_mul(config.variants.len() as u64);
    let any_significant = comparisons.iter().any(|c| c.result.is_significant);
    // Signed: a variant that significantly loses to the baseline is not an improvement.
    let practical = comparisons.iter().any(|c| {
        c.result.is_significant && c.result.effect_size > settings.practical_effect_size
    });

    let recommendation = if !any_significant && total < required {
        INSUFFICIENT_SAMPLE.to_string()
    } else if !any_significant {
        NO_DIFFERENCE.to_string()
    } else if practical {
        let best = best_variant(&metrics).map_or("", |m| m.variant.as_str());
        format!("Implement variant '{best}' - significant improvement detected")
    } else {
        SMALL_EFFECT.to_string()
    };

    Ok(ExperimentAnalysis {
        experiment_id: config.id.clone(),
        metrics,
        comparisons,
        recommendation,
    })
}
