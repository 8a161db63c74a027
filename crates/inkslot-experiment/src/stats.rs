//! Per-variant aggregation and the two-proportion z-test.

use inkslot_math::{clamp_unit, cohens_h, rate, round_f64, two_tailed_p, z_critical};
use inkslot_types::{
    ConfidenceInterval, EventType, ExperimentEvent, ExperimentMetrics, Recommendation,
    StatisticalResult,
};

/// Aggregate the event log for each of `variant_ids`, in that order.
///
/// Revenue is the sum of conversion values; events without a value count
/// as zero revenue.
pub fn compute_metrics<'a>(
    variant_ids: impl IntoIterator<Item = &'a str>,
    events: &[ExperimentEvent],
) -> Vec<ExperimentMetrics> {
    variant_ids
        .into_iter()
        .map(|variant| {
            let mut impressions = 0u64;
            let mut clicks = 0u64;
            let mut conversions = 0u64;
            let mut revenue = 0.0f64;
            for e in events.iter().filter(|e| e.variant == variant) {
                match e.event_type {
                    EventType::Impression => impressions += 1,
                    EventType::Click => clicks += 1,
                    EventType::Conversion => {
                        conversions += 1;
                        revenue += e.value.filter(|v| v.is_finite()).unwrap_or(0.0);
                    }
                }
            }
            ExperimentMetrics {
                variant: variant.to_string(),
                impressions,
                clicks,
                conversions,
                ctr: round_f64(rate(clicks, impressions), 4),
                conversion_rate: round_f64(rate(conversions, impressions), 4),
                revenue: round_f64(revenue, 4),
                average_value: if conversions == 0 {
                    0.0
                } else {
                    round_f64(revenue / conversions as f64, 4)
                },
            }
        })
        .collect()
}

/// Compare `variant` against `baseline` on conversions per impression.
///
/// A zero standard error (no data, or both rates at 0 or 1) yields p = 1.
/// The interval is for `rate_variant - rate_baseline` and uses the
/// unpooled standard error. Rates are clamped to `[0, 1]`, so a log with
/// more conversions than impressions still yields finite results. Once the
/// combined sample passes `sample_cap` without significance the test is
/// called with no winner.
pub fn two_proportion_test(
    baseline: &ExperimentMetrics,
    variant: &ExperimentMetrics,
    confidence_level: f64,
    sample_cap: u64,
) -> StatisticalResult {
    let (n_a, n_b) = (baseline.impressions, variant.impressions);
    let rate_a = clamp_unit(rate(baseline.conversions, n_a));
    let rate_b = clamp_unit(rate(variant.conversions, n_b));

    let (p_value, unpooled_se) = if n_a == 0 || n_b == 0 {
        (1.0, 0.0)
    } else {
        let (na, nb) = (n_a as f64, n_b as f64);
        let pooled =
            clamp_unit(baseline.conversions.saturating_add(variant.conversions) as f64 / (na + nb));
        let se = (pooled * (1.0 - pooled) * (1.0 / na + 1.0 / nb)).sqrt();
        let p = if se > 0.0 && se.is_finite() {
            two_tailed_p((rate_b - rate_a) / se)
        } else {
            1.0
        };
        let unpooled = (rate_a * (1.0 - rate_a) / na + rate_b * (1.0 - rate_b) / nb).sqrt();
        (p, unpooled)
    };

    let is_significant = p_value < 1.0 - confidence_level;
    let diff = rate_b - rate_a;
    let margin = if unpooled_se.is_finite() {
        z_critical(confidence_level) * unpooled_se
    } else {
        0.0
    };

    let recommendation = if is_significant && rate_b > rate_a {
        Recommendation::StopWinner
    } else if is_significant {
        Recommendation::StopNoWinner
    } else if n_a.saturating_add(n_b) > sample_cap {
        Recommendation::StopNoWinner
    } else {
        Recommendation::Continue
    };

    StatisticalResult {
        is_significant,
        p_value,
        confidence_interval: ConfidenceInterval {
            lower: diff - margin,
            upper: diff + margin,
        },
        effect_size: cohens_h(rate_a, rate_b),
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(variant: &str, impressions: u64, conversions: u64) -> ExperimentMetrics {
        ExperimentMetrics {
            variant: variant.into(),
            impressions,
            clicks: 0,
            conversions,
            ctr: 0.0,
            conversion_rate: rate(conversions, impressions),
            revenue: 0.0,
            average_value: 0.0,
        }
    }

    fn event(variant: &str, event_type: EventType, value: Option<f64>) -> ExperimentEvent {
        ExperimentEvent {
            id: String::new(),
            experiment_id: "e".into(),
            variant: variant.into(),
            subject_id: None,
            event_type,
            value,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn metrics_follow_event_log() {
        let events = vec![
            event("a", EventType::Impression, None),
            event("a", EventType::Impression, None),
            event("a", EventType::Click, None),
            event("a", EventType::Conversion, Some(10.0)),
            event("b", EventType::Impression, None),
        ];
        let m = compute_metrics(["a", "b", "c"], &events);
        assert_eq!(m.len(), 3);
        assert_eq!(m[0].impressions, 2);
        assert_eq!(m[0].ctr, 0.5);
        assert_eq!(m[0].conversion_rate, 0.5);
        assert_eq!(m[0].revenue, 10.0);
        assert_eq!(m[0].average_value, 10.0);
        assert_eq!(m[1].impressions, 1);
        assert_eq!(m[2].impressions, 0);
        assert_eq!(m[2].ctr, 0.0);
    }

    #[test]
    fn empty_arms_are_not_significant() {
        let r = two_proportion_test(&metrics("a", 0, 0), &metrics("b", 0, 0), 0.95, 10_000);
        assert!(!r.is_significant);
        assert_eq!(r.p_value, 1.0);
        assert_eq!(r.recommendation, Recommendation::Continue);
        assert_eq!(r.effect_size, 0.0);
    }

    #[test]
    fn identical_rates_give_p_of_one() {
        let r = two_proportion_test(&metrics("a", 500, 50), &metrics("b", 500, 50), 0.95, 10_000);
        assert!((r.p_value - 1.0).abs() < 1e-6);
        assert!(!r.is_significant);
    }

    #[test]
    fn clear_winner_is_flagged() {
        let r = two_proportion_test(&metrics("a", 5000, 100), &metrics("b", 5000, 250), 0.95, 100_000);
        assert!(r.is_significant);
        assert!(r.p_value < 0.001);
        assert!(r.effect_size > 0.0);
        assert!(r.confidence_interval.lower > 0.0);
        assert_eq!(r.recommendation, Recommendation::StopWinner);
    }

    #[test]
    fn clear_loser_stops_without_winner() {
        let r = two_proportion_test(&metrics("a", 5000, 250), &metrics("b", 5000, 100), 0.95, 100_000);
        assert!(r.is_significant);
        assert_eq!(r.recommendation, Recommendation::StopNoWinner);
    }

    #[test]
    fn excess_conversions_keep_interval_finite() {
        let r = two_proportion_test(&metrics("a", 10, 25), &metrics("b", 10, 3), 0.95, 10_000);
        assert!(r.p_value.is_finite());
        assert!(r.effect_size.is_finite());
        assert!(r.confidence_interval.lower.is_finite());
        assert!(r.confidence_interval.upper.is_finite());
        assert!(r.confidence_interval.lower <= r.confidence_interval.upper);
    }

    #[test]
    fn large_flat_sample_stops_without_winner() {
        let r = two_proportion_test(&metrics("a", 6000, 60), &metrics("b", 6000, 61), 0.95, 10_000);
        assert!(!r.is_significant);
        assert_eq!(r.recommendation, Recommendation::StopNoWinner);
    }
}
