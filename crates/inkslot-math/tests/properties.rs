use inkslot_math::{clamp_unit, cohens_h, erf, mean, normal_cdf, rate, round_f64, two_tailed_p};
use proptest::prelude::*;

proptest! {
    #[test]
    fn erf_is_odd(x in -6.0f64..6.0) {
        prop_assert!((erf(x) + erf(-x)).abs() < 1e-12);
    }

    #[test]
    fn erf_is_bounded(x in -50.0f64..50.0) {
        let got = erf(x);
        prop_assert!((-1.0..=1.0).contains(&got));
    }

    #[test]
    fn normal_cdf_is_monotonic(a in -8.0f64..8.0, b in -8.0f64..8.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(normal_cdf(lo) <= normal_cdf(hi) + 1e-12);
    }

    #[test]
    fn two_tailed_p_is_symmetric_and_bounded(z in -10.0f64..10.0) {
        let p = two_tailed_p(z);
        prop_assert!((0.0..=1.0).contains(&p));
        prop_assert_eq!(p, two_tailed_p(-z));
    }

    #[test]
    fn cohens_h_is_antisymmetric(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        prop_assert!((cohens_h(a, b) + cohens_h(b, a)).abs() < 1e-12);
    }

    #[test]
    fn clamp_unit_stays_in_range(x in proptest::num::f64::ANY) {
        let got = clamp_unit(x);
        prop_assert!((0.0..=1.0).contains(&got));
    }

    #[test]
    fn rate_zero_denominator_is_zero(numer in 0u64..1_000_000) {
        prop_assert_eq!(rate(numer, 0), 0.0);
    }

    #[test]
    fn mean_of_uniform_values_is_that_value(v in -100.0f64..100.0, len in 1usize..50) {
        let values = vec![v; len];
        prop_assert!((mean(&values) - v).abs() < 1e-9);
    }

    #[test]
    fn round_f64_is_idempotent(value in -1000.0f64..1000.0, decimals in 0u32..8) {
        let once = round_f64(value, decimals);
        let twice = round_f64(once, decimals);
        prop_assert!((once - twice).abs() < 1e-10);
    }
}

#[test]
fn given_equal_rates_when_effect_size_is_computed_then_it_is_zero() {
    assert_eq!(cohens_h(0.3, 0.3), 0.0);
}

#[test]
fn given_empty_series_when_mean_is_requested_then_zero_is_returned() {
    assert_eq!(mean(&[]), 0.0);
}
