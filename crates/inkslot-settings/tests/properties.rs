use inkslot_settings::{InkslotSettings, PlacementSettings};
use proptest::prelude::*;

proptest! {
    #[test]
    fn toml_round_trip_preserves_placement(
        max_ads in 0usize..20,
        min_distance in 1usize..100,
        card in 0u64..10_000,
        banner in 0u64..10_000,
    ) {
        let s = InkslotSettings {
            placement: PlacementSettings {
                max_ads,
                min_distance,
                card_min_stars: card,
                banner_min_stars: banner,
                ..Default::default()
            },
            ..Default::default()
        };
        let text = toml::to_string(&s).unwrap();
        let back = InkslotSettings::from_toml_str(&text).unwrap();
        prop_assert_eq!(back.placement, s.placement);
    }

    #[test]
    fn confidence_inside_open_interval_is_accepted(level in 0.01f64..0.999) {
        let text = format!("[experiment]\nconfidence_level = {level}\n");
        let s = InkslotSettings::from_toml_str(&text).unwrap();
        prop_assert!((s.experiment.confidence_level - level).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_weights_are_rejected(weight in 1.01f64..10.0) {
        let text = format!("[placement]\ncandidate_weight = {weight}\n");
        prop_assert!(InkslotSettings::from_toml_str(&text).is_err());
    }
}
