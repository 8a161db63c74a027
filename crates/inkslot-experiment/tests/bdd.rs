//! BDD-style integration tests for inkslot-experiment.
//!
//! Covers: create_test validation, lifecycle transitions, assignment,
//! event recording, early termination and analysis verdicts.

use inkslot_experiment::{
    EARLY_TERMINATION_REASON, ExperimentError, ExperimentManager, INSUFFICIENT_SAMPLE,
    NO_DIFFERENCE, SMALL_EFFECT, analyze_experiment, assign_variant, compute_metrics,
    two_proportion_test,
};
use inkslot_settings::ExperimentSettings;
use inkslot_types::{
    EventType, ExperimentConfig, ExperimentEvent, ExperimentStatus, ExperimentVariant,
    Recommendation, TestType, TrafficSplit,
};

// ── helpers ──────────────────────────────────────────────────────────

fn variant(id: &str) -> ExperimentVariant {
    ExperimentVariant {
        id: id.to_string(),
        name: format!("Variant {id}"),
        config: Default::default(),
    }
}

fn config(id: &str, split: &[(&str, f64)]) -> ExperimentConfig {
    ExperimentConfig {
        id: id.to_string(),
        name: format!("Test {id}"),
        description: None,
        test_type: TestType::Placement,
        variants: split.iter().map(|(v, _)| variant(v)).collect(),
        traffic_split: split.iter().map(|(v, p)| (v.to_string(), *p)).collect(),
        start_ms: 0,
        end_ms: None,
        min_sample_size: 0,
        confidence_level: 0.0,
        status: ExperimentStatus::Running,
        winning_variant: None,
        stop_reason: None,
    }
}

fn event(experiment: &str, variant: &str, event_type: EventType, n: usize) -> ExperimentEvent {
    ExperimentEvent {
        id: format!("{experiment}-{variant}-{n}"),
        experiment_id: experiment.to_string(),
        variant: variant.to_string(),
        subject_id: Some(format!("s{n}")),
        event_type,
        value: None,
        timestamp_ms: n as u128,
    }
}

fn arm(experiment: &str, variant: &str, impressions: usize, conversions: usize) -> Vec<ExperimentEvent> {
    let mut out: Vec<ExperimentEvent> = (0..impressions)
        .map(|n| event(experiment, variant, EventType::Impression, n))
        .collect();
    out.extend((0..conversions).map(|n| event(experiment, variant, EventType::Conversion, n)));
    out
}

fn manager() -> ExperimentManager {
    ExperimentManager::in_memory(ExperimentSettings::default())
}

// ── creation ─────────────────────────────────────────────────────────

#[test]
fn given_valid_config_when_creating_then_status_is_draft_and_defaults_apply() {
    let mut m = manager();
    let created = m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    assert_eq!(created.status, ExperimentStatus::Draft);
    assert_eq!(created.min_sample_size, 1000);
    assert_eq!(created.confidence_level, 0.95);
    assert_eq!(m.get_test("e1").unwrap(), created);
}

#[test]
fn given_split_not_summing_to_100_when_creating_then_it_is_normalized() {
    let mut m = manager();
    let created = m.create_test(config("e1", &[("a", 1.0), ("b", 3.0)])).unwrap();
    assert_eq!(created.traffic_split.get("a"), Some(25.0));
    assert_eq!(created.traffic_split.get("b"), Some(75.0));
}

#[test]
fn given_split_within_tolerance_when_creating_then_it_is_kept() {
    let mut m = manager();
    let created = m
        .create_test(config("e1", &[("a", 50.05), ("b", 50.0)]))
        .unwrap();
    assert_eq!(created.traffic_split.get("a"), Some(50.05));
}

#[test]
fn given_single_variant_when_creating_then_variants_field_is_named() {
    let err = manager()
        .create_test(config("e1", &[("a", 100.0)]))
        .unwrap_err();
    assert_eq!(err.field(), Some("variants"));
}

#[test]
fn given_missing_split_entry_when_creating_then_validation_fails() {
    let mut cfg = config("e1", &[("a", 50.0), ("b", 50.0)]);
    cfg.variants.push(variant("c"));
    let err = manager().create_test(cfg).unwrap_err();
    assert_eq!(err.field(), Some("traffic_split"));
    assert!(err.to_string().contains("'c'"));
}

#[test]
fn given_all_zero_split_when_creating_then_validation_fails() {
    let err = manager()
        .create_test(config("e1", &[("a", 0.0), ("b", 0.0)]))
        .unwrap_err();
    assert_eq!(err.field(), Some("traffic_split"));
}

#[test]
fn given_blank_name_when_creating_then_name_field_is_named() {
    let mut cfg = config("e1", &[("a", 50.0), ("b", 50.0)]);
    cfg.name = "  ".into();
    assert_eq!(manager().create_test(cfg).unwrap_err().field(), Some("name"));
}

#[test]
fn given_existing_id_when_creating_then_it_is_rejected() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    let err = m
        .create_test(config("e1", &[("a", 50.0), ("b", 50.0)]))
        .unwrap_err();
    assert_eq!(err.field(), Some("id"));
    assert_eq!(m.list_tests().unwrap().len(), 1);
}

// ── lifecycle ────────────────────────────────────────────────────────

#[test]
fn given_draft_when_walking_lifecycle_then_transitions_are_enforced() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();

    assert!(matches!(
        m.pause_test("e1"),
        Err(ExperimentError::InvalidTransition { .. })
    ));
    let running = m.start_test("e1").unwrap();
    assert_eq!(running.status, ExperimentStatus::Running);
    assert!(running.start_ms > 0);

    assert_eq!(m.pause_test("e1").unwrap().status, ExperimentStatus::Paused);
    assert_eq!(m.start_test("e1").unwrap().status, ExperimentStatus::Running);

    let stopped = m.stop_test("e1", "manual", Some("b")).unwrap();
    assert_eq!(stopped.status, ExperimentStatus::Completed);
    assert_eq!(stopped.winning_variant.as_deref(), Some("b"));
    assert_eq!(stopped.stop_reason.as_deref(), Some("manual"));
    assert!(stopped.end_ms.is_some());

    assert!(matches!(
        m.start_test("e1"),
        Err(ExperimentError::InvalidTransition { .. })
    ));
}

#[test]
fn given_unknown_winner_when_stopping_then_validation_fails() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    let err = m.stop_test("e1", "manual", Some("zzz")).unwrap_err();
    assert_eq!(err.field(), Some("winning_variant"));
}

#[test]
fn given_unknown_id_when_reading_then_not_found() {
    assert_eq!(
        manager().get_test("nope").unwrap_err(),
        ExperimentError::NotFound("nope".into())
    );
}

// ── assignment ───────────────────────────────────────────────────────

#[test]
fn given_70_30_split_when_assigning_1000_subjects_then_ratio_is_close() {
    let split: TrafficSplit = [("v1", 70.0), ("v2", 30.0)].into_iter().collect();
    let v1 = (1..=1000)
        .filter(|i| assign_variant("readme-test", &format!("u{i}"), &split) == Some("v1"))
        .count();
    assert!((650..=750).contains(&v1), "v1 got {v1}");
}

#[test]
fn given_50_50_split_when_assigning_10000_subjects_then_halves_are_balanced() {
    let split: TrafficSplit = [("a", 50.0), ("b", 50.0)].into_iter().collect();
    let a = (1..=10_000)
        .filter(|i| assign_variant("readme-test", &format!("u{i}"), &split) == Some("a"))
        .count();
    assert!((4800..=5200).contains(&a), "a got {a}");
}

#[test]
fn given_stored_experiment_when_assigning_then_manager_matches_pure_function() {
    let mut m = manager();
    let created = m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    for i in 0..50 {
        let subject = format!("user-{i}");
        assert_eq!(
            m.assign("e1", &subject).unwrap(),
            assign_variant("e1", &subject, &created.traffic_split).unwrap()
        );
    }
}

// ── events ───────────────────────────────────────────────────────────

#[test]
fn given_unknown_variant_when_recording_then_event_is_rejected() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    let err = m
        .record_event(event("e1", "zzz", EventType::Impression, 0))
        .unwrap_err();
    assert_eq!(err.field(), Some("variant"));
    assert!(m.events("e1").unwrap().is_empty());
}

#[test]
fn given_recorded_events_when_reading_metrics_then_counts_match() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    for e in arm("e1", "a", 10, 2).into_iter().chain(arm("e1", "b", 4, 0)) {
        m.record_event(e).unwrap();
    }
    let metrics = m.metrics("e1").unwrap();
    assert_eq!(metrics[0].variant, "a");
    assert_eq!(metrics[0].impressions, 10);
    assert_eq!(metrics[0].conversions, 2);
    assert_eq!(metrics[0].conversion_rate, 0.2);
    assert_eq!(metrics[1].impressions, 4);
    assert_eq!(m.events("e1").unwrap().len(), 16);
}

#[test]
fn given_running_test_with_strong_signal_when_recording_then_it_stops_early() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    m.start_test("e1").unwrap();
    for e in arm("e1", "a", 200, 0).into_iter().chain(arm("e1", "b", 200, 40)) {
        m.record_event(e).unwrap();
    }
    let stopped = m.get_test("e1").unwrap();
    assert_eq!(stopped.status, ExperimentStatus::Completed);
    assert_eq!(stopped.stop_reason.as_deref(), Some(EARLY_TERMINATION_REASON));
    assert_eq!(stopped.winning_variant.as_deref(), Some("b"));
}

#[test]
fn given_draft_test_with_strong_signal_when_recording_then_it_keeps_running_state() {
    let mut m = manager();
    m.create_test(config("e1", &[("a", 50.0), ("b", 50.0)])).unwrap();
    for e in arm("e1", "a", 200, 0).into_iter().chain(arm("e1", "b", 200, 40)) {
        m.record_event(e).unwrap();
    }
    assert_eq!(m.get_test("e1").unwrap().status, ExperimentStatus::Draft);
}

// ── statistics ───────────────────────────────────────────────────────

#[test]
fn given_sparse_conversions_when_testing_then_outputs_are_finite() {
    let events: Vec<ExperimentEvent> = arm("e", "base", 1000, 5)
        .into_iter()
        .chain(arm("e", "alt", 950, 8))
        .collect();
    let metrics = compute_metrics(["base", "alt"], &events);
    let r = two_proportion_test(&metrics[0], &metrics[1], 0.95, 10_000);
    assert!(r.p_value.is_finite());
    assert!((0.0..=1.0).contains(&r.p_value));
    assert!(r.effect_size.is_finite());
    assert!(r.confidence_interval.lower.is_finite());
    assert!(r.confidence_interval.upper.is_finite());
    assert!(matches!(
        r.recommendation,
        Recommendation::Continue
            | Recommendation::StopWinner
            | Recommendation::StopNoWinner
            | Recommendation::Extend
    ));
}

#[test]
fn given_single_variant_when_analyzing_then_computation_error() {
    let cfg = config("solo", &[("only", 100.0)]);
    let err = analyze_experiment(&cfg, &[], &ExperimentSettings::default()).unwrap_err();
    assert!(matches!(err, ExperimentError::Computation(_)));
}

fn analyzed(events: Vec<ExperimentEvent>, min_sample_size: u64) -> String {
    let mut cfg = config("e", &[("a", 50.0), ("b", 50.0)]);
    cfg.min_sample_size = min_sample_size;
    cfg.confidence_level = 0.95;
    analyze_experiment(&cfg, &events, &ExperimentSettings::default())
        .unwrap()
        .recommendation
}

#[test]
fn given_little_data_when_analyzing_then_collect_more() {
    let events = arm("e", "a", 50, 5).into_iter().chain(arm("e", "b", 50, 5)).collect();
    assert_eq!(analyzed(events, 1000), INSUFFICIENT_SAMPLE);
}

#[test]
fn given_enough_flat_data_when_analyzing_then_no_difference() {
    let events = arm("e", "a", 300, 30).into_iter().chain(arm("e", "b", 300, 31)).collect();
    assert_eq!(analyzed(events, 100), NO_DIFFERENCE);
}

#[test]
fn given_large_effect_when_analyzing_then_best_variant_is_named() {
    let events = arm("e", "a", 1000, 20).into_iter().chain(arm("e", "b", 1000, 120)).collect();
    assert_eq!(
        analyzed(events, 100),
        "Implement variant 'b' - significant improvement detected"
    );
}

#[test]
fn given_significant_small_effect_when_analyzing_then_business_impact_is_flagged() {
    let events = arm("e", "a", 20_000, 2_000)
        .into_iter()
        .chain(arm("e", "b", 20_000, 2_300))
        .collect();
    assert_eq!(analyzed(events, 100), SMALL_EFFECT);
}

#[test]
fn given_significant_loser_when_analyzing_then_no_variant_is_implemented() {
    let events = arm("e", "a", 1000, 120).into_iter().chain(arm("e", "b", 1000, 20)).collect();
    assert_eq!(analyzed(events, 100), SMALL_EFFECT);
}
