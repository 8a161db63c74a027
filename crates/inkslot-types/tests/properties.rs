use inkslot_types::{
    AdCreative, AdFormat, ContentAnalysisResult, ExperimentEvent, EventType, TargetAudience,
    TechnologySignals, TrafficSplit,
};
use proptest::prelude::*;

fn arb_split() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec(("[a-z]{1,8}", 0.0f64..100.0), 1..8)
}

proptest! {
    #[test]
    fn split_json_keeps_first_key(entries in arb_split()) {
        let split: TrafficSplit = entries.iter().cloned().collect();
        let json = serde_json::to_string(&split).unwrap();
        let back: TrafficSplit = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back.first(), split.first());
        prop_assert_eq!(back.len(), split.len());
    }

    #[test]
    fn split_normalization_sums_to_hundred(entries in arb_split()) {
        let split: TrafficSplit = entries.into_iter().collect();
        prop_assume!(split.total() > 1e-6);
        let norm = split.normalized();
        prop_assert!((norm.total() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn split_insert_is_idempotent_on_len(entries in arb_split()) {
        let mut split: TrafficSplit = entries.iter().cloned().collect();
        let before = split.len();
        for (id, pct) in &entries {
            split.insert(id.clone(), *pct);
        }
        prop_assert_eq!(split.len(), before);
    }
}

#[test]
fn ad_creative_defaults_optional_sections() {
    let json = r#"{
        "id": "ad-1",
        "format": "card",
        "content": {"title": "Fast CI", "body": "Ship faster"},
        "cta_url": "https://example.com"
    }"#;
    let ad: AdCreative = serde_json::from_str(json).unwrap();
    assert_eq!(ad.format, AdFormat::Card);
    assert!(ad.targeting.languages.is_empty());
    assert_eq!(ad.performance.impressions, 0);
}

#[test]
fn event_parses_without_optional_fields() {
    let json = r#"{
        "id": "e1",
        "experiment_id": "x",
        "variant": "control",
        "event_type": "conversion",
        "timestamp_ms": 1700000000000
    }"#;
    let event: ExperimentEvent = serde_json::from_str(json).unwrap();
    assert_eq!(event.event_type, EventType::Conversion);
    assert!(event.value.is_none());
    assert!(event.subject_id.is_none());
}

#[test]
fn analysis_result_round_trips() {
    let result = ContentAnalysisResult {
        schema_version: inkslot_types::ANALYSIS_SCHEMA_VERSION,
        repository_id: "repo".into(),
        content_hash: "abc".into(),
        technologies: TechnologySignals::default(),
        topics: vec![],
        sentiment_score: 0.5,
        complexity_score: 0.2,
        target_audience: TargetAudience::General,
        sections: vec![],
        code_blocks: vec![],
        placement_candidates: vec![],
        line_count: 0,
        word_count: 0,
    };
    let json = serde_json::to_string(&result).unwrap();
    let back: ContentAnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}
