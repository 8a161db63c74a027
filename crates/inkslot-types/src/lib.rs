//! # inkslot-types
//!
//! **Tier 0 (Data Contracts)**
//!
//! Pure data structures shared by the analyzer, the placement optimizer,
//! the experiment manager and the orchestrator. No I/O or business logic.
//!
//! ## What belongs here
//! * Analysis results, signals and placement candidates
//! * Ad inventory and placement recommendation shapes
//! * Experiment configuration, events, metrics and statistical results
//!
//! ## What does NOT belong here
//! * Scoring or detection logic (use inkslot-content / inkslot-placement)
//! * Statistics (use inkslot-experiment)
//! * Threshold defaults (use inkslot-settings)

mod split;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use split::TrafficSplit;

/// Schema version for serialized analysis results.
/// v2: Added `line_count`/`word_count` and unclosed-fence handling.
pub const ANALYSIS_SCHEMA_VERSION: u32 = 2;

// -----------------
// Content analysis
// -----------------

/// A heading-delimited region of a document. Lines are zero-based and inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub level: u8,
    pub start_line: usize,
    pub end_line: usize,
    pub word_count: usize,
}

/// A fenced code block. Lines are zero-based and include both fences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub start_line: usize,
    pub end_line: usize,
    pub line_count: usize,
}

impl CodeBlock {
    /// Whether `line` falls inside the block, fences included.
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }
}

/// A detected technology or topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnologySignals {
    pub languages: Vec<Signal>,
    pub frameworks: Vec<Signal>,
    pub tools: Vec<Signal>,
}

impl TechnologySignals {
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty() && self.frameworks.is_empty() && self.tools.is_empty()
    }

    /// Highest-confidence signal across all three categories.
    ///
    /// Ties keep category order (languages, frameworks, tools).
    pub fn top(&self) -> Option<&Signal> {
        self.languages
            .iter()
            .chain(&self.frameworks)
            .chain(&self.tools)
            .fold(None, |best: Option<&Signal>, s| match best {
                Some(b) if b.confidence >= s.confidence => Some(b),
                _ => Some(s),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetAudience {
    Beginners,
    Advanced,
    Research,
    General,
}

impl TargetAudience {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAudience::Beginners => "beginners",
            TargetAudience::Advanced => "advanced",
            TargetAudience::Research => "research",
            TargetAudience::General => "general",
        }
    }
}

impl fmt::Display for TargetAudience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed insertion line. The ad block is inserted before the line
/// currently at `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementCandidate {
    pub position: usize,
    pub section: String,
    pub score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysisResult {
    pub schema_version: u32,
    pub repository_id: String,
    pub content_hash: String,
    pub technologies: TechnologySignals,
    pub topics: Vec<Signal>,
    pub sentiment_score: f64,
    pub complexity_score: f64,
    pub target_audience: TargetAudience,
    pub sections: Vec<Section>,
    pub code_blocks: Vec<CodeBlock>,
    pub placement_candidates: Vec<PlacementCandidate>,
    pub line_count: usize,
    pub word_count: usize,
}

// -----------------
// Ad inventory
// -----------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    Banner,
    Text,
    Card,
    Native,
}

impl AdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdFormat::Banner => "banner",
            AdFormat::Text => "text",
            AdFormat::Card => "card",
            AdFormat::Native => "native",
        }
    }
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creative copy used by the markup templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub advertiser: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub cta_text: Option<String>,
}

/// Targeting rules. Empty or absent dimensions do not filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdTargeting {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub audience_types: Vec<TargetAudience>,
    #[serde(default)]
    pub min_stars: Option<u64>,
    #[serde(default)]
    pub max_stars: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AdPerformance {
    pub impressions: u64,
    pub clicks: u64,
    pub ctr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdCreative {
    pub id: String,
    pub format: AdFormat,
    pub content: AdContent,
    pub cta_url: String,
    #[serde(default)]
    pub targeting: AdTargeting,
    #[serde(default)]
    pub performance: AdPerformance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecommendation {
    pub ad_creative_id: String,
    pub position: usize,
    pub section: String,
    pub score: f64,
    pub reasoning: String,
    pub format: AdFormat,
    pub rendered_content: String,
}

// -----------------
// Experiments
// -----------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    Placement,
    Format,
    Creative,
    Frequency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentStatus {
    Draft,
    Running,
    Completed,
    Paused,
}

impl fmt::Display for ExperimentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExperimentStatus::Draft => "draft",
            ExperimentStatus::Running => "running",
            ExperimentStatus::Completed => "completed",
            ExperimentStatus::Paused => "paused",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placements: Option<Vec<PlacementRecommendation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_creative_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<AdFormat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentVariant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub config: VariantConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub test_type: TestType,
    pub variants: Vec<ExperimentVariant>,
    pub traffic_split: TrafficSplit,
    pub start_ms: u128,
    #[serde(default)]
    pub end_ms: Option<u128>,
    pub min_sample_size: u64,
    pub confidence_level: f64,
    pub status: ExperimentStatus,
    #[serde(default)]
    pub winning_variant: Option<String>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl ExperimentConfig {
    pub fn variant_ids(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| v.id.as_str())
    }

    pub fn has_variant(&self, id: &str) -> bool {
        self.variants.iter().any(|v| v.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Impression,
    Click,
    Conversion,
}

/// One append-only experiment observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentEvent {
    pub id: String,
    pub experiment_id: String,
    pub variant: String,
    #[serde(default)]
    pub subject_id: Option<String>,
    pub event_type: EventType,
    #[serde(default)]
    pub value: Option<f64>,
    pub timestamp_ms: u128,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentMetrics {
    pub variant: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub conversion_rate: f64,
    pub revenue: f64,
    pub average_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Continue,
    StopWinner,
    StopNoWinner,
    Extend,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticalResult {
    pub is_significant: bool,
    pub p_value: f64,
    pub confidence_interval: ConfidenceInterval,
    pub effect_size: f64,
    pub recommendation: Recommendation,
}

/// Outcome of testing one variant against the baseline (first variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantComparison {
    pub baseline: String,
    pub variant: String,
    pub result: StatisticalResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentAnalysis {
    pub experiment_id: String,
    pub metrics: Vec<ExperimentMetrics>,
    pub comparisons: Vec<VariantComparison>,
    pub recommendation: String,
}

// -----------------
// Orchestration
// -----------------

/// Repository metadata supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stars: u64,
    #[serde(default)]
    pub language: Option<String>,
    pub readme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelligentPlacementResult {
    pub content_analysis: ContentAnalysisResult,
    pub placements: Vec<PlacementRecommendation>,
    pub ab_test: Option<ExperimentConfig>,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub modified_document: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&Recommendation::StopNoWinner).unwrap(),
            "\"stop_no_winner\""
        );
        assert_eq!(
            serde_json::to_string(&TargetAudience::Beginners).unwrap(),
            "\"beginners\""
        );
        assert_eq!(serde_json::to_string(&AdFormat::Native).unwrap(), "\"native\"");
    }

    #[test]
    fn top_signal_prefers_first_category_on_tie() {
        let tech = TechnologySignals {
            languages: vec![Signal {
                name: "rust".into(),
                confidence: 0.5,
            }],
            frameworks: vec![Signal {
                name: "tokio".into(),
                confidence: 0.5,
            }],
            tools: vec![],
        };
        assert_eq!(tech.top().map(|s| s.name.as_str()), Some("rust"));
    }

    #[test]
    fn code_block_contains_is_inclusive() {
        let block = CodeBlock {
            language: "text".into(),
            start_line: 3,
            end_line: 5,
            line_count: 3,
        };
        assert!(block.contains(3));
        assert!(block.contains(5));
        assert!(!block.contains(6));
    }
}
