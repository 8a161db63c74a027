//! # inkslot-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Thresholds and limits for the analyzer, the placement optimizer and the
//! experiment manager. Every field has a serde default, so a partial TOML
//! file only needs to name what it overrides.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Default values and range validation
//! * TOML loading
//!
//! ## What does NOT belong here
//! * Keyword dictionaries (use inkslot-lexicon)
//! * Business logic

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A setting that failed range validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid setting `{}`: {}", self.field, self.message)
    }
}

impl std::error::Error for SettingsError {}

/// Top-level settings document (`inkslot.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InkslotSettings {
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub experiment: ExperimentSettings,
}

impl InkslotSettings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text).context("Failed to parse inkslot settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.analysis.validate()?;
        self.placement.validate()?;
        self.experiment.validate()
    }
}

/// Content analyzer limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Documents larger than this are rejected instead of analysed.
    #[serde(default = "default_max_document_bytes")]
    pub max_document_bytes: usize,

    /// Signals kept per technology category.
    #[serde(default = "default_top_technologies")]
    pub top_technologies: usize,

    /// Topic signals kept.
    #[serde(default = "default_top_topics")]
    pub top_topics: usize,

    /// Placement candidates kept after ranking.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_max_document_bytes() -> usize {
    1024 * 1024
}

fn default_top_technologies() -> usize {
    5
}

fn default_top_topics() -> usize {
    3
}

fn default_max_candidates() -> usize {
    3
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            max_document_bytes: default_max_document_bytes(),
            top_technologies: default_top_technologies(),
            top_topics: default_top_topics(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl AnalysisSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.max_document_bytes == 0 {
            return Err(SettingsError {
                field: "analysis.max_document_bytes",
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

/// Placement optimizer constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementSettings {
    /// Upper bound on placements per document.
    #[serde(default = "default_max_ads")]
    pub max_ads: usize,

    /// Minimum line distance between two accepted placements.
    #[serde(default = "default_min_distance")]
    pub min_distance: usize,

    /// Section-name substrings that never receive ads (case-insensitive).
    /// License, contributing and changelog are excluded regardless.
    #[serde(default = "default_excluded_sections")]
    pub excluded_sections: Vec<String>,

    /// Star count above which card ads are allowed.
    #[serde(default = "default_card_min_stars")]
    pub card_min_stars: u64,

    /// Star count above which banner ads are allowed.
    #[serde(default = "default_banner_min_stars")]
    pub banner_min_stars: u64,

    /// Weight of the candidate score in the combined score.
    #[serde(default = "default_candidate_weight")]
    pub candidate_weight: f64,

    /// Weight of the ad relevance in the combined score.
    #[serde(default = "default_relevance_weight")]
    pub relevance_weight: f64,
}

fn default_max_ads() -> usize {
    3
}

fn default_min_distance() -> usize {
    10
}

fn default_excluded_sections() -> Vec<String> {
    vec![
        "license".to_string(),
        "contributing".to_string(),
        "changelog".to_string(),
    ]
}

fn default_card_min_stars() -> u64 {
    500
}

fn default_banner_min_stars() -> u64 {
    1000
}

fn default_candidate_weight() -> f64 {
    0.6
}

fn default_relevance_weight() -> f64 {
    0.4
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            max_ads: default_max_ads(),
            min_distance: default_min_distance(),
            excluded_sections: default_excluded_sections(),
            card_min_stars: default_card_min_stars(),
            banner_min_stars: default_banner_min_stars(),
            candidate_weight: default_candidate_weight(),
            relevance_weight: default_relevance_weight(),
        }
    }
}

impl PlacementSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.min_distance == 0 {
            return Err(SettingsError {
                field: "placement.min_distance",
                message: "must be at least one line".into(),
            });
        }
        for (field, weight) in [
            ("placement.candidate_weight", self.candidate_weight),
            ("placement.relevance_weight", self.relevance_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(SettingsError {
                    field,
                    message: format!("{weight} is outside [0, 1]"),
                });
            }
        }
        if self.candidate_weight + self.relevance_weight > 1.0 + 1e-9 {
            return Err(SettingsError {
                field: "placement.relevance_weight",
                message: "candidate and relevance weights must not sum above 1".into(),
            });
        }
        Ok(())
    }
}

/// Experiment manager thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSettings {
    /// Default per-variant sample size for new experiments.
    #[serde(default = "default_min_sample_size")]
    pub min_sample_size: u64,

    /// Default confidence level for new experiments.
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    /// Any comparison below this p-value stops a running experiment.
    #[serde(default = "default_early_termination_p")]
    pub early_termination_p: f64,

    /// Cohen's h a significant variant must exceed over the baseline to count as practical.
    #[serde(default = "default_practical_effect_size")]
    pub practical_effect_size: f64,

    /// Combined sample size after which a non-significant comparison stops.
    #[serde(default = "default_sample_cap")]
    pub sample_cap: u64,

    /// Allowed deviation of the traffic split total from 100.
    #[serde(default = "default_split_tolerance")]
    pub split_tolerance: f64,
}

fn default_min_sample_size() -> u64 {
    1000
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_early_termination_p() -> f64 {
    0.01
}

fn default_practical_effect_size() -> f64 {
    0.1
}

fn default_sample_cap() -> u64 {
    10_000
}

fn default_split_tolerance() -> f64 {
    0.1
}

impl Default for ExperimentSettings {
    fn default() -> Self {
        Self {
            min_sample_size: default_min_sample_size(),
            confidence_level: default_confidence_level(),
            early_termination_p: default_early_termination_p(),
            practical_effect_size: default_practical_effect_size(),
            sample_cap: default_sample_cap(),
            split_tolerance: default_split_tolerance(),
        }
    }
}

impl ExperimentSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(SettingsError {
                field: "experiment.confidence_level",
                message: format!("{} is outside (0, 1)", self.confidence_level),
            });
        }
        if !(0.0..=1.0).contains(&self.early_termination_p) {
            return Err(SettingsError {
                field: "experiment.early_termination_p",
                message: format!("{} is outside [0, 1]", self.early_termination_p),
            });
        }
        if !(self.practical_effect_size.is_finite() && self.practical_effect_size >= 0.0) {
            return Err(SettingsError {
                field: "experiment.practical_effect_size",
                message: "must be a finite non-negative number".into(),
            });
        }
        if !(self.split_tolerance.is_finite() && self.split_tolerance >= 0.0) {
            return Err(SettingsError {
                field: "experiment.split_tolerance",
                message: "must be a finite non-negative number".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let s = InkslotSettings::default();
        assert_eq!(s.analysis.top_technologies, 5);
        assert_eq!(s.analysis.top_topics, 3);
        assert_eq!(s.placement.min_distance, 10);
        assert_eq!(s.placement.excluded_sections.len(), 3);
        assert_eq!(s.experiment.early_termination_p, 0.01);
        assert_eq!(s.experiment.practical_effect_size, 0.1);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let s = InkslotSettings::from_toml_str("[placement]\nmax_ads = 5\n").unwrap();
        assert_eq!(s.placement.max_ads, 5);
        assert_eq!(s.placement.min_distance, 10);
        assert_eq!(s.experiment.confidence_level, 0.95);
    }

    #[test]
    fn zero_min_distance_is_rejected() {
        let err = InkslotSettings::from_toml_str("[placement]\nmin_distance = 0\n").unwrap_err();
        assert!(format!("{err:#}").contains("placement.min_distance"));
    }

    #[test]
    fn settings_error_display_names_field() {
        let err = SettingsError {
            field: "experiment.confidence_level",
            message: "1.5 is outside (0, 1)".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid setting `experiment.confidence_level`: 1.5 is outside (0, 1)"
        );
    }
}
