//! # inkslot-experiment
//!
//! **Tier 3 (Experiment Manager)**
//!
//! A/B test lifecycle over placement variants: validated creation,
//! deterministic traffic assignment, an append-only event log, per-variant
//! metrics and two-proportion significance testing with early termination.
//!
//! ## What belongs here
//! * Experiment validation and lifecycle transitions
//! * Assignment, aggregation and statistics
//! * Store traits and in-memory stores
//!
//! ## What does NOT belong here
//! * Durable persistence (callers implement the store traits)
//! * Building variants from placements (use inkslot-core)

mod analysis;
mod assign;
mod error;
mod stats;
mod store;

use std::collections::BTreeSet;
use std::time::{SystemTime, UNIX_EPOCH};

use inkslot_settings::ExperimentSettings;
use inkslot_types::{
    ExperimentAnalysis, ExperimentConfig, ExperimentEvent, ExperimentMetrics, ExperimentStatus,
};
use tracing::{debug, info, warn};

pub use analysis::{
    INSUFFICIENT_SAMPLE, NO_DIFFERENCE, SMALL_EFFECT, analyze_experiment, best_variant,
};
pub use assign::{assign_variant, bucket, rolling_hash};
pub use error::{ExperimentError, ExperimentResult};
pub use inkslot_math::z_critical;
pub use stats::{compute_metrics, two_proportion_test};
pub use store::{EventStore, ExperimentStore, InMemoryEventStore, InMemoryExperimentStore};

pub const EARLY_TERMINATION_REASON: &str = "Early termination - significant result detected";

/// Milliseconds since the Unix epoch, zero if the clock is before it.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Check a new configuration and bring it into canonical form.
///
/// Zero `min_sample_size` / `confidence_level` take the settings defaults.
/// A split whose total is off by more than the tolerance is rescaled to
/// 100; missing or unknown variant ids and an all-zero split are rejected.
pub fn validate_config(
    mut config: ExperimentConfig,
    settings: &ExperimentSettings,
) -> ExperimentResult<ExperimentConfig> {
    if config.id.trim().is_empty() {
        return Err(ExperimentError::validation("id", "must not be empty"));
    }
    if config.name.trim().is_empty() {
        return Err(ExperimentError::validation("name", "must not be empty"));
    }
    if config.variants.len() < 2 {
        return Err(ExperimentError::validation(
            "variants",
            format!("at least 2 variants required, got {}", config.variants.len()),
        ));
    }
    let mut seen = BTreeSet::new();
    for v in &config.variants {
        if v.id.trim().is_empty() {
            return Err(ExperimentError::validation("variants", "variant id must not be empty"));
        }
        if !seen.insert(v.id.as_str()) {
            return Err(ExperimentError::validation(
                "variants",
                format!("duplicate variant id '{}'", v.id),
            ));
        }
    }

    let split = &config.traffic_split;
    if split.is_empty() {
        return Err(ExperimentError::validation("traffic_split", "must not be empty"));
    }
    if let Some(missing) = config.variant_ids().find(|id| !split.contains(id)) {
        return Err(ExperimentError::validation(
            "traffic_split",
            format!("missing entry for variant '{missing}'"),
        ));
    }
    if let Some((unknown, _)) = split.iter().find(|(id, _)| !seen.contains(id)) {
        return Err(ExperimentError::validation(
            "traffic_split",
            format!("entry for unknown variant '{unknown}'"),
        ));
    }
    if let Some((id, pct)) = split.iter().find(|(_, pct)| !pct.is_finite() || *pct < 0.0) {
        return Err(ExperimentError::validation(
            "traffic_split",
            format!("share for '{id}' must be a non-negative number, got {pct}"),
        ));
    }
    let total = split.total();
    if total == 0.0 {
        return Err(ExperimentError::validation("traffic_split", "all shares are zero"));
    }
    if (total - 100.0).abs() > settings.split_tolerance {
        debug!(experiment = %config.id, total, "normalizing traffic split");
        config.traffic_split = split.normalized();
    }

    if config.min_sample_size == 0 {
        config.min_sample_size = settings.min_sample_size;
    }
    if config.confidence_level == 0.0 {
        config.confidence_level = settings.confidence_level;
    }
    if !(config.confidence_level > 0.0 && config.confidence_level < 1.0) {
        return Err(ExperimentError::validation(
            "confidence_level",
            format!("{} is outside (0, 1)", config.confidence_level),
        ));
    }

    config.status = ExperimentStatus::Draft;
    config.winning_variant = None;
    config.stop_reason = None;
    config.end_ms = None;
    Ok(config)
}

/// Experiment lifecycle over injected stores.
#[derive(Debug)]
pub struct ExperimentManager<S = InMemoryExperimentStore, E = InMemoryEventStore> {
    experiments: S,
    events: E,
    settings: ExperimentSettings,
}

impl ExperimentManager {
    pub fn in_memory(settings: ExperimentSettings) -> Self {
        Self::new(
            InMemoryExperimentStore::default(),
            InMemoryEventStore::default(),
            settings,
        )
    }
}

impl<S: ExperimentStore, E: EventStore> ExperimentManager<S, E> {
    pub fn new(experiments: S, events: E, settings: ExperimentSettings) -> Self {
        Self {
            experiments,
            events,
            settings,
        }
    }

    pub fn settings(&self) -> &ExperimentSettings {
        &self.settings
    }

    /// Validate, normalize and store a new experiment in `draft` status.
    pub fn create_test(&mut self, config: ExperimentConfig) -> ExperimentResult<ExperimentConfig> {
        let config = validate_config(config, &self.settings)?;
        if self.experiments.get(&config.id)?.is_some() {
            return Err(ExperimentError::validation(
                "id",
                format!("experiment '{}' already exists", config.id),
            ));
        }
        self.experiments.put(config.clone())?;
        info!(
            experiment = %config.id,
            variants = config.variants.len(),
            "experiment created"
        );
        Ok(config)
    }

    pub fn get_test(&self, id: &str) -> ExperimentResult<ExperimentConfig> {
        self.experiments
            .get(id)?
            .ok_or_else(|| ExperimentError::NotFound(id.to_string()))
    }

    pub fn list_tests(&self) -> ExperimentResult<Vec<ExperimentConfig>> {
        self.experiments.list()
    }

    pub fn events(&self, id: &str) -> ExperimentResult<Vec<ExperimentEvent>> {
        self.get_test(id)?;
        self.events.events_for(id)
    }

    /// Draft or paused to running.
    pub fn start_test(&mut self, id: &str) -> ExperimentResult<ExperimentConfig> {
        let mut config = self.get_test(id)?;
        match config.status {
            ExperimentStatus::Draft | ExperimentStatus::Paused => {}
            from => {
                return Err(ExperimentError::InvalidTransition {
                    id: id.to_string(),
                    from,
                    action: "start",
                });
            }
        }
        if config.status == ExperimentStatus::Draft && config.start_ms == 0 {
            config.start_ms = now_ms();
        }
        config.status = ExperimentStatus::Running;
        self.experiments.put(config.clone())?;
        info!(experiment = %id, "experiment started");
        Ok(config)
    }

    /// Running to paused.
    pub fn pause_test(&mut self, id: &str) -> ExperimentResult<ExperimentConfig> {
        let mut config = self.get_test(id)?;
        if config.status != ExperimentStatus::Running {
            return Err(ExperimentError::InvalidTransition {
                id: id.to_string(),
                from: config.status,
                action: "pause",
            });
        }
        config.status = ExperimentStatus::Paused;
        self.experiments.put(config.clone())?;
        info!(experiment = %id, "experiment paused");
        Ok(config)
    }

    /// Complete an experiment, optionally naming a winner.
    pub fn stop_test(
        &mut self,
        id: &str,
        reason: &str,
        winner: Option<&str>,
    ) -> ExperimentResult<ExperimentConfig> {
        let mut config = self.get_test(id)?;
        if config.status == ExperimentStatus::Completed {
            return Err(ExperimentError::InvalidTransition {
                id: id.to_string(),
                from: config.status,
                action: "stop",
            });
        }
        if let Some(w) = winner
            && !config.has_variant(w)
        {
            return Err(ExperimentError::validation(
                "winning_variant",
                format!("'{w}' is not a variant of {id}"),
            ));
        }
        config.status = ExperimentStatus::Completed;
        config.end_ms = Some(now_ms());
        config.stop_reason = Some(reason.to_string());
        config.winning_variant = winner.map(str::to_string);
        self.experiments.put(config.clone())?;
        info!(experiment = %id, reason, winner = ?winner, "experiment stopped");
        Ok(config)
    }

    /// Variant for `subject_id`. Pure in the experiment's split.
    pub fn assign(&self, id: &str, subject_id: &str) -> ExperimentResult<String> {
        let config = self.get_test(id)?;
        assign_variant(&config.id, subject_id, &config.traffic_split)
            .map(str::to_string)
            .ok_or_else(|| ExperimentError::Computation(format!("{id} has an empty traffic split")))
    }

    /// Append one event, then run the early-termination check.
    ///
    /// Failures of the check are logged and do not fail the append.
    pub fn record_event(&mut self, event: ExperimentEvent) -> ExperimentResult<()> {
        let config = self.get_test(&event.experiment_id)?;
        if !config.has_variant(&event.variant) {
            return Err(ExperimentError::validation(
                "variant",
                format!("'{}' is not a variant of {}", event.variant, config.id),
            ));
        }
        debug!(
            experiment = %config.id,
            variant = %event.variant,
            event_type = ?event.event_type,
            "event recorded"
        );
        self.events.append(event)?;

        if config.status == ExperimentStatus::Running
            && let Err(err) = self.check_early_termination(&config)
        {
            warn!(experiment = %config.id, error = %err, "early termination check failed");
        }
        Ok(())
    }

    /// Stop a running experiment when any comparison falls below the
    /// early-termination p-value. Returns whether it stopped.
    pub fn check_early_termination(&mut self, config: &ExperimentConfig) -> ExperimentResult<bool> {
        let events = self.events.events_for(&config.id)?;
        let analysis = analyze_experiment(config, &events, &self.settings)?;
        let triggered = analysis
            .comparisons
            .iter()
            .any(|c| c.result.p_value < self.settings.early_termination_p);
        if !triggered {
            return Ok(false);
        }
        let winner = best_variant(&analysis.metrics).map(|m| m.variant.clone());
        warn!(experiment = %config.id, winner = ?winner, "terminating experiment early");
        self.stop_test(&config.id, EARLY_TERMINATION_REASON, winner.as_deref())?;
        Ok(true)
    }

    pub fn metrics(&self, id: &str) -> ExperimentResult<Vec<ExperimentMetrics>> {
        let config = self.get_test(id)?;
        let events = self.events.events_for(id)?;
        Ok(compute_metrics(config.variant_ids(), &events))
    }

    pub fn analyze(&self, id: &str) -> ExperimentResult<ExperimentAnalysis> {
        let config = self.get_test(id)?;
        let events = self.events.events_for(id)?;
        analyze_experiment(&config, &events, &self.settings)
    }
}
