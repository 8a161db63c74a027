//! Persistence seams. The manager only talks to these traits; callers
//! supply durable implementations, tests use the in-memory ones.

use std::collections::BTreeMap;

use inkslot_types::{ExperimentConfig, ExperimentEvent};

use crate::ExperimentResult;

/// Keyed storage for experiment configurations.
pub trait ExperimentStore {
    /// Insert or replace by `config.id`.
    fn put(&mut self, config: ExperimentConfig) -> ExperimentResult<()>;
    fn get(&self, id: &str) -> ExperimentResult<Option<ExperimentConfig>>;
    /// All experiments ordered by id.
    fn list(&self) -> ExperimentResult<Vec<ExperimentConfig>>;
}

/// Append-only event log.
pub trait EventStore {
    fn append(&mut self, event: ExperimentEvent) -> ExperimentResult<()>;
    /// Events for one experiment in append order.
    fn events_for(&self, experiment_id: &str) -> ExperimentResult<Vec<ExperimentEvent>>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryExperimentStore {
    experiments: BTreeMap<String, ExperimentConfig>,
}

impl ExperimentStore for InMemoryExperimentStore {
    fn put(&mut self, config: ExperimentConfig) -> ExperimentResult<()> {
        self.experiments.insert(config.id.clone(), config);
        Ok(())
    }

    fn get(&self, id: &str) -> ExperimentResult<Option<ExperimentConfig>> {
        Ok(self.experiments.get(id).cloned())
    }

    fn list(&self) -> ExperimentResult<Vec<ExperimentConfig>> {
        Ok(self.experiments.values().cloned().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    events: Vec<ExperimentEvent>,
}

impl InMemoryEventStore {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for InMemoryEventStore {
    fn append(&mut self, event: ExperimentEvent) -> ExperimentResult<()> {
        self.events.push(event);
        Ok(())
    }

    fn events_for(&self, experiment_id: &str) -> ExperimentResult<Vec<ExperimentEvent>> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.experiment_id == experiment_id)
            .cloned()
            .collect())
    }
}
