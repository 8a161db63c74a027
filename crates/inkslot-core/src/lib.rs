//! # inkslot-core
//!
//! **Tier 3 (Orchestration)**
//!
//! This crate is the **primary library interface** for `inkslot`. It runs
//! the analyzer, the placement optimizer and the experiment manager as one
//! pipeline and exposes the JSON entrypoint used by language bindings.
//!
//! ## What belongs here
//! * The end-to-end placement run and its confidence score
//! * Splicing rendered ads into the document
//! * Structured errors and the response envelope
//!
//! ## What does NOT belong here
//! * Scoring rules (use inkslot-content / inkslot-placement)
//! * Statistics (use inkslot-experiment)
//! * Persistence (implement the inkslot-experiment store traits)
//!
//! ## Example
//!
//! ```rust,no_run
//! use inkslot_core::{PlacementRequest, generate_intelligent_placements};
//! use inkslot_experiment::ExperimentManager;
//! use inkslot_lexicon::Lexicon;
//! use inkslot_settings::InkslotSettings;
//! use inkslot_types::Repository;
//!
//! let repo = Repository {
//!     id: "r1".into(),
//!     name: "demo".into(),
//!     stars: 1200,
//!     language: Some("Rust".into()),
//!     readme: "# Demo\n\nA tool.\n\n## Installation\n\ncargo install demo\n".into(),
//! };
//! let settings = InkslotSettings::default();
//! let mut experiments = ExperimentManager::in_memory(settings.experiment.clone());
//! let request = PlacementRequest::new(repo, Vec::new());
//! let result = generate_intelligent_placements(
//!     &request,
//!     &Lexicon::builtin(),
//!     &settings,
//!     &mut experiments,
//! )
//! .expect("placement run failed");
//! println!("confidence {}", result.confidence);
//! ```

mod error;
pub mod ffi;
mod orchestrator;

pub use error::{ErrorCode, InkslotError, ResponseEnvelope};
pub use orchestrator::{
    ANALYSIS_FAILED, AbTestRequest, EXPERIMENT_FAILED, PLACEMENT_FAILED, PlacementRequest,
    build_reasoning, equal_split, experiment_id, generate_intelligent_placements,
    overall_confidence, splice_placements, variant_placements,
};

// Re-export the component crates for convenience.
pub use inkslot_content as content;
pub use inkslot_experiment as experiment;
pub use inkslot_placement as placement;
pub use inkslot_settings as settings;
pub use inkslot_types as types;
