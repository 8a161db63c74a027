use std::fmt;

use inkslot_types::ExperimentStatus;

/// Failures raised by the experiment manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ExperimentError {
    /// Malformed configuration or event. `field` names the offending input.
    Validation { field: &'static str, message: String },
    /// No experiment with this id.
    NotFound(String),
    /// Statistics cannot be computed for this experiment.
    Computation(String),
    /// Lifecycle change not allowed from the current status.
    InvalidTransition {
        id: String,
        from: ExperimentStatus,
        action: &'static str,
    },
    /// The backing store failed.
    Store(String),
}

impl ExperimentError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Field name for validation errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "invalid experiment `{field}`: {message}")
            }
            Self::NotFound(id) => write!(f, "experiment not found: {id}"),
            Self::Computation(message) => write!(f, "cannot analyze experiment: {message}"),
            Self::InvalidTransition { id, from, action } => {
                write!(f, "cannot {action} experiment {id} while {from}")
            }
            Self::Store(message) => write!(f, "experiment store error: {message}"),
        }
    }
}

impl std::error::Error for ExperimentError {}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
