//! Structured error types for the JSON binding surface.

use std::fmt;

use inkslot_experiment::ExperimentError;
use inkslot_settings::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ANALYSIS_FAILED, EXPERIMENT_FAILED, PLACEMENT_FAILED};

/// Error codes for inkslot operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Invalid JSON input.
    InvalidJson,
    /// Invalid settings or arguments.
    InvalidSettings,
    /// Unknown operation mode.
    UnknownMode,
    /// Content analysis failed.
    AnalysisError,
    /// Placement optimization failed.
    PlacementError,
    /// Experiment validation, lifecycle or statistics failed.
    ExperimentError,
    /// Internal error (unexpected state).
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidJson => write!(f, "invalid_json"),
            ErrorCode::InvalidSettings => write!(f, "invalid_settings"),
            ErrorCode::UnknownMode => write!(f, "unknown_mode"),
            ErrorCode::AnalysisError => write!(f, "analysis_error"),
            ErrorCode::PlacementError => write!(f, "placement_error"),
            ErrorCode::ExperimentError => write!(f, "experiment_error"),
            ErrorCode::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error for binding-friendly reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InkslotError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl InkslotError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn invalid_json(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid JSON: {}", err))
    }

    pub fn unknown_mode(mode: &str) -> Self {
        Self::new(ErrorCode::UnknownMode, format!("Unknown mode: {}", mode))
    }

    /// A JSON argument had the wrong shape.
    pub fn invalid_field(field: &str, expected: &str) -> Self {
        Self::with_details(
            ErrorCode::InvalidSettings,
            format!("Invalid value for '{}'", field),
            format!("expected {}", expected),
        )
    }

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::InvalidSettings,
            format!("Missing required field '{}'", field),
        )
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {}", err))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}"}}"#,
                self.code, self.message
            )
        })
    }
}

impl fmt::Display for InkslotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "[{}] {}: {}", self.code, self.message, details)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for InkslotError {}

/// Orchestrator errors carry a phase prefix; map it back to a code.
impl From<anyhow::Error> for InkslotError {
    fn from(err: anyhow::Error) -> Self {
        let code = match err.to_string().as_str() {
            ANALYSIS_FAILED => ErrorCode::AnalysisError,
            PLACEMENT_FAILED => ErrorCode::PlacementError,
            EXPERIMENT_FAILED => ErrorCode::ExperimentError,
            _ => return Self::internal(format!("{err:#}")),
        };
        let cause = err
            .chain()
            .skip(1)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(": ");
        if cause.is_empty() {
            Self::new(code, err.to_string())
        } else {
            Self::with_details(code, err.to_string(), cause)
        }
    }
}

impl From<serde_json::Error> for InkslotError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_json(err)
    }
}

impl From<SettingsError> for InkslotError {
    fn from(err: SettingsError) -> Self {
        Self::with_details(ErrorCode::InvalidSettings, err.to_string(), err.field)
    }
}

impl From<ExperimentError> for InkslotError {
    fn from(err: ExperimentError) -> Self {
        match err.field() {
            Some(field) => Self::with_details(ErrorCode::ExperimentError, err.to_string(), field),
            None => Self::new(ErrorCode::ExperimentError, err.to_string()),
        }
    }
}

/// `{"ok": true, "data": ...}` or `{"ok": false, "error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<InkslotError>,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: &InkslotError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err.clone()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"error":{"code":"internal_error","message":"envelope serialization failed"}}"#
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn error_codes_serialize_to_snake_case() {
        let json = InkslotError::unknown_mode("foo").to_json();
        assert!(json.contains("\"code\":\"unknown_mode\""));
    }

    #[test]
    fn phase_context_maps_to_code() {
        let err: anyhow::Error = Err::<(), _>(anyhow::anyhow!("too big"))
            .context(ANALYSIS_FAILED)
            .unwrap_err();
        let mapped = InkslotError::from(err);
        assert_eq!(mapped.code, ErrorCode::AnalysisError);
        assert_eq!(mapped.message, ANALYSIS_FAILED);
        assert_eq!(mapped.details.as_deref(), Some("too big"));
    }

    #[test]
    fn plain_anyhow_is_internal() {
        let mapped = InkslotError::from(anyhow::anyhow!("boom"));
        assert_eq!(mapped.code, ErrorCode::InternalError);
    }

    #[test]
    fn experiment_validation_keeps_field() {
        let mapped = InkslotError::from(ExperimentError::validation("name", "must not be empty"));
        assert_eq!(mapped.code, ErrorCode::ExperimentError);
        assert_eq!(mapped.details.as_deref(), Some("name"));
    }

    #[test]
    fn display_includes_code() {
        let err = InkslotError::new(ErrorCode::PlacementError, "test message");
        assert_eq!(err.to_string(), "[placement_error] test message");
    }
}
