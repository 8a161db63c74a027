//! JSON entrypoint for language bindings.
//!
//! A single `run_json` takes a mode string and JSON arguments and returns a
//! JSON envelope:
//! - Success: `{"ok": true, "data": {...}}`
//! - Error: `{"ok": false, "error": {"code": "...", "message": "...", "details": ...}}`
//!
//! Missing optional keys use defaults; values of the wrong type are errors.

use inkslot_content::analyze;
use inkslot_experiment::{ExperimentManager, assign_variant};
use inkslot_lexicon::Lexicon;
use inkslot_placement::{PlacementContext, generate_placements};
use inkslot_settings::InkslotSettings;
use inkslot_types::{ANALYSIS_SCHEMA_VERSION, AdCreative, Repository, TrafficSplit};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{ErrorCode, InkslotError, ResponseEnvelope};
use crate::orchestrator::{PlacementRequest, generate_intelligent_placements};

/// Run one inkslot operation.
///
/// Modes: `analyze`, `placements`, `assign`, `generate`, `version`.
///
/// ```ignore
/// let out = run_json("analyze", r#"{"text": "# Title\n..."}"#);
/// // {"ok": true, "data": {"schema_version": 2, ...}}
/// ```
pub fn run_json(mode: &str, args_json: &str) -> String {
    match run_json_inner(mode, args_json) {
        Ok(data) => ResponseEnvelope::success(data).to_json(),
        Err(err) => ResponseEnvelope::error(&err).to_json(),
    }
}

fn run_json_inner(mode: &str, args_json: &str) -> Result<Value, InkslotError> {
    let args: Value = serde_json::from_str(args_json)?;
    if !args.is_object() {
        return Err(InkslotError::invalid_field("arguments", "a JSON object"));
    }
    let lexicon = Lexicon::builtin();

    match mode {
        "analyze" => {
            let settings = parse_settings(&args)?;
            let repository_id = parse_string(&args, "repository_id", "inline")?;
            let text = parse_required_string(&args, "text")?;
            let analysis = analyze(&repository_id, &text, &lexicon, &settings.analysis)
                .map_err(|e| InkslotError::new(ErrorCode::AnalysisError, format!("{e:#}")))?;
            Ok(serde_json::to_value(&analysis)?)
        }
        "placements" => {
            let settings = parse_settings(&args)?;
            let repository: Repository = parse_required(&args, "repository", "a repository object")?;
            let ads: Vec<AdCreative> = parse_optional(&args, "ads", "an array of ad creatives")?
                .unwrap_or_default();
            let max_ads = parse_optional_usize(&args, "max_ads")?;
            let excluded = parse_string_array(&args, "excluded_sections", Vec::new())?;

            let analysis = analyze(
                &repository.id,
                &repository.readme,
                &lexicon,
                &settings.analysis,
            )
            .map_err(|e| InkslotError::new(ErrorCode::AnalysisError, format!("{e:#}")))?;
            let mut ctx = PlacementContext::new(
                repository.id.clone(),
                repository.stars,
                repository.language.clone(),
                &analysis,
                &settings.placement,
            )
            .with_excluded_sections(&excluded);
            if let Some(max_ads) = max_ads {
                ctx = ctx.with_max_ads(max_ads);
            }
            let placements = generate_placements(&ctx, &ads, &lexicon);
            Ok(serde_json::to_value(&placements)?)
        }
        "assign" => {
            let experiment_id = parse_required_string(&args, "experiment_id")?;
            let subject_id = parse_required_string(&args, "subject_id")?;
            let split: TrafficSplit =
                parse_required(&args, "traffic_split", "an object of variant shares")?;
            let variant = assign_variant(&experiment_id, &subject_id, &split)
                .ok_or_else(|| InkslotError::invalid_field("traffic_split", "a non-empty object"))?;
            Ok(json!({ "variant": variant }))
        }
        "generate" => {
            let settings = parse_settings(&args)?;
            let request: PlacementRequest = serde_json::from_value(args.clone())
                .map_err(|e| InkslotError::with_details(
                    ErrorCode::InvalidSettings,
                    "Invalid placement request",
                    e.to_string(),
                ))?;
            let mut experiments = ExperimentManager::in_memory(settings.experiment.clone());
            let result =
                generate_intelligent_placements(&request, &lexicon, &settings, &mut experiments)?;
            Ok(serde_json::to_value(&result)?)
        }
        "version" => Ok(json!({
            "version": env!("CARGO_PKG_VERSION"),
            "schema_version": ANALYSIS_SCHEMA_VERSION,
        })),
        _ => Err(InkslotError::unknown_mode(mode)),
    }
}

// ============================================================================
// Strict parsing helpers
// ============================================================================

/// Optional `settings` object, validated.
fn parse_settings(args: &Value) -> Result<InkslotSettings, InkslotError> {
    let settings: InkslotSettings =
        parse_optional(args, "settings", "a settings object")?.unwrap_or_default();
    settings.validate()?;
    Ok(settings)
}

fn parse_required_string(args: &Value, field: &str) -> Result<String, InkslotError> {
    match args.get(field) {
        None | Some(Value::Null) => Err(InkslotError::missing_field(field)),
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| InkslotError::invalid_field(field, "a string")),
    }
}

/// Parse a string field strictly: missing -> default, non-string -> error.
fn parse_string(args: &Value, field: &str, default: &str) -> Result<String, InkslotError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(v) => v
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| InkslotError::invalid_field(field, "a string")),
    }
}

fn parse_optional_usize(args: &Value, field: &str) -> Result<Option<usize>, InkslotError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| InkslotError::invalid_field(field, "a non-negative integer")),
    }
}

fn parse_string_array(
    args: &Value,
    field: &str,
    default: Vec<String>,
) -> Result<Vec<String>, InkslotError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => serde_json::from_value::<Vec<String>>(v.clone())
            .map_err(|_| InkslotError::invalid_field(field, "an array of strings")),
    }
}

fn parse_optional<T: DeserializeOwned>(
    args: &Value,
    field: &str,
    expected: &str,
) -> Result<Option<T>, InkslotError> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value::<T>(v.clone())
            .map(Some)
            .map_err(|_| InkslotError::invalid_field(field, expected)),
    }
}

fn parse_required<T: DeserializeOwned>(
    args: &Value,
    field: &str,
    expected: &str,
) -> Result<T, InkslotError> {
    parse_optional(args, field, expected)?.ok_or_else(|| InkslotError::missing_field(field))
}
