//! End-to-end placement run: analyze, optimize, optionally set up an
//! experiment, splice and score.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use inkslot_content::analyze;
use inkslot_experiment::{EventStore, ExperimentError, ExperimentManager, ExperimentStore};
use inkslot_lexicon::Lexicon;
use inkslot_math::{clamp_unit, mean, round_f64};
use inkslot_placement::{PlacementContext, generate_placements};
use inkslot_settings::InkslotSettings;
use inkslot_types::{
    AdCreative, AdFormat, ContentAnalysisResult, ExperimentConfig, ExperimentStatus,
    ExperimentVariant, IntelligentPlacementResult, PlacementRecommendation, Repository, TestType,
    TrafficSplit, VariantConfig,
};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const ANALYSIS_FAILED: &str = "content analysis failed";
pub const PLACEMENT_FAILED: &str = "placement optimization failed";
pub const EXPERIMENT_FAILED: &str = "experiment setup failed";

const CONTENT_WEIGHT: f64 = 0.3;
const RELEVANCE_WEIGHT: f64 = 0.4;
const PLACEMENT_WEIGHT: f64 = 0.2;
const INVENTORY_WEIGHT: f64 = 0.1;
const TECHNOLOGY_BONUS: f64 = 0.1;
const SECTION_NORM: f64 = 8.0;
const CANDIDATE_NORM: f64 = 3.0;
const FORMAT_NORM: f64 = 4.0;
const SPREAD_NORM: f64 = 100.0;
const INVENTORY_NORM: f64 = 10.0;
const VARIANT_OFFSET: usize = 10;

fn default_variant_names() -> Vec<String> {
    vec!["control".to_string(), "multiple".to_string()]
}

/// Caller overrides for the experiment created over placement variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbTestRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_variant_names")]
    pub variants: Vec<String>,
    /// Keyed by variant name. Equal split when absent.
    #[serde(default)]
    pub traffic_split: Option<TrafficSplit>,
    #[serde(default)]
    pub min_sample_size: Option<u64>,
    #[serde(default)]
    pub confidence_level: Option<f64>,
}

impl Default for AbTestRequest {
    fn default() -> Self {
        Self {
            name: None,
            variants: default_variant_names(),
            traffic_split: None,
            min_sample_size: None,
            confidence_level: None,
        }
    }
}

/// One end-to-end request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRequest {
    pub repository: Repository,
    #[serde(default)]
    pub available_ads: Vec<AdCreative>,
    #[serde(default)]
    pub enable_ab_testing: bool,
    #[serde(default)]
    pub ab_test: Option<AbTestRequest>,
    /// Overrides `placement.max_ads`.
    #[serde(default)]
    pub max_ads: Option<usize>,
    /// Added to `placement.excluded_sections`.
    #[serde(default)]
    pub excluded_sections: Vec<String>,
}

impl PlacementRequest {
    pub fn new(repository: Repository, available_ads: Vec<AdCreative>) -> Self {
        Self {
            repository,
            available_ads,
            enable_ab_testing: false,
            ab_test: None,
            max_ads: None,
            excluded_sections: Vec::new(),
        }
    }
}

/// `exp-` plus a short BLAKE3 digest of the repository and document.
pub fn experiment_id(repository_id: &str, content_hash: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(repository_id.as_bytes());
    hasher.update(b":");
    hasher.update(content_hash.as_bytes());
    let hex = hasher.finalize().to_hex();
    format!("exp-{}", &hex[..16])
}

/// Lowercase, alphanumerics kept, everything else collapsed to `-`.
fn variant_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Placements a named variant shows.
///
/// `control`/`a` first only, `multiple`/`b` first two, `native`/`c` and
/// `banner`/`d` by format. Other names shift every placement down by
/// `index * 10` lines, capped at the document end.
pub fn variant_placements(
    name: &str,
    index: usize,
    placements: &[PlacementRecommendation],
    line_count: usize,
) -> Vec<PlacementRecommendation> {
    let by_format = |format: AdFormat| -> Vec<PlacementRecommendation> {
        placements
            .iter()
            .filter(|p| p.format == format)
            .cloned()
            .collect()
    };
    match name.trim().to_lowercase().as_str() {
        "control" | "a" => placements.iter().take(1).cloned().collect(),
        "multiple" | "b" => placements.iter().take(2).cloned().collect(),
        "native" | "c" => by_format(AdFormat::Native),
        "banner" | "d" => by_format(AdFormat::Banner),
        _ => placements
            .iter()
            .map(|p| PlacementRecommendation {
                position: (p.position + index * VARIANT_OFFSET).min(line_count),
                ..p.clone()
            })
            .collect(),
    }
}

/// Equal shares in whole percent, remainder on the first variant.
pub fn equal_split(ids: &[String]) -> TrafficSplit {
    let n = ids.len().max(1) as u32;
    let base = 100 / n;
    let remainder = 100 % n;
    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let share = if i == 0 { base + remainder } else { base };
            (id.clone(), f64::from(share))
        })
        .collect()
}

fn build_experiment(
    id: String,
    repository: &Repository,
    request: &AbTestRequest,
    placements: &[PlacementRecommendation],
    line_count: usize,
) -> ExperimentConfig {
    let mut variants: Vec<ExperimentVariant> = Vec::with_capacity(request.variants.len());
    for (index, name) in request.variants.iter().enumerate() {
        let subset = variant_placements(name, index, placements, line_count);
        let formats: BTreeSet<AdFormat> = subset.iter().map(|p| p.format).collect();
        variants.push(ExperimentVariant {
            id: variant_slug(name),
            name: name.clone(),
            config: VariantConfig {
                ad_creative_ids: Some(subset.iter().map(|p| p.ad_creative_id.clone()).collect()),
                formats: Some(formats.into_iter().collect()),
                placements: Some(subset),
                custom_settings: None,
            },
        });
    }

    let traffic_split = match &request.traffic_split {
        Some(split) => split
            .iter()
            .map(|(name, share)| (variant_slug(name), share))
            .collect(),
        None => {
            let ids: Vec<String> = variants.iter().map(|v| v.id.clone()).collect();
            equal_split(&ids)
        }
    };

    ExperimentConfig {
        id,
        name: request
            .name
            .clone()
            .unwrap_or_else(|| format!("Placement test for {}", repository.name)),
        description: Some(format!(
            "Placement variants for {} ({} candidate placements)",
            repository.id,
            placements.len()
        )),
        test_type: TestType::Placement,
        variants,
        traffic_split,
        start_ms: 0,
        end_ms: None,
        min_sample_size: request.min_sample_size.unwrap_or(0),
        confidence_level: request.confidence_level.unwrap_or(0.0),
        status: ExperimentStatus::Draft,
        winning_variant: None,
        stop_reason: None,
    }
}

/// Insert each placement's markup before the line at its position.
///
/// Works from the bottom up so earlier positions stay valid. With an
/// experiment id every block gets a tracking comment. A CRLF document
/// keeps CRLF endings, inserted markup included.
pub fn splice_placements(
    document: &str,
    placements: &[PlacementRecommendation],
    experiment_id: Option<&str>,
) -> String {
    let newline = if document.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = document.lines().map(str::to_string).collect();
    let mut ordered: Vec<&PlacementRecommendation> = placements.iter().collect();
    ordered.sort_by(|a, b| b.position.cmp(&a.position));

    for p in ordered {
        let at = p.position.min(lines.len());
        let rendered = p.rendered_content.replace("\r\n", "\n").replace('\n', newline);
        let mut block = vec![String::new(), rendered];
        if let Some(exp) = experiment_id {
            block.push(format!(
                "<!-- inkslot:placement ad={} experiment={} -->",
                p.ad_creative_id, exp
            ));
        }
        block.push(String::new());
        lines.splice(at..at, block);
    }

    let mut out = lines.join(newline);
    if document.ends_with('\n') {
        out.push_str(newline);
    }
    out
}

/// Weighted confidence in `[0, 1]`. Zero when nothing was placed.
pub fn overall_confidence(
    analysis: &ContentAnalysisResult,
    placements: &[PlacementRecommendation],
    inventory_size: usize,
) -> f64 {
    if placements.is_empty() {
        return 0.0;
    }

    let content_quality = mean(&[
        analysis.sentiment_score,
        1.0 - analysis.complexity_score,
        (analysis.sections.len() as f64 / SECTION_NORM).min(1.0),
        (analysis.placement_candidates.len() as f64 / CANDIDATE_NORM).min(1.0),
    ]);

    let scores: Vec<f64> = placements.iter().map(|p| p.score).collect();
    let bonus = if analysis.technologies.is_empty() {
        0.0
    } else {
        TECHNOLOGY_BONUS
    };
    let ad_relevance = clamp_unit(mean(&scores) + bonus);

    let formats: BTreeSet<AdFormat> = placements.iter().map(|p| p.format).collect();
    let (lo, hi) = placements
        .iter()
        .fold((usize::MAX, 0), |(lo, hi), p| (lo.min(p.position), hi.max(p.position)));
    let placement_quality = mean(&[
        (formats.len() as f64 / FORMAT_NORM).min(1.0),
        ((hi - lo) as f64 / SPREAD_NORM).min(1.0),
    ]);

    let inventory = (inventory_size as f64 / INVENTORY_NORM).min(1.0);

    round_f64(
        clamp_unit(
            content_quality * CONTENT_WEIGHT
                + ad_relevance * RELEVANCE_WEIGHT
                + placement_quality * PLACEMENT_WEIGHT
                + inventory * INVENTORY_WEIGHT,
        ),
        4,
    )
}

fn percent(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Human-readable trace of what drove the result.
pub fn build_reasoning(
    analysis: &ContentAnalysisResult,
    placements: &[PlacementRecommendation],
    repository: &Repository,
    settings: &InkslotSettings,
    experiment: Option<&ExperimentConfig>,
) -> Vec<String> {
    let mut out = Vec::new();

    match analysis.technologies.top() {
        Some(t) => out.push(format!(
            "Primary technology: {} ({} confidence)",
            t.name,
            percent(t.confidence)
        )),
        None => out.push("No specific technology detected".to_string()),
    }
    if let Some(topic) = analysis.topics.first() {
        out.push(format!(
            "Main topic: {} ({} confidence)",
            topic.name,
            percent(topic.confidence)
        ));
    }
    out.push(format!("Target audience: {}", analysis.target_audience));

    if placements.is_empty() {
        out.push("No suitable placements found".to_string());
    } else {
        out.push(format!("Generated {} placement(s)", placements.len()));
        let best = placements.iter().fold(&placements[0], |best, p| {
            if p.score > best.score { p } else { best }
        });
        out.push(format!(
            "Best placement: line {} in '{}' ({}, score {:.2})",
            best.position, best.section, best.format, best.score
        ));
    }

    let stars = repository.stars;
    let p = &settings.placement;
    if stars > p.banner_min_stars {
        out.push(format!(
            "Popular repository ({stars} stars): banner, card, text and native formats allowed"
        ));
    } else if stars > p.card_min_stars {
        out.push(format!(
            "Established repository ({stars} stars): card, text and native formats allowed"
        ));
    } else {
        out.push(format!(
            "Smaller repository ({stars} stars): text and native formats only"
        ));
    }

    if let Some(exp) = experiment {
        out.push(format!(
            "A/B test {} prepared with {} variants ({})",
            exp.id,
            exp.variants.len(),
            exp.status
        ));
    }
    out
}

/// Analyze, optimize, optionally register an experiment, then splice.
///
/// Failures from each phase are wrapped with that phase's context string.
/// An experiment is only created when requested and at least one
/// placement exists; it is left in draft status. A repeated request for
/// the same document reuses the stored experiment.
pub fn generate_intelligent_placements<S, E>(
    request: &PlacementRequest,
    lexicon: &Lexicon,
    settings: &InkslotSettings,
    experiments: &mut ExperimentManager<S, E>,
) -> Result<IntelligentPlacementResult>
where
    S: ExperimentStore,
    E: EventStore,
{
    let repo = &request.repository;
    let analysis =
        analyze(&repo.id, &repo.readme, lexicon, &settings.analysis).context(ANALYSIS_FAILED)?;

    let mut ctx = PlacementContext::new(
        repo.id.clone(),
        repo.stars,
        repo.language.clone(),
        &analysis,
        &settings.placement,
    )
    .with_excluded_sections(&request.excluded_sections);
    if let Some(max_ads) = request.max_ads {
        ctx = ctx.with_max_ads(max_ads);
    }
    if ctx.max_ads == 0 {
        return Err(anyhow::anyhow!("max_ads must be at least 1").context(PLACEMENT_FAILED));
    }
    let placements = generate_placements(&ctx, &request.available_ads, lexicon);

    let experiment = if request.enable_ab_testing && !placements.is_empty() {
        let id = experiment_id(&repo.id, &analysis.content_hash);
        let config = match experiments.get_test(&id) {
            Ok(config) => config,
            Err(ExperimentError::NotFound(_)) => {
                let ab = request.ab_test.clone().unwrap_or_default();
                let config = build_experiment(id, repo, &ab, &placements, analysis.line_count);
                experiments.create_test(config).context(EXPERIMENT_FAILED)?
            }
            Err(err) => return Err(err).context(EXPERIMENT_FAILED),
        };
        Some(config)
    } else {
        None
    };

    let modified_document = splice_placements(
        &repo.readme,
        &placements,
        experiment.as_ref().map(|e| e.id.as_str()),
    );
    let confidence = overall_confidence(&analysis, &placements, request.available_ads.len());
    let reasoning = build_reasoning(&analysis, &placements, repo, settings, experiment.as_ref());

    info!(
        repository = %repo.id,
        placements = placements.len(),
        experiment = experiment.as_ref().map(|e| e.id.as_str()).unwrap_or("none"),
        confidence,
        "intelligent placements generated"
    );

    Ok(IntelligentPlacementResult {
        content_analysis: analysis,
        placements,
        ab_test: experiment,
        confidence,
        reasoning,
        modified_document,
    })
}
