//! # inkslot-content
//!
//! **Tier 2 (Content Analyzer)**
//!
//! Turns README text into structure (sections, code blocks), keyword
//! signals (languages, frameworks, tools, topics), document scores
//! (sentiment, complexity, audience) and ranked placement candidates.
//!
//! Everything is deterministic keyword and pattern matching. The same
//! text, lexicon and settings always produce the same result.

mod candidates;
mod scoring;
mod signals;
mod structure;

use anyhow::{Result, bail};
use inkslot_lexicon::Lexicon;
use inkslot_settings::AnalysisSettings;
use inkslot_types::{ANALYSIS_SCHEMA_VERSION, ContentAnalysisResult, TechnologySignals};
use tracing::debug;

pub use candidates::placement_candidates;
pub use scoring::{complexity_score, sentiment_score, target_audience};
pub use signals::{count_term, detect_signals, entry_confidence};
pub use structure::{extract_code_blocks, extract_sections, sentence_count, tokenize, word_count};

/// BLAKE3 hex digest of the document text.
pub fn content_hash(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}

/// Whether a stored analysis keyed by `previous_hash` is stale for `text`.
pub fn needs_reanalysis(previous_hash: Option<&str>, text: &str) -> bool {
    previous_hash != Some(content_hash(text).as_str())
}

/// Analyze with the built-in lexicon and default settings.
pub fn analyze_content(repository_id: &str, text: &str) -> Result<ContentAnalysisResult> {
    analyze(
        repository_id,
        text,
        &Lexicon::builtin(),
        &AnalysisSettings::default(),
    )
}

/// Run the full analysis.
///
/// Only fails when `text` exceeds `settings.max_document_bytes`. Documents
/// without headings or code produce empty structure and at most the
/// end-of-document candidate.
pub fn analyze(
    repository_id: &str,
    text: &str,
    lexicon: &Lexicon,
    settings: &AnalysisSettings,
) -> Result<ContentAnalysisResult> {
    if text.len() > settings.max_document_bytes {
        bail!(
            "document for {} is {} bytes, limit is {}",
            repository_id,
            text.len(),
            settings.max_document_bytes
        );
    }

    let lines: Vec<&str> = text.lines().collect();
    let code_blocks = extract_code_blocks(&lines);
    let sections = extract_sections(&lines, &code_blocks);

    let lower = text.to_lowercase();
    let technologies = TechnologySignals {
        languages: detect_signals(&lower, lexicon.languages, settings.top_technologies),
        frameworks: detect_signals(&lower, lexicon.frameworks, settings.top_technologies),
        tools: detect_signals(&lower, lexicon.tools, settings.top_technologies),
    };
    let topics = detect_signals(&lower, lexicon.topics, settings.top_topics);

    let tokens = tokenize(text);
    let sentiment = sentiment_score(&tokens, lexicon.sentiment);
    let complexity = complexity_score(&tokens, sentence_count(text), code_blocks.len());
    let audience = target_audience(&lower, &lexicon.audience, &topics);

    let candidates = placement_candidates(
        &sections,
        &code_blocks,
        lines.len(),
        lexicon,
        settings.max_candidates,
    );

    let hash = content_hash(text);
    debug!(
        repository = repository_id,
        hash = &hash[..12],
        sections = sections.len(),
        code_blocks = code_blocks.len(),
        candidates = candidates.len(),
        audience = %audience,
        "content analysed"
    );

    Ok(ContentAnalysisResult {
        schema_version: ANALYSIS_SCHEMA_VERSION,
        repository_id: repository_id.to_string(),
        content_hash: hash,
        technologies,
        topics,
        sentiment_score: sentiment,
        complexity_score: complexity,
        target_audience: audience,
        sections,
        code_blocks,
        placement_candidates: candidates,
        line_count: lines.len(),
        word_count: tokens.len(),
    })
}
