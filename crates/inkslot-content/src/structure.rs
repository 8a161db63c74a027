//! Document structure: fenced code blocks, heading sections and word tokens.

use std::sync::LazyLock;

use inkslot_types::{CodeBlock, Section};
use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ {0,3}(#{1,6})[ \t]+(.*?)(?:[ \t]+#+)?[ \t]*$").expect("valid regex literal")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}][\p{L}\p{N}'_-]*").expect("valid regex literal"));

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex literal"));

const DEFAULT_FENCE_LANGUAGE: &str = "text";

/// Lowercased word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

pub fn word_count(text: &str) -> usize {
    WORD.find_iter(text).count()
}

/// Number of sentences that contain at least one word.
pub fn sentence_count(text: &str) -> usize {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| WORD.is_match(s))
        .count()
}

fn fence_marker(line: &str) -> Option<(&'static str, &str)> {
    let trimmed = line.trim_start();
    for marker in ["```", "~~~"] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some((marker, rest));
        }
    }
    None
}

/// Pair each opening fence with the next fence of the same kind.
///
/// An unclosed fence runs to the last line of the document.
pub fn extract_code_blocks(lines: &[&str]) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(&'static str, usize, String)> = None;

    for (idx, line) in lines.iter().enumerate() {
        let Some((marker, rest)) = fence_marker(line) else {
            continue;
        };
        match open.take() {
            None => {
                let language = rest
                    .split_whitespace()
                    .next()
                    .map(|s| s.trim_matches(|c| c == '{' || c == '}'))
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_FENCE_LANGUAGE)
                    .to_lowercase();
                open = Some((marker, idx, language));
            }
            Some((open_marker, start, language)) if open_marker == marker => {
                blocks.push(CodeBlock {
                    language,
                    start_line: start,
                    end_line: idx,
                    line_count: idx - start + 1,
                });
            }
            Some(still_open) => open = Some(still_open),
        }
    }

    if let Some((_, start, language)) = open {
        let end = lines.len().saturating_sub(1).max(start);
        blocks.push(CodeBlock {
            language,
            start_line: start,
            end_line: end,
            line_count: end - start + 1,
        });
    }

    blocks
}

/// Split the document at heading lines. Headings inside code blocks are ignored.
///
/// Each section runs from its heading to the line before the next heading,
/// or to the end of the document. Text before the first heading belongs to
/// no section.
pub fn extract_sections(lines: &[&str], code_blocks: &[CodeBlock]) -> Vec<Section> {
    let mut headings: Vec<(usize, u8, String)> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if code_blocks.iter().any(|b| b.contains(idx)) {
            continue;
        }
        if let Some(caps) = HEADING.captures(line) {
            let level = caps.get(1).map_or(1, |m| m.as_str().len()) as u8;
            let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
            headings.push((idx, level, title));
        }
    }

    let mut sections = Vec::with_capacity(headings.len());
    for (i, (start, level, title)) in headings.iter().enumerate() {
        let end = match headings.get(i + 1) {
            Some((next, _, _)) => next - 1,
            None => lines.len().saturating_sub(1),
        };
        let words = lines[*start..=end].iter().map(|l| word_count(l)).sum();
        sections.push(Section {
            title: title.clone(),
            level: *level,
            start_line: *start,
            end_line: end,
            word_count: words,
        });
    }
    sections
}
