//! Ranked insertion points derived from document structure.

use inkslot_lexicon::Lexicon;
use inkslot_types::{CodeBlock, PlacementCandidate, Section};

const DOCUMENT_END: &str = "document end";

fn inside_code(code_blocks: &[CodeBlock], line: usize) -> bool {
    code_blocks.iter().any(|b| b.contains(line))
}

fn spans_gap(code_blocks: &[CodeBlock], prev: &Section, next: &Section) -> bool {
    code_blocks
        .iter()
        .any(|b| b.start_line <= prev.end_line && b.end_line >= next.start_line)
}

fn section_at<'a>(sections: &'a [Section], line: usize) -> Option<&'a Section> {
    sections
        .iter()
        .find(|s| line >= s.start_line && line <= s.end_line)
}

/// Propose insertion points in priority order, then keep the best `limit`.
///
/// 1. after the introduction (first level-1 or intro-titled section) when it is long enough
/// 2. before the install / setup section
/// 3. between consecutive sections with enough text and no code across the gap
/// 4. a few lines before the end of long documents
pub fn placement_candidates(
    sections: &[Section],
    code_blocks: &[CodeBlock],
    line_count: usize,
    lexicon: &Lexicon,
    limit: usize,
) -> Vec<PlacementCandidate> {
    let h = &lexicon.heuristics;
    let mut out: Vec<PlacementCandidate> = Vec::new();

    if let Some(intro) = sections
        .iter()
        .find(|s| s.level == 1 || lexicon.is_intro_title(&s.title))
        && intro.word_count > h.intro_min_words
    {
        out.push(PlacementCandidate {
            position: intro.end_line + 1,
            section: intro.title.clone(),
            score: h.intro_score,
            reasoning: format!(
                "After introduction '{}' ({} words): readers have context before the ad",
                intro.title, intro.word_count
            ),
        });
    }

    if let Some(install) = sections.iter().find(|s| lexicon.is_install_title(&s.title)) {
        out.push(PlacementCandidate {
            position: install.start_line,
            section: install.title.clone(),
            score: h.install_score,
            reasoning: format!("Before setup section '{}': natural pause", install.title),
        });
    }

    for pair in sections.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        let position = prev.end_line + 1;
        if prev.word_count <= h.between_min_words
            || spans_gap(code_blocks, prev, next)
            || inside_code(code_blocks, position)
            || out.iter().any(|c| c.position == position)
        {
            continue;
        }
        out.push(PlacementCandidate {
            position,
            section: prev.title.clone(),
            score: h.between_score,
            reasoning: format!(
                "Between '{}' and '{}': section break without code",
                prev.title, next.title
            ),
        });
    }

    if line_count > h.tail_min_lines {
        let mut position = line_count - h.tail_offset;
        if let Some(block) = code_blocks.iter().find(|b| b.contains(position)) {
            position = block.end_line + 1;
        }
        let section = section_at(sections, position)
            .map(|s| s.title.clone())
            .unwrap_or_else(|| DOCUMENT_END.to_string());
        out.push(PlacementCandidate {
            position,
            section,
            score: h.tail_score,
            reasoning: format!(
                "Near the end of a {line_count}-line document: low-interruption slot"
            ),
        });
    }

    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out.truncate(limit);
    out
}
