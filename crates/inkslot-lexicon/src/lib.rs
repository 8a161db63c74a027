//! # inkslot-lexicon
//!
//! **Tier 1 (Static Tables)**
//!
//! Keyword dictionaries and placement heuristics used by the analyzer and
//! the optimizer. Everything here is data; the scoring functions take a
//! [`Lexicon`] as an explicit parameter so tests can swap in small tables.
//!
//! Dictionary order matters: signal ties are broken by table position.

mod tables;

pub use tables::{
    ADVANCED_INDICATORS, BEGINNER_INDICATORS, FRAMEWORK_LANGUAGES, FRAMEWORKS,
    INSTALL_SECTION_TERMS, INTRO_SECTION_TERMS, LANGUAGES, RESEARCH_INDICATORS,
    RESOURCE_SECTION_TERMS, SENTIMENT, TOOLS, TOPICS,
};

/// A canonical name and the surface keywords that indicate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordEntry {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

/// Indicator vocabularies for audience voting.
#[derive(Debug, Clone, Copy)]
pub struct AudienceIndicators {
    pub beginner: &'static [&'static str],
    pub advanced: &'static [&'static str],
    pub research: &'static [&'static str],
}

/// Line-placement heuristics for candidate generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementHeuristics {
    /// Score for the slot after the introduction section.
    pub intro_score: f64,
    /// The introduction must have more words than this.
    pub intro_min_words: usize,
    /// Score for the slot before the install section.
    pub install_score: f64,
    /// Score for a slot between two sections.
    pub between_score: f64,
    /// The preceding section must have more words than this.
    pub between_min_words: usize,
    /// Score for the slot near the end of long documents.
    pub tail_score: f64,
    /// Documents must have more lines than this to get a tail slot.
    pub tail_min_lines: usize,
    /// Distance of the tail slot from the last line.
    pub tail_offset: usize,
}

pub const PLACEMENT_HEURISTICS: PlacementHeuristics = PlacementHeuristics {
    intro_score: 0.9,
    intro_min_words: 50,
    install_score: 0.8,
    between_score: 0.6,
    between_min_words: 30,
    tail_score: 0.4,
    tail_min_lines: 100,
    tail_offset: 5,
};

/// The full set of tables one analysis run reads.
#[derive(Debug, Clone, Copy)]
pub struct Lexicon {
    pub languages: &'static [KeywordEntry],
    pub frameworks: &'static [KeywordEntry],
    pub tools: &'static [KeywordEntry],
    pub topics: &'static [KeywordEntry],
    pub audience: AudienceIndicators,
    /// Weighted polarity words, AFINN style.
    pub sentiment: &'static [(&'static str, i32)],
    /// Framework name to the languages it belongs to.
    pub framework_languages: &'static [(&'static str, &'static [&'static str])],
    pub intro_sections: &'static [&'static str],
    pub install_sections: &'static [&'static str],
    pub resource_sections: &'static [&'static str],
    pub heuristics: PlacementHeuristics,
}

impl Lexicon {
    /// The built-in tables.
    pub const fn builtin() -> Self {
        Self {
            languages: LANGUAGES,
            frameworks: FRAMEWORKS,
            tools: TOOLS,
            topics: TOPICS,
            audience: AudienceIndicators {
                beginner: BEGINNER_INDICATORS,
                advanced: ADVANCED_INDICATORS,
                research: RESEARCH_INDICATORS,
            },
            sentiment: SENTIMENT,
            framework_languages: FRAMEWORK_LANGUAGES,
            intro_sections: INTRO_SECTION_TERMS,
            install_sections: INSTALL_SECTION_TERMS,
            resource_sections: RESOURCE_SECTION_TERMS,
            heuristics: PLACEMENT_HEURISTICS,
        }
    }

    /// Languages a framework belongs to, empty when unknown.
    pub fn languages_for_framework(&self, framework: &str) -> &'static [&'static str] {
        self.framework_languages
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(framework))
            .map(|(_, langs)| *langs)
            .unwrap_or(&[])
    }

    pub fn is_intro_title(&self, title: &str) -> bool {
        contains_any(title, self.intro_sections)
    }

    pub fn is_install_title(&self, title: &str) -> bool {
        contains_any(title, self.install_sections)
    }

    pub fn is_resource_title(&self, title: &str) -> bool {
        contains_any(title, self.resource_sections)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn contains_any(title: &str, terms: &[&str]) -> bool {
    let lower = title.to_lowercase();
    terms.iter().any(|t| lower.contains(t))
}
