use inkslot_settings::PlacementSettings;
use inkslot_types::{AdFormat, ContentAnalysisResult};

/// Sections that never receive ads, whatever the settings say.
pub const ALWAYS_EXCLUDED: &[&str] = &["license", "contributing", "changelog"];

/// Everything the optimizer knows about one document and its repository.
#[derive(Debug, Clone)]
pub struct PlacementContext<'a> {
    pub repository_id: String,
    pub stars: u64,
    pub language: Option<String>,
    pub analysis: &'a ContentAnalysisResult,
    pub max_ads: usize,
    pub allowed_formats: Vec<AdFormat>,
    /// Lowercase section-name substrings that never receive ads.
    pub excluded_sections: Vec<String>,
    pub min_distance: usize,
    pub candidate_weight: f64,
    pub relevance_weight: f64,
}

impl<'a> PlacementContext<'a> {
    /// Build a context from settings. Allowed formats widen with star count.
    ///
    /// Settings exclusions extend [`ALWAYS_EXCLUDED`]; they cannot remove it.
    pub fn new(
        repository_id: impl Into<String>,
        stars: u64,
        language: Option<String>,
        analysis: &'a ContentAnalysisResult,
        settings: &PlacementSettings,
    ) -> Self {
        Self {
            repository_id: repository_id.into(),
            stars,
            language,
            analysis,
            max_ads: settings.max_ads,
            allowed_formats: allowed_formats(stars, settings),
            excluded_sections: ALWAYS_EXCLUDED.iter().map(|s| s.to_string()).collect(),
            min_distance: settings.min_distance,
            candidate_weight: settings.candidate_weight,
            relevance_weight: settings.relevance_weight,
        }
        .with_excluded_sections(&settings.excluded_sections)
    }

    /// Add caller exclusions on top of the defaults, skipping duplicates.
    pub fn with_excluded_sections<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for section in extra {
            let section = section.as_ref().trim().to_lowercase();
            if !section.is_empty() && !self.excluded_sections.contains(&section) {
                self.excluded_sections.push(section);
            }
        }
        self
    }

    pub fn with_max_ads(mut self, max_ads: usize) -> Self {
        self.max_ads = max_ads;
        self
    }

    pub fn is_excluded(&self, section: &str) -> bool {
        let section = section.to_lowercase();
        self.excluded_sections
            .iter()
            .any(|ex| section.contains(ex.as_str()))
    }

    pub fn allows(&self, format: AdFormat) -> bool {
        self.allowed_formats.contains(&format)
    }
}

/// Text and native always; card and banner above their star thresholds.
pub fn allowed_formats(stars: u64, settings: &PlacementSettings) -> Vec<AdFormat> {
    let mut formats = vec![AdFormat::Text, AdFormat::Native];
    if stars > settings.card_min_stars {
        formats.push(AdFormat::Card);
    }
    if stars > settings.banner_min_stars {
        formats.push(AdFormat::Banner);
    }
    formats
}
