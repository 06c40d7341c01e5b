use crate::types::LengthCategory;

pub const FALLBACK_TITLE: &str = "Untitled Blog";
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
pub const WORDS_PER_MINUTE: usize = 200;

/// Target word counts per length bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTargets {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
    /// Used for any length string that is not a known bucket.
    pub fallback: usize,
}

impl Default for WordTargets {
    fn default() -> Self {
        Self {
            short: 400,
            medium: 800,
            long: 1500,
            fallback: 800,
        }
    }
}

impl WordTargets {
    pub fn for_category(&self, category: LengthCategory) -> usize {
        match category {
            LengthCategory::Short => self.short,
            LengthCategory::Medium => self.medium,
            LengthCategory::Long => self.long,
        }
    }

    pub fn for_length(&self, length: &str) -> usize {
        length
            .parse::<LengthCategory>()
            .map(|c| self.for_category(c))
            .unwrap_or(self.fallback)
    }
}

/// Weights and thresholds of the SEO rubric.
///
/// Stored scores are never recomputed, so any change to a value here must come
/// with a new `version`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringPolicy {
    pub version: u32,
    pub max_score: u32,

    pub long_form_min_words: usize,
    pub long_form_points: u32,
    pub short_form_points: u32,

    /// Exclusive bounds, in percent.
    pub density_band: (f64, f64),
    pub density_in_band_points: u32,
    pub density_out_of_band_points: u32,

    /// Meta descriptions strictly shorter than this earn the full bonus.
    pub meta_max_chars: usize,
    pub meta_short_points: u32,
    pub meta_long_points: u32,

    pub tone_marker: String,
    pub tone_points: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            version: 1,
            max_score: 100,
            long_form_min_words: 500,
            long_form_points: 30,
            short_form_points: 10,
            density_band: (1.0, 3.0),
            density_in_band_points: 40,
            density_out_of_band_points: 10,
            meta_max_chars: META_DESCRIPTION_MAX_CHARS,
            meta_short_points: 20,
            meta_long_points: 10,
            tone_marker: "friendly".to_string(),
            tone_points: 10,
        }
    }
}

/// Everything the article pipeline needs, passed in explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub word_targets: WordTargets,
    pub words_per_minute: usize,
    pub fallback_title: String,
    pub scoring: ScoringPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            word_targets: WordTargets::default(),
            words_per_minute: WORDS_PER_MINUTE,
            fallback_title: FALLBACK_TITLE.to_string(),
            scoring: ScoringPolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Meta descriptions are truncated to the same length the rubric rewards.
    pub fn meta_max_chars(&self) -> usize {
        self.scoring.meta_max_chars
    }
}
