use crate::config::ScoringPolicy;

/// Inputs the rubric looks at.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub word_count: usize,
    pub densities: &'a [f64],
    pub meta_description_chars: usize,
    pub tone: &'a str,
}

/// Points awarded by each rubric line, before the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub length: u32,
    pub density: u32,
    pub meta: u32,
    pub tone: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.length + self.density + self.meta + self.tone
    }
}

pub struct SeoScorer {
    policy: ScoringPolicy,
}

impl SeoScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    pub fn breakdown(&self, input: &ScoreInput<'_>) -> ScoreBreakdown {
        let p = &self.policy;

        let length = if input.word_count > p.long_form_min_words {
            p.long_form_points
        } else {
            p.short_form_points
        };

        let (low, high) = p.density_band;
        let density = if input.densities.iter().any(|d| *d > low && *d < high) {
            p.density_in_band_points
        } else {
            p.density_out_of_band_points
        };

        let meta = if input.meta_description_chars < p.meta_max_chars {
            p.meta_short_points
        } else {
            p.meta_long_points
        };

        let tone = if input.tone.to_lowercase().contains(&p.tone_marker.to_lowercase()) {
            p.tone_points
        } else {
            0
        };

        ScoreBreakdown {
            length,
            density,
            meta,
            tone,
        }
    }

    /// Composite score, capped at the policy maximum (and at 100).
    pub fn score(&self, input: &ScoreInput<'_>) -> u8 {
        let breakdown = self.breakdown(input);
        let score = breakdown.total().min(self.policy.max_score).min(100) as u8;
        tracing::debug!(?breakdown, score, "Scored article");
        score
    }
}

impl Default for SeoScorer {
    fn default() -> Self {
        Self::new(ScoringPolicy::default())
    }
}
