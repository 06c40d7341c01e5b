use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::lexical;
use crate::metrics;
use crate::scoring::{ScoreInput, SeoScorer};
use crate::segment;
use crate::slug;
use crate::types::{Article, GenerationRequest, LexicalStats, Prompt, SeoMetrics};

pub const SYSTEM_PROMPT: &str =
    "You are an expert SEO content writer who writes engaging and optimized blog posts.";

/// Turns raw generated text into a finished [`Article`].
///
/// Always produces a record: unusable text falls back to the default title
/// and a keyword-based meta description.
pub struct ArticleAssembler {
    config: PipelineConfig,
    scorer: SeoScorer,
}

impl ArticleAssembler {
    pub fn new(config: PipelineConfig) -> Self {
        let scorer = SeoScorer::new(config.scoring.clone());
        Self { config, scorer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn target_words(&self, request: &GenerationRequest) -> usize {
        self.config.word_targets.for_length(&request.length)
    }

    pub fn prompt(&self, request: &GenerationRequest) -> Prompt {
        let user = format!(
            "Generate an SEO-friendly blog post of about {} words.\n\
             Tone: {}.\n\
             Keywords: {}.\n\
             The blog must include:\n\
             1. A catchy title (first line)\n\
             2. A meta description (second line, under {} characters)\n\
             3. Multiple headings and short paragraphs.\n\
             4. Use markdown or plain text only.",
            self.target_words(request),
            request.tone,
            request.joined_keywords(),
            self.config.meta_max_chars(),
        );
        Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    pub fn assemble(&self, raw: &str, request: &GenerationRequest) -> Article {
        self.assemble_at(raw, request, Utc::now())
    }

    pub fn assemble_at(
        &self,
        raw: &str,
        request: &GenerationRequest,
        created_at: DateTime<Utc>,
    ) -> Article {
        if raw.trim().is_empty() {
            tracing::warn!("Generated text is empty, assembling article from fallbacks");
        }

        let parsed = segment::segment(raw, &request.keywords, &self.config);
        let slug = slug::slugify(&parsed.title);
        let stats = lexical::analyze(&parsed.body, &request.keywords);
        let seo = self.metrics(&stats, &parsed.meta_description, &request.tone);

        tracing::debug!(
            slug = %slug,
            word_count = stats.word_count,
            seo_score = seo.seo_score,
            "Assembled article"
        );

        Article {
            id: Uuid::new_v4(),
            title: parsed.title,
            slug,
            meta_description: parsed.meta_description,
            keywords: request.keywords.clone(),
            tone: request.tone.clone(),
            body: parsed.body,
            length: request.length.clone(),
            word_count: stats.word_count,
            read_time: seo.read_time_minutes,
            keyword_density: stats.keyword_density,
            seo_score: seo.seo_score,
            score_version: seo.score_version,
            created_at,
        }
    }

    fn metrics(&self, stats: &LexicalStats, meta_description: &str, tone: &str) -> SeoMetrics {
        let densities: Vec<f64> = stats.densities().collect();
        let seo_score = self.scorer.score(&ScoreInput {
            word_count: stats.word_count,
            densities: &densities,
            meta_description_chars: meta_description.chars().count(),
            tone,
        });
        SeoMetrics {
            read_time_minutes: metrics::read_time_minutes(
                stats.word_count,
                self.config.words_per_minute,
            ),
            seo_score,
            score_version: self.scorer.policy().version,
        }
    }
}

impl Default for ArticleAssembler {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
