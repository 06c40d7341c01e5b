use std::sync::Arc;

use tracing::{error, info};

use crate::assembler::ArticleAssembler;
use crate::generator::TextGenerator;
use crate::storage::ArticleStorage;
use crate::types::{Article, ArticlePage, GenerationRequest, Pagination, SortOrder};
use crate::{Error, Result};

/// Ties the generation backend, the article pipeline and storage together.
pub struct BlogService {
    generator: Arc<dyn TextGenerator>,
    storage: Arc<dyn ArticleStorage>,
    assembler: ArticleAssembler,
}

impl BlogService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        storage: Arc<dyn ArticleStorage>,
        assembler: ArticleAssembler,
    ) -> Self {
        Self {
            generator,
            storage,
            assembler,
        }
    }

    pub fn assembler(&self) -> &ArticleAssembler {
        &self.assembler
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Generate, assemble and store one article.
    ///
    /// Generation failures surface as `Error::Generation` before anything is
    /// assembled; a taken slug surfaces as `Error::DuplicateSlug`.
    pub async fn generate(&self, request: GenerationRequest) -> Result<Article> {
        let request = request.normalized();
        let prompt = self.assembler.prompt(&request);

        info!(
            "🧠 Requesting article from {} for keywords [{}]",
            self.generator.name(),
            request.joined_keywords()
        );
        let raw = self.generator.generate(&prompt).await.map_err(|e| match e {
            Error::Generation(_) => e,
            other => Error::Generation(other.to_string()),
        })?;

        let article = self.assembler.assemble(&raw, &request);
        info!(
            "📝 Assembled \"{}\" ({} words, score {})",
            article.title, article.word_count, article.seo_score
        );

        if let Err(e) = self.storage.save(&article).await {
            error!("Failed to store article {}: {}", article.slug, e);
            return Err(e);
        }
        info!("💾 Stored article {}", article.slug);
        Ok(article)
    }

    pub async fn get(&self, slug: &str) -> Result<Article> {
        self.storage
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound(format!("article {}", slug)))
    }

    pub async fn list(&self, pagination: Pagination, order: SortOrder) -> Result<ArticlePage> {
        self.storage.list(pagination, order).await
    }

    pub async fn delete(&self, slug: &str) -> Result<Article> {
        let deleted = self
            .storage
            .delete_by_slug(slug)
            .await?
            .ok_or_else(|| Error::NotFound(format!("article {}", slug)))?;
        info!("🗑️ Deleted article {}", deleted.slug);
        Ok(deleted)
    }

    pub async fn top(&self, min_score: u8, limit: usize) -> Result<Vec<Article>> {
        self.storage.top_by_score(min_score, limit).await
    }
}
