use async_trait::async_trait;

use crate::types::{Article, ArticlePage, Pagination, SortOrder};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Store a new article. Fails with `Error::DuplicateSlug` if the slug is taken.
    async fn save(&self, article: &Article) -> Result<()>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// One page of articles ordered by creation time, plus the total count.
    async fn list(&self, pagination: Pagination, order: SortOrder) -> Result<ArticlePage>;

    /// Remove an article, returning it if it existed.
    async fn delete_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// Articles scoring at least `min_score`, best first, newest first on ties.
    async fn top_by_score(&self, min_score: u8, limit: usize) -> Result<Vec<Article>>;
}
