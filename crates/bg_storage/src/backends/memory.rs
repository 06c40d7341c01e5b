use std::sync::Arc;

use async_trait::async_trait;
use bg_core::{Article, ArticlePage, ArticleStorage, Error, Pagination, Result, SortOrder};
use tokio::sync::RwLock;

use crate::{BackendConfig, StorageBackend};

/// Articles kept in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, article: &Article) -> Result<()> {
        if self.articles.iter().any(|a| a.slug == article.slug) {
            return Err(Error::DuplicateSlug(article.slug.clone()));
        }
        self.articles.push(article.clone());
        Ok(())
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<Article> {
        self.articles.iter().find(|a| a.slug == slug).cloned()
    }

    pub fn list(&self, pagination: Pagination, order: SortOrder) -> ArticlePage {
        // Stable sort on insertion order, so equal timestamps fall back to it.
        let mut sorted: Vec<&Article> = self.articles.iter().collect();
        sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        if order == SortOrder::Desc {
            sorted.reverse();
        }
        let articles = sorted
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.limit as usize)
            .cloned()
            .collect();
        ArticlePage::new(articles, self.articles.len(), pagination)
    }

    pub fn remove(&mut self, slug: &str) -> Option<Article> {
        let index = self.articles.iter().position(|a| a.slug == slug)?;
        Some(self.articles.remove(index))
    }

    pub fn top_by_score(&self, min_score: u8, limit: usize) -> Vec<Article> {
        let mut ranked: Vec<&Article> = self
            .articles
            .iter()
            .rev()
            .filter(|a| a.seo_score >= min_score)
            .collect();
        ranked.sort_by(|a, b| {
            b.seo_score
                .cmp(&a.seo_score)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        ranked.into_iter().take(limit).cloned().collect()
    }
}

pub struct MemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
    config: BackendConfig,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
            config: BackendConfig::new("memory://"),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(config: &BackendConfig) -> Result<Self> {
        let mut storage = Self::new();
        storage.config = config.clone();
        Ok(storage)
    }
}

#[async_trait]
impl ArticleStorage for MemoryStorage {
    async fn save(&self, article: &Article) -> Result<()> {
        let mut store = self.store.write().await;
        store.insert(article)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.find_by_slug(slug))
    }

    async fn list(&self, pagination: Pagination, order: SortOrder) -> Result<ArticlePage> {
        let store = self.store.read().await;
        Ok(store.list(pagination, order))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let mut store = self.store.write().await;
        Ok(store.remove(slug))
    }

    async fn top_by_score(&self, min_score: u8, limit: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.top_by_score(min_score, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support::article;

    fn slugs(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();
        let first = article("first-post", 60, 0);
        storage.save(&first).await.unwrap();

        assert_eq!(storage.find_by_slug("first-post").await.unwrap(), Some(first.clone()));
        assert!(storage.find_by_slug("other").await.unwrap().is_none());

        let err = storage.save(&article("first-post", 10, 5)).await.unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug(slug) if slug == "first-post"));

        assert_eq!(storage.delete_by_slug("first-post").await.unwrap(), Some(first));
        assert!(storage.delete_by_slug("first-post").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pagination_and_order() {
        let storage = MemoryStorage::new();
        for (i, slug) in ["a", "b", "c", "d", "e", "f", "g"].iter().enumerate() {
            storage.save(&article(slug, 50, i as i64)).await.unwrap();
        }

        let page = storage.list(Pagination::new(1, 5), SortOrder::Desc).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.pages, 2);
        assert_eq!(slugs(&page.articles), vec!["g", "f", "e", "d", "c"]);

        let page = storage.list(Pagination::new(2, 5), SortOrder::Desc).await.unwrap();
        assert_eq!(slugs(&page.articles), vec!["b", "a"]);

        let page = storage.list(Pagination::new(1, 3), SortOrder::Asc).await.unwrap();
        assert_eq!(slugs(&page.articles), vec!["a", "b", "c"]);

        let page = storage.list(Pagination::new(9, 3), SortOrder::Asc).await.unwrap();
        assert!(page.articles.is_empty());
        assert_eq!(page.page, 9);
    }

    #[tokio::test]
    async fn test_equal_timestamps_order_by_insertion() {
        let storage = MemoryStorage::new();
        for slug in ["first", "second", "third"] {
            storage.save(&article(slug, 70, 0)).await.unwrap();
        }

        let desc = storage
            .list(Pagination::new(1, 5), SortOrder::Desc)
            .await
            .unwrap();
        assert_eq!(slugs(&desc.articles), vec!["third", "second", "first"]);

        let asc = storage
            .list(Pagination::new(1, 5), SortOrder::Asc)
            .await
            .unwrap();
        assert_eq!(slugs(&asc.articles), vec!["first", "second", "third"]);

        let top = storage.top_by_score(50, 5).await.unwrap();
        assert_eq!(slugs(&top), vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_top_by_score() {
        let storage = MemoryStorage::new();
        storage.save(&article("low", 30, 0)).await.unwrap();
        storage.save(&article("old-high", 90, 1)).await.unwrap();
        storage.save(&article("new-high", 90, 2)).await.unwrap();
        storage.save(&article("mid", 70, 3)).await.unwrap();

        let top = storage.top_by_score(50, 5).await.unwrap();
        assert_eq!(slugs(&top), vec!["new-high", "old-high", "mid"]);

        let top = storage.top_by_score(50, 1).await.unwrap();
        assert_eq!(slugs(&top), vec!["new-high"]);

        assert!(storage.top_by_score(95, 5).await.unwrap().is_empty());
    }
}
