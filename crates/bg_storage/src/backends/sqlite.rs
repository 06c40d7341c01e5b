use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use bg_core::{Article, ArticlePage, ArticleStorage, Error, Pagination, Result, SortOrder};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::{BackendConfig, StorageBackend};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        slug TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        meta_description TEXT NOT NULL,
        keywords TEXT NOT NULL,
        tone TEXT NOT NULL,
        body TEXT NOT NULL,
        length TEXT NOT NULL,
        word_count INTEGER NOT NULL,
        read_time INTEGER NOT NULL,
        keyword_density TEXT NOT NULL,
        seo_score INTEGER NOT NULL,
        score_version INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_articles_created_at ON articles (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_articles_seo_score ON articles (seo_score)",
];

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Database(format!("{}: {}", context, e))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering. Keeps
/// full nanosecond precision so a stored article reads back unchanged.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn row_to_article(row: &SqliteRow) -> Result<Article> {
    let get_text = |column: &str| -> Result<String> {
        row.try_get::<String, _>(column)
            .map_err(|e| db_error(&format!("Failed to read column {}", column), e))
    };
    let get_int = |column: &str| -> Result<i64> {
        row.try_get::<i64, _>(column)
            .map_err(|e| db_error(&format!("Failed to read column {}", column), e))
    };

    let id = Uuid::parse_str(&get_text("id")?)
        .map_err(|e| Error::Database(format!("Invalid article id: {}", e)))?;
    let created_at = DateTime::parse_from_rfc3339(&get_text("created_at")?)
        .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))?
        .with_timezone(&Utc);

    Ok(Article {
        id,
        title: get_text("title")?,
        slug: get_text("slug")?,
        meta_description: get_text("meta_description")?,
        keywords: serde_json::from_str(&get_text("keywords")?)?,
        tone: get_text("tone")?,
        body: get_text("body")?,
        length: get_text("length")?,
        word_count: get_int("word_count")?.max(0) as usize,
        read_time: get_int("read_time")?.clamp(0, u32::MAX as i64) as u32,
        keyword_density: serde_json::from_str(&get_text("keyword_density")?)?,
        seo_score: get_int("seo_score")?.clamp(0, 100) as u8,
        score_version: get_int("score_version")?.clamp(0, u32::MAX as i64) as u32,
        created_at,
    })
}

pub struct SQLiteStorage {
    pool: SqlitePool,
    db_path: Option<PathBuf>,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at the configured DATABASE_URL"
    }

    async fn connect(config: &BackendConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| db_error(&format!("Invalid database URL '{}'", config.url), e))?
            .create_if_missing(true);
        Self::with_options(options, None).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        Self::with_options(options, Some(db_path.to_path_buf())).await
    }

    async fn with_options(options: SqliteConnectOptions, db_path: Option<PathBuf>) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        tracing::debug!("SQLite storage ready ({} migrations)", MIGRATIONS.len());
        Ok(Self { pool, db_path })
    }

    pub fn get_db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }
}

#[async_trait]
impl ArticleStorage for SQLiteStorage {
    async fn save(&self, article: &Article) -> Result<()> {
        let keywords = serde_json::to_string(&article.keywords)?;
        let keyword_density = serde_json::to_string(&article.keyword_density)?;

        sqlx::query(
            r#"
            INSERT INTO articles
            (id, slug, title, meta_description, keywords, tone, body, length,
             word_count, read_time, keyword_density, seo_score, score_version, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(article.id.to_string())
        .bind(&article.slug)
        .bind(&article.title)
        .bind(&article.meta_description)
        .bind(keywords)
        .bind(&article.tone)
        .bind(&article.body)
        .bind(&article.length)
        .bind(article.word_count as i64)
        .bind(article.read_time as i64)
        .bind(keyword_density)
        .bind(article.seo_score as i64)
        .bind(article.score_version as i64)
        .bind(format_timestamp(&article.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Error::DuplicateSlug(article.slug.clone())
            }
            other => db_error("Failed to store article", other),
        })?;

        Ok(())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let row = sqlx::query("SELECT * FROM articles WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to fetch article", e))?;

        row.as_ref().map(row_to_article).transpose()
    }

    async fn list(&self, pagination: Pagination, order: SortOrder) -> Result<ArticlePage> {
        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM articles")
            .fetch_one(&self.pool)
            .await
            .and_then(|row| row.try_get("total"))
            .map_err(|e| db_error("Failed to count articles", e))?;

        let query = match order {
            SortOrder::Asc => {
                "SELECT * FROM articles ORDER BY created_at ASC, rowid ASC LIMIT ? OFFSET ?"
            }
            SortOrder::Desc => {
                "SELECT * FROM articles ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?"
            }
        };
        let rows = sqlx::query(query)
            .bind(pagination.limit as i64)
            .bind(pagination.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list articles", e))?;

        let articles = rows.iter().map(row_to_article).collect::<Result<Vec<_>>>()?;
        Ok(ArticlePage::new(articles, total.max(0) as usize, pagination))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        // The statement must be driven to completion for the delete to apply.
        let rows = sqlx::query("DELETE FROM articles WHERE slug = ? RETURNING *")
            .bind(slug)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete article", e))?;

        rows.first().map(row_to_article).transpose()
    }

    async fn top_by_score(&self, min_score: u8, limit: usize) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM articles
            WHERE seo_score >= ?
            ORDER BY seo_score DESC, created_at DESC, rowid DESC
            LIMIT ?
            "#,
        )
        .bind(min_score as i64)
        .bind(limit.min(i64::MAX as usize) as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch top articles", e))?;

        rows.iter().map(row_to_article).collect()
    }
}
