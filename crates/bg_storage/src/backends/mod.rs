pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStorage;

#[cfg(feature = "sqlite")]
pub use sqlite::SQLiteStorage;

#[cfg(test)]
pub(crate) mod test_support {
    use bg_core::Article;
    use chrono::{DateTime, Duration, Utc};
    use uuid::Uuid;

    pub fn base_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    /// An article created `minutes` after the base time.
    pub fn article(slug: &str, score: u8, minutes: i64) -> Article {
        Article {
            id: Uuid::new_v4(),
            title: slug.replace('-', " "),
            slug: slug.to_string(),
            meta_description: "Meta".to_string(),
            keywords: vec!["rust".to_string()],
            tone: "neutral".to_string(),
            body: "Rust body text".to_string(),
            length: "short".to_string(),
            word_count: 3,
            read_time: 1,
            keyword_density: vec![bg_core::KeywordDensity {
                keyword: "rust".to_string(),
                occurrences: 1,
                density: 33.33,
            }],
            seo_score: score,
            score_version: 1,
            created_at: base_time() + Duration::minutes(minutes),
        }
    }
}
