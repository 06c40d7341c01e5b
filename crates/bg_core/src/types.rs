use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the caller asked for: keywords, tone and a coarse length bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_length")]
    pub length: String,
}

fn default_tone() -> String {
    "neutral".to_string()
}

fn default_length() -> String {
    LengthCategory::Medium.to_string()
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            tone: default_tone(),
            length: default_length(),
        }
    }
}

impl GenerationRequest {
    pub fn new(keywords: Vec<String>, tone: impl Into<String>, length: impl Into<String>) -> Self {
        Self {
            keywords,
            tone: tone.into(),
            length: length.into(),
        }
    }

    /// Trims every keyword and drops the blank ones. Order and duplicates are kept.
    pub fn normalized(mut self) -> Self {
        self.keywords = self
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if self.tone.trim().is_empty() {
            self.tone = default_tone();
        }
        if self.length.trim().is_empty() {
            self.length = default_length();
        }
        self
    }

    pub fn length_category(&self) -> Option<LengthCategory> {
        self.length.parse().ok()
    }

    pub fn joined_keywords(&self) -> String {
        self.keywords.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthCategory {
    Short,
    Medium,
    Long,
}

impl fmt::Display for LengthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LengthCategory::Short => "short",
            LengthCategory::Medium => "medium",
            LengthCategory::Long => "long",
        };
        f.write_str(name)
    }
}

impl FromStr for LengthCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "short" => Ok(LengthCategory::Short),
            "medium" => Ok(LengthCategory::Medium),
            "long" => Ok(LengthCategory::Long),
            other => Err(format!("Unknown length category: {}", other)),
        }
    }
}

/// Raw generated text split into its three parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    pub title: String,
    pub meta_description: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordDensity {
    pub keyword: String,
    pub occurrences: usize,
    /// Percentage of body words, two decimals.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexicalStats {
    pub word_count: usize,
    pub keyword_density: Vec<KeywordDensity>,
}

impl LexicalStats {
    pub fn densities(&self) -> impl Iterator<Item = f64> + '_ {
        self.keyword_density.iter().map(|k| k.density)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeoMetrics {
    pub read_time_minutes: u32,
    pub seo_score: u8,
    pub score_version: u32,
}

/// The persisted record handed to the storage boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub meta_description: String,
    pub keywords: Vec<String>,
    pub tone: String,
    pub body: String,
    pub length: String,
    pub word_count: usize,
    pub read_time: u32,
    pub keyword_density: Vec<KeywordDensity>,
    pub seo_score: u8,
    pub score_version: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = std::convert::Infallible;

    /// Anything other than `asc` sorts newest first.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else {
            Ok(SortOrder::Desc)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 5 }
    }
}

impl Pagination {
    /// Page and limit are clamped to at least 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    pub fn page_count(&self, total: usize) -> u32 {
        total.div_ceil(self.limit as usize) as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticlePage {
    pub total: usize,
    pub page: u32,
    pub pages: u32,
    pub articles: Vec<Article>,
}

impl ArticlePage {
    pub fn new(articles: Vec<Article>, total: usize, pagination: Pagination) -> Self {
        Self {
            total,
            page: pagination.page,
            pages: pagination.page_count(total),
            articles,
        }
    }
}

/// A chat-style prompt for the text generation backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}
