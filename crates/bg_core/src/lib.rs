pub mod assembler;
pub mod config;
pub mod error;
pub mod generator;
pub mod lexical;
pub mod metrics;
pub mod scoring;
pub mod segment;
pub mod service;
pub mod slug;
pub mod storage;
pub mod types;

pub use assembler::ArticleAssembler;
pub use config::{PipelineConfig, ScoringPolicy, WordTargets};
pub use error::{Error, Result};
pub use generator::TextGenerator;
pub use service::BlogService;
pub use storage::ArticleStorage;
pub use types::{
    Article, ArticlePage, GenerationRequest, KeywordDensity, LengthCategory, LexicalStats,
    Pagination, ParsedArticle, Prompt, SeoMetrics, SortOrder,
};

pub mod prelude {
    pub use super::{
        Article, ArticleAssembler, ArticleStorage, BlogService, Error, GenerationRequest,
        PipelineConfig, Result, TextGenerator,
    };
}
