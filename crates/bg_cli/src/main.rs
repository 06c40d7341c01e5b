use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bg_core::{
    Article, ArticleAssembler, ArticleStorage, BlogService, Error, GenerationRequest, Pagination,
    PipelineConfig, Result, SortOrder,
};
use bg_inference::{Backend, InferenceConfig};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_STORAGE: &str = "sqlite";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate SEO-scored blog articles with an LLM",
    long_about = None
)]
pub struct Cli {
    /// Storage backend: memory or sqlite. Falls back to $STORAGE, then sqlite.
    #[arg(long)]
    storage: Option<String>,
    /// Database URL for the sqlite backend. Falls back to $DATABASE_URL.
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long, help = "Text generation backend. Available models: openai (default), dummy")]
    model: Option<String>,
    /// Chat completion endpoint. Falls back to $LLM_ENDPOINT_URL.
    #[arg(long)]
    model_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on. Falls back to $PORT, then 4000.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate, score and store one article
    Generate {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Run the article pipeline on a local text file without calling a model
    Analyze {
        file: PathBuf,
        #[command(flatten)]
        request: RequestArgs,
    },
    /// List stored articles
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 5)]
        limit: u32,
        /// asc or desc by creation time
        #[arg(long, default_value = "desc")]
        sort: String,
    },
    /// Print one stored article
    Show { slug: String },
    /// Delete one stored article
    Delete { slug: String },
    /// Best scoring articles
    Top {
        #[arg(long, default_value_t = 5)]
        limit: usize,
        #[arg(long, default_value_t = 50)]
        min_score: u8,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct RequestArgs {
    /// Comma separated keywords
    #[arg(long, value_delimiter = ',')]
    keywords: Vec<String>,
    #[arg(long, default_value = "neutral")]
    tone: String,
    /// short, medium or long
    #[arg(long, default_value = "medium")]
    length: String,
}

impl From<RequestArgs> for GenerationRequest {
    fn from(args: RequestArgs) -> Self {
        GenerationRequest::new(args.keywords, args.tone, args.length).normalized()
    }
}

fn env_or(value: Option<String>, key: &str) -> Option<String> {
    value.or_else(|| env::var(key).ok().filter(|v| !v.is_empty()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn check_storage(storage: &Arc<dyn ArticleStorage>) -> Result<()> {
    storage.list(Pagination::new(1, 1), SortOrder::Desc).await?;
    Ok(())
}

async fn check_storage_with_retry(
    storage: &Arc<dyn ArticleStorage>,
    storage_type: &str,
    max_retries: u32,
    timeout: Duration,
) -> Result<()> {
    let mut retries = 0;
    let mut last_error = None;

    while retries < max_retries {
        match tokio::time::timeout(timeout, check_storage(storage)).await {
            Ok(Ok(())) => {
                info!("🏦 Storage backend initialized successfully (using {})", storage_type);
                return Ok(());
            }
            Ok(Err(e)) => last_error = Some(e),
            Err(elapsed) => {
                last_error = Some(Error::Storage(format!(
                    "Storage health check timed out: {}",
                    elapsed
                )));
            }
        }
        retries += 1;
        if retries < max_retries {
            info!("Storage health check failed, retrying {}/{}...", retries, max_retries);
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| {
        Error::Storage("Storage health check failed after all retries".to_string())
    }))
}

fn storage_kind(cli: &Cli) -> String {
    env_or(cli.storage.clone(), "STORAGE").unwrap_or_else(|| DEFAULT_STORAGE.to_string())
}

async fn open_storage(cli: &Cli) -> Result<Arc<dyn ArticleStorage>> {
    let kind = storage_kind(cli);
    let url = env_or(cli.database_url.clone(), "DATABASE_URL");

    info!("💾 Checking storage connection...");
    let storage = bg_storage::create_storage(&kind, url.as_deref()).await?;
    check_storage_with_retry(&storage, &kind, 3, Duration::from_secs(10)).await?;
    if kind == "memory" {
        tracing::warn!("Using memory storage, articles will not outlive this process");
    }
    Ok(storage)
}

fn inference_config(cli: &Cli) -> Result<InferenceConfig> {
    let mut config = InferenceConfig::from_env()?;
    if let Some(url) = &cli.model_url {
        config = config.with_endpoint(url)?;
    }
    if let Some(model) = &cli.model {
        config = config.with_backend(model.parse::<Backend>()?);
    }
    Ok(config)
}

async fn build_service(cli: &Cli) -> Result<BlogService> {
    let storage = open_storage(cli).await?;
    let generator = bg_inference::create_model(&inference_config(cli)?)?;
    info!("🧠 Text generator initialized successfully (using {})", generator.name());
    Ok(BlogService::new(
        generator,
        storage,
        ArticleAssembler::new(PipelineConfig::default()),
    ))
}

fn analyze_file(path: &Path, request: GenerationRequest) -> Result<Article> {
    let raw = std::fs::read_to_string(path)?;
    Ok(ArticleAssembler::new(PipelineConfig::default()).assemble(&raw, &request))
}

async fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Commands::Serve { port } => {
            let port = match port {
                Some(port) => *port,
                None => match env::var("PORT") {
                    Ok(value) => value
                        .parse()
                        .map_err(|e| Error::Config(format!("Invalid PORT '{}': {}", value, e)))?,
                    Err(_) => DEFAULT_PORT,
                },
            };
            let service = build_service(&cli).await?;
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            bg_web::serve(addr, bg_web::AppState::new(Arc::new(service))).await?;
        }
        Commands::Generate { request } => {
            let service = build_service(&cli).await?;
            let article = service.generate(request.clone().into()).await?;
            print_json(&article)?;
        }
        Commands::Analyze { file, request } => {
            info!("📄 Analyzing {}", file.display());
            let article = analyze_file(file, request.clone().into())?;
            print_json(&article)?;
        }
        Commands::List { page, limit, sort } => {
            let storage = open_storage(&cli).await?;
            let order = sort.parse::<SortOrder>().unwrap_or_default();
            let page = storage.list(Pagination::new(*page, *limit), order).await?;
            print_json(&page)?;
        }
        Commands::Show { slug } => {
            let storage = open_storage(&cli).await?;
            let article = storage
                .find_by_slug(slug)
                .await?
                .ok_or_else(|| Error::NotFound(format!("article {}", slug)))?;
            print_json(&article)?;
        }
        Commands::Delete { slug } => {
            let storage = open_storage(&cli).await?;
            let deleted = storage
                .delete_by_slug(slug)
                .await?
                .ok_or_else(|| Error::NotFound(format!("article {}", slug)))?;
            info!("🗑️ Deleted article {}", deleted.slug);
        }
        Commands::Top { limit, min_score } => {
            let storage = open_storage(&cli).await?;
            let articles = storage.top_by_score(*min_score, *limit).await?;
            if articles.is_empty() {
                info!("No articles found with a score of at least {}", min_score);
            }
            print_json(&articles)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_generate_command() {
        let cli = Cli::try_parse_from([
            "blogen",
            "--model",
            "dummy",
            "generate",
            "--keywords",
            "rust, seo ,,async",
            "--tone",
            "friendly",
        ])
        .unwrap();

        assert_eq!(cli.model.as_deref(), Some("dummy"));
        match cli.command {
            Commands::Generate { request } => {
                let request: GenerationRequest = request.into();
                assert_eq!(request.keywords, vec!["rust", "seo", "async"]);
                assert_eq!(request.tone, "friendly");
                assert_eq!(request.length, "medium");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["blogen", "list"]).unwrap();
        match cli.command {
            Commands::List { page, limit, sort } => {
                assert_eq!(page, 1);
                assert_eq!(limit, 5);
                assert_eq!(sort, "desc");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_analyze_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# Offline Draft\nA short meta.\nRust keeps SEO tooling fast.").unwrap();

        let request = GenerationRequest::new(vec!["rust".into()], "friendly", "short");
        let article = analyze_file(file.path(), request).unwrap();

        assert_eq!(article.slug, "offline-draft");
        assert_eq!(article.word_count, 5);
        assert_eq!(article.keyword_density[0].density, 20.0);
        assert_eq!(article.seo_score, 50);
    }

    #[test]
    fn test_analyze_missing_file_is_io_error() {
        let missing = Path::new("/definitely/not/here.md");
        let result = analyze_file(missing, GenerationRequest::default());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_storage_defaults_to_sqlite() {
        let cli = Cli::try_parse_from(["blogen", "list"]).unwrap();
        assert_eq!(cli.storage, None);
        if env::var("STORAGE").map_or(true, |v| v.is_empty()) {
            assert_eq!(storage_kind(&cli), "sqlite");
        }

        let cli = Cli::try_parse_from(["blogen", "--storage", "memory", "list"]).unwrap();
        assert_eq!(storage_kind(&cli), "memory");
    }

    #[tokio::test]
    async fn test_articles_outlive_one_invocation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("cli.db").display());
        let args = ["blogen", "--storage", "sqlite", "--database-url", url.as_str(), "show", "x"];

        let first = open_storage(&Cli::try_parse_from(args).unwrap()).await.unwrap();
        let article = ArticleAssembler::default().assemble(
            "# Kept Around\nMeta\nRust body",
            &GenerationRequest::new(vec!["rust".into()], "neutral", "short"),
        );
        first.save(&article).await.unwrap();
        drop(first);

        let second = open_storage(&Cli::try_parse_from(args).unwrap()).await.unwrap();
        let found = second.find_by_slug("kept-around").await.unwrap();
        assert_eq!(found, Some(article));
    }

    #[test]
    fn test_unknown_model_is_rejected() {
        let cli = Cli::try_parse_from(["blogen", "--model", "ollama", "list"]).unwrap();
        assert!(matches!(inference_config(&cli), Err(Error::Config(_))));
    }
}
