use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/generate", post(handlers::generate_article))
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/articles/top", get(handlers::top_articles))
        .route(
            "/api/articles/:slug",
            get(handlers::get_article).delete(handlers::delete_article),
        )
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(Arc::new(state))
}

pub async fn serve(addr: SocketAddr, state: AppState) -> bg_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server running on {}", listener.local_addr()?);
    axum::serve(listener, create_app(state)).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use bg_core::{Article, Error, Result};
}
