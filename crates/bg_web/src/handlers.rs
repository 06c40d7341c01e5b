use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bg_core::{Error, GenerationRequest, Pagination, SortOrder};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::AppState;

pub async fn health() -> &'static str {
    "Blog generator backend is running..."
}

pub async fn generate_article(
    State(state): State<Arc<AppState>>,
    request: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let article = state.service.generate(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Blog generated and saved",
            "article": article,
        })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let defaults = Pagination::default();
    let pagination = Pagination::new(
        query.page.unwrap_or(defaults.page),
        query.limit.unwrap_or(defaults.limit),
    );
    let order = query
        .sort
        .as_deref()
        .and_then(|s| s.parse::<SortOrder>().ok())
        .unwrap_or_default();
    let page = state.service.list(pagination, order).await?;
    Ok(Json(page))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    tracing::debug!("Looking up article {}", slug);
    match state.service.get(&slug).await {
        Ok(article) => Ok(Json(article).into_response()),
        Err(Error::NotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Article not found" })),
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_article(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.service.delete(&slug).await?;
    Ok(Json(json!({
        "message": "Article deleted successfully",
        "slug": deleted.slug,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopQuery {
    pub limit: Option<usize>,
    pub min_score: Option<u8>,
}

pub async fn top_articles(
    State(state): State<Arc<AppState>>,
    query: Result<Query<TopQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(5);
    let min_score = query.min_score.unwrap_or(50);
    let articles = state.service.top(min_score, limit).await?;

    if articles.is_empty() {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "message": "No articles found above the given SEO score threshold."
            })),
        ));
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "count": articles.len(),
            "minScore": min_score,
            "articles": articles,
        })),
    ))
}
