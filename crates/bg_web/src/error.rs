use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bg_core::Error;
use serde_json::json;

/// Maps core errors onto HTTP responses.
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

// Malformed bodies and query strings are reported like any other invalid
// request instead of with axum's plain-text rejection.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Config(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(Error::Config(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::DuplicateSlug(_) => StatusCode::CONFLICT,
            Error::Generation(_) => StatusCode::BAD_GATEWAY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn summary(&self) -> &'static str {
        match &self.0 {
            Error::DuplicateSlug(_) => "Article already exists",
            Error::Generation(_) => "Blog generation failed",
            Error::NotFound(_) => "Article not found",
            Error::Config(_) => "Invalid request",
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}: {}", self.summary(), self.0);
        }
        let body = json!({
            "error": self.summary(),
            "details": self.0.to_string(),
        });
        (status, Json(body)).into_response()
    }
}
