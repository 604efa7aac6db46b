use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extract::ExtractError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{ "detail": "..." }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// The completion service answered with a non-success status. Status and
    /// body are relayed to the caller unchanged.
    #[error("{body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse model output: {0}")]
    Parse(String),

    #[error("{0}")]
    Storage(String),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, body } => AppError::Upstream { status, body },
            LlmError::Parse(msg) => AppError::Parse(msg),
            LlmError::EmptyContent => AppError::Parse(LlmError::EmptyContent.to_string()),
            LlmError::Http(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Parse(msg) => {
                tracing::error!("Completion output error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Extract(e) => {
                tracing::error!("Extraction error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "detail": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_is_400_with_detail() {
        let (status, body) = render(AppError::BadRequest("missing".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "detail": "missing" }));
    }

    #[tokio::test]
    async fn test_upstream_relays_status_and_body() {
        let (status, body) = render(AppError::Upstream {
            status: 429,
            body: "slow down".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["detail"], "slow down");
    }

    #[tokio::test]
    async fn test_internal_carries_context_chain() {
        let err = anyhow::anyhow!("connection refused").context("Failed to fetch s3://b/k");
        let (status, body) = render(AppError::Internal(err)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Failed to fetch s3://b/k: connection refused");
    }

    #[test]
    fn test_llm_api_error_maps_to_upstream() {
        let err = AppError::from(LlmError::Api {
            status: 503,
            body: "down".to_string(),
        });
        assert!(matches!(err, AppError::Upstream { status: 503, .. }));
    }

    #[test]
    fn test_llm_empty_content_maps_to_parse() {
        assert!(matches!(
            AppError::from(LlmError::EmptyContent),
            AppError::Parse(_)
        ));
    }
}
