//! Axum route handler for the Parse API.

use std::time::Duration;

use anyhow::{anyhow, Context};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract::extract_text;
use crate::llm_client::DEFAULT_TIMEOUT_SECS;
use crate::models::resume::{NewResumeRecord, ParsedResume};
use crate::state::AppState;

/// Per-request override of the completion timeout, in (fractional) seconds.
pub const TIMEOUT_HEADER: &str = "x-api-timeout";

const MISSING_FIELDS: &str = "userId, bucketName, and fileKey are required";
const NO_TEXT: &str = "Could not extract text from file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Required fields are optional here so that absent, `null` and `""` all get
/// the same 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub user_id: Option<String>,
    pub bucket_name: Option<String>,
    pub file_key: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResponse {
    pub user_id: String,
    pub bucket_name: String,
    pub file_key: String,
    pub parsed_data: ParsedResume,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /parse
///
/// Fetches the document, extracts its text, asks the completion service for
/// structured fields and records them. Persistence is best-effort: a failed
/// insert is logged and the caller still gets the parsed data.
pub async fn handle_parse(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let (Some(user_id), Some(bucket_name), Some(file_key)) = (
        non_empty(request.user_id),
        non_empty(request.bucket_name),
        non_empty(request.file_key),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS.to_string()));
    };
    let mime_type = request.mime_type;

    let timeout = completion_timeout(&headers)?;

    info!("Parsing s3://{bucket_name}/{file_key} for user {user_id}");

    let data = state
        .objects
        .get_object(&bucket_name, &file_key)
        .await
        .map_err(|e| AppError::Storage(format!("{e:#}")))?;

    // PDF and DOCX parsing is CPU-bound; keep it off the async workers
    let cv_text = tokio::task::spawn_blocking(move || extract_text(&data, mime_type.as_deref()))
        .await
        .context("Text extraction task failed")??;

    if cv_text.trim().is_empty() {
        return Err(AppError::BadRequest(NO_TEXT.to_string()));
    }

    let parsed = state.llm.parse_resume(&cv_text, timeout).await?;

    let record = NewResumeRecord {
        user_id,
        file_key,
        bucket_name,
        parsed,
        parsed_at: Utc::now().naive_utc(),
    };

    if let Err(e) = state.resumes.insert(&record).await {
        warn!(
            "Failed to persist parsed resume for user {} (s3://{}/{}): {e:#}",
            record.user_id, record.bucket_name, record.file_key
        );
    }

    Ok(Json(ParseResponse {
        user_id: record.user_id,
        bucket_name: record.bucket_name,
        file_key: record.file_key,
        parsed_data: record.parsed,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Reads `X-API-Timeout`, falling back to the default when absent. Values are
/// not clamped; anything that is not a representable duration is an error.
fn completion_timeout(headers: &HeaderMap) -> Result<Duration, AppError> {
    let Some(value) = headers.get(TIMEOUT_HEADER) else {
        return Ok(Duration::from_secs_f64(DEFAULT_TIMEOUT_SECS));
    };

    let raw = value
        .to_str()
        .map_err(|_| anyhow!("X-API-Timeout header is not valid text"))?;
    let secs: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid X-API-Timeout value '{raw}'"))?;
    let timeout = Duration::try_from_secs_f64(secs)
        .with_context(|| format!("X-API-Timeout value '{raw}' is not a valid duration"))?;

    Ok(timeout)
}
