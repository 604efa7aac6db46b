use std::sync::Arc;

use crate::llm_client::LlmClient;
use crate::resumes::repository::ResumeStore;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything in here is built once in `main` and shared across requests.
#[derive(Clone)]
pub struct AppState {
    /// Source documents. Default: `S3ObjectStore`.
    pub objects: Arc<dyn ObjectStore>,
    /// Parsed-resume sink. Default: `PgResumeStore` over the startup pool.
    pub resumes: Arc<dyn ResumeStore>,
    pub llm: LlmClient,
}
