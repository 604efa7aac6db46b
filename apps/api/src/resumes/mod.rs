// Resume parsing: POST /parse orchestration and the insert-only record store.
// Completion calls go through llm_client; document text comes from extract.

pub mod handlers;
pub mod repository;
