//! Text extraction: turns a fetched document into plain text.
//!
//! Dispatch is by declared media type only; the bytes are never sniffed.
//! Anything that is not PDF or Word falls through to a lossy UTF-8 decode.

mod docx;
mod pdf;

use thiserror::Error;
use tracing::debug;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MSWORD_MIME: &str = "application/msword";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Failed to read Word document: {0}")]
    Docx(#[from] docx_rs::ReaderError),
}

/// Extracts plain text from `data` according to `mime_type`.
///
/// Malformed PDF or Word documents fail; the fallback decode never does.
/// The result may be empty, which callers treat as "nothing to parse".
pub fn extract_text(data: &[u8], mime_type: Option<&str>) -> Result<String, ExtractError> {
    let text = match mime_type {
        Some(PDF_MIME) => pdf::extract(data)?,
        Some(DOCX_MIME) | Some(MSWORD_MIME) => docx::extract(data)?,
        _ => decode_lossy(data),
    };

    debug!(
        "Extracted {} chars from {} bytes (mime type: {})",
        text.len(),
        data.len(),
        mime_type.unwrap_or("none")
    );

    Ok(text)
}

/// Decodes UTF-8, dropping invalid byte sequences instead of replacing them.
fn decode_lossy(data: &[u8]) -> String {
    let mut text = String::with_capacity(data.len());
    for chunk in data.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
