//! Text extraction: PDF bytes → plain text via the page text layer.
//!
//! ## Why spawn_blocking?
//!
//! `pdf-extract` parses the whole object graph and decodes every content
//! stream synchronously. On a large upload that is hundreds of milliseconds
//! of CPU, so it runs on tokio's blocking pool instead of a worker thread.
//! The parser is also known to panic on some malformed inputs; the
//! `JoinError` of a panicking task is reported as an extraction failure, so
//! a bad upload cannot take the process down.

use crate::error::SummarizeError;
use tracing::{debug, info};

/// Extract the text of every page, in order.
///
/// Each page with text contributes its text followed by `"\n"`; pages with
/// no text (or whitespace only) contribute nothing. A document without any
/// text layer yields an empty string; deciding whether that is an error is
/// left to the caller.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, SummarizeError> {
    let size = bytes.len();

    let text = tokio::task::spawn_blocking(move || extract_text_blocking(&bytes))
        .await
        .map_err(|e| SummarizeError::Extraction {
            detail: if e.is_panic() {
                "PDF parser panicked on malformed input".to_string()
            } else {
                format!("extraction task failed: {}", e)
            },
        })??;

    info!("Extracted {} chars from {} byte PDF", text.chars().count(), size);
    Ok(text)
}

/// Blocking implementation of text extraction.
pub fn extract_text_blocking(bytes: &[u8]) -> Result<String, SummarizeError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
        SummarizeError::Extraction {
            detail: e.to_string(),
        }
    })?;

    debug!("PDF has {} pages", pages.len());
    Ok(join_pages(pages))
}

/// Join per-page texts, skipping pages without text.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        if page.trim().is_empty() {
            continue;
        }
        text.push_str(page);
        text.push('\n');
    }
    text
}
