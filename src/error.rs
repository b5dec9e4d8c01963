//! Error types for the pdf-summarizer library.
//!
//! Two error types reflect two distinct failure domains:
//!
//! * [`SummarizeError`] — everything that can stop a single summarisation
//!   request: a bad upload, an unreadable PDF, a PDF without a text layer,
//!   or a failed generation call.
//!
//! * [`GenerationError`] — failures of the external text-generation service
//!   only. It is wrapped by [`SummarizeError::Generation`] so callers can tell
//!   an upstream outage apart from a bad document and react differently.
//!
//! Language detection never produces an error: a detector that cannot decide
//! downgrades to the configured fallback language instead.

use thiserror::Error;

/// All errors a summarisation request can end with.
#[derive(Debug, Error)]
pub enum SummarizeError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// A zero-byte file was received.
    #[error("Empty file")]
    EmptyUpload,

    /// The declared content type is not `application/pdf`.
    #[error("Only PDF files are allowed")]
    UnsupportedMedia { content_type: Option<String> },

    /// The upload exceeds the configured size limit.
    ///
    /// `size` is `None` when the body was cut off by the transport limit
    /// before it was fully read.
    #[error("File size exceeds {}MB limit", .limit / (1024 * 1024))]
    UploadTooLarge { size: Option<usize>, limit: usize },

    /// The multipart body could not be read.
    #[error("Invalid upload: {0}")]
    MalformedUpload(String),

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The byte stream could not be parsed as a PDF.
    #[error("Error reading PDF: {detail}")]
    Extraction { detail: String },

    /// The PDF parsed but contains no non-whitespace text.
    #[error("Could not extract text from PDF")]
    NoText,

    // ── Generation errors ─────────────────────────────────────────────────
    /// The external summarisation call failed.
    #[error("Error generating summary: {0}")]
    Generation(#[from] GenerationError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`SummarizeError`].
///
/// HTTP boundaries use it to pick a status code; a caller with a retry
/// policy would only ever consider [`ErrorClass::Generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The caller sent something unusable.
    Upload,
    /// The document itself could not be turned into text.
    Extraction,
    /// The upstream generation service failed.
    Generation,
    /// Misconfiguration or a bug on our side.
    Internal,
}

impl SummarizeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            SummarizeError::EmptyUpload
            | SummarizeError::UnsupportedMedia { .. }
            | SummarizeError::UploadTooLarge { .. }
            | SummarizeError::MalformedUpload(_) => ErrorClass::Upload,
            SummarizeError::Extraction { .. } | SummarizeError::NoText => ErrorClass::Extraction,
            SummarizeError::Generation(_) => ErrorClass::Generation,
            SummarizeError::InvalidConfig(_) | SummarizeError::Internal(_) => ErrorClass::Internal,
        }
    }
}

/// Failures of the external text-generation service.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// HTTP 429: the quota is exhausted for now.
    #[error("rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP 401/403: the API key is missing, wrong or lacks permission.
    #[error("authentication failed: {detail}")]
    Auth { detail: String },

    /// The request never got a response (DNS, TLS, connection reset…).
    #[error("network error: {0}")]
    Network(String),

    /// No response within the configured deadline.
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Any other non-success status from the API.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A 2xx response that does not contain generated text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The prompt was rejected by the service's safety filters.
    #[error("prompt blocked by the service: {reason}")]
    Blocked { reason: String },

    /// Error reported by an edgequake-llm provider.
    #[error("{0}")]
    Provider(String),

    /// The backend cannot be used at all (e.g. no API key).
    #[error("generation backend '{backend}' is not configured: {hint}")]
    NotConfigured { backend: String, hint: String },
}

impl GenerationError {
    /// Whether trying again later could plausibly succeed.
    ///
    /// Nothing in this crate retries; the flag exists for callers.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::RateLimited { .. }
            | GenerationError::Network(_)
            | GenerationError::Timeout { .. } => true,
            GenerationError::Api { status, .. } => *status >= 500,
            GenerationError::Auth { .. }
            | GenerationError::MalformedResponse(_)
            | GenerationError::Blocked { .. }
            | GenerationError::Provider(_)
            | GenerationError::NotConfigured { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_too_large_display() {
        let e = SummarizeError::UploadTooLarge {
            size: Some(60 * 1024 * 1024),
            limit: 50 * 1024 * 1024,
        };
        assert_eq!(e.to_string(), "File size exceeds 50MB limit");
    }

    #[test]
    fn generation_error_is_wrapped_with_prefix() {
        let e: SummarizeError = GenerationError::Auth {
            detail: "API key not valid".into(),
        }
        .into();
        let msg = e.to_string();
        assert!(msg.starts_with("Error generating summary:"), "got: {msg}");
        assert!(msg.contains("API key not valid"));
        assert_eq!(e.class(), ErrorClass::Generation);
    }

    #[test]
    fn classes_split_upload_from_extraction() {
        assert_eq!(SummarizeError::EmptyUpload.class(), ErrorClass::Upload);
        assert_eq!(SummarizeError::NoText.class(), ErrorClass::Extraction);
        assert_eq!(
            SummarizeError::Extraction {
                detail: "bad xref".into()
            }
            .class(),
            ErrorClass::Extraction
        );
    }

    #[test]
    fn transient_generation_errors() {
        assert!(GenerationError::RateLimited {
            retry_after_secs: Some(30)
        }
        .is_transient());
        assert!(GenerationError::Api {
            status: 503,
            message: "overloaded".into()
        }
        .is_transient());
        assert!(!GenerationError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_transient());
        assert!(!GenerationError::Auth {
            detail: "invalid key".into()
        }
        .is_transient());
    }
}
