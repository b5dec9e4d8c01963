//! Route handlers.
//!
//! Two contracts sit on the same pipeline:
//!
//! * `POST /api/summarize` — client-facing. Requires a PDF content type,
//!   always summarises in the detected language as paragraphs, and reports
//!   failures through the HTTP status with a `{"detail": …}` body.
//! * `POST /summarize` — service-to-service. Accepts language and format
//!   choices plus opaque metadata, and always answers 200 with a
//!   [`SummaryResult`]; callers check `success`.

use super::upload::parse_multipart;
use super::AppState;
use crate::config::SummaryOptions;
use crate::error::{ErrorClass, SummarizeError};
use crate::output::{GenerationMetadata, LanguageDetection, SummaryResult};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::{error, info, warn};

/// `GET /`
pub async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "message": "PDF Summarizer API",
        "status": "running",
    }))
}

// ── Client-facing route ──────────────────────────────────────────────────

/// Success body of `POST /api/summarize`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DirectResponse {
    pub summary: String,
    pub file_name: Option<String>,
    pub text_length: usize,
    pub detected_language: LanguageDetection,
    pub metadata: GenerationMetadata,
}

/// A [`SummarizeError`] rendered as `{"detail": msg}` with a status code.
#[derive(Debug)]
pub struct ApiError(pub SummarizeError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.class() {
            ErrorClass::Upload | ErrorClass::Extraction => StatusCode::BAD_REQUEST,
            ErrorClass::Generation | ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SummarizeError> for ApiError {
    fn from(e: SummarizeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

/// `POST /api/summarize`
pub async fn summarize_direct(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DirectResponse>, ApiError> {
    let multipart = multipart.map_err(|e| SummarizeError::MalformedUpload(e.body_text()))?;
    let limit = state.summarizer.config().max_upload_bytes;
    let form = parse_multipart(multipart, limit).await?;

    state.summarizer.validate_upload(&form.upload, true)?;
    let summary = state
        .summarizer
        .summarize(form.upload, &SummaryOptions::default())
        .await?;

    Ok(Json(DirectResponse {
        summary: summary.text,
        file_name: summary.file_name,
        text_length: summary.text_length,
        detected_language: summary.detected_language,
        metadata: state.summarizer.metadata(),
    }))
}

// ── Service-to-service route ─────────────────────────────────────────────

/// `POST /summarize`
pub async fn summarize_internal(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Json<SummaryResult> {
    let start = Instant::now();
    let limit = state.summarizer.config().max_upload_bytes;

    let parsed = match multipart {
        Ok(multipart) => parse_multipart(multipart, limit).await,
        Err(e) => Err(SummarizeError::MalformedUpload(e.body_text())),
    };
    let form = match parsed {
        Ok(form) => form,
        Err(e) => {
            warn!("Rejected summarise request: {}", e);
            return Json(SummaryResult::failure(
                &e,
                start.elapsed().as_millis() as u64,
            ));
        }
    };

    let options = SummaryOptions::from_form(form.language.as_deref(), form.output_type.as_deref());
    let result = state.summarizer.summarize_to_result(form.upload, &options).await;
    info!(
        "Summarise request finished: success={} in {}ms",
        result.success, result.processing_time_ms
    );
    Json(result)
}
