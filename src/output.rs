//! Result types produced by the summarisation pipeline.

use crate::config::{OutputFormat, SamplingParams};
use crate::error::SummarizeError;
use serde::{Deserialize, Serialize};

/// A language as a short code plus a human-readable name.
///
/// Used both for the detected source language and for the resolved target
/// language of the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub code: String,
    pub name: String,
}

impl LanguageDetection {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A successfully generated summary and what went into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Generated text, unmodified; contains `<mark>` highlight spans.
    pub text: String,
    /// Uploaded file name, if the client sent one.
    pub file_name: Option<String>,
    /// Length of the full extracted text in characters (before truncation).
    pub text_length: usize,
    pub detected_language: LanguageDetection,
    pub target_language: LanguageDetection,
    pub output_format: OutputFormat,
    /// Wall-clock time from receipt of the bytes to the generated text.
    pub processing_time_ms: u64,
}

/// Outcome of one request in the service-to-service wire shape.
///
/// Failures are reported in-band (`success = false` + `error`) rather than
/// through the transport status, so consumers must check `success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary_text: String,
    pub processing_time_ms: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SummaryResult {
    pub fn success(summary: &Summary) -> Self {
        Self {
            summary_text: summary.text.clone(),
            processing_time_ms: summary.processing_time_ms,
            success: true,
            error: None,
        }
    }

    pub fn failure(error: &SummarizeError, processing_time_ms: u64) -> Self {
        Self {
            summary_text: String::new(),
            processing_time_ms,
            success: false,
            error: Some(error.to_string()),
        }
    }
}

/// Generation settings echoed back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl GenerationMetadata {
    pub fn new(model: impl Into<String>, sampling: &SamplingParams) -> Self {
        Self {
            model: model.into(),
            temperature: sampling.temperature,
            top_p: sampling.top_p,
            top_k: sampling.top_k,
        }
    }
}
