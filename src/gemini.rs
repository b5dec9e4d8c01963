//! Gemini `generateContent` client.
//!
//! Gemini is called over its REST API rather than through a chat
//! abstraction because the summariser depends on `topP` and `topK`, which
//! only the native `generationConfig` exposes.
//!
//! ## Error mapping
//!
//! | Upstream                         | [`GenerationError`]     |
//! |----------------------------------|-------------------------|
//! | HTTP 429                         | `RateLimited`           |
//! | HTTP 401 / 403                   | `Auth`                  |
//! | other non-2xx                    | `Api { status, .. }`    |
//! | connect / TLS / reset            | `Network`               |
//! | client-side timeout              | `Timeout`               |
//! | `promptFeedback.blockReason`     | `Blocked`               |
//! | undecodable body, no text        | `MalformedResponse`     |

use crate::config::{SamplingParams, SummarizerConfig};
use crate::error::GenerationError;
use crate::pipeline::llm::Generator;
use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl From<&SamplingParams> for GenerationConfig {
    fn from(s: &SamplingParams) -> Self {
        Self {
            temperature: s.temperature,
            top_p: s.top_p,
            top_k: s.top_k,
            max_output_tokens: s.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ── Client ───────────────────────────────────────────────────────────────

/// [`Generator`] that calls Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    sampling: SamplingParams,
    request_timeout: Option<Duration>,
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("sampling", &self.sampling)
            .finish()
    }
}

impl GeminiGenerator {
    /// Create a client for the public endpoint.
    pub fn new(
        api_key: impl Into<String>,
        config: &SummarizerConfig,
    ) -> Result<Self, GenerationError> {
        Self::with_base_url(api_key, config, DEFAULT_BASE_URL)
    }

    /// Create a client for a custom endpoint (proxies, test stubs).
    pub fn with_base_url(
        api_key: impl Into<String>,
        config: &SummarizerConfig,
        base_url: impl Into<String>,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured {
                backend: "gemini".into(),
                hint: "Set GEMINI_API_KEY to a Google AI Studio key.".into(),
            });
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerationError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            sampling: config.sampling,
            request_timeout: config.generation_timeout_secs.map(Duration::from_secs),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig::from(&self.sampling),
        };

        let mut request = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        debug!("POST {} ({} prompt chars)", self.endpoint(), prompt.chars().count());
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let raw = response.text().await.unwrap_or_default();
            return Err(status_error(status, &raw, retry_after_secs));
        }

        let raw = response.text().await.map_err(|e| self.transport_error(e))?;
        parse_response(&raw)
    }
}

impl GeminiGenerator {
    fn transport_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                secs: self.request_timeout.map(|d| d.as_secs()).unwrap_or(0),
            }
        } else {
            GenerationError::Network(e.to_string())
        }
    }
}

/// Map a non-2xx status and its body to a [`GenerationError`].
fn status_error(status: StatusCode, raw: &str, retry_after_secs: Option<u64>) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(raw)
        .map(|env| env.error.message)
        .unwrap_or_else(|_| raw.trim().to_string());

    warn!("Gemini returned {}: {}", status, message);

    match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited { retry_after_secs },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth { detail: message },
        _ => GenerationError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull the generated text out of a 2xx body.
fn parse_response(raw: &str) -> Result<String, GenerationError> {
    let parsed: GenerateContentResponse = serde_json::from_str(raw)
        .map_err(|e| GenerationError::MalformedResponse(format!("invalid JSON: {e}")))?;

    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.clone())
    {
        return Err(GenerationError::Blocked { reason });
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::MalformedResponse("no candidates".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(GenerationError::MalformedResponse(format!(
            "candidate has no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_uses_camel_case_generation_config() {
        let sampling = SamplingParams::default();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hi" }],
            }],
            generation_config: GenerationConfig::from(&sampling),
        };
        let json = serde_json::to_value(&body).unwrap();
        let gc = &json["generationConfig"];
        assert!((gc["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
        assert!((gc["topP"].as_f64().unwrap() - 0.8).abs() < 1e-6);
        assert_eq!(gc["topK"], 40);
        assert!(gc.get("maxOutputTokens").is_none());
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn parses_multi_part_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]},"finishReason":"STOP"}]}"#;
        assert_eq!(parse_response(raw).unwrap(), "Hello world");
    }

    #[test]
    fn blocked_prompt_is_reported() {
        let raw = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(
            parse_response(raw),
            Err(GenerationError::Blocked { reason }) if reason == "SAFETY"
        ));
    }

    #[test]
    fn empty_candidates_are_malformed() {
        assert!(matches!(
            parse_response(r#"{"candidates":[]}"#),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response("<html>gateway</html>"),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_response(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#),
            Err(GenerationError::MalformedResponse(m)) if m.contains("MAX_TOKENS")
        ));
    }

    #[test]
    fn status_mapping() {
        let body = r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, body, Some(7)),
            GenerationError::RateLimited {
                retry_after_secs: Some(7)
            }
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, r#"{"error":{"message":"API key not valid"}}"#, None),
            GenerationError::Auth { detail } if detail == "API key not valid"
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "oops", None),
            GenerationError::Api { status: 500, message } if message == "oops"
        ));
    }

    #[test]
    fn empty_api_key_is_not_configured() {
        let err = GeminiGenerator::new("  ", &SummarizerConfig::default()).unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured { .. }));
    }
}
