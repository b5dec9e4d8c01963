//! Configuration types for PDF summarisation.
//!
//! Every knob of the pipeline lives in [`SummarizerConfig`], built via its
//! [`SummarizerConfigBuilder`]. The config is constructed once at startup,
//! wrapped in an `Arc` and shared read-only by every request; nothing in the
//! pipeline mutates it.
//!
//! The per-request choices (target language, output format) are not part of
//! the config: they travel in [`SummaryOptions`].

use crate::error::SummarizeError;
use crate::output::LanguageDetection;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default Gemini model used for summaries.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default character budget for the document text embedded in the prompt.
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 15_000;

/// Default length of the prefix handed to the language detector.
pub const DEFAULT_DETECTION_SAMPLE_CHARS: usize = 1_000;

/// Default upload size limit: 50 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Configuration for the summarisation pipeline.
///
/// # Example
/// ```rust
/// use pdf_summarizer::SummarizerConfig;
///
/// let config = SummarizerConfig::builder()
///     .model("gemini-2.5-flash")
///     .generation_timeout_secs(Some(60))
///     .build()
///     .unwrap();
/// assert_eq!(config.sampling.top_k, 40);
/// ```
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    /// Model identifier passed to the generation backend. Default: `gemini-2.5-flash`.
    pub model: String,

    /// Sampling parameters, identical for every request.
    pub sampling: SamplingParams,

    /// Maximum number of characters of document text placed in the prompt. Default: 15 000.
    ///
    /// Long documents are summarised from their prefix only. The budget bounds
    /// cost and latency of the generation call.
    pub max_document_chars: usize,

    /// Number of leading characters inspected by the language detector. Default: 1 000.
    pub detection_sample_chars: usize,

    /// Largest accepted upload in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,

    /// Deadline for one generation call in seconds. `None` waits forever. Default: 120.
    pub generation_timeout_secs: Option<u64>,

    /// Language reported when detection has nothing to go on.
    pub detection_fallback: DetectionFallback,

    /// Languages a caller may request explicitly. Default: `id`, `en`, `ja`.
    pub supported_languages: Vec<SupportedLanguage>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            sampling: SamplingParams::default(),
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            detection_sample_chars: DEFAULT_DETECTION_SAMPLE_CHARS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            generation_timeout_secs: Some(120),
            detection_fallback: DetectionFallback::default(),
            supported_languages: SupportedLanguage::defaults(),
        }
    }
}

impl SummarizerConfig {
    /// Create a new builder for `SummarizerConfig`.
    pub fn builder() -> SummarizerConfigBuilder {
        SummarizerConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SummarizerConfig`].
#[derive(Debug)]
pub struct SummarizerConfigBuilder {
    config: SummarizerConfig,
}

impl SummarizerConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.sampling.temperature = t;
        self
    }

    pub fn top_p(mut self, p: f32) -> Self {
        self.config.sampling.top_p = p;
        self
    }

    pub fn top_k(mut self, k: u32) -> Self {
        self.config.sampling.top_k = k;
        self
    }

    pub fn max_output_tokens(mut self, n: Option<u32>) -> Self {
        self.config.sampling.max_output_tokens = n;
        self
    }

    pub fn max_document_chars(mut self, n: usize) -> Self {
        self.config.max_document_chars = n;
        self
    }

    pub fn detection_sample_chars(mut self, n: usize) -> Self {
        self.config.detection_sample_chars = n;
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    pub fn generation_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.config.generation_timeout_secs = secs;
        self
    }

    pub fn detection_fallback(mut self, fallback: DetectionFallback) -> Self {
        self.config.detection_fallback = fallback;
        self
    }

    pub fn supported_languages(mut self, languages: Vec<SupportedLanguage>) -> Self {
        self.config.supported_languages = languages;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizerConfig, SummarizeError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(SummarizeError::InvalidConfig("Model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&c.sampling.temperature) {
            return Err(SummarizeError::InvalidConfig(format!(
                "Temperature must be 0.0–2.0, got {}",
                c.sampling.temperature
            )));
        }
        if !(c.sampling.top_p > 0.0 && c.sampling.top_p <= 1.0) {
            return Err(SummarizeError::InvalidConfig(format!(
                "top_p must be in (0, 1], got {}",
                c.sampling.top_p
            )));
        }
        if c.sampling.top_k == 0 {
            return Err(SummarizeError::InvalidConfig("top_k must be ≥ 1".into()));
        }
        if c.max_document_chars == 0 || c.detection_sample_chars == 0 {
            return Err(SummarizeError::InvalidConfig(
                "Character budgets must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(SummarizeError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        if c.generation_timeout_secs == Some(0) {
            return Err(SummarizeError::InvalidConfig(
                "Generation timeout must be ≥ 1s (use None to disable)".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Sampling ─────────────────────────────────────────────────────────────

/// Sampling parameters sent with every generation request.
///
/// Held constant across requests: low temperature keeps summaries close to
/// the source text, nucleus and top-k truncation trim unlikely tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    /// Default: 0.3.
    pub temperature: f32,
    /// Nucleus-sampling threshold. Default: 0.8.
    pub top_p: f32,
    /// Top-k truncation. Default: 40.
    pub top_k: u32,
    /// Output token cap. `None` leaves the model default in place.
    pub max_output_tokens: Option<u32>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: None,
        }
    }
}

// ── Languages ────────────────────────────────────────────────────────────

/// A language a caller may ask for explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedLanguage {
    /// Short code as sent in the `language` form field, e.g. `"id"`.
    pub code: String,
    /// Canonical display name, e.g. `"Indonesian"`.
    pub name: String,
}

impl SupportedLanguage {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Indonesian, English and Japanese.
    pub fn defaults() -> Vec<SupportedLanguage> {
        vec![
            SupportedLanguage::new("id", "Indonesian"),
            SupportedLanguage::new("en", "English"),
            SupportedLanguage::new("ja", "Japanese"),
        ]
    }
}

/// What the detector reports when it cannot tell the language.
///
/// Deployments disagreed on this; `Unknown` is the default because it does
/// not pretend to know. With `Unknown` the prompt asks the model to answer in
/// the document's own language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionFallback {
    /// `("unknown", "Unknown")` (default)
    #[default]
    Unknown,
    /// `("en", "English")`
    English,
}

impl DetectionFallback {
    pub fn language(&self) -> LanguageDetection {
        match self {
            DetectionFallback::Unknown => LanguageDetection::new("unknown", "Unknown"),
            DetectionFallback::English => LanguageDetection::new("en", "English"),
        }
    }
}

// ── Per-request options ──────────────────────────────────────────────────

/// Caller preference for the summary language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguagePreference {
    /// Write in the detected document language (default).
    #[default]
    Auto,
    /// Write in this language code, if it is supported.
    Explicit(String),
}

impl LanguagePreference {
    /// Parse a form value. Total: every string maps to some preference.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") {
            LanguagePreference::Auto
        } else {
            LanguagePreference::Explicit(value.to_lowercase())
        }
    }
}

/// Structural template of the generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Overview, body and conclusion paragraphs (default).
    #[default]
    Paragraph,
    /// Fixed count of `-` bullets.
    Bullet,
}

impl OutputFormat {
    /// Parse a form value; unrecognised values fall back to `Paragraph`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "paragraph" => OutputFormat::Paragraph,
            "bullet" | "bullets" | "pointer" => OutputFormat::Bullet,
            other => {
                warn!("Unknown output_type '{}', using paragraph", other);
                OutputFormat::Paragraph
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Paragraph => "paragraph",
            OutputFormat::Bullet => "bullet",
        }
    }
}

/// Per-request choices.
#[derive(Debug, Clone, Default)]
pub struct SummaryOptions {
    pub language: LanguagePreference,
    pub output_format: OutputFormat,
}

impl SummaryOptions {
    /// Build options from raw form values, applying the defaults
    /// (`auto`, `paragraph`) for missing fields.
    pub fn from_form(language: Option<&str>, output_type: Option<&str>) -> Self {
        Self {
            language: language.map(LanguagePreference::parse).unwrap_or_default(),
            output_format: output_type.map(OutputFormat::parse).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_generation_contract() {
        let config = SummarizerConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.sampling.temperature, 0.3);
        assert_eq!(config.sampling.top_p, 0.8);
        assert_eq!(config.sampling.top_k, 40);
        assert_eq!(config.max_document_chars, 15_000);
        assert_eq!(config.detection_sample_chars, 1_000);
        assert_eq!(config.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn builder_rejects_bad_sampling() {
        assert!(SummarizerConfig::builder().top_p(0.0).build().is_err());
        assert!(SummarizerConfig::builder().top_p(1.5).build().is_err());
        assert!(SummarizerConfig::builder().top_k(0).build().is_err());
        assert!(SummarizerConfig::builder().temperature(3.0).build().is_err());
        assert!(SummarizerConfig::builder().top_p(1.0).build().is_ok());
    }

    #[test]
    fn builder_rejects_zero_budgets() {
        assert!(SummarizerConfig::builder().max_document_chars(0).build().is_err());
        assert!(SummarizerConfig::builder()
            .generation_timeout_secs(Some(0))
            .build()
            .is_err());
        assert!(SummarizerConfig::builder()
            .generation_timeout_secs(None)
            .build()
            .is_ok());
    }

    #[test]
    fn language_preference_parse_is_total() {
        assert_eq!(LanguagePreference::parse("auto"), LanguagePreference::Auto);
        assert_eq!(LanguagePreference::parse(" AUTO "), LanguagePreference::Auto);
        assert_eq!(LanguagePreference::parse(""), LanguagePreference::Auto);
        assert_eq!(
            LanguagePreference::parse("ID"),
            LanguagePreference::Explicit("id".into())
        );
        assert_eq!(
            LanguagePreference::parse("xx-unsupported"),
            LanguagePreference::Explicit("xx-unsupported".into())
        );
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("paragraph"), OutputFormat::Paragraph);
        assert_eq!(OutputFormat::parse("Bullet"), OutputFormat::Bullet);
        assert_eq!(OutputFormat::parse("pointer"), OutputFormat::Bullet);
        assert_eq!(OutputFormat::parse("haiku"), OutputFormat::Paragraph);
    }

    #[test]
    fn options_from_form_defaults() {
        let opts = SummaryOptions::from_form(None, None);
        assert_eq!(opts.language, LanguagePreference::Auto);
        assert_eq!(opts.output_format, OutputFormat::Paragraph);

        let opts = SummaryOptions::from_form(Some("ja"), Some("bullet"));
        assert_eq!(opts.language, LanguagePreference::Explicit("ja".into()));
        assert_eq!(opts.output_format, OutputFormat::Bullet);
    }

    #[test]
    fn detection_fallback_pairs() {
        let unknown = DetectionFallback::Unknown.language();
        assert_eq!((unknown.code.as_str(), unknown.name.as_str()), ("unknown", "Unknown"));
        let english = DetectionFallback::English.language();
        assert_eq!((english.code.as_str(), english.name.as_str()), ("en", "English"));
    }
}
