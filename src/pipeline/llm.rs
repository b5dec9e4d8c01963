//! Text generation: the narrow interface to the external model.
//!
//! The pipeline only ever needs `prompt → text`. That single operation is the
//! [`Generator`] trait; the Gemini REST client ([`crate::gemini`]) and the
//! edgequake-llm adapter ([`ProviderGenerator`]) implement it, and tests plug
//! in fakes that record prompts, fail or stall.
//!
//! There is no retry here. A failed call fails the request; whether a caller
//! retries is its own business (see [`GenerationError::is_transient`]).

use crate::config::SummarizerConfig;
use crate::error::GenerationError;
use crate::prompts::HIGHLIGHT_COUNT;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Call `generator`, bounded by the configured timeout.
///
/// The response text is returned unmodified. The number of highlight spans
/// is logged but not enforced.
pub async fn generate_summary(
    generator: &dyn Generator,
    prompt: &str,
    config: &SummarizerConfig,
) -> Result<String, GenerationError> {
    let start = Instant::now();
    let call = generator.generate(prompt);

    let text = match config.generation_timeout_secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
            .await
            .map_err(|_| GenerationError::Timeout { secs })??,
        None => call.await?,
    };

    let highlights = count_highlights(&text);
    info!(
        "Generated {} chars in {}ms ({} highlights)",
        text.chars().count(),
        start.elapsed().as_millis(),
        highlights
    );
    if highlights != HIGHLIGHT_COUNT {
        warn!(
            "Model returned {} highlighted terms, prompt asked for {}",
            highlights, HIGHLIGHT_COUNT
        );
    }

    Ok(text)
}

static MARK_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<mark\b[^>]*>").unwrap());

/// Number of `<mark …>` spans in `text`.
pub fn count_highlights(text: &str) -> usize {
    MARK_OPEN.find_iter(text).count()
}

// ── edgequake-llm adapter ────────────────────────────────────────────────

/// [`Generator`] over any edgequake-llm provider (OpenAI, Anthropic, Ollama, …).
///
/// Chat-style providers take temperature and an output cap; the nucleus and
/// top-k parameters have no counterpart in their completion options and are
/// left to the provider's defaults.
pub struct ProviderGenerator {
    provider: Arc<dyn LLMProvider>,
    options: CompletionOptions,
}

impl ProviderGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, config: &SummarizerConfig) -> Self {
        Self {
            provider,
            options: build_options(config),
        }
    }

    /// Instantiate a named provider via [`ProviderFactory`].
    ///
    /// API keys are read from the provider's usual environment variables
    /// (`OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, …).
    pub fn from_factory(
        provider_name: &str,
        config: &SummarizerConfig,
    ) -> Result<Self, GenerationError> {
        let provider = ProviderFactory::create_llm_provider(provider_name, &config.model)
            .map_err(|e| GenerationError::NotConfigured {
                backend: provider_name.to_string(),
                hint: format!("{e}"),
            })?;
        Ok(Self::new(provider, config))
    }
}

#[async_trait]
impl Generator for ProviderGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let messages = vec![ChatMessage::user(prompt)];
        let response = self
            .provider
            .chat(&messages, Some(&self.options))
            .await
            .map_err(provider_error)?;

        debug!(
            "Provider used {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        non_blank(response.content)
    }
}

fn provider_error(e: impl std::fmt::Display) -> GenerationError {
    GenerationError::Provider(e.to_string())
}

/// Reject a reply that carries no text.
fn non_blank(content: String) -> Result<String, GenerationError> {
    if content.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "provider returned no text".into(),
        ));
    }
    Ok(content)
}

/// Build `CompletionOptions` from the summariser config.
fn build_options(config: &SummarizerConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.sampling.temperature),
        max_tokens: config.sampling.max_output_tokens.map(|n| n as usize),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait]
    impl Generator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct Stalled;

    #[async_trait]
    impl Generator for Stalled {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[test]
    fn build_options_defaults() {
        let config = SummarizerConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, None);
    }

    #[test]
    fn provider_reply_mapping() {
        assert_eq!(non_blank("  - one\n".into()).unwrap(), "  - one\n");
        assert!(matches!(
            non_blank(" \n\t".into()),
            Err(GenerationError::MalformedResponse(_))
        ));
        assert!(matches!(
            provider_error("401 invalid x-api-key"),
            GenerationError::Provider(m) if m == "401 invalid x-api-key"
        ));
    }

    #[test]
    fn counts_mark_spans() {
        let text = r#"<mark style="background-color: #2196F3; color: white;">a</mark> and <MARK>b</MARK> <marker>"#;
        assert_eq!(count_highlights(text), 2);
        assert_eq!(count_highlights("no markup"), 0);
    }

    #[tokio::test]
    async fn response_is_returned_unmodified() {
        let config = SummarizerConfig::default();
        let raw = "  - one <mark>x</mark>\n\n";
        let text = generate_summary(&Fixed(raw), "prompt", &config).await.unwrap();
        assert_eq!(text, raw);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_generator_times_out() {
        let config = SummarizerConfig::builder()
            .generation_timeout_secs(Some(5))
            .build()
            .unwrap();
        let err = generate_summary(&Stalled, "prompt", &config).await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout { secs: 5 }));
    }
}
