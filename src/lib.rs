//! # pdf-summarizer
//!
//! Summarise uploaded PDF documents with a generative language model.
//!
//! The crate owns the request pipeline around the model call: pulling the
//! text layer out of the PDF, guessing its language, deciding which language
//! the summary is written in, and building a prompt that asks for a fixed
//! structure with five highlighted key terms. Parsing, language
//! identification and generation are delegated to `pdf-extract`, `lingua`
//! and an LLM backend.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ 1. Extract  per-page text layer (CPU-bound, spawn_blocking)
//!  ├─ 2. Detect   language of the first 1000 chars
//!  ├─ 3. Target   caller preference vs. detected language
//!  ├─ 4. Prompt   template + first 15 000 chars of the document
//!  └─ 5. Generate Gemini REST / any edgequake-llm provider
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_summarizer::{
//!     GeminiGenerator, LinguaDetector, SummarizerConfig, Summarizer, SummaryOptions, Upload,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SummarizerConfig::default();
//!     let generator = GeminiGenerator::new(std::env::var("GEMINI_API_KEY")?, &config)?;
//!     let summarizer = Summarizer::new(
//!         config,
//!         Arc::new(LinguaDetector::new()),
//!         Arc::new(generator),
//!     );
//!
//!     let bytes = std::fs::read("report.pdf")?;
//!     let options = SummaryOptions::from_form(Some("en"), Some("bullet"));
//!     let summary = summarizer.summarize(Upload::new(bytes), &options).await?;
//!     println!("{}", summary.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum HTTP surface and the `pdf-summarizer` binary |
//!
//! Disable `server` when embedding only the pipeline:
//! ```toml
//! pdf-summarizer = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod gemini;
pub mod output;
pub mod pipeline;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    DetectionFallback, LanguagePreference, OutputFormat, SamplingParams, SummarizerConfig,
    SummarizerConfigBuilder, SummaryOptions, SupportedLanguage,
};
pub use error::{ErrorClass, GenerationError, SummarizeError};
pub use gemini::GeminiGenerator;
pub use output::{GenerationMetadata, LanguageDetection, Summary, SummaryResult};
pub use pipeline::detect::{LanguageDetector, LinguaDetector};
pub use pipeline::llm::{Generator, ProviderGenerator};
pub use summarize::{Summarizer, Upload, UploadMetadata};
