//! HTTP server binary for pdf-summarizer.
//!
//! A thin shim over the library crate that maps flags and environment
//! variables to `SummarizerConfig`, picks a generation backend and serves
//! the router until Ctrl-C.

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use pdf_summarizer::server::{router, AppState};
use pdf_summarizer::{
    DetectionFallback, GeminiGenerator, Generator, LinguaDetector, ProviderGenerator,
    SummarizerConfig, Summarizer,
};
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"ROUTES:
  GET  /                 Health check
  POST /api/summarize    Client-facing: multipart `file` (application/pdf)
  POST /summarize        Internal: multipart `file` + pdf_id, original_filename,
                         file_size, language (auto|id|en|ja), output_type
                         (paragraph|bullet)

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY         Google AI Studio key (gemini provider)
  OPENAI_API_KEY, ANTHROPIC_API_KEY, ...
                         Keys for other providers, read by edgequake-llm
  RUST_LOG               Log filter, overrides --verbose

  A `.env` file in the working directory is loaded before parsing flags.
"#;

/// Summarise uploaded PDFs with a generative language model.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-summarizer",
    version,
    about = "Serve a PDF summarisation API backed by Gemini or any edgequake-llm provider",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Origin allowed by CORS (the web frontend). Any origin when unset.
    #[arg(long, env = "BACKEND_URL")]
    allowed_origin: Option<String>,

    /// Generation backend: gemini (native REST) or any edgequake-llm provider
    /// (openai, anthropic, ollama, azure, ...).
    #[arg(long, env = "SUMMARIZER_PROVIDER", default_value = "gemini")]
    provider: String,

    /// Model ID.
    #[arg(long, env = "SUMMARIZER_MODEL", default_value = pdf_summarizer::config::DEFAULT_MODEL)]
    model: String,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini endpoint override (proxies, local stubs).
    #[arg(long, env = "GEMINI_BASE_URL", default_value = pdf_summarizer::gemini::DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Generation timeout in seconds; 0 disables it.
    #[arg(long, env = "SUMMARIZER_GENERATION_TIMEOUT", default_value_t = 120)]
    generation_timeout: u64,

    /// Largest accepted upload in MiB.
    #[arg(long, env = "SUMMARIZER_MAX_UPLOAD_MB", default_value_t = 50,
          value_parser = clap::value_parser!(u64).range(1..=1024))]
    max_upload_mb: u64,

    /// Language reported when detection fails.
    #[arg(long, env = "SUMMARIZER_DETECTION_FALLBACK", value_enum, default_value = "unknown")]
    detection_fallback: FallbackArg,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SUMMARIZER_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FallbackArg {
    Unknown,
    English,
}

impl From<FallbackArg> for DetectionFallback {
    fn from(v: FallbackArg) -> Self {
        match v {
            FallbackArg::Unknown => DetectionFallback::Unknown,
            FallbackArg::English => DetectionFallback::English,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Config ───────────────────────────────────────────────────────────
    let config = SummarizerConfig::builder()
        .model(cli.model.clone())
        .generation_timeout_secs((cli.generation_timeout > 0).then_some(cli.generation_timeout))
        .max_upload_bytes((cli.max_upload_mb * 1024 * 1024) as usize)
        .detection_fallback(cli.detection_fallback.clone().into())
        .build()
        .context("Invalid summariser configuration")?;

    // ── Backend ──────────────────────────────────────────────────────────
    let generator: Arc<dyn Generator> = if cli.provider.eq_ignore_ascii_case("gemini") {
        let key = cli.gemini_api_key.clone().unwrap_or_default();
        Arc::new(
            GeminiGenerator::with_base_url(key, &config, cli.gemini_base_url.clone())
                .context("Failed to create Gemini client")?,
        )
    } else {
        Arc::new(
            ProviderGenerator::from_factory(&cli.provider, &config)
                .with_context(|| format!("Failed to create provider '{}'", cli.provider))?,
        )
    };
    info!("Generation backend: {} / {}", cli.provider, config.model);

    // Loading the n-gram models takes a moment; do it before accepting traffic.
    let detector = tokio::task::spawn_blocking(LinguaDetector::new)
        .await
        .context("Language detector initialisation failed")?;

    let allowed_origin = match cli.allowed_origin.as_deref().map(str::trim) {
        Some(origin) if !origin.is_empty() => Some(
            HeaderValue::from_str(origin)
                .with_context(|| format!("BACKEND_URL is not a valid origin: {origin}"))?,
        ),
        _ => {
            warn!("BACKEND_URL not set, allowing requests from any origin");
            None
        }
    };

    let summarizer = Summarizer::new(config, Arc::new(detector), generator);
    let app = router(AppState::new(summarizer), allowed_origin);

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
