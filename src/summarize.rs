//! Request-level orchestration: bytes → text → language → prompt → summary.
//!
//! [`Summarizer`] owns the shared, read-only pieces (config, detector,
//! generator) and runs one linear pipeline per request. It holds no
//! per-request state, so a single instance behind an `Arc` serves every
//! concurrent request.

use crate::config::{SummarizerConfig, SummaryOptions};
use crate::error::SummarizeError;
use crate::output::{GenerationMetadata, Summary, SummaryResult};
use crate::pipeline::detect::{detect_language, LanguageDetector};
use crate::pipeline::llm::{generate_summary, Generator};
use crate::pipeline::{extract, target};
use crate::prompts::build_prompt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Opaque caller metadata, logged and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    pub pdf_id: Option<String>,
    pub original_filename: Option<String>,
    pub file_size: Option<String>,
}

/// One uploaded document.
#[derive(Debug, Clone, Default)]
pub struct Upload {
    pub bytes: Vec<u8>,
    /// File name from the multipart part, if any.
    pub file_name: Option<String>,
    /// Declared content type of the multipart part, if any.
    pub content_type: Option<String>,
    pub metadata: UploadMetadata,
}

impl Upload {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            ..Default::default()
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_metadata(mut self, metadata: UploadMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether the declared content type is `application/pdf` (parameters ignored).
    pub fn declares_pdf(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().eq_ignore_ascii_case("application/pdf"))
            .unwrap_or(false)
    }
}

/// The summarisation pipeline.
pub struct Summarizer {
    config: Arc<SummarizerConfig>,
    detector: Arc<dyn LanguageDetector>,
    generator: Arc<dyn Generator>,
}

impl Summarizer {
    pub fn new(
        config: SummarizerConfig,
        detector: Arc<dyn LanguageDetector>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            detector,
            generator,
        }
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.config
    }

    /// Model name and sampling parameters, for echoing to clients.
    pub fn metadata(&self) -> GenerationMetadata {
        GenerationMetadata::new(self.config.model.clone(), &self.config.sampling)
    }

    /// Reject uploads that must not reach the extractor.
    ///
    /// The content-type check is optional because the internal contract
    /// trusts its caller to send PDFs.
    pub fn validate_upload(
        &self,
        upload: &Upload,
        require_pdf_content_type: bool,
    ) -> Result<(), SummarizeError> {
        // A form without a file part arrives with no bytes and no content type.
        if upload.bytes.is_empty() && upload.content_type.is_none() {
            return Err(SummarizeError::EmptyUpload);
        }
        if require_pdf_content_type && !upload.declares_pdf() {
            return Err(SummarizeError::UnsupportedMedia {
                content_type: upload.content_type.clone(),
            });
        }
        if upload.bytes.len() > self.config.max_upload_bytes {
            return Err(SummarizeError::UploadTooLarge {
                size: Some(upload.bytes.len()),
                limit: self.config.max_upload_bytes,
            });
        }
        if upload.bytes.is_empty() {
            return Err(SummarizeError::EmptyUpload);
        }
        Ok(())
    }

    /// Run the full pipeline on one upload.
    ///
    /// # Errors
    /// - [`SummarizeError::EmptyUpload`] / [`SummarizeError::UploadTooLarge`] before any parsing
    /// - [`SummarizeError::Extraction`] when the bytes are not a readable PDF
    /// - [`SummarizeError::NoText`] when the PDF has no text layer; the
    ///   generator is not called
    /// - [`SummarizeError::Generation`] when the model call fails
    pub async fn summarize(
        &self,
        upload: Upload,
        options: &SummaryOptions,
    ) -> Result<Summary, SummarizeError> {
        let start = Instant::now();
        self.validate_upload(&upload, false)?;

        let Upload {
            bytes,
            file_name,
            metadata,
            ..
        } = upload;
        info!(
            "Processing PDF: id={:?} filename={:?} declared_size={:?} bytes={} language={:?} output={}",
            metadata.pdf_id,
            metadata.original_filename.as_deref().or(file_name.as_deref()),
            metadata.file_size,
            bytes.len(),
            options.language,
            options.output_format.as_str()
        );

        // ── Step 1: Extract ──────────────────────────────────────────────
        let text = extract::extract_text(bytes).await?;
        if text.trim().is_empty() {
            return Err(SummarizeError::NoText);
        }
        let text_length = text.chars().count();

        // ── Step 2: Detect ───────────────────────────────────────────────
        let detected = detect_language(
            &text,
            self.detector.as_ref(),
            self.config.detection_sample_chars,
            self.config.detection_fallback,
        );
        info!("Detected language: {} ({})", detected.name, detected.code);

        // ── Step 3: Resolve target ───────────────────────────────────────
        let target_language = target::resolve_target(
            &options.language,
            &detected,
            &self.config.supported_languages,
        );
        info!(
            "Target language: {} ({}), format: {}",
            target_language.name,
            target_language.code,
            options.output_format.as_str()
        );

        // ── Step 4: Prompt + generate ────────────────────────────────────
        let prompt = build_prompt(
            &text,
            &target_language,
            options.output_format,
            self.config.max_document_chars,
        );
        let summary_text = generate_summary(self.generator.as_ref(), &prompt, &self.config).await?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!("Processing completed in {}ms", processing_time_ms);

        Ok(Summary {
            text: summary_text,
            file_name,
            text_length,
            detected_language: detected,
            target_language,
            output_format: options.output_format,
            processing_time_ms,
        })
    }

    /// Run the pipeline and fold any failure into a [`SummaryResult`].
    ///
    /// Never fails; the error message and elapsed time are reported in-band.
    pub async fn summarize_to_result(&self, upload: Upload, options: &SummaryOptions) -> SummaryResult {
        let start = Instant::now();
        match self.summarize(upload, options).await {
            Ok(summary) => SummaryResult::success(&summary),
            Err(e) => {
                let elapsed = start.elapsed().as_millis() as u64;
                error!("Summarisation failed after {}ms: {}", elapsed, e);
                SummaryResult::failure(&e, elapsed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_pdf_ignores_parameters_and_case() {
        assert!(Upload::new(vec![1])
            .with_content_type("application/pdf")
            .declares_pdf());
        assert!(Upload::new(vec![1])
            .with_content_type("Application/PDF; name=x.pdf")
            .declares_pdf());
        assert!(!Upload::new(vec![1])
            .with_content_type("application/octet-stream")
            .declares_pdf());
        assert!(!Upload::new(vec![1]).declares_pdf());
    }

    struct Unused;

    impl LanguageDetector for Unused {
        fn detect(&self, _sample: &str) -> Option<String> {
            None
        }
    }

    #[async_trait::async_trait]
    impl Generator for Unused {
        async fn generate(&self, _prompt: &str) -> Result<String, crate::error::GenerationError> {
            Ok(String::new())
        }
    }

    fn summarizer() -> Summarizer {
        Summarizer::new(SummarizerConfig::default(), Arc::new(Unused), Arc::new(Unused))
    }

    #[test]
    fn missing_file_part_is_empty_even_when_pdf_required() {
        let err = summarizer()
            .validate_upload(&Upload::default(), true)
            .unwrap_err();
        assert!(matches!(err, SummarizeError::EmptyUpload));
    }

    #[test]
    fn declared_non_pdf_is_rejected_before_size_checks() {
        let upload = Upload::new(Vec::new()).with_content_type("text/plain");
        let err = summarizer().validate_upload(&upload, true).unwrap_err();
        assert!(matches!(err, SummarizeError::UnsupportedMedia { .. }));

        let upload = Upload::new(vec![1, 2, 3]).with_content_type("application/pdf");
        assert!(summarizer().validate_upload(&upload, true).is_ok());
    }
}
