//! Language detection on a prefix sample of the extracted text.
//!
//! Detection is advisory: it only looks at the first
//! [`crate::config::SummarizerConfig::detection_sample_chars`] characters,
//! and any failure is downgraded to the configured fallback language.
//! A document whose language changes after the sample is misclassified.
//!
//! The statistical model sits behind [`LanguageDetector`] so tests can count
//! invocations or force failures; production uses [`LinguaDetector`].

use crate::config::DetectionFallback;
use crate::output::LanguageDetection;
use crate::prompts::truncate_chars;
use lingua::{Language, LanguageDetectorBuilder};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Display names for the language codes a detector may return.
pub static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("id", "Indonesian"),
        ("en", "English"),
        ("ms", "Malay"),
        ("jv", "Javanese"),
        ("su", "Sundanese"),
        ("es", "Spanish"),
        ("fr", "French"),
        ("de", "German"),
        ("it", "Italian"),
        ("pt", "Portuguese"),
        ("nl", "Dutch"),
        ("ru", "Russian"),
        ("ja", "Japanese"),
        ("ko", "Korean"),
        ("zh", "Chinese"),
        ("zh-cn", "Chinese (Simplified)"),
        ("zh-tw", "Chinese (Traditional)"),
        ("ar", "Arabic"),
        ("hi", "Hindi"),
        ("th", "Thai"),
        ("vi", "Vietnamese"),
    ])
});

/// A statistical language identifier.
pub trait LanguageDetector: Send + Sync {
    /// Return a short language code for `sample`, or `None` when the
    /// detector cannot decide.
    fn detect(&self, sample: &str) -> Option<String>;
}

/// Display name for `code`; unknown codes are shown uppercased.
pub fn display_name(code: &str) -> String {
    LANGUAGE_NAMES
        .get(code)
        .map(|name| name.to_string())
        .unwrap_or_else(|| code.to_uppercase())
}

/// Detect the language of `text` from its leading `sample_chars` characters.
///
/// An empty or whitespace-only sample returns the fallback without calling
/// the detector. Never fails.
pub fn detect_language(
    text: &str,
    detector: &dyn LanguageDetector,
    sample_chars: usize,
    fallback: DetectionFallback,
) -> LanguageDetection {
    let sample = truncate_chars(text, sample_chars).trim();
    if sample.is_empty() {
        debug!("Empty detection sample, using fallback");
        return fallback.language();
    }

    match detector.detect(sample) {
        Some(code) => {
            let name = display_name(&code);
            debug!("Detected language {} ({})", name, code);
            LanguageDetection::new(code, name)
        }
        None => {
            warn!(
                "Language detection inconclusive on {} char sample, using fallback",
                sample.chars().count()
            );
            fallback.language()
        }
    }
}

// ── lingua ───────────────────────────────────────────────────────────────

/// Languages the lingua model is built for, with the codes we report.
///
/// Restricting the candidate set keeps model memory small and avoids
/// confusing closely related languages outside the display-name table.
const LINGUA_CANDIDATES: &[(Language, &str)] = &[
    (Language::Indonesian, "id"),
    (Language::English, "en"),
    (Language::Malay, "ms"),
    (Language::Spanish, "es"),
    (Language::French, "fr"),
    (Language::German, "de"),
    (Language::Italian, "it"),
    (Language::Portuguese, "pt"),
    (Language::Dutch, "nl"),
    (Language::Russian, "ru"),
    (Language::Japanese, "ja"),
    (Language::Korean, "ko"),
    (Language::Chinese, "zh"),
    (Language::Arabic, "ar"),
    (Language::Hindi, "hi"),
    (Language::Thai, "th"),
    (Language::Vietnamese, "vi"),
];

/// [`LanguageDetector`] backed by the `lingua` n-gram models.
///
/// Building the detector loads model data; do it once at startup and share
/// the instance.
pub struct LinguaDetector {
    inner: lingua::LanguageDetector,
}

impl LinguaDetector {
    pub fn new() -> Self {
        let languages: Vec<Language> = LINGUA_CANDIDATES.iter().map(|(l, _)| *l).collect();
        let inner = LanguageDetectorBuilder::from_languages(&languages).build();
        Self { inner }
    }
}

impl Default for LinguaDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector for LinguaDetector {
    fn detect(&self, sample: &str) -> Option<String> {
        let language = self.inner.detect_language_of(sample)?;
        LINGUA_CANDIDATES
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, code)| code.to_string())
    }
}
