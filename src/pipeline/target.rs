//! Target-language resolution: caller preference vs. detected language.

use crate::config::{LanguagePreference, SupportedLanguage};
use crate::output::LanguageDetection;

/// Decide the language the summary is written in.
///
/// An explicit preference wins only when it names a supported language;
/// `auto` and every unsupported code fall back to the detected language.
/// Pure and total.
pub fn resolve_target(
    preference: &LanguagePreference,
    detected: &LanguageDetection,
    supported: &[SupportedLanguage],
) -> LanguageDetection {
    match preference {
        LanguagePreference::Auto => detected.clone(),
        LanguagePreference::Explicit(code) => supported
            .iter()
            .find(|lang| lang.code == *code)
            .map(|lang| LanguageDetection::new(lang.code.clone(), lang.name.clone()))
            .unwrap_or_else(|| detected.clone()),
    }
}
