//! Prompt templates for PDF summarisation.
//!
//! Every instruction sent to the model lives here so the wording can be
//! reviewed and unit-tested without a generation backend.
//!
//! [`build_prompt`] is a pure function: identical inputs always produce an
//! identical prompt string.

use crate::config::OutputFormat;
use crate::output::LanguageDetection;

/// Inline markup the model must wrap highlighted terms in.
pub const HIGHLIGHT_OPEN: &str = r#"<mark style="background-color: #2196F3; color: white;">"#;

/// Closing tag matching [`HIGHLIGHT_OPEN`].
pub const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Number of terms the model is asked to highlight.
pub const HIGHLIGHT_COUNT: usize = 5;

/// Structure instructions for [`OutputFormat::Paragraph`].
pub const PARAGRAPH_FORMAT: &str = r#"FORMAT: Write in PARAGRAPH form with proper structure.
- Start with an overview paragraph (1 sentence)
- Follow with 1-2 body paragraphs explaining main ideas
- End with a conclusion paragraph (1 sentence)
- Use natural flowing sentences, NOT bullet points"#;

/// Structure instructions for [`OutputFormat::Bullet`].
pub const BULLET_FORMAT: &str = r#"FORMAT: Write in BULLET POINT form with clear structure.
- Start with EXACTLY ONE bullet point overview
- Follow with 3 bullet points for main ideas
- End with EXACTLY ONE concluding bullet point
- Each bullet must be concise (one sentence)
- Use "-" for bullets, NO sub-bullets"#;

/// Language phrase used when the target is the detection fallback.
const SAME_LANGUAGE: &str = "the same language as the document";

/// How the target language is named inside the prompt.
///
/// Indonesian is spelled the way native readers name it; an undetected
/// language asks the model to mirror the document.
pub fn language_instruction(target: &LanguageDetection) -> String {
    match target.code.as_str() {
        "id" => "Bahasa Indonesia".to_string(),
        "unknown" | "" => SAME_LANGUAGE.to_string(),
        _ => target.name.clone(),
    }
}

/// Structure instructions for the requested format.
pub fn format_instruction(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Paragraph => PARAGRAPH_FORMAT,
        OutputFormat::Bullet => BULLET_FORMAT,
    }
}

/// First `max_chars` characters of `text`, cut on a character boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the complete summarisation prompt.
///
/// Only the first `max_chars` characters of `text` are embedded.
pub fn build_prompt(
    text: &str,
    target: &LanguageDetection,
    format: OutputFormat,
    max_chars: usize,
) -> String {
    let language = language_instruction(target);
    let document = truncate_chars(text, max_chars);

    format!(
        "Summarize the following document in {language}.\n\
         \n\
         {format}\n\
         - Highlight EXACTLY {count} MOST IMPORTANT terms using: {open}term{close}\n\
         \n\
         CRITICAL RULES:\n\
         1. Write ENTIRELY in {language}\n\
         2. Keep it concise and clear\n\
         3. EXACTLY {count} highlighted terms total (no more, no less)\n\
         4. Do NOT repeat highlights unnecessarily\n\
         5. Avoid filler words\n\
         \n\
         ---\n\
         Document:\n\
         {document}\n",
        format = format_instruction(format),
        count = HIGHLIGHT_COUNT,
        open = HIGHLIGHT_OPEN,
        close = HIGHLIGHT_CLOSE,
    )
}
