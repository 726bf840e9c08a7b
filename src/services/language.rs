//! Language detection and translation over the one-shot gateway.
//!
//! Both operations absorb every failure: detection falls back to English
//! and translation falls back to the untranslated text. Failures are only
//! logged.

use tracing::{debug, warn};

use crate::error::ErrorCode;
use crate::llm::{LlmChat, generate_text};
use crate::prompt;
use crate::types::Language;

/// Detect the language of `text`. Unknown codes and failures yield English.
pub async fn detect_language(llm: &dyn LlmChat, max_tokens: Option<u32>, text: &str) -> Language {
    match generate_text(llm, max_tokens, &prompt::detect_prompt(text)).await {
        Ok(raw) => {
            let language = Language::coerce(&raw);
            debug!(raw = %raw, %language, "language: detected");
            language
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "language: detection failed, assuming en");
            Language::En
        }
    }
}

/// Translate `text` into `to`. Returns `text` unchanged on any failure.
pub async fn translate_text(
    llm: &dyn LlmChat,
    max_tokens: Option<u32>,
    text: &str,
    to: Language,
    from: Option<Language>,
) -> String {
    match generate_text(llm, max_tokens, &prompt::translate_prompt(text, to, from)).await {
        Ok(translated) => translated,
        Err(e) => {
            warn!(
                error = %e,
                code = e.error_code(),
                %to,
                from = from.map(Language::code),
                "language: translation failed, passing text through"
            );
            text.to_string()
        }
    }
}

#[cfg(test)]
#[path = "language_test.rs"]
mod tests;
