//! Hosted language model gateway.
//!
//! DESIGN
//! ======
//! Everything above this module talks to the model through [`LlmChat`], so
//! tests can script replies. [`GeminiClient`] is the production gateway.
//!
//! Two gateway operations sit on top of `LlmChat::chat`:
//! - [`generate_text`]: stateless one-shot prompt, no system instruction.
//! - session chat: owned by the orchestrator, which replays its own history
//!   under a system instruction (see `services::conversation`).

pub mod config;
pub mod gemini;
pub mod types;

pub use gemini::GeminiClient;
pub use types::LlmChat;
use types::{LlmError, Message};

/// Stateless single-shot prompt. Returns the trimmed reply text.
///
/// # Errors
///
/// Propagates gateway failures, and returns [`LlmError::EmptyReply`] when
/// the model answers with no text.
pub async fn generate_text(llm: &dyn LlmChat, max_tokens: Option<u32>, prompt: &str) -> Result<String, LlmError> {
    let text = llm.chat(max_tokens, "", &[Message::user(prompt)]).await?.text();
    if text.is_empty() {
        return Err(LlmError::EmptyReply);
    }
    Ok(text)
}
