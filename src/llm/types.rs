//! Gateway vocabulary: conversation turns, model replies, and failures.
//!
//! The receptionist only ever exchanges plain text with the model, so a
//! turn is a role plus a string and a reply is a list of text parts.

use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid gateway config: {0}")]
    Config(String),

    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// Connection, TLS, or timeout failure before a status was received.
    #[error("gateway request failed: {0}")]
    Transport(String),

    /// Non-200 status. The body is kept for logs but never displayed.
    #[error("gateway returned status {status}")]
    Status { status: u16, body: String },

    #[error("gateway response malformed: {0}")]
    Decode(String),

    /// The gateway refused the prompt outright (safety filters).
    #[error("prompt blocked by gateway ({reason})")]
    Blocked { reason: String },

    #[error("gateway reply contained no text")]
    EmptyReply,

    /// The output cap was reached before any visible text was produced.
    #[error("gateway reply truncated by the output token cap")]
    Truncated,

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_LLM_CONFIG",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::Transport(_) => "E_LLM_TRANSPORT",
            Self::Status { .. } => "E_LLM_STATUS",
            Self::Decode(_) => "E_LLM_DECODE",
            Self::Blocked { .. } => "E_PROMPT_BLOCKED",
            Self::EmptyReply => "E_EMPTY_REPLY",
            Self::Truncated => "E_REPLY_TRUNCATED",
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// TURNS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a model conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }

    #[must_use]
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

// =============================================================================
// REPLIES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    Text(String),
    /// Model reasoning; never shown to the user.
    Thought(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    /// Any other gateway reason, lowercased (`safety`, `recitation`, ...).
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub reply_tokens: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub parts: Vec<Part>,
    pub model: String,
    pub finish: FinishReason,
    pub usage: Usage,
}

impl ChatResponse {
    /// A finished single-part reply.
    #[must_use]
    pub fn from_text(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::Text(text.into())],
            model: model.into(),
            finish: FinishReason::Stop,
            usage: Usage::default(),
        }
    }

    /// Visible reply text: every text part concatenated, then trimmed.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let Part::Text(text) = part {
                out.push_str(text);
            }
        }
        out.trim().to_string()
    }
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// The hosted model, as seen by the rest of the crate. Tests substitute a
/// scripted implementation.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Run `messages` under `system` and return the model's next turn.
    /// An empty `system` sends no system instruction at all. `max_tokens`
    /// of `None` leaves the output length to the model.
    ///
    /// # Errors
    ///
    /// Any [`LlmError`] from transport, status, or decoding.
    async fn chat(&self, max_tokens: Option<u32>, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
