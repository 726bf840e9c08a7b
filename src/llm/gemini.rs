//! Google Generative Language (Gemini) gateway client.
//!
//! Thin HTTP wrapper for `models/{model}:generateContent`. The system
//! instruction travels in `systemInstruction`; assistant turns are sent with
//! the `model` role. Response parsing is pure and lives in
//! `parse_generate_content_response`.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::config::LlmConfig;
use super::types::{ChatResponse, FinishReason, LlmChat, LlmError, Message, Part, Usage};
use crate::error::ErrorCode;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// See [`LlmConfig::from_env`]; also [`LlmError::ClientBuild`].
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// # Errors
    ///
    /// [`LlmError::ClientBuild`] if the TLS backend fails to initialize.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request)
            .connect_timeout(config.timeouts.connect)
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;
        Ok(Self { http, api_key: config.api_key, model: config.model, base_url: config.base_url })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmChat for GeminiClient {
    async fn chat(&self, max_tokens: Option<u32>, system: &str, messages: &[Message]) -> Result<ChatResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = build_request(max_tokens, system, messages);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;
        if status != 200 {
            return Err(LlmError::Status { status, body: text });
        }

        let parsed = parse_generate_content_response(&text, &self.model)?;
        if parsed.finish == FinishReason::MaxTokens {
            warn!(
                code = LlmError::Truncated.error_code(),
                model = %parsed.model,
                ?max_tokens,
                reply_tokens = parsed.usage.reply_tokens,
                "gemini: reply cut off at the output token cap"
            );
        }
        debug!(
            model = %parsed.model,
            prompt_tokens = parsed.usage.prompt_tokens,
            reply_tokens = parsed.usage.reply_tokens,
            "gemini: generateContent ok"
        );
        Ok(parsed)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

fn build_request<'a>(max_tokens: Option<u32>, system: &'a str, messages: &'a [Message]) -> GenerateRequest<'a> {
    let system_instruction =
        (!system.trim().is_empty()).then(|| Content { role: None, parts: [TextPart { text: system }] });
    let contents = messages
        .iter()
        .map(|m| Content {
            role: Some(if m.is_assistant() { "model" } else { "user" }),
            parts: [TextPart { text: &m.content }],
        })
        .collect();
    let generation_config = max_tokens.map(|max_output_tokens| GenerationConfig { max_output_tokens });
    GenerateRequest { system_instruction, contents, generation_config }
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

pub(crate) fn parse_generate_content_response(json_text: &str, requested_model: &str) -> Result<ChatResponse, LlmError> {
    let root: Value = serde_json::from_str(json_text).map_err(|e| LlmError::Decode(e.to_string()))?;

    let Some(candidate) = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|arr| arr.first())
    else {
        return Err(match root.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
            Some(reason) => LlmError::Blocked { reason: reason.to_string() },
            None => LlmError::Decode("generateContent: missing candidates[0]".to_string()),
        });
    };

    let parts: Vec<Part> = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| parts.iter().filter_map(parse_part).collect())
        .unwrap_or_default();

    let finish = match candidate.get("finishReason").and_then(Value::as_str) {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::MaxTokens,
        Some(other) => FinishReason::Other(other.to_ascii_lowercase()),
    };

    let token_count = |field: &str| {
        root.get("usageMetadata")
            .and_then(|u| u.get(field))
            .and_then(Value::as_u64)
            .unwrap_or(0)
    };
    let usage = Usage {
        prompt_tokens: token_count("promptTokenCount"),
        reply_tokens: token_count("candidatesTokenCount"),
    };

    let model = root
        .get("modelVersion")
        .and_then(Value::as_str)
        .unwrap_or(requested_model)
        .to_string();

    let response = ChatResponse { parts, model, finish, usage };
    if response.finish == FinishReason::MaxTokens && response.text().is_empty() {
        return Err(LlmError::Truncated);
    }
    Ok(response)
}

fn parse_part(part: &Value) -> Option<Part> {
    let text = part.get("text").and_then(Value::as_str)?;
    if part.get("thought").and_then(Value::as_bool) == Some(true) {
        Some(Part::Thought(text.to_string()))
    } else if text.is_empty() {
        None
    } else {
        Some(Part::Text(text.to_string()))
    }
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
