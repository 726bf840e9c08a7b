//! Gateway configuration read from the environment.
//!
//! | variable                   | default                                   |
//! |----------------------------|-------------------------------------------|
//! | `LLM_API_KEY_ENV`          | `GEMINI_API_KEY` (names the key variable) |
//! | `LLM_MODEL`                | `gemini-2.5-flash`                        |
//! | `LLM_BASE_URL`             | Generative Language `v1beta` endpoint     |
//! | `LLM_REQUEST_TIMEOUT_SECS` | 120                                       |
//! | `LLM_CONNECT_TIMEOUT_SECS` | 10                                        |

use std::time::Duration;

use super::types::LlmError;

pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Default for LlmTimeouts {
    fn default() -> Self {
        Self { request: DEFAULT_REQUEST_TIMEOUT, connect: DEFAULT_CONNECT_TIMEOUT }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    /// Without trailing slash.
    pub base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// # Errors
    ///
    /// [`LlmError::MissingApiKey`] when the key variable is unset or blank,
    /// [`LlmError::Config`] for an unparsable or zero timeout.
    pub fn from_env() -> Result<Self, LlmError> {
        let key_var = non_blank_env("LLM_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string());
        let api_key = non_blank_env(&key_var).ok_or(LlmError::MissingApiKey { var: key_var })?;

        let model = non_blank_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = non_blank_env("LLM_BASE_URL")
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let timeouts = LlmTimeouts {
            request: timeout_from_env("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?,
            connect: timeout_from_env("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT)?,
        };

        Ok(Self { api_key, model, base_url, timeouts })
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn timeout_from_env(key: &str, default: Duration) -> Result<Duration, LlmError> {
    let Some(raw) = non_blank_env(key) else {
        return Ok(default);
    };
    match raw.parse::<u64>() {
        Ok(0) => Err(LlmError::Config(format!("{key} must be greater than zero"))),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => Err(LlmError::Config(format!("{key}: expected whole seconds, got '{raw}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
