//! Reply classification for the model's in-band signals.
//!
//! The system instruction asks the model for two fixed reply shapes:
//! a single-line lead record (`LEAD::{json}`) once contact details are
//! collected, and a fixed handoff sentence when it escalates to a human.
//! Every check against those shapes lives here so the matching rule can
//! be tightened or relaxed in one place.

use crate::error::ErrorCode;
use crate::types::LeadDetails;

/// Prefix marking a lead-capture reply.
pub const LEAD_PREFIX: &str = "LEAD::";

/// Sentence the model must answer with, verbatim, to hand off to a human.
pub const ESCALATION_MESSAGE: &str = "I'm transferring you to a human agent for assistance. Please wait a moment.";

#[derive(Debug, thiserror::Error)]
pub enum LeadParseError {
    #[error("lead payload is empty")]
    Empty,
    #[error("lead payload is not a JSON object")]
    NotObject,
    #[error("lead payload is not a valid lead record: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for LeadParseError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "E_LEAD_EMPTY",
            Self::NotObject => "E_LEAD_NOT_OBJECT",
            Self::Json(_) => "E_LEAD_JSON",
        }
    }
}

/// What a model reply asks the orchestrator to do.
#[derive(Debug)]
pub enum Reply<'a> {
    /// Lead sentinel. `Err` when the payload did not parse.
    Lead(Result<LeadDetails, LeadParseError>),
    /// The fixed handoff sentence.
    Escalation,
    /// Ordinary conversational text.
    Text(&'a str),
}

#[must_use]
pub fn is_lead(reply: &str) -> bool {
    reply.trim().starts_with(LEAD_PREFIX)
}

#[must_use]
pub fn is_escalation(reply: &str) -> bool {
    reply.trim() == ESCALATION_MESSAGE
}

#[must_use]
pub fn classify(reply: &str) -> Reply<'_> {
    let trimmed = reply.trim();
    if let Some(payload) = trimmed.strip_prefix(LEAD_PREFIX) {
        return Reply::Lead(parse_lead(payload));
    }
    if trimmed == ESCALATION_MESSAGE {
        return Reply::Escalation;
    }
    Reply::Text(reply)
}

/// Parse the JSON object following the prefix. All four keys are required
/// strings; unknown keys are ignored.
///
/// # Errors
///
/// Returns [`LeadParseError`] for an empty or malformed payload.
pub fn parse_lead(payload: &str) -> Result<LeadDetails, LeadParseError> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(LeadParseError::Empty);
    }
    let value: serde_json::Value = serde_json::from_str(payload)?;
    if !value.is_object() {
        return Err(LeadParseError::NotObject);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
#[path = "sentinel_test.rs"]
mod tests;
