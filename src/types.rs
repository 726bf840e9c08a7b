//! Domain types — transcript messages, leads, knowledge-base entries, and
//! the supported conversation languages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use uuid::Uuid;

// =============================================================================
// LANGUAGE
// =============================================================================

/// Languages the receptionist can converse in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported language code '{0}' (expected en, es, fr, or de)")]
pub struct UnknownLanguage(pub String);

impl Language {
    pub const ALL: [Self; 4] = [Self::En, Self::Es, Self::Fr, Self::De];

    /// ISO 639-1 code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
        }
    }

    /// English name, used inside prompts.
    #[must_use]
    pub fn english_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::De => "German",
        }
    }

    /// Label shown in the language picker.
    #[must_use]
    pub fn native_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Es => "Español",
            Self::Fr => "Français",
            Self::De => "Deutsch",
        }
    }

    /// Opening message of a fresh transcript.
    #[must_use]
    pub fn greeting(self, company: &str) -> String {
        match self {
            Self::En => format!("Hello 👋 Welcome to {company}! I’m your AI assistant. How can I help you today?"),
            Self::Es => format!("¡Hola! 👋 ¡Bienvenido a {company}! Soy tu asistente de IA. ¿Cómo puedo ayudarte hoy?"),
            Self::Fr => format!(
                "Bonjour 👋 Bienvenue chez {company} ! Je suis votre assistant IA. Comment puis-je vous aider aujourd'hui ?"
            ),
            Self::De => {
                format!("Hallo 👋 Willkommen bei {company}! Ich bin Ihr KI-Assistent. Wie kann ich Ihnen heute helfen?")
            }
        }
    }

    /// Exact code lookup.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Normalize a model's language-detection answer.
    ///
    /// Trims, lowercases, keeps the first two characters, and coerces
    /// anything outside the supported set to English.
    #[must_use]
    pub fn coerce(raw: &str) -> Self {
        let code: String = raw.trim().to_lowercase().chars().take(2).collect();
        Self::from_code(&code).unwrap_or(Self::En)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(&s.trim().to_lowercase()).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

// =============================================================================
// CHAT MESSAGE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// One transcript entry. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    /// Display time, `HH:MM`.
    pub timestamp: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), Sender::User)
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(text.into(), Sender::Assistant)
    }

    fn new(text: String, sender: Sender) -> Self {
        Self { id: Uuid::new_v4(), text, sender, timestamp: display_timestamp() }
    }
}

fn display_timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}

// =============================================================================
// LEADS
// =============================================================================

/// Contact details as the model reports them in the lead sentinel payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
}

/// A captured sales lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub interest: String,
}

impl Lead {
    /// Mint a lead with a fresh identity.
    #[must_use]
    pub fn from_details(details: LeadDetails) -> Self {
        let LeadDetails { name, email, phone, interest } = details;
        Self { id: Uuid::new_v4(), name, email, phone, interest }
    }
}

// =============================================================================
// KNOWLEDGE BASE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    #[serde(default = "new_faq_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl Faq {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { id: new_faq_id(), question: question.into(), answer: answer.into() }
    }
}

fn new_faq_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// TURN EVENTS
// =============================================================================

/// Output of one orchestrated user turn, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    Message(ChatMessage),
    LeadCreated(Lead),
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
