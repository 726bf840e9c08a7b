//! Multilingual AI receptionist: a conversation engine that answers from a
//! business knowledge base, captures sales leads, and escalates to a human.

pub mod error;
pub mod knowledge;
pub mod llm;
pub mod prompt;
pub mod sentinel;
pub mod services;
pub mod state;
pub mod types;

pub use error::ErrorCode;
pub use knowledge::{KnowledgeBase, KnowledgeError};
pub use llm::{GeminiClient, LlmChat};
pub use services::conversation::{Orchestrator, OrchestratorConfig, SessionKey, TurnError};
pub use state::{Dashboard, DashboardSummary};
pub use types::{ChatMessage, Faq, Language, Lead, LeadDetails, Sender, TurnEvent};

/// Serializes tests that read or write process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
