//! Conversation orchestrator — one user utterance in, transcript events out.
//!
//! DESIGN
//! ======
//! A turn is a strictly sequential chain of gateway calls:
//!
//! 1. echo the user's message
//! 2. detect the utterance language (failure → `en`)
//! 3. translate into the target language when they differ
//! 4. chat with the session-bound model
//! 5. translate the reply back unless it is a lead or escalation signal
//! 6. classify the reply: lead record, plain text, or escalation
//!
//! The model conversation (system instruction + history) is owned by the
//! orchestrator and keyed by (target language, knowledge-base fingerprint).
//! A key change or any chat failure drops the session, so a reply never
//! reflects a stale knowledge base or the wrong language.
//!
//! Only caller contract violations (blank utterance, turn already running)
//! are returned as errors. Once a turn starts every failure degrades to one
//! of a fixed set of assistant messages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::ErrorCode;
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};
use crate::prompt;
use crate::sentinel::{self, Reply};
use crate::services::language::{detect_language, translate_text};
use crate::types::{ChatMessage, Faq, Language, Lead, TurnEvent};

pub const DEFAULT_COMPANY: &str = "Zentara";

/// Shown when the chat call itself fails.
pub const CONNECTION_TROUBLE_MESSAGE: &str = "Sorry, I'm having trouble connecting right now. Please try again later.";

/// Shown when the model's lead record cannot be parsed.
pub const LEAD_RETRY_MESSAGE: &str =
    "I had a little trouble saving your details. Could you please provide them again?";

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Company name the receptionist speaks for.
    pub company: String,
    /// Output token cap for every gateway call. `None` sends no cap.
    pub max_tokens: Option<u32>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self { company: DEFAULT_COMPANY.to_string(), max_tokens: None }
    }
}

impl OrchestratorConfig {
    /// Read `RECEPTIONIST_COMPANY` and `RECEPTIONIST_MAX_TOKENS`. Absent or
    /// unparsable values fall back to the defaults: `Zentara`, and no cap.
    #[must_use]
    pub fn from_env() -> Self {
        let company = std::env::var("RECEPTIONIST_COMPANY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY.to_string());
        let max_tokens = std::env::var("RECEPTIONIST_MAX_TOKENS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&n| n > 0);
        Self { company, max_tokens }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("a message is already being processed")]
    Busy,
}

impl ErrorCode for TurnError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyMessage => "E_EMPTY_MESSAGE",
            Self::Busy => "E_TURN_IN_FLIGHT",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Busy)
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Binding that decides whether a model conversation can be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub language: Language,
    pub faq_fingerprint: u64,
}

impl SessionKey {
    #[must_use]
    pub fn new(language: Language, faqs: &[Faq]) -> Self {
        Self { language, faq_fingerprint: prompt::faq_fingerprint(faqs) }
    }
}

/// Model-side conversation: the system instruction it was primed with and
/// every completed exchange since.
#[derive(Debug, Clone)]
struct ChatSession {
    key: SessionKey,
    system_instruction: String,
    history: Vec<Message>,
}

// =============================================================================
// IN-FLIGHT GUARD
// =============================================================================

/// Holds the in-flight flag for the duration of one turn. Dropping it
/// releases the flag on every exit path.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// EVENT EMISSION
// =============================================================================

/// Collects a turn's events and forwards each one as soon as it exists.
struct Emitter<'a> {
    events: Vec<TurnEvent>,
    sink: Option<&'a mpsc::UnboundedSender<TurnEvent>>,
}

impl<'a> Emitter<'a> {
    fn new(sink: Option<&'a mpsc::UnboundedSender<TurnEvent>>) -> Self {
        Self { events: Vec::new(), sink }
    }

    fn emit(&mut self, event: TurnEvent) {
        if let Some(sink) = self.sink {
            if sink.send(event.clone()).is_err() {
                debug!("conversation: event receiver dropped");
            }
        }
        self.events.push(event);
    }

    fn message(&mut self, message: ChatMessage) {
        self.emit(TurnEvent::Message(message));
    }

    fn assistant(&mut self, text: impl Into<String>) {
        self.message(ChatMessage::assistant(text));
    }

    fn lead(&mut self, lead: Lead) {
        self.emit(TurnEvent::LeadCreated(lead));
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

pub struct Orchestrator {
    llm: Arc<dyn LlmChat>,
    config: OrchestratorConfig,
    session: Mutex<Option<ChatSession>>,
    in_flight: AtomicBool,
}

impl Orchestrator {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, config: OrchestratorConfig) -> Self {
        Self { llm, config, session: Mutex::new(None), in_flight: AtomicBool::new(false) }
    }

    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// `true` while a turn is running; callers disable input meanwhile.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Key of the live model session, if one exists.
    #[must_use]
    pub fn session_key(&self) -> Option<SessionKey> {
        self.lock_session().as_ref().map(|s| s.key)
    }

    /// Drop the model session; the next turn rebuilds it.
    pub fn reset_session(&self) {
        self.lock_session().take();
    }

    /// Run one turn and return its events in emission order.
    ///
    /// # Errors
    ///
    /// [`TurnError::EmptyMessage`] for a blank utterance and
    /// [`TurnError::Busy`] when another turn is running. Nothing is emitted
    /// in either case.
    pub async fn handle_user_message(
        &self,
        utterance: &str,
        faqs: &[Faq],
        target: Language,
    ) -> Result<Vec<TurnEvent>, TurnError> {
        self.run(utterance, faqs, target, None).await
    }

    /// Like [`Self::handle_user_message`], additionally pushing each event
    /// to `sink` the moment it is produced.
    ///
    /// # Errors
    ///
    /// Same as [`Self::handle_user_message`].
    pub async fn stream_user_message(
        &self,
        utterance: &str,
        faqs: &[Faq],
        target: Language,
        sink: &mpsc::UnboundedSender<TurnEvent>,
    ) -> Result<Vec<TurnEvent>, TurnError> {
        self.run(utterance, faqs, target, Some(sink)).await
    }

    async fn run(
        &self,
        utterance: &str,
        faqs: &[Faq],
        target: Language,
        sink: Option<&mpsc::UnboundedSender<TurnEvent>>,
    ) -> Result<Vec<TurnEvent>, TurnError> {
        if utterance.trim().is_empty() {
            return Err(TurnError::EmptyMessage);
        }
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            return Err(TurnError::Busy);
        };

        info!(%target, faqs = faqs.len(), utterance_len = utterance.len(), "conversation: turn started");
        let mut emitter = Emitter::new(sink);
        self.turn(utterance, faqs, target, &mut emitter).await;
        info!(events = emitter.events.len(), "conversation: turn complete");
        Ok(emitter.events)
    }

    async fn turn(&self, utterance: &str, faqs: &[Faq], target: Language, out: &mut Emitter<'_>) {
        let max_tokens = self.config.max_tokens;
        let llm = &*self.llm;

        out.message(ChatMessage::user(utterance));

        let detected = detect_language(llm, max_tokens, utterance).await;
        let crosses_language = detected != target;

        let message_for_model = if crosses_language {
            translate_text(llm, max_tokens, utterance, target, Some(detected)).await
        } else {
            utterance.to_string()
        };

        let raw = match self.chat(&message_for_model, faqs, target).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, code = e.error_code(), retryable = e.retryable(), "conversation: chat failed");
                out.assistant(CONNECTION_TROUBLE_MESSAGE);
                return;
            }
        };

        let reply = if crosses_language && !sentinel::is_lead(&raw) && !sentinel::is_escalation(&raw) {
            translate_text(llm, max_tokens, &raw, detected, Some(target)).await
        } else {
            raw
        };

        match sentinel::classify(&reply) {
            Reply::Lead(Ok(details)) => {
                let lead = Lead::from_details(details);
                info!(lead_id = %lead.id, interest = %lead.interest, "conversation: lead captured");
                let mut confirmation = prompt::lead_confirmation(&lead);
                if detected != Language::En {
                    confirmation =
                        translate_text(llm, max_tokens, &confirmation, detected, Some(Language::En)).await;
                }
                out.lead(lead);
                out.assistant(confirmation);
            }
            Reply::Lead(Err(e)) => {
                warn!(error = %e, code = e.error_code(), "conversation: lead payload rejected");
                out.assistant(LEAD_RETRY_MESSAGE);
            }
            Reply::Escalation => {
                info!("conversation: escalated to human agent");
                out.assistant(reply.trim());
            }
            Reply::Text(text) => out.assistant(text),
        }
    }

    /// Send `message` through the session bound to (`language`, `faqs`),
    /// rebuilding the session first when the binding changed.
    async fn chat(&self, message: &str, faqs: &[Faq], language: Language) -> Result<String, LlmError> {
        let key = SessionKey::new(language, faqs);
        let (system, mut messages) = {
            let mut slot = self.lock_session();
            let session = match slot.take() {
                Some(session) if session.key == key => session,
                stale => {
                    if let Some(old) = stale {
                        info!(from = %old.key.language, to = %language, "conversation: session binding changed");
                    }
                    let system_instruction = prompt::system_instruction(&self.config.company, language, faqs);
                    debug!(system_len = system_instruction.len(), "conversation: session created");
                    ChatSession { key, system_instruction, history: Vec::new() }
                }
            };
            let snapshot = (session.system_instruction.clone(), session.history.clone());
            *slot = Some(session);
            snapshot
        };

        messages.push(Message::user(message));
        let result = self
            .llm
            .chat(self.config.max_tokens, &system, &messages)
            .await
            .and_then(|response| {
                let text = response.text();
                if text.is_empty() { Err(LlmError::EmptyReply) } else { Ok(text) }
            });

        let mut slot = self.lock_session();
        match result {
            Ok(text) => {
                if let Some(session) = slot.as_mut().filter(|s| s.key == key) {
                    session.history.push(Message::user(message));
                    session.history.push(Message::assistant(text.clone()));
                }
                Ok(text)
            }
            Err(e) => {
                slot.take();
                Err(e)
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<ChatSession>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
