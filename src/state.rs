//! Dashboard state — everything the rendering surface displays.
//!
//! DESIGN
//! ======
//! `Dashboard` owns the transcript, lead list, knowledge base, and active
//! language, and feeds a snapshot of them to the orchestrator for each
//! turn. Orchestrator events are the only way turns touch this state, and
//! they only ever append.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::knowledge::KnowledgeBase;
use crate::services::conversation::{Orchestrator, TurnError};
use crate::types::{ChatMessage, Language, Lead, LeadDetails, TurnEvent};

/// Number of leads shown on the overview card.
pub const RECENT_LEADS: usize = 4;

/// Headline numbers for the overview panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_leads: usize,
    pub total_faqs: usize,
    pub recent_leads: Vec<Lead>,
    /// A turn is still being answered.
    pub loading: bool,
}

pub struct Dashboard {
    orchestrator: Arc<Orchestrator>,
    language: Language,
    transcript: Vec<ChatMessage>,
    leads: Vec<Lead>,
    knowledge: KnowledgeBase,
}

impl Dashboard {
    /// A fresh dashboard with the starter knowledge base and sample leads.
    #[must_use]
    pub fn new(orchestrator: Arc<Orchestrator>, language: Language) -> Self {
        let mut dashboard = Self {
            orchestrator,
            language,
            transcript: Vec::new(),
            leads: sample_leads(),
            knowledge: KnowledgeBase::with_defaults(),
        };
        dashboard.reset_transcript();
        dashboard
    }

    #[must_use]
    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Switch the conversation language. The transcript restarts with the
    /// new greeting; the model session rebinds on the next turn.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.language = language;
        self.reset_transcript();
    }

    #[must_use]
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge
    }

    /// `true` while a turn is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.orchestrator.is_busy()
    }

    pub fn apply(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::Message(message) => self.transcript.push(message),
            TurnEvent::LeadCreated(lead) => self.leads.push(lead),
        }
    }

    /// Run one user turn against the current knowledge base and language.
    ///
    /// # Errors
    ///
    /// Propagates [`TurnError`] for blank input or a turn already running.
    pub async fn submit(&mut self, utterance: &str) -> Result<Vec<TurnEvent>, TurnError> {
        let events = self
            .orchestrator
            .handle_user_message(utterance, self.knowledge.faqs(), self.language)
            .await?;
        for event in &events {
            self.apply(event.clone());
        }
        Ok(events)
    }

    /// Like [`Self::submit`], streaming each event to `sink` as it happens.
    ///
    /// # Errors
    ///
    /// Propagates [`TurnError`] for blank input or a turn already running.
    pub async fn submit_streaming(
        &mut self,
        utterance: &str,
        sink: &mpsc::UnboundedSender<TurnEvent>,
    ) -> Result<Vec<TurnEvent>, TurnError> {
        let events = self
            .orchestrator
            .stream_user_message(utterance, self.knowledge.faqs(), self.language, sink)
            .await?;
        for event in &events {
            self.apply(event.clone());
        }
        Ok(events)
    }

    /// Up to `n` leads, newest first.
    #[must_use]
    pub fn recent_leads(&self, n: usize) -> Vec<Lead> {
        self.leads.iter().rev().take(n).cloned().collect()
    }

    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            total_leads: self.leads.len(),
            total_faqs: self.knowledge.len(),
            recent_leads: self.recent_leads(RECENT_LEADS),
            loading: self.is_loading(),
        }
    }

    fn reset_transcript(&mut self) {
        let greeting = self.language.greeting(&self.orchestrator.config().company);
        self.transcript = vec![ChatMessage::assistant(greeting)];
    }
}

fn sample_leads() -> Vec<Lead> {
    [
        ("John Doe", "john.doe@example.com", "123-456-7890", "Web Design Package"),
        ("Jane Smith", "jane.smith@example.com", "098-765-4321", "SEO Services"),
    ]
    .into_iter()
    .map(|(name, email, phone, interest)| {
        Lead::from_details(LeadDetails {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            interest: interest.into(),
        })
    })
    .collect()
}


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
