//! Editable knowledge base the receptionist answers from.

use crate::error::ErrorCode;
use crate::types::Faq;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("question and answer must both be non-empty")]
    Blank,
    #[error("faq not found: {0}")]
    NotFound(String),
    #[error("faq {0} has a blank question or answer")]
    BlankEntry(String),
}

impl ErrorCode for KnowledgeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Blank | Self::BlankEntry(_) => "E_FAQ_BLANK",
            Self::NotFound(_) => "E_FAQ_NOT_FOUND",
        }
    }
}

/// Ordered FAQ list. Order is preserved in the model's grounding context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeBase {
    faqs: Vec<Faq>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn new(faqs: Vec<Faq>) -> Self {
        Self { faqs }
    }

    /// Build from externally supplied entries, holding them to the same
    /// rules as [`Self::add`].
    ///
    /// # Errors
    ///
    /// [`KnowledgeError::BlankEntry`] naming the first entry with a blank
    /// question or answer.
    pub fn from_faqs(faqs: Vec<Faq>) -> Result<Self, KnowledgeError> {
        if let Some(faq) = faqs.iter().find(|f| is_blank(&f.question, &f.answer)) {
            return Err(KnowledgeError::BlankEntry(faq.id.clone()));
        }
        Ok(Self::new(faqs))
    }

    /// The starter FAQs a new workspace ships with.
    #[must_use]
    pub fn with_defaults() -> Self {
        let seed = [
            (
                "faq1",
                "What services do you offer?",
                "We offer Web Design Packages, SEO Services, and a Social Media Management service.",
            ),
            (
                "faq2",
                "What are your prices?",
                "Our Web Design packages start at $200. SEO services are $150/month. Social Media Management is \
                 $100/month.",
            ),
            (
                "faq3",
                "Can I pay in installments?",
                "Absolutely — we offer 50% upfront and the rest in 2 installments for projects over $500.",
            ),
            ("faq4", "What are your business hours?", "We are open Monday to Friday, from 9 AM to 6 PM."),
        ];
        Self::new(
            seed.into_iter()
                .map(|(id, question, answer)| Faq { id: id.into(), question: question.into(), answer: answer.into() })
                .collect(),
        )
    }

    /// Snapshot handed to the orchestrator for one turn.
    #[must_use]
    pub fn faqs(&self) -> &[Faq] {
        &self.faqs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faqs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faqs.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Faq> {
        self.faqs.iter().find(|f| f.id == id)
    }

    /// Append a new entry and return its id.
    ///
    /// # Errors
    ///
    /// [`KnowledgeError::Blank`] when either field is blank.
    pub fn add(&mut self, question: &str, answer: &str) -> Result<String, KnowledgeError> {
        if is_blank(question, answer) {
            return Err(KnowledgeError::Blank);
        }
        let faq = Faq::new(question, answer);
        let id = faq.id.clone();
        self.faqs.push(faq);
        Ok(id)
    }

    /// Replace an entry's text in place, keeping its position.
    ///
    /// # Errors
    ///
    /// [`KnowledgeError::Blank`] when either field is blank,
    /// [`KnowledgeError::NotFound`] for an unknown id.
    pub fn update(&mut self, id: &str, question: &str, answer: &str) -> Result<(), KnowledgeError> {
        if is_blank(question, answer) {
            return Err(KnowledgeError::Blank);
        }
        let faq = self
            .faqs
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
        faq.question = question.to_string();
        faq.answer = answer.to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// [`KnowledgeError::NotFound`] for an unknown id.
    pub fn remove(&mut self, id: &str) -> Result<Faq, KnowledgeError> {
        let idx = self
            .faqs
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| KnowledgeError::NotFound(id.to_string()))?;
        Ok(self.faqs.remove(idx))
    }
}

fn is_blank(question: &str, answer: &str) -> bool {
    question.trim().is_empty() || answer.trim().is_empty()
}

#[cfg(test)]
#[path = "knowledge_test.rs"]
mod tests;
