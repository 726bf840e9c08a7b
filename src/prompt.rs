//! Prompt templates for the receptionist.
//!
//! DESIGN
//! ======
//! The system instruction is rebuilt whenever the chat session is rebuilt,
//! so it always embeds the current knowledge base and reply language.
//! Translation and detection prompts are one-shot and carry no system
//! instruction.

use std::fmt::Write;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::sentinel::{ESCALATION_MESSAGE, LEAD_PREFIX};
use crate::types::{Faq, Language, Lead};

// =============================================================================
// KNOWLEDGE BASE
// =============================================================================

/// Render FAQs as `Q:`/`A:` pairs separated by blank lines.
#[must_use]
pub fn render_faqs(faqs: &[Faq]) -> String {
    faqs.iter()
        .map(|f| format!("Q: {}\nA: {}", f.question, f.answer))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Order-sensitive fingerprint of the knowledge base as the model sees it.
#[must_use]
pub fn faq_fingerprint(faqs: &[Faq]) -> u64 {
    let mut hasher = DefaultHasher::new();
    render_faqs(faqs).hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// SYSTEM INSTRUCTION
// =============================================================================

#[must_use]
pub fn system_instruction(company: &str, language: Language, faqs: &[Faq]) -> String {
    let lang = language.english_name();
    let mut prompt = format!(
        "You are an expert AI WhatsApp receptionist for a company called '{company}'. Your primary goals are to be \
         friendly, helpful, answer customer questions based on the provided knowledge base, capture lead \
         information, and escalate to a human when necessary.\n\n"
    );

    prompt.push_str("**Your Persona & Rules:**\n");
    let _ = writeln!(
        prompt,
        "1. **Language:** You MUST respond exclusively in the following language: {lang}. All your responses \
         must be in {lang}."
    );
    prompt.push_str(
        "2. **Be Sophisticated & Professional:** Your tone should be confident, elegant, and professional, yet \
         friendly and approachable. Start with a warm greeting. Avoid slang. Use emojis very sparingly.\n\
         3. **Use the Knowledge Base:** ONLY answer questions based on the following FAQs. If a question is \
         outside this scope, politely state that you don't have the information and ask if you can help with \
         anything else. Do not make up answers.\n\
         4. **Lead Capture Goal:** Proactively try to collect the user's name, email, phone number, and which \
         service they are interested in.\n",
    );
    let _ = writeln!(
        prompt,
        "5. **LEAD_CAPTURE_FORMAT:** When you have successfully gathered a user's name, email, phone number, and \
         their service of interest, you MUST respond ONLY with a single line in the following strict JSON \
         format. Do not add any conversational text before or after it:\n   \
         `{LEAD_PREFIX}{{\"name\":\"<user_name>\",\"email\":\"<user_email>\",\"phone\":\"<user_phone>\",\
         \"interest\":\"<service_of_interest>\"}}`"
    );
    prompt.push_str(
        "6. **Multi-turn Conversation:** Remember the context of the conversation. If a user asks a follow-up \
         question, answer it naturally based on previous messages.\n\
         7. **Keep it Concise:** Provide clear and brief answers, like a real chat assistant. Use short \
         paragraphs.\n",
    );
    let _ = writeln!(
        prompt,
        "8. **Escalation:** If a user expresses significant frustration, has a complex technical issue, or asks \
         a question you cannot answer with the knowledge base twice, you MUST escalate. Respond ONLY with this \
         exact message: \"{ESCALATION_MESSAGE}\""
    );

    prompt.push_str("\n**Knowledge Base (FAQs):**\n---\n");
    if faqs.is_empty() {
        prompt.push_str("(no FAQs configured)");
    } else {
        prompt.push_str(&render_faqs(faqs));
    }
    prompt.push_str("\n---\n");
    prompt
}

// =============================================================================
// ONE-SHOT PROMPTS
// =============================================================================

#[must_use]
pub fn translate_prompt(text: &str, to: Language, from: Option<Language>) -> String {
    let source = from.map(|l| format!("from {} ", l.english_name())).unwrap_or_default();
    format!(
        "Translate the following text {source}to {}. Respond with only the translated text, nothing else.\n\n\
         Text: \"{text}\"",
        to.english_name()
    )
}

#[must_use]
pub fn detect_prompt(text: &str) -> String {
    format!(
        "Detect the language of the following text and respond with only the two-letter ISO 639-1 code \
         (e.g., 'en', 'es', 'fr', 'de'). If you are unsure, default to 'en'.\n\nText: \"{text}\""
    )
}

/// English confirmation shown after a lead is saved.
#[must_use]
pub fn lead_confirmation(lead: &Lead) -> String {
    format!(
        "Great! I've saved your information for {}. A representative will contact you shortly regarding your \
         interest in {}. Is there anything else I can help with?",
        lead.name, lead.interest
    )
}

#[cfg(test)]
#[path = "prompt_test.rs"]
mod tests;
