use super::*;

// =============================================================================
// Language
// =============================================================================

#[test]
fn language_codes_roundtrip() {
    for lang in Language::ALL {
        assert_eq!(Language::from_code(lang.code()), Some(lang));
        assert_eq!(lang.to_string(), lang.code());
    }
}

#[test]
fn coerce_accepts_noisy_detection_output() {
    assert_eq!(Language::coerce("es"), Language::Es);
    assert_eq!(Language::coerce("  FR\n"), Language::Fr);
    assert_eq!(Language::coerce("de."), Language::De);
    assert_eq!(Language::coerce("es-MX"), Language::Es);
}

#[test]
fn coerce_unknown_defaults_to_english() {
    assert_eq!(Language::coerce("pt"), Language::En);
    assert_eq!(Language::coerce(""), Language::En);
    assert_eq!(Language::coerce("'es'"), Language::En);
    assert_eq!(Language::coerce("日本"), Language::En);
}

#[test]
fn from_str_is_strict() {
    assert_eq!("De".parse::<Language>().unwrap(), Language::De);
    let err = "spanish".parse::<Language>().unwrap_err();
    assert!(err.to_string().contains("spanish"));
}

#[test]
fn language_serde_uses_codes() {
    assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
    let lang: Language = serde_json::from_str("\"es\"").unwrap();
    assert_eq!(lang, Language::Es);
}

#[test]
fn greetings_mention_company() {
    for lang in Language::ALL {
        assert!(lang.greeting("Acme").contains("Acme"), "{lang} greeting");
    }
    assert!(Language::Es.greeting("Zentara").starts_with("¡Hola!"));
}

#[test]
fn default_language_is_english() {
    assert_eq!(Language::default(), Language::En);
}

// =============================================================================
// ChatMessage
// =============================================================================

#[test]
fn chat_messages_get_unique_ids_and_roles() {
    let a = ChatMessage::user("hi");
    let b = ChatMessage::assistant("hello");
    assert_ne!(a.id, b.id);
    assert_eq!(a.sender, Sender::User);
    assert_eq!(b.sender, Sender::Assistant);
}

#[test]
fn chat_message_timestamp_is_hh_mm() {
    let msg = ChatMessage::user("hi");
    assert_eq!(msg.timestamp.len(), 5);
    assert_eq!(msg.timestamp.as_bytes()[2], b':');
}

#[test]
fn sender_serializes_lowercase() {
    let json = serde_json::to_value(ChatMessage::assistant("x")).unwrap();
    assert_eq!(json["sender"], "assistant");
}

// =============================================================================
// Lead / Faq
// =============================================================================

#[test]
fn lead_from_details_copies_fields_and_mints_id() {
    let details = LeadDetails {
        name: "Ana".into(),
        email: "a@x.com".into(),
        phone: "555".into(),
        interest: "SEO".into(),
    };
    let a = Lead::from_details(details.clone());
    let b = Lead::from_details(details);
    assert_eq!(a.name, "Ana");
    assert_eq!(a.email, "a@x.com");
    assert_eq!(a.phone, "555");
    assert_eq!(a.interest, "SEO");
    assert_ne!(a.id, b.id);
}

#[test]
fn faq_deserializes_without_id() {
    let faq: Faq = serde_json::from_str(r#"{"question":"Q?","answer":"A."}"#).unwrap();
    assert!(!faq.id.is_empty());
    assert_eq!(faq.question, "Q?");
}

#[test]
fn turn_event_serializes_with_tag() {
    let json = serde_json::to_value(TurnEvent::Message(ChatMessage::user("hi"))).unwrap();
    assert_eq!(json["type"], "message");
    assert_eq!(json["text"], "hi");
}
