use super::*;
use crate::state::test_helpers::{MockLlm, fail, ok};

#[tokio::test]
async fn detect_maps_reply_to_language() {
    let llm = MockLlm::replying(&[" ES\n"]);
    assert_eq!(detect_language(&llm, None, "hola").await, Language::Es);

    let calls = llm.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_detect());
    assert!(calls[0].prompt().contains("\"hola\""));
}

#[tokio::test]
async fn detect_unknown_code_is_english() {
    let llm = MockLlm::replying(&["pt"]);
    assert_eq!(detect_language(&llm, None, "olá").await, Language::En);
}

#[tokio::test]
async fn detect_failure_is_english() {
    let llm = MockLlm::new(vec![fail()]);
    assert_eq!(detect_language(&llm, None, "bonjour").await, Language::En);
}

#[tokio::test]
async fn translate_returns_model_text() {
    let llm = MockLlm::new(vec![ok("What are your prices?")]);
    let out = translate_text(&llm, None, "¿Cuáles son sus precios?", Language::En, Some(Language::Es)).await;
    assert_eq!(out, "What are your prices?");

    let calls = llm.calls();
    assert!(calls[0].is_translate());
    assert!(calls[0].prompt().contains("from Spanish to English"));
}

#[tokio::test]
async fn translate_failure_passes_text_through() {
    let llm = MockLlm::new(vec![fail()]);
    let out = translate_text(&llm, None, "Guten Tag", Language::En, None).await;
    assert_eq!(out, "Guten Tag");
}

#[tokio::test]
async fn translate_empty_reply_passes_text_through() {
    let llm = MockLlm::replying(&["   "]);
    let out = translate_text(&llm, None, "Guten Tag", Language::En, Some(Language::De)).await;
    assert_eq!(out, "Guten Tag");
}
