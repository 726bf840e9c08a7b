use super::*;

fn make_response(parts: serde_json::Value, finish_reason: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": finish_reason,
            "index": 0
        }],
        "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 12, "totalTokenCount": 132 },
        "modelVersion": "gemini-2.5-flash"
    })
    .to_string()
}

// =============================================================================
// parse_generate_content_response
// =============================================================================

#[test]
fn parse_text_response() {
    let json = make_response(serde_json::json!([{ "text": "Our Web Design packages start at $200." }]), "STOP");
    let resp = parse_generate_content_response(&json, "gemini-2.5-flash").unwrap();
    assert_eq!(resp.text(), "Our Web Design packages start at $200.");
    assert_eq!(resp.model, "gemini-2.5-flash");
    assert_eq!(resp.finish, FinishReason::Stop);
    assert_eq!(resp.usage, Usage { prompt_tokens: 120, reply_tokens: 12 });
}

#[test]
fn parse_joins_multiple_parts() {
    let json = make_response(serde_json::json!([{ "text": "Hola, " }, { "text": "¿cómo estás?" }]), "STOP");
    let resp = parse_generate_content_response(&json, "m").unwrap();
    assert_eq!(resp.parts.len(), 2);
    assert_eq!(resp.text(), "Hola, ¿cómo estás?");
}

#[test]
fn parse_thought_parts_become_thinking() {
    let json = make_response(
        serde_json::json!([{ "text": "reasoning...", "thought": true }, { "text": "es" }]),
        "STOP",
    );
    let resp = parse_generate_content_response(&json, "m").unwrap();
    assert_eq!(resp.parts[0], Part::Thought("reasoning...".into()));
    assert_eq!(resp.text(), "es");
}

#[test]
fn parse_max_tokens_finish_reason() {
    let json = make_response(serde_json::json!([{ "text": "partial" }]), "MAX_TOKENS");
    let resp = parse_generate_content_response(&json, "m").unwrap();
    assert_eq!(resp.finish, FinishReason::MaxTokens);
    assert_eq!(resp.text(), "partial");
}

#[test]
fn parse_max_tokens_without_text_is_truncated() {
    let json = make_response(serde_json::json!([]), "MAX_TOKENS");
    let err = parse_generate_content_response(&json, "m").unwrap_err();
    assert!(matches!(err, LlmError::Truncated));
    assert_eq!(err.error_code(), "E_REPLY_TRUNCATED");
}

#[test]
fn parse_max_tokens_spent_on_thoughts_is_truncated() {
    let json = make_response(serde_json::json!([{ "text": "weighing the FAQ entries...", "thought": true }]), "MAX_TOKENS");
    assert!(matches!(parse_generate_content_response(&json, "m"), Err(LlmError::Truncated)));
}

#[test]
fn parse_safety_finish_reason_lowercased() {
    let json = make_response(serde_json::json!([]), "SAFETY");
    let resp = parse_generate_content_response(&json, "m").unwrap();
    assert_eq!(resp.finish, FinishReason::Other("safety".into()));
    assert!(resp.text().is_empty());
}

#[test]
fn parse_falls_back_to_requested_model() {
    let json = serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": "hi" }] } }]
    })
    .to_string();
    let resp = parse_generate_content_response(&json, "gemini-2.5-pro").unwrap();
    assert_eq!(resp.model, "gemini-2.5-pro");
    assert_eq!(resp.finish, FinishReason::Stop);
    assert_eq!(resp.usage, Usage::default());
}

#[test]
fn parse_blocked_prompt_errors() {
    let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    let err = parse_generate_content_response(&json, "m").unwrap_err();
    assert!(matches!(err, LlmError::Blocked { ref reason } if reason == "SAFETY"));
}

#[test]
fn parse_missing_candidates_errors() {
    let err = parse_generate_content_response("{}", "m").unwrap_err();
    assert!(matches!(err, LlmError::Decode(ref msg) if msg.contains("missing candidates")));
}

#[test]
fn parse_invalid_json() {
    assert!(matches!(parse_generate_content_response("nope", "m"), Err(LlmError::Decode(_))));
}

// =============================================================================
// build_request
// =============================================================================

#[test]
fn request_maps_roles_and_system_instruction() {
    let history = [Message::user("hi"), Message::assistant("hello"), Message::user("prices?")];
    let body = build_request(Some(256), "You are a receptionist.", &history);
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are a receptionist.");
    assert!(json["systemInstruction"].get("role").is_none());
    assert_eq!(json["contents"][0]["role"], "user");
    assert_eq!(json["contents"][1]["role"], "model");
    assert_eq!(json["contents"][2]["parts"][0]["text"], "prices?");
    assert_eq!(json["generationConfig"]["maxOutputTokens"], 256);
}

#[test]
fn request_omits_blank_system_instruction() {
    let history = [Message::user("Translate this")];
    let body = build_request(None, "", &history);
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("systemInstruction").is_none());
    assert!(json.get("generationConfig").is_none());
    assert_eq!(json["contents"].as_array().map(Vec::len), Some(1));
}
