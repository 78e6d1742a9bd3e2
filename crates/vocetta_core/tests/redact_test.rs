use serde_json::json;
use vocetta_core::redact_context;

#[test]
fn secret_shaped_keys_redacted() {
    let context = json!({
        "api_key": "sk-123456",
        "apiKey": "sk-abcdef",
        "AUTHORIZATION": "Bearer sk-xyz",
        "client_secret": "hunter2",
        "session_token": "tok_1",
        "password": "pw",
        "port": 3000,
        "upstream_url": "https://api.openai.com/v1/audio/speech",
    });

    let redacted = redact_context(context);
    assert_eq!(redacted["api_key"], "[REDACTED]");
    assert_eq!(redacted["apiKey"], "[REDACTED]");
    assert_eq!(redacted["AUTHORIZATION"], "[REDACTED]");
    assert_eq!(redacted["client_secret"], "[REDACTED]");
    assert_eq!(redacted["session_token"], "[REDACTED]");
    assert_eq!(redacted["password"], "[REDACTED]");

    // Non-secret values untouched
    assert_eq!(redacted["port"], 3000);
    assert_eq!(
        redacted["upstream_url"],
        "https://api.openai.com/v1/audio/speech"
    );
}

#[test]
fn nested_objects_walked() {
    let context = json!({
        "upstream": {
            "api_key": "sk-123",
            "model": "gpt-4o-mini-tts",
        },
    });

    let redacted = redact_context(context);
    assert_eq!(redacted["upstream"]["api_key"], "[REDACTED]");
    assert_eq!(redacted["upstream"]["model"], "gpt-4o-mini-tts");
}

#[test]
fn scalars_pass_through() {
    assert_eq!(redact_context(json!("plain")), json!("plain"));
    assert_eq!(redact_context(json!(42)), json!(42));
}
