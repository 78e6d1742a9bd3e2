//! Redaction of secret-shaped values in log context.

use serde_json::Value;

/// Key fragments whose values are never logged.
const SENSITIVE_KEY_TOKENS: [&str; 5] = ["key", "secret", "password", "token", "authorization"];

/// Replace secret-shaped values in a JSON context with `"[REDACTED]"`.
///
/// A value is secret-shaped when its key contains any of the sensitive
/// fragments, case-insensitively ("apiKey", "AUTH_TOKEN", ...). Nested
/// objects are walked; everything else passes through unchanged. Intended
/// for configuration summaries and structured log context, not payloads.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vocetta_core::redact_context;
///
/// let context = json!({"api_key": "sk-1234", "port": 3000});
/// let redacted = redact_context(context);
/// assert_eq!(redacted["api_key"], "[REDACTED]");
/// assert_eq!(redacted["port"], 3000);
/// ```
pub fn redact_context(context: Value) -> Value {
    match context {
        Value::Object(map) => {
            let redacted = map
                .into_iter()
                .map(|(key, value)| {
                    let lowered = key.to_lowercase();
                    if SENSITIVE_KEY_TOKENS.iter().any(|t| lowered.contains(t)) {
                        (key, Value::String("[REDACTED]".to_string()))
                    } else {
                        (key, redact_context(value))
                    }
                })
                .collect();
            Value::Object(redacted)
        }
        other => other,
    }
}
