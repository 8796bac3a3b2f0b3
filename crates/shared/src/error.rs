use serde_json::Value;

/// Reads the `error` member of a response envelope.
///
/// Absent, `null`, `false` and empty strings do not count as an error. Any other
/// non-string value is reported through its JSON text.
pub fn envelope_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

/// Reads a non-empty `redirect_url` member of a response envelope.
pub fn envelope_redirect(body: &Value) -> Option<&str> {
    body.get("redirect_url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}
