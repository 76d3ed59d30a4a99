use serde_json::{Map, Value};

/// Keep the first `max_chars` characters, marking the cut with `...`.
pub fn truncate_end(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

/// Last `/`-separated segment of a path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

/// Text of an input field, treating null, false, zero and "" as absent.
pub fn field_text(input: &Map<String, Value>, key: &str) -> Option<String> {
    match input.get(key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Pretty JSON for the detail pane.
pub fn pretty_json(input: &Map<String, Value>) -> String {
    serde_json::to_string_pretty(input).unwrap_or_else(|_| "{}".to_string())
}
