use serde_json::Value;

/// Pulls the reply text out of a `generateContent` response.
///
/// Tries `candidates[0].content.parts[0].text` first, then the accessor-style
/// fallbacks (a top-level `text`, or every text part of the first candidate
/// joined). When nothing yields text the whole response is returned as
/// pretty-printed JSON so the caller still sees what came back.
pub fn extract_text(response: &Value) -> String {
    if let Some(text) = primary_text(response) {
        return text.to_string();
    }
    if let Some(text) = accessor_text(response) {
        return text;
    }
    serde_json::to_string_pretty(response).unwrap_or_else(|_| response.to_string())
}

fn primary_text(response: &Value) -> Option<&str> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn accessor_text(response: &Value) -> Option<String> {
    if let Some(text) = response.get("text").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let joined: String = response
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if joined.is_empty() { None } else { Some(joined) }
}
