use crate::flow::Headers;
use itertools::Itertools;

const DEFAULT_HEADERS: [(&str, &str); 1] = [("Content-Type", "application/json")];

/// Parses free-text headers.
///
/// The text is first read as a JSON object. If it is not valid JSON it is read as
/// newline-separated `key: value` lines; the first colon splits key from value
/// and both are trimmed. Lines without a colon or with an empty key are skipped.
pub fn parse_headers(text: &str) -> Vec<(String, String)> {
    if let Ok(object) = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(text) {
        return object
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect();
    }

    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Merges user headers over the default `Content-Type: application/json`.
/// Header names compare case-insensitively and the user's value wins.
pub fn merge_headers(headers: &Headers) -> Vec<(String, String)> {
    let user = match headers {
        Headers::Text(text) => parse_headers(text),
        Headers::Map(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
    };

    DEFAULT_HEADERS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .chain(user)
        .rev()
        .unique_by(|(key, _)| key.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect()
}
