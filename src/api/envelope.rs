//! One place that knows the shapes the backend answers with.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub const SERVER_ERROR: &str = "Server error. Please try again later.";

/// List endpoints answer either with a bare array or a paginated object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Paginated {
        #[serde(default)]
        next: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Paginated { results, .. } => results,
            ListEnvelope::Plain(items) => items,
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self, ListEnvelope::Paginated { next: Some(_), .. })
    }
}

pub fn parse_list<T: DeserializeOwned>(body: &[u8]) -> serde_json::Result<Vec<T>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    serde_json::from_slice::<ListEnvelope<T>>(body).map(ListEnvelope::into_vec)
}

/// Pull a human message out of an error body: `detail`, then `message`,
/// then `error`. Each may be a string or a list of strings. Falls back to
/// the first field of a validation-error map, then to a generic message.
pub fn error_message(body: &[u8]) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return SERVER_ERROR.to_string();
    };

    for key in ["detail", "message", "error"] {
        if let Some(msg) = value.get(key).and_then(text_of) {
            return msg;
        }
    }

    if let Some(msg) = value.as_array().and_then(|_| text_of(&value)) {
        return msg;
    }

    if let Some(map) = value.as_object()
        && let Some(msg) = map.values().find_map(text_of)
    {
        return msg;
    }

    SERVER_ERROR.to_string()
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(text_of),
        _ => None,
    }
}
