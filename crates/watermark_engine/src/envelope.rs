//! Response envelopes of the batch endpoints.
//!
//! Success bodies decode into typed envelopes. Error bodies are resolved once,
//! here, into a single display string so callers never inspect their shape.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbedItem {
    pub filename: String,
    pub download_url: String,
    pub rms: f64,
    pub si_snr: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EmbedEnvelope {
    pub results: Vec<EmbedItem>,
    #[serde(default)]
    pub zip_download_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectItem {
    pub filename: String,
    pub probability: f64,
    pub is_watermarked: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectEnvelope {
    pub results: Vec<DetectItem>,
}

/// One entry of a validation-style `detail` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}

/// Payload of a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorEnvelope {
    /// `detail` was a string.
    Message(String),
    /// `detail` was an array of `{loc, msg}` entries.
    FieldErrors(Vec<FieldError>),
    /// Anything else; rendered as JSON.
    Opaque(Value),
}

impl ErrorEnvelope {
    /// Returns `None` when the body is not JSON, or is JSON without structure.
    pub fn decode(body: &[u8]) -> Option<Self> {
        let payload: Value = serde_json::from_slice(body).ok()?;
        if !(payload.is_object() || payload.is_array()) {
            return None;
        }
        Some(Self::from_payload(payload))
    }

    fn from_payload(payload: Value) -> Self {
        match payload.get("detail") {
            Some(Value::String(text)) if !text.is_empty() => ErrorEnvelope::Message(text.clone()),
            Some(Value::Array(entries))
                if entries
                    .first()
                    .and_then(|entry| entry.get("msg"))
                    .is_some_and(is_truthy) =>
            {
                ErrorEnvelope::FieldErrors(entries.iter().map(FieldError::from_entry).collect())
            }
            Some(detail) if is_truthy(detail) => ErrorEnvelope::Opaque(detail.clone()),
            _ => ErrorEnvelope::Opaque(payload),
        }
    }

    /// Display text, or `None` if the payload cannot be rendered.
    pub fn message(&self) -> Option<String> {
        match self {
            ErrorEnvelope::Message(text) => Some(text.clone()),
            ErrorEnvelope::FieldErrors(errors) => Some(
                errors
                    .iter()
                    .map(|error| format!("{}: {}", error.path.join("."), error.message))
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
            ErrorEnvelope::Opaque(value) => serde_json::to_string(value).ok(),
        }
    }
}

impl FieldError {
    fn from_entry(entry: &Value) -> Self {
        let path = match entry.get("loc") {
            Some(Value::Array(parts)) => parts.iter().map(value_text).collect(),
            _ => vec!["unknown".to_string()],
        };
        let message = match entry.get("msg") {
            Some(msg) if is_truthy(msg) => value_text(msg),
            _ => "Unknown error".to_string(),
        };
        Self { path, message }
    }
}

/// Resolves the final failure message for a non-2xx response.
pub fn describe_failure(envelope: Option<&ErrorEnvelope>, status: u16) -> String {
    envelope
        .and_then(ErrorEnvelope::message)
        .unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
