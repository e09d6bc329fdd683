//! Normalized `(status, body)` result handed back to callers.
//!
//! # Design
//! The service answers with JSON on success and with HTML pages on most
//! failures. Bodies that do not parse as JSON are kept verbatim as text so a
//! failing assertion still shows what the server said.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;

/// Parsed response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parse `raw` as JSON, falling back to the raw text.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return ResponseBody::Text(raw.to_string());
        }
        match serde_json::from_str(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw.to_string()),
        }
    }

    /// Membership check: key presence for JSON objects, substring presence
    /// for everything else.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            ResponseBody::Json(Value::Object(map)) => map.contains_key(needle),
            ResponseBody::Json(Value::String(text)) => text.contains(needle),
            ResponseBody::Json(other) => other.to_string().contains(needle),
            ResponseBody::Text(text) => text.contains(needle),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }

    /// Field lookup on a JSON object body.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_json().and_then(|value| value.get(field))
    }
}

/// Coarse classification of the status codes the service is known to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Forbidden,
    NotFound,
    ServerError,
    Other(u16),
}

impl From<u16> for StatusClass {
    fn from(status: u16) -> Self {
        match status {
            200..=299 => StatusClass::Success,
            403 => StatusClass::Forbidden,
            404 => StatusClass::NotFound,
            500..=599 => StatusClass::ServerError,
            other => StatusClass::Other(other),
        }
    }
}

/// Outcome of one API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: u16, raw_body: &str) -> Self {
        Self {
            status,
            body: ResponseBody::parse(raw_body),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.class(), StatusClass::Success)
    }

    pub fn class(&self) -> StatusClass {
        StatusClass::from(self.status)
    }

    /// Deserialize a JSON body into `T`.
    ///
    /// Does not look at the status; a 200 with an unexpected shape and a 403
    /// HTML page both fail with `ClientError::Decode`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match &self.body {
            ResponseBody::Json(value) => {
                serde_json::from_value(value.clone()).map_err(|e| ClientError::Decode(e.to_string()))
            }
            ResponseBody::Text(text) => Err(ClientError::Decode(format!(
                "HTTP {} body is not JSON: {}",
                self.status,
                preview(text)
            ))),
        }
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
