//! Bodies of the conversational ask endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::Source;

/// Request sent to `POST /ask/`. `session_id` is always serialized, as `null`
/// for a new conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
    pub session_id: Option<String>,
}

impl AskRequest {
    pub fn new(question: String, session_id: Option<String>) -> Self {
        Self {
            question,
            session_id,
        }
    }
}

/// Timestamp of a history entry. The service emits epoch seconds, but
/// RFC 3339 strings are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryTimestamp {
    Epoch(f64),
    Text(String),
}

impl HistoryTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            HistoryTimestamp::Epoch(secs) => {
                if !secs.is_finite() {
                    return None;
                }
                let whole = secs.floor();
                let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
                DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
            }
            HistoryTimestamp::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        }
    }
}

/// One entry of the server-authoritative conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<HistoryTimestamp>,
}

/// A timestamp of any other shape is dropped instead of failing the response.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<HistoryTimestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Response of `POST /ask/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Option<Vec<Source>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_history: Option<Vec<HistoryEntry>>,
}

impl AskResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            sources: None,
            session_id: None,
            message_history: None,
        }
    }

    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }
}
