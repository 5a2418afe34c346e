#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use lmnotes_api_types::HistoryEntry;
use strum_macros::{Display, EnumString};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Set only on failure notices synthesized by the client.
    pub is_error: bool,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    pub fn user(content: &str) -> Message {
        Message::new(Role::User, content)
    }

    pub fn assistant(content: &str) -> Message {
        Message::new(Role::Assistant, content)
    }

    /// Failure notice shown in place of an answer.
    pub fn error(detail: &str) -> Message {
        Message {
            is_error: true,
            ..Message::assistant(&format!("**Failed to get an answer:** {detail}"))
        }
    }

    /// Map a server history entry. Unknown roles yield `None`; a missing or
    /// unreadable timestamp becomes `now`.
    pub fn from_history(entry: &HistoryEntry, now: DateTime<Utc>) -> Option<Message> {
        let role = Role::from_str(entry.role.trim()).ok()?;
        let timestamp = entry
            .timestamp
            .as_ref()
            .and_then(|ts| ts.to_datetime())
            .unwrap_or(now);

        Some(Message {
            role,
            content: entry.content.clone(),
            timestamp,
            is_error: false,
        })
    }

    pub fn is_user_with(&self, content: &str) -> bool {
        self.role == Role::User && !self.is_error && self.content == content
    }

    pub fn is_assistant_with(&self, content: &str) -> bool {
        self.role == Role::Assistant && self.content == content
    }
}
