//! Note CRUD and similarity search bodies.

use serde::{Deserialize, Serialize};

/// Title shown for notes and sources that arrive without one.
pub const UNTITLED_NOTE: &str = "Untitled";

/// A stored note as returned by the list, get, create and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of a create or update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePayload {
    pub title: String,
    pub description: String,
}

impl NotePayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Note metadata attached to a scored search hit or answer source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A note ranked by similarity, used both for search results and for the
/// sources backing an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub similarity: f64,
    #[serde(default)]
    pub metadata: SourceMetadata,
}

/// Search results share the source shape.
pub type SearchHit = Source;

impl Source {
    pub fn display_title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or(UNTITLED_NOTE)
    }

    pub fn description(&self) -> &str {
        self.metadata.description.as_deref().unwrap_or_default()
    }
}

/// Query string of the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: u32,
    pub threshold: f64,
}
