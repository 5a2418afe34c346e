//! Client SDK for the lmnotes notes service.
//!
//! Everything the terminal client needs from the server goes through the
//! [`NotesApi`] trait: note CRUD, similarity search and the conversational ask
//! endpoint. [`HttpNotesClient`] talks JSON over HTTP; tests substitute their
//! own implementations.

use async_trait::async_trait;
use lmnotes_api_types::{AskRequest, AskResponse, Note, NotePayload, SearchHit, SearchQuery};

pub mod error;
pub mod http_client;

pub use error::*;
pub use http_client::HttpNotesClient;

/// Operations offered by the notes service.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// Ask a question, continuing `request.session_id` when present.
    async fn ask(&self, request: AskRequest) -> Result<AskResponse, ApiError>;

    /// All notes, in the order the server stores them.
    async fn list_notes(&self) -> Result<Vec<Note>, ApiError>;

    async fn get_note(&self, id: &str) -> Result<Note, ApiError>;

    async fn create_note(&self, payload: NotePayload) -> Result<Note, ApiError>;

    async fn update_note(&self, id: &str, payload: NotePayload) -> Result<Note, ApiError>;

    async fn delete_note(&self, id: &str) -> Result<(), ApiError>;

    /// Similarity search over notes, best match first.
    async fn search(&self, query: SearchQuery) -> Result<Vec<SearchHit>, ApiError>;
}

pub type NotesApiBox = Box<dyn NotesApi>;

/// Factory for creating NotesApi instances
pub struct NotesApiFactory;

impl NotesApiFactory {
    /// Create an HTTP client for the service at `base_url`
    pub fn create_http_client(
        base_url: &str,
        timeout: std::time::Duration,
    ) -> anyhow::Result<NotesApiBox> {
        Ok(Box::new(
            HttpNotesClient::new(base_url)?.with_timeout(timeout),
        ))
    }
}
