use lmnotes_api_types::{NotePayload, SearchQuery};

use crate::domain::services::AskTicket;

/// Network work requested by the app state and carried out by the actions
/// worker.
#[derive(Debug, Clone)]
pub enum Action {
    Ask(AskTicket),
    LoadNotes,
    OpenNote(String),
    SaveNote(Option<String>, NotePayload),
    DeleteNote(String),
    Search(SearchQuery),
}
