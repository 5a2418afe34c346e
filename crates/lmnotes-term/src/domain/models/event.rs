use lmnotes_api_types::{AskResponse, Note, SearchHit};
use lmnotes_client::ApiError;

#[derive(Debug)]
pub enum Event {
    Input(String),
    EndOfInput,
    AskCompleted {
        ticket_id: u64,
        result: Result<AskResponse, ApiError>,
    },
    NotesLoaded(Result<Vec<Note>, ApiError>),
    NoteLoaded(Result<Note, ApiError>),
    NoteSaved(Result<Note, ApiError>),
    NoteDeleted {
        id: String,
        result: Result<(), ApiError>,
    },
    SearchCompleted {
        query: String,
        result: Result<Vec<SearchHit>, ApiError>,
    },
}
