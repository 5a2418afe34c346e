use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use lmnotes_api_types::{
    AskRequest, AskResponse, Note, NotePayload, SearchHit, SearchQuery, Source, SourceMetadata,
};
use lmnotes_client::{ApiError, NotesApi};

/// NotesApi double that replays queued ask results and records requests.
#[derive(Default)]
pub struct ScriptedNotesApi {
    pub ask_results: Mutex<VecDeque<Result<AskResponse, ApiError>>>,
    pub ask_requests: Mutex<Vec<AskRequest>>,
    pub notes: Mutex<Vec<Note>>,
}

impl ScriptedNotesApi {
    pub fn with_asks(results: Vec<Result<AskResponse, ApiError>>) -> ScriptedNotesApi {
        ScriptedNotesApi {
            ask_results: Mutex::new(results.into()),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<AskRequest> {
        self.ask_requests.lock().unwrap().clone()
    }
}

pub fn server_error(detail: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        detail: detail.to_string(),
    }
}

pub fn source(id: &str, title: &str) -> Source {
    Source {
        id: id.to_string(),
        similarity: 0.8,
        metadata: SourceMetadata {
            title: Some(title.to_string()),
            description: Some(format!("{title} body")),
        },
    }
}

pub fn note(id: &str, title: &str) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} body"),
    }
}

#[async_trait]
impl NotesApi for ScriptedNotesApi {
    async fn ask(&self, request: AskRequest) -> Result<AskResponse, ApiError> {
        self.ask_requests.lock().unwrap().push(request);
        self.ask_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(server_error("no scripted response")))
    }

    async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        Ok(self.notes.lock().unwrap().clone())
    }

    async fn get_note(&self, id: &str) -> Result<Note, ApiError> {
        self.notes
            .lock()
            .unwrap()
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "Note not found".to_string(),
            })
    }

    async fn create_note(&self, payload: NotePayload) -> Result<Note, ApiError> {
        let mut notes = self.notes.lock().unwrap();
        let created = Note {
            id: (notes.len() + 1).to_string(),
            title: payload.title,
            description: payload.description,
        };
        notes.push(created.clone());
        Ok(created)
    }

    async fn update_note(&self, id: &str, payload: NotePayload) -> Result<Note, ApiError> {
        let mut notes = self.notes.lock().unwrap();
        let existing = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                detail: "Note not found".to_string(),
            })?;
        existing.title = payload.title;
        existing.description = payload.description;
        Ok(existing.clone())
    }

    async fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        self.notes.lock().unwrap().retain(|n| n.id != id);
        Ok(())
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<SearchHit>, ApiError> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.title.contains(&query.q) || n.description.contains(&query.q))
            .take(query.limit as usize)
            .map(|n| source(&n.id, &n.title))
            .collect())
    }
}
