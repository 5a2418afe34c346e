use std::time::Duration;

use async_trait::async_trait;
use lmnotes_api_types::{AskRequest, AskResponse, Note, NotePayload, SearchHit, SearchQuery};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::{ApiError, NotesApi};

const NOTES_PATH: &str = "/api/v1/notes";

/// HTTP client for a remote lmnotes server
pub struct HttpNotesClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpNotesClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: Duration::from_secs(30),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{}/", self.base_url, NOTES_PATH)
    }

    fn note_url(&self, id: &str) -> String {
        format!("{}{}/{}", self.base_url, NOTES_PATH, id)
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}/{}/", self.base_url, NOTES_PATH, endpoint)
    }
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status, body = %body, "notes api request failed");
    ApiError::from_status_body(status, &body)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl NotesApi for HttpNotesClient {
    async fn ask(&self, request: AskRequest) -> Result<AskResponse, ApiError> {
        let url = self.endpoint_url("ask");
        tracing::debug!(url = %url, session_id = ?request.session_id, "ask");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        decode(response).await
    }

    async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let response = self
            .client
            .get(self.collection_url())
            .timeout(self.timeout)
            .send()
            .await?;

        decode(response).await
    }

    async fn get_note(&self, id: &str) -> Result<Note, ApiError> {
        let response = self
            .client
            .get(self.note_url(id))
            .timeout(self.timeout)
            .send()
            .await?;

        decode(response).await
    }

    async fn create_note(&self, payload: NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .post(self.collection_url())
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        decode(response).await
    }

    async fn update_note(&self, id: &str, payload: NotePayload) -> Result<Note, ApiError> {
        let response = self
            .client
            .put(self.note_url(id))
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        decode(response).await
    }

    async fn delete_note(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.note_url(id))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(())
    }

    async fn search(&self, query: SearchQuery) -> Result<Vec<SearchHit>, ApiError> {
        let url = self.endpoint_url("search");
        tracing::debug!(url = %url, q = %query.q, limit = query.limit, "search");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&query)
            .send()
            .await?;

        decode(response).await
    }
}
