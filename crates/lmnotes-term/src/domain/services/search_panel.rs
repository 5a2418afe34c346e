use lmnotes_api_types::{SearchHit, SearchQuery};
use lmnotes_client::ApiError;

use super::Notifier;
use crate::domain::models::NoteDraft;
use crate::domain::models::Notice;
use crate::domain::models::PanelError;
use crate::domain::models::StateChange;

#[cfg(test)]
#[path = "search_panel_test.rs"]
mod tests;

/// Similarity search over notes. Only the latest query's results are kept.
pub struct SearchPanel {
    query: String,
    results: Vec<SearchHit>,
    has_searched: bool,
    pending: Option<String>,
    limit: u32,
    threshold: f64,
    notifier: Notifier,
}

impl SearchPanel {
    pub fn new(notifier: Notifier, limit: u32, threshold: f64) -> SearchPanel {
        SearchPanel {
            query: String::new(),
            results: vec![],
            has_searched: false,
            pending: None,
            limit,
            threshold,
            notifier,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    pub fn result(&self, position: usize) -> Option<&SearchHit> {
        position.checked_sub(1).and_then(|i| self.results.get(i))
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn begin_search(&mut self, query: &str) -> Result<SearchQuery, PanelError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PanelError::EmptyQuery);
        }

        self.query = query.to_string();
        self.pending = Some(self.query.clone());
        self.has_searched = true;
        self.results.clear();
        self.notifier.notify(StateChange::Search);

        Ok(SearchQuery {
            q: self.query.clone(),
            limit: self.limit,
            threshold: self.threshold,
        })
    }

    pub fn complete_search(
        &mut self,
        query: &str,
        result: Result<Vec<SearchHit>, ApiError>,
    ) -> Option<Notice> {
        if self.pending.as_deref() != Some(query) {
            tracing::debug!(query = %query, "discarding stale search results");
            return None;
        }
        self.pending = None;

        match result {
            Ok(hits) => {
                tracing::debug!(query = %query, count = hits.len(), "search finished");
                let empty = hits.is_empty();
                self.results = hits;
                self.notifier.notify(StateChange::Search);
                empty.then(|| Notice::info(format!("No notes match \"{query}\"")))
            }
            Err(err) => {
                tracing::error!(
                    query = %query,
                    status = ?err.status(),
                    error = %err,
                    "search failed"
                );
                self.notifier.notify(StateChange::Search);
                Some(Notice::error(format!("Search failed: {}", err.detail())))
            }
        }
    }

    /// Open a result in the editor and leave the results view.
    pub fn select_result(&mut self, position: usize) -> Result<NoteDraft, PanelError> {
        let hit = self
            .result(position)
            .ok_or(PanelError::UnknownResult(position))?;
        let draft = NoteDraft::from_source(hit);

        self.has_searched = false;
        self.notifier.notify(StateChange::Search);

        Ok(draft)
    }
}
