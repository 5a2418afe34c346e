use lmnotes_api_types::{Note, NotePayload};
use lmnotes_client::ApiError;

use super::Notifier;
use crate::domain::models::NoteDraft;
use crate::domain::models::Notice;
use crate::domain::models::PanelError;
use crate::domain::models::StateChange;

#[cfg(test)]
#[path = "notes_panel_test.rs"]
mod tests;

/// Note list plus the editor draft. Failed requests leave the draft alone so
/// the user can retry.
pub struct NotesPanel {
    notes: Vec<Note>,
    draft: NoteDraft,
    loading: bool,
    saving: bool,
    deleting: bool,
    notifier: Notifier,
}

impl NotesPanel {
    pub fn new(notifier: Notifier) -> NotesPanel {
        NotesPanel {
            notes: vec![],
            draft: NoteDraft::default(),
            loading: false,
            saving: false,
            deleting: false,
            notifier,
        }
    }

    /// Newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, position: usize) -> Option<&Note> {
        position.checked_sub(1).and_then(|i| self.notes.get(i))
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.notifier.notify(StateChange::Notes);
    }

    pub fn apply_notes(&mut self, result: Result<Vec<Note>, ApiError>) -> Option<Notice> {
        self.loading = false;

        match result {
            Ok(mut notes) => {
                notes.reverse();
                tracing::debug!(count = notes.len(), "notes loaded");
                self.notes = notes;
                self.notifier.notify(StateChange::Notes);
                None
            }
            Err(err) => {
                tracing::error!(
                    status = ?err.status(),
                    error = %err,
                    "failed to load notes"
                );
                self.notifier.notify(StateChange::Notes);
                Some(Notice::error(format!("Failed to load notes: {}", err.detail())))
            }
        }
    }

    pub fn load_draft(&mut self, draft: NoteDraft) {
        self.draft = draft;
        self.notifier.notify(StateChange::Draft);
    }

    pub fn new_draft(&mut self) {
        self.load_draft(NoteDraft::default());
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.to_string();
        self.notifier.notify(StateChange::Draft);
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.description = description.to_string();
        self.notifier.notify(StateChange::Draft);
    }

    /// Validate the draft and return the id to update (`None` to create) with
    /// the payload to send.
    pub fn begin_save(&mut self) -> Result<(Option<String>, NotePayload), PanelError> {
        if self.saving {
            return Err(PanelError::Busy("Saving"));
        }

        let payload = self.draft.payload();
        if payload.title.is_empty() {
            return Err(PanelError::EmptyTitle);
        }

        self.saving = true;
        self.notifier.notify(StateChange::Draft);
        Ok((self.draft.id.clone(), payload))
    }

    /// `Ok` carries a success notice and means the list should be reloaded.
    pub fn complete_save(&mut self, result: Result<Note, ApiError>) -> Result<Notice, Notice> {
        self.saving = false;

        match result {
            Ok(note) => {
                tracing::info!(id = %note.id, "note saved");
                self.new_draft();
                Ok(Notice::info(format!("Saved \"{}\"", note.title)))
            }
            Err(err) => {
                tracing::error!(
                    status = ?err.status(),
                    error = %err,
                    "failed to save note"
                );
                self.notifier.notify(StateChange::Draft);
                Err(Notice::error(format!("Failed to save note: {}", err.detail())))
            }
        }
    }

    pub fn begin_delete(&mut self) -> Result<String, PanelError> {
        if self.deleting {
            return Err(PanelError::Busy("Deleting"));
        }

        let id = self.draft.id.clone().ok_or(PanelError::NoNoteSelected)?;
        self.deleting = true;
        Ok(id)
    }

    /// `Ok` carries a success notice and means the list should be reloaded.
    pub fn complete_delete(
        &mut self,
        id: &str,
        result: Result<(), ApiError>,
    ) -> Result<Notice, Notice> {
        self.deleting = false;

        match result {
            Ok(()) => {
                tracing::info!(id = %id, "note deleted");
                self.notes.retain(|n| n.id != id);
                self.notifier.notify(StateChange::Notes);
                if self.draft.id.as_deref() == Some(id) {
                    self.new_draft();
                }
                Ok(Notice::info("Note deleted"))
            }
            Err(err) => {
                tracing::error!(
                    id = %id,
                    status = ?err.status(),
                    error = %err,
                    "failed to delete note"
                );
                Err(Notice::error(format!("Failed to delete note: {}", err.detail())))
            }
        }
    }
}
