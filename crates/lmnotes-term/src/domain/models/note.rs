use lmnotes_api_types::{Note, NotePayload, Source};

/// Contents of the note editor. `id` is `None` for a note not yet saved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

impl NoteDraft {
    pub fn from_source(source: &Source) -> NoteDraft {
        NoteDraft {
            id: Some(source.id.clone()),
            title: source.display_title().to_string(),
            description: source.description().to_string(),
        }
    }

    pub fn payload(&self) -> NotePayload {
        NotePayload::new(self.title.trim(), self.description.trim())
    }
}

impl From<Note> for NoteDraft {
    fn from(note: Note) -> NoteDraft {
        NoteDraft {
            id: Some(note.id),
            title: note.title,
            description: note.description,
        }
    }
}
