use anyhow::Result;
use tokio::sync::mpsc;

use super::AskOutcome;
use super::ConversationController;
use super::NotesPanel;
use super::Notifier;
use super::SearchPanel;
use crate::domain::models::help_text;
use crate::domain::models::Action;
use crate::domain::models::ConversationError;
use crate::domain::models::Event;
use crate::domain::models::NoteDraft;
use crate::domain::models::NoteSelector;
use crate::domain::models::Notice;
use crate::domain::models::PanelError;
use crate::domain::models::SlashCommand;
use crate::domain::models::StateChange;
use crate::domain::models::View;

#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

pub struct AppStateProps {
    pub action_tx: mpsc::UnboundedSender<Action>,
    pub notifier: Notifier,
    pub search_limit: u32,
    pub search_threshold: f64,
}

/// Everything the client shows, mutated only from the event loop. Network
/// work leaves as [`Action`]s and comes back as [`Event`]s.
pub struct AppState {
    pub conversation: ConversationController,
    pub notes: NotesPanel,
    pub search: SearchPanel,
    notices: Vec<Notice>,
    notifier: Notifier,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl AppState {
    pub fn new(props: AppStateProps) -> Result<AppState> {
        let mut app_state = AppState {
            conversation: ConversationController::new(props.notifier.clone()),
            notes: NotesPanel::new(props.notifier.clone()),
            search: SearchPanel::new(
                props.notifier.clone(),
                props.search_limit,
                props.search_threshold,
            ),
            notices: vec![],
            notifier: props.notifier,
            action_tx: props.action_tx,
        };

        app_state.load_notes()?;

        Ok(app_state)
    }

    /// Hand out pending notices; each is shown once.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        self.notifier.notify(StateChange::Notice);
    }

    fn send(&self, action: Action) -> Result<()> {
        self.action_tx.send(action)?;
        Ok(())
    }

    fn load_notes(&mut self) -> Result<()> {
        self.notes.begin_load();
        self.send(Action::LoadNotes)
    }

    /// Show a note in the editor. Choosing a note that is not a cited source
    /// drops the return point to the conversation.
    fn open_draft(&mut self, draft: NoteDraft) {
        self.conversation.discard_return_point();
        self.conversation.show(View::Editor);
        self.notes.load_draft(draft);
    }

    /// Returns `true` when the client should exit.
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Input(line) => return self.handle_input(&line),
            Event::EndOfInput => return Ok(true),
            Event::AskCompleted { ticket_id, result } => {
                if let AskOutcome::Failed(detail) = self.conversation.complete_ask(ticket_id, result)
                {
                    tracing::debug!(detail = %detail, "ask rolled back");
                }
            }
            Event::NotesLoaded(result) => {
                if let Some(notice) = self.notes.apply_notes(result) {
                    self.push_notice(notice);
                }
            }
            Event::NoteLoaded(result) => match result {
                Ok(note) => self.open_draft(NoteDraft::from(note)),
                Err(err) => {
                    tracing::error!(status = ?err.status(), error = %err, "failed to open note");
                    let text = format!("Failed to open note: {}", err.detail());
                    self.push_notice(Notice::error(text));
                }
            },
            Event::NoteSaved(result) => match self.notes.complete_save(result) {
                Ok(notice) => {
                    self.push_notice(notice);
                    self.load_notes()?;
                }
                Err(notice) => self.push_notice(notice),
            },
            Event::NoteDeleted { id, result } => match self.notes.complete_delete(&id, result) {
                Ok(notice) => {
                    self.push_notice(notice);
                    self.load_notes()?;
                }
                Err(notice) => self.push_notice(notice),
            },
            Event::SearchCompleted { query, result } => {
                if let Some(notice) = self.search.complete_search(&query, result) {
                    self.push_notice(notice);
                }
            }
        }

        Ok(false)
    }

    /// Returns `true` when the client should exit.
    pub fn handle_input(&mut self, line: &str) -> Result<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(false);
        }

        let Some(command) = SlashCommand::parse(line) else {
            self.ask(line)?;
            return Ok(false);
        };

        match command {
            SlashCommand::Quit => return Ok(true),
            SlashCommand::Help => self.push_notice(Notice::info(help_text())),
            SlashCommand::Invalid(msg) => self.push_notice(Notice::warning(msg)),
            SlashCommand::NewConversation => {
                self.conversation.start_new_conversation();
                self.conversation.show(View::Conversation);
            }
            SlashCommand::Conversation => self.conversation.show(View::Conversation),
            SlashCommand::Source(position) => {
                match self.conversation.source(position).cloned() {
                    Some(source) => {
                        let draft = self.conversation.select_cited_source(&source);
                        self.notes.load_draft(draft);
                    }
                    None => self.reject(ConversationError::UnknownSource(position)),
                }
            }
            SlashCommand::Back => {
                if let Err(err) = self.conversation.return_to_conversation() {
                    self.reject(err);
                }
            }
            SlashCommand::Notes => {
                self.conversation.show(View::Editor);
                self.load_notes()?;
            }
            SlashCommand::Open(NoteSelector::Position(position)) => {
                match self.notes.note(position).cloned() {
                    Some(note) => self.open_draft(NoteDraft::from(note)),
                    None => self.reject(PanelError::UnknownNote(position)),
                }
            }
            SlashCommand::Open(NoteSelector::Id(id)) => self.send(Action::OpenNote(id))?,
            SlashCommand::Draft => {
                self.open_draft(NoteDraft::default());
            }
            SlashCommand::Title(title) => {
                self.conversation.show(View::Editor);
                self.notes.set_title(&title);
            }
            SlashCommand::Body(body) => {
                self.conversation.show(View::Editor);
                self.notes.set_description(&body);
            }
            SlashCommand::Save => match self.notes.begin_save() {
                Ok((id, payload)) => self.send(Action::SaveNote(id, payload))?,
                Err(err) => self.reject(err),
            },
            SlashCommand::Delete => match self.notes.begin_delete() {
                Ok(id) => self.send(Action::DeleteNote(id))?,
                Err(err) => self.reject(err),
            },
            SlashCommand::Search(query) => match self.search.begin_search(&query) {
                Ok(query) => {
                    self.conversation.show(View::Search);
                    self.send(Action::Search(query))?;
                }
                Err(err) => self.reject(err),
            },
            SlashCommand::Result(position) => match self.search.select_result(position) {
                Ok(draft) => self.open_draft(draft),
                Err(err) => self.reject(err),
            },
        }

        Ok(false)
    }

    fn ask(&mut self, question: &str) -> Result<()> {
        match self.conversation.begin_ask(question) {
            Ok(ticket) => self.send(Action::Ask(ticket)),
            Err(err) => {
                self.reject(err);
                Ok(())
            }
        }
    }

    fn reject(&mut self, err: impl std::fmt::Display) {
        self.push_notice(Notice::warning(err.to_string()));
    }
}
