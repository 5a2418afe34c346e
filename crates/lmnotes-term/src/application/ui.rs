use std::collections::HashSet;
use std::io::Write;

use anyhow::Result;
use tokio::io::BufReader;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::mpsc;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::StateChange;
use crate::domain::models::View;
use crate::domain::services::ActionsService;
use crate::domain::services::AppState;
use crate::domain::services::AppStateProps;
use crate::domain::services::EventsService;
use crate::domain::services::Notifier;
use crate::infrastructure::clients::NotesApiManager;

#[cfg(test)]
#[path = "ui_test.rs"]
mod tests;

/// Prints whatever changed since the last call. Conversation messages are
/// appended as they arrive and reprinted only when the history was rewritten.
pub struct Renderer<W: Write> {
    out: W,
    printed: Vec<Message>,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Renderer<W> {
        Renderer {
            out,
            printed: vec![],
        }
    }

    fn drain(changes: &mut broadcast::Receiver<StateChange>) -> HashSet<StateChange> {
        let mut pending = HashSet::new();
        loop {
            match changes.try_recv() {
                Ok(change) => {
                    pending.insert(change);
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "renderer lagged, redrawing everything");
                    pending.extend(StateChange::ALL);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return pending,
            }
        }
    }

    pub fn render(
        &mut self,
        app_state: &mut AppState,
        changes: &mut broadcast::Receiver<StateChange>,
    ) -> Result<()> {
        let pending = Renderer::<W>::drain(changes);
        let changed = |change: StateChange| pending.contains(&change);
        let view = app_state.conversation.view();

        if changed(StateChange::View) {
            writeln!(self.out, "== {view} ==")?;
        }

        if changed(StateChange::Messages) {
            self.render_messages(app_state.conversation.messages())?;
        }

        if changed(StateChange::Busy) && app_state.conversation.is_asking() {
            writeln!(self.out, "... thinking")?;
        }

        if changed(StateChange::Answer)
            && !app_state.conversation.is_asking()
            && !app_state.conversation.sources().is_empty()
        {
            writeln!(self.out, "Sources:")?;
            for (i, source) in app_state.conversation.sources().iter().enumerate() {
                writeln!(
                    self.out,
                    "  [{}] {} ({:.2})",
                    i + 1,
                    source.display_title(),
                    source.similarity
                )?;
            }
        }

        if changed(StateChange::Input)
            && !app_state.conversation.is_asking()
            && !app_state.conversation.question_input().is_empty()
        {
            writeln!(
                self.out,
                "(unsent question: {})",
                app_state.conversation.question_input()
            )?;
        }

        if changed(StateChange::ReturnPoint) && app_state.conversation.can_return() {
            writeln!(self.out, "(/back returns to the conversation)")?;
        }

        if changed(StateChange::Notes) && view == View::Editor {
            if app_state.notes.is_loading() {
                writeln!(self.out, "... loading notes")?;
            } else {
                writeln!(self.out, "Notes:")?;
                if app_state.notes.notes().is_empty() {
                    writeln!(self.out, "  (none)")?;
                }
                for (i, note) in app_state.notes.notes().iter().enumerate() {
                    writeln!(self.out, "  [{}] {} ({})", i + 1, note.title, note.id)?;
                }
            }
        }

        if changed(StateChange::Draft) && view == View::Editor {
            let draft = app_state.notes.draft();
            if app_state.notes.is_saving() {
                writeln!(self.out, "... saving \"{}\"", draft.title.trim())?;
            } else {
                match &draft.id {
                    Some(id) => writeln!(self.out, "Editing note {id}")?,
                    None => writeln!(self.out, "Editing a new note")?,
                }
                writeln!(self.out, "  title: {}", draft.title)?;
                writeln!(self.out, "  body:  {}", draft.description)?;
            }
        }

        if changed(StateChange::Search) && view == View::Search {
            if app_state.search.is_searching() {
                writeln!(self.out, "... searching \"{}\"", app_state.search.query())?;
            } else if app_state.search.has_searched() {
                for (i, hit) in app_state.search.results().iter().enumerate() {
                    writeln!(
                        self.out,
                        "  [{}] {} ({:.2})",
                        i + 1,
                        hit.display_title(),
                        hit.similarity
                    )?;
                }
            }
        }

        for notice in app_state.take_notices() {
            writeln!(self.out, "[{}] {}", notice.level, notice.text)?;
        }

        self.out.flush()?;
        Ok(())
    }

    fn render_messages(&mut self, messages: &[Message]) -> Result<()> {
        let kept = self
            .printed
            .iter()
            .zip(messages)
            .take_while(|(printed, current)| printed == current)
            .count();

        let start = if kept < self.printed.len() {
            if !messages.is_empty() {
                writeln!(self.out, "-- conversation --")?;
            }
            0
        } else {
            kept
        };

        for message in &messages[start..] {
            let who = match (message.role, message.is_error) {
                (_, true) => "!",
                (Role::User, false) => "you",
                (Role::Assistant, false) => "notes",
            };
            writeln!(self.out, "{who}> {}", message.content)?;
        }

        self.printed = messages.to_vec();
        Ok(())
    }
}

pub async fn start_loop() -> Result<()> {
    let api = NotesApiManager::get()?;
    let notifier = Notifier::default();
    let mut changes = notifier.subscribe();

    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let mut app_state = AppState::new(AppStateProps {
        action_tx,
        notifier,
        search_limit: Config::get_u32(ConfigKey::SearchLimit)?,
        search_threshold: Config::get_f64(ConfigKey::SearchThreshold)?,
    })?;

    let worker = tokio::spawn(async move {
        ActionsService::start(api, event_tx, &mut action_rx).await
    });

    let mut events = EventsService::new(BufReader::new(tokio::io::stdin()), event_rx);
    let mut renderer = Renderer::new(std::io::stdout());

    println!("lmnotes: ask a question, or /help for commands.");

    loop {
        let event = events.next().await?;
        let quit = app_state.handle_event(event)?;
        renderer.render(&mut app_state, &mut changes)?;
        if quit {
            break;
        }
    }

    worker.abort();
    tracing::info!("lmnotes exiting");

    Ok(())
}
