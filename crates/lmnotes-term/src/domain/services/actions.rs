use std::sync::Arc;

use anyhow::Result;
use lmnotes_client::NotesApiBox;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;

#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

async fn run_action(
    api: &NotesApiBox,
    action: Action,
    event_tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    let event = match action {
        Action::Ask(ticket) => {
            tracing::debug!(ticket = ticket.id, "sending ask");
            Event::AskCompleted {
                ticket_id: ticket.id,
                result: api.ask(ticket.request).await,
            }
        }
        Action::LoadNotes => Event::NotesLoaded(api.list_notes().await),
        Action::OpenNote(id) => Event::NoteLoaded(api.get_note(&id).await),
        Action::SaveNote(Some(id), payload) => Event::NoteSaved(api.update_note(&id, payload).await),
        Action::SaveNote(None, payload) => Event::NoteSaved(api.create_note(payload).await),
        Action::DeleteNote(id) => {
            let result = api.delete_note(&id).await;
            Event::NoteDeleted { id, result }
        }
        Action::Search(query) => {
            let q = query.q.clone();
            Event::SearchCompleted {
                query: q,
                result: api.search(query).await,
            }
        }
    };

    event_tx.send(event)?;
    Ok(())
}

pub struct ActionsService {}

impl ActionsService {
    /// Run every action on its own task and report back through `event_tx`.
    /// Returns once the action channel closes.
    pub async fn start(
        api: NotesApiBox,
        event_tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let api_arc = Arc::new(api);

        while let Some(action) = rx.recv().await {
            let api_worker = api_arc.clone();
            let worker_event_tx = event_tx.clone();
            tokio::spawn(async move {
                if let Err(err) = run_action(&api_worker, action, &worker_event_tx).await {
                    tracing::warn!(error = %err, "event loop went away before the action finished");
                }
            });
        }

        Ok(())
    }
}
