use chrono::Utc;
use lmnotes_api_types::{AskRequest, AskResponse, Source};
use lmnotes_client::{ApiError, NotesApi};

use super::Notifier;
use crate::domain::models::ConversationError;
use crate::domain::models::ConversationSession;
use crate::domain::models::Message;
use crate::domain::models::NavigationSnapshot;
use crate::domain::models::NoteDraft;
use crate::domain::models::StateChange;
use crate::domain::models::View;

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;

/// Handle for one ask round trip. The request is what goes over the wire;
/// the id ties the eventual response back to the ask that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskTicket {
    pub id: u64,
    pub request: AskRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AskOutcome {
    Answered,
    /// The ask failed and the conversation was rolled back. Holds the error
    /// detail that was appended to the conversation.
    Failed(String),
    /// The conversation moved on before the response arrived; nothing changed.
    Stale,
}

/// State committed before the optimistic append, restored on failure.
#[derive(Debug, Clone)]
struct Rollback {
    messages: Vec<Message>,
    answer: String,
    sources: Vec<Source>,
}

#[derive(Debug, Clone)]
struct InFlightAsk {
    ticket_id: u64,
    question: String,
    rollback: Rollback,
}

/// Owns the question-answering session: the server-issued session id, the
/// message history with its optimistic user entry, the last answer and its
/// sources, and the single-slot return point used when a cited source is
/// opened from the conversation.
///
/// Asks are two-phase. [`begin_ask`](Self::begin_ask) validates, appends the
/// question and hands out an [`AskTicket`]; whoever performs the request feeds
/// the result to [`complete_ask`](Self::complete_ask). Only the ticket that is
/// currently in flight is accepted, so responses for an abandoned
/// conversation are dropped.
pub struct ConversationController {
    session: ConversationSession,
    answer: String,
    sources: Vec<Source>,
    has_asked: bool,
    question_input: String,
    view: View,
    snapshot: Option<NavigationSnapshot>,
    in_flight: Option<InFlightAsk>,
    last_ticket: u64,
    notifier: Notifier,
}

impl Default for ConversationController {
    fn default() -> ConversationController {
        ConversationController::new(Notifier::default())
    }
}

impl ConversationController {
    pub fn new(notifier: Notifier) -> ConversationController {
        ConversationController {
            session: ConversationSession::default(),
            answer: String::new(),
            sources: vec![],
            has_asked: false,
            question_input: String::new(),
            view: View::default(),
            snapshot: None,
            in_flight: None,
            last_ticket: 0,
            notifier,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.session.messages
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.session_id.as_deref()
    }

    pub fn is_follow_up(&self) -> bool {
        self.session.is_follow_up
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Cited source by its 1-based position in the last answer.
    pub fn source(&self, position: usize) -> Option<&Source> {
        position.checked_sub(1).and_then(|i| self.sources.get(i))
    }

    pub fn has_asked(&self) -> bool {
        self.has_asked
    }

    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn is_asking(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a return to the conversation is available.
    pub fn can_return(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn show(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.notifier.notify(StateChange::View);
        }
    }

    /// Validate the question, append it optimistically and return the request
    /// to send.
    pub fn begin_ask(&mut self, question: &str) -> Result<AskTicket, ConversationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ConversationError::EmptyQuestion);
        }
        if self.in_flight.is_some() {
            return Err(ConversationError::AskInFlight);
        }

        self.discard_return_point();

        let rollback = Rollback {
            messages: self.session.messages.clone(),
            answer: std::mem::take(&mut self.answer),
            sources: std::mem::take(&mut self.sources),
        };

        let repeated = self
            .session
            .messages
            .last()
            .is_some_and(|last| last.is_user_with(question));
        if !repeated {
            self.session.messages.push(Message::user(question));
        }

        self.last_ticket += 1;
        let ticket = AskTicket {
            id: self.last_ticket,
            request: AskRequest::new(question.to_string(), self.session.session_id.clone()),
        };

        self.in_flight = Some(InFlightAsk {
            ticket_id: ticket.id,
            question: question.to_string(),
            rollback,
        });
        self.has_asked = true;
        self.question_input = question.to_string();
        self.show(View::Conversation);

        tracing::debug!(
            ticket = ticket.id,
            session_id = ?ticket.request.session_id,
            "ask started"
        );

        self.notifier.notify(StateChange::Messages);
        self.notifier.notify(StateChange::Answer);
        self.notifier.notify(StateChange::Busy);

        Ok(ticket)
    }

    /// Apply the result of the ask identified by `ticket_id`.
    pub fn complete_ask(
        &mut self,
        ticket_id: u64,
        result: Result<AskResponse, ApiError>,
    ) -> AskOutcome {
        let pending = match self.in_flight.take() {
            Some(pending) if pending.ticket_id == ticket_id => pending,
            other => {
                self.in_flight = other;
                tracing::debug!(ticket = ticket_id, "discarding stale ask response");
                return AskOutcome::Stale;
            }
        };

        self.notifier.notify(StateChange::Busy);

        match result {
            Ok(response) => {
                self.commit_answer(response);
                AskOutcome::Answered
            }
            Err(err) => {
                tracing::warn!(ticket = ticket_id, error = %err, "ask failed");

                let detail = err.to_string();
                self.session.messages = pending.rollback.messages;
                self.answer = pending.rollback.answer;
                self.sources = pending.rollback.sources;
                self.session.messages.push(Message::error(&detail));

                self.notifier.notify(StateChange::Messages);
                self.notifier.notify(StateChange::Answer);

                AskOutcome::Failed(detail)
            }
        }
    }

    fn commit_answer(&mut self, response: AskResponse) {
        let AskResponse {
            answer,
            sources,
            session_id,
            message_history,
        } = response;

        self.answer = answer;
        self.sources = sources.unwrap_or_default();

        let history = match session_id {
            Some(session_id) => {
                self.session.session_id = Some(session_id);
                self.session.is_follow_up = true;
                self.notifier.notify(StateChange::Session);
                message_history
            }
            None => None,
        };

        match history {
            Some(entries) => {
                let now = Utc::now();
                self.session.messages = entries
                    .iter()
                    .filter_map(|entry| {
                        let message = Message::from_history(entry, now);
                        if message.is_none() {
                            tracing::warn!(role = %entry.role, "skipping history entry with unknown role");
                        }
                        message
                    })
                    .collect();
            }
            None => {
                let seen = self
                    .session
                    .messages
                    .iter()
                    .any(|m| m.is_assistant_with(&self.answer));
                if !seen {
                    self.session.messages.push(Message::assistant(&self.answer));
                }
            }
        }

        self.question_input.clear();

        self.notifier.notify(StateChange::Messages);
        self.notifier.notify(StateChange::Answer);
        self.notifier.notify(StateChange::Input);
    }

    /// Ask a question and wait for the answer in one go.
    pub async fn submit_question<A>(
        &mut self,
        api: &A,
        question: &str,
    ) -> Result<AskOutcome, ConversationError>
    where
        A: NotesApi + ?Sized,
    {
        let ticket = self.begin_ask(question)?;
        let result = api.ask(ticket.request).await;
        Ok(self.complete_ask(ticket.id, result))
    }

    /// Forget the session and everything shown for it. Safe to call at any
    /// time; an ask still in flight becomes stale.
    pub fn start_new_conversation(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            tracing::debug!(ticket = pending.ticket_id, "abandoning ask for new conversation");
            self.notifier.notify(StateChange::Busy);
        }

        self.session = ConversationSession::default();
        self.answer.clear();
        self.sources.clear();
        self.question_input.clear();
        self.has_asked = false;
        self.discard_return_point();

        self.notifier.notify(StateChange::Session);
        self.notifier.notify(StateChange::Messages);
        self.notifier.notify(StateChange::Answer);
        self.notifier.notify(StateChange::Input);
    }

    /// Open a cited source in the editor. Leaving from the conversation view
    /// saves a return point first.
    pub fn select_cited_source(&mut self, source: &Source) -> NoteDraft {
        self.abandon_in_flight();

        if self.view == View::Conversation {
            self.snapshot = Some(NavigationSnapshot {
                has_asked: self.has_asked,
                answer: self.answer.clone(),
                sources: self.sources.clone(),
                messages: self.session.messages.clone(),
                session_id: self.session.session_id.clone(),
                is_follow_up: self.session.is_follow_up,
            });
            self.notifier.notify(StateChange::ReturnPoint);
        }

        self.has_asked = false;
        self.show(View::Editor);

        NoteDraft::from_source(source)
    }

    /// Restore the conversation saved by [`select_cited_source`](Self::select_cited_source).
    pub fn return_to_conversation(&mut self) -> Result<(), ConversationError> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or(ConversationError::NothingToReturnTo)?;

        self.has_asked = snapshot.has_asked;
        self.answer = snapshot.answer;
        self.sources = snapshot.sources;
        self.session.messages = snapshot.messages;
        self.session.session_id = snapshot.session_id;
        self.session.is_follow_up = snapshot.is_follow_up;
        self.show(View::Conversation);

        self.notifier.notify(StateChange::ReturnPoint);
        self.notifier.notify(StateChange::Session);
        self.notifier.notify(StateChange::Messages);
        self.notifier.notify(StateChange::Answer);

        Ok(())
    }

    /// Drop the return point because the user moved on to something else.
    pub fn discard_return_point(&mut self) {
        if self.snapshot.take().is_some() {
            self.notifier.notify(StateChange::ReturnPoint);
        }
    }

    /// Undo the optimistic append of an ask nobody waits for anymore and put
    /// the question back into the input.
    fn abandon_in_flight(&mut self) {
        let Some(pending) = self.in_flight.take() else {
            return;
        };

        tracing::debug!(ticket = pending.ticket_id, "abandoning ask");

        self.session.messages = pending.rollback.messages;
        self.answer = pending.rollback.answer;
        self.sources = pending.rollback.sources;
        self.question_input = pending.question;

        self.notifier.notify(StateChange::Busy);
        self.notifier.notify(StateChange::Messages);
        self.notifier.notify(StateChange::Answer);
        self.notifier.notify(StateChange::Input);
    }
}
