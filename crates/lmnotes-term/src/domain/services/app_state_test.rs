use anyhow::Result;
use lmnotes_api_types::AskResponse;
use tokio::sync::mpsc;

use super::AppState;
use super::AppStateProps;
use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::NoticeLevel;
use crate::domain::models::Role;
use crate::domain::models::View;
use crate::domain::services::test_support::note;
use crate::domain::services::test_support::server_error;
use crate::domain::services::test_support::source;
use crate::domain::services::Notifier;

fn app() -> Result<(AppState, mpsc::UnboundedReceiver<Action>)> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let app_state = AppState::new(AppStateProps {
        action_tx,
        notifier: Notifier::default(),
        search_limit: 10,
        search_threshold: 0.2,
    })?;

    assert!(matches!(action_rx.try_recv(), Ok(Action::LoadNotes)));
    Ok((app_state, action_rx))
}

fn ask_ticket(action_rx: &mut mpsc::UnboundedReceiver<Action>) -> u64 {
    match action_rx.try_recv() {
        Ok(Action::Ask(ticket)) => ticket.id,
        other => panic!("expected an ask, got {other:?}"),
    }
}

fn answer_with_sources(ticket_id: u64) -> Event {
    Event::AskCompleted {
        ticket_id,
        result: Ok(AskResponse {
            sources: Some(vec![source("n1", "X notes")]),
            session_id: Some("abc".to_string()),
            ..AskResponse::new("X is...")
        }),
    }
}

#[test]
fn it_asks_plain_text_questions() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    assert!(!app_state.handle_input("What is X?")?);
    let ticket_id = ask_ticket(&mut action_rx);
    assert_eq!(app_state.conversation.view(), View::Conversation);
    assert!(app_state.conversation.is_asking());

    app_state.handle_event(answer_with_sources(ticket_id))?;

    let roles: Vec<Role> = app_state
        .conversation
        .messages()
        .iter()
        .map(|m| m.role)
        .collect();
    assert_eq!(roles, vec![Role::User, Role::Assistant]);
    assert_eq!(app_state.conversation.session_id(), Some("abc"));
    Ok(())
}

#[test]
fn it_refuses_a_second_question_while_waiting() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("one")?;
    ask_ticket(&mut action_rx);
    app_state.handle_input("two")?;

    assert!(action_rx.try_recv().is_err());
    let notices = app_state.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(app_state.conversation.messages().len(), 1);
    Ok(())
}

#[test]
fn it_shows_failed_asks_inline() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("What is X?")?;
    let ticket_id = ask_ticket(&mut action_rx);
    app_state.handle_event(Event::AskCompleted {
        ticket_id,
        result: Err(server_error("server error")),
    })?;

    let messages = app_state.conversation.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_error);
    assert!(app_state.take_notices().is_empty());
    Ok(())
}

#[test]
fn it_drops_answers_for_an_abandoned_conversation() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("What is X?")?;
    let ticket_id = ask_ticket(&mut action_rx);
    app_state.handle_input("/new")?;
    app_state.handle_event(answer_with_sources(ticket_id))?;

    assert!(app_state.conversation.messages().is_empty());
    assert_eq!(app_state.conversation.session_id(), None);
    assert!(app_state.take_notices().is_empty());
    Ok(())
}

#[test]
fn it_visits_a_source_and_comes_back() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("What is X?")?;
    let ticket_id = ask_ticket(&mut action_rx);
    app_state.handle_event(answer_with_sources(ticket_id))?;

    app_state.handle_input("/source 1")?;
    assert_eq!(app_state.conversation.view(), View::Editor);
    assert_eq!(app_state.notes.draft().id.as_deref(), Some("n1"));
    assert!(app_state.conversation.can_return());

    app_state.handle_input("/back")?;
    assert_eq!(app_state.conversation.view(), View::Conversation);
    assert_eq!(app_state.conversation.messages().len(), 2);
    assert_eq!(app_state.conversation.answer(), "X is...");

    app_state.handle_input("/back")?;
    let notices = app_state.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].text.contains("no conversation"));
    Ok(())
}

#[test]
fn it_forgets_the_return_point_when_another_note_is_opened() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;
    app_state.handle_event(Event::NotesLoaded(Ok(vec![note("1", "a"), note("2", "b")])))?;

    app_state.handle_input("What is X?")?;
    let ticket_id = ask_ticket(&mut action_rx);
    app_state.handle_event(answer_with_sources(ticket_id))?;
    app_state.handle_input("/source 1")?;

    app_state.handle_input("/open 1")?;
    assert_eq!(app_state.notes.draft().id.as_deref(), Some("2"));
    assert!(!app_state.conversation.can_return());
    Ok(())
}

#[test]
fn it_rejects_unknown_positions() -> Result<()> {
    let (mut app_state, _action_rx) = app()?;

    app_state.handle_input("/source 3")?;
    app_state.handle_input("/open 9")?;
    app_state.handle_input("/result 1")?;

    let notices = app_state.take_notices();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.level == NoticeLevel::Warning));
    Ok(())
}

#[test]
fn it_saves_and_reloads_notes() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("/save")?;
    assert!(action_rx.try_recv().is_err());
    assert_eq!(app_state.take_notices()[0].text, "Title cannot be empty");

    app_state.handle_input("/title Groceries")?;
    app_state.handle_input("/body milk, eggs")?;
    app_state.handle_input("/save")?;
    match action_rx.try_recv() {
        Ok(Action::SaveNote(None, payload)) => {
            assert_eq!(payload.title, "Groceries");
            assert_eq!(payload.description, "milk, eggs");
        }
        other => panic!("expected a save, got {other:?}"),
    }

    app_state.handle_event(Event::NoteSaved(Ok(note("5", "Groceries"))))?;
    assert!(matches!(action_rx.try_recv(), Ok(Action::LoadNotes)));
    assert_eq!(app_state.take_notices()[0].level, NoticeLevel::Info);
    Ok(())
}

#[test]
fn it_keeps_the_form_when_saving_fails() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("/title Groceries")?;
    app_state.handle_input("/save")?;
    action_rx.try_recv()?;

    app_state.handle_event(Event::NoteSaved(Err(server_error("disk full"))))?;

    assert!(action_rx.try_recv().is_err());
    assert_eq!(app_state.notes.draft().title, "Groceries");
    let notices = app_state.take_notices();
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert!(notices[0].text.contains("disk full"));
    Ok(())
}

#[test]
fn it_deletes_the_open_note() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;
    app_state.handle_event(Event::NotesLoaded(Ok(vec![note("1", "a")])))?;

    app_state.handle_input("/delete")?;
    assert!(action_rx.try_recv().is_err());

    app_state.handle_input("/open 1")?;
    app_state.handle_input("/delete")?;
    assert!(matches!(action_rx.try_recv(), Ok(Action::DeleteNote(id)) if id == "1"));

    app_state.handle_event(Event::NoteDeleted {
        id: "1".to_string(),
        result: Ok(()),
    })?;
    assert!(app_state.notes.notes().is_empty());
    assert!(matches!(action_rx.try_recv(), Ok(Action::LoadNotes)));
    Ok(())
}

#[test]
fn it_searches_and_opens_a_result() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("/search rust")?;
    assert_eq!(app_state.conversation.view(), View::Search);
    let query = match action_rx.try_recv() {
        Ok(Action::Search(query)) => query,
        other => panic!("expected a search, got {other:?}"),
    };
    assert_eq!(query.q, "rust");
    assert_eq!(query.limit, 10);

    app_state.handle_event(Event::SearchCompleted {
        query: "rust".to_string(),
        result: Ok(vec![source("r1", "Rust ownership")]),
    })?;
    app_state.handle_input("/result 1")?;

    assert_eq!(app_state.conversation.view(), View::Editor);
    assert_eq!(app_state.notes.draft().title, "Rust ownership");
    assert!(!app_state.search.has_searched());
    Ok(())
}

#[test]
fn it_opens_notes_by_id() -> Result<()> {
    let (mut app_state, mut action_rx) = app()?;

    app_state.handle_input("/open 65f0c2aa")?;
    assert!(matches!(action_rx.try_recv(), Ok(Action::OpenNote(id)) if id == "65f0c2aa"));

    app_state.handle_event(Event::NoteLoaded(Ok(note("65f0c2aa", "Found"))))?;
    assert_eq!(app_state.notes.draft().title, "Found");

    app_state.handle_event(Event::NoteLoaded(Err(server_error("gone"))))?;
    assert_eq!(app_state.take_notices()[0].level, NoticeLevel::Error);
    assert_eq!(app_state.notes.draft().title, "Found");
    Ok(())
}

#[test]
fn it_quits() -> Result<()> {
    let (mut app_state, _action_rx) = app()?;

    assert!(app_state.handle_input("/quit")?);
    assert!(app_state.handle_event(Event::EndOfInput)?);
    assert!(!app_state.handle_input("   ")?);
    Ok(())
}
