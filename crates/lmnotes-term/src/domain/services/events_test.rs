use anyhow::Result;
use tokio::sync::mpsc;

use super::EventsService;
use crate::domain::models::Event;

#[tokio::test]
async fn it_reads_lines_until_end_of_input() -> Result<()> {
    let (_event_tx, event_rx) = mpsc::unbounded_channel();
    let mut service = EventsService::new(&b"What is X?\n/quit\n"[..], event_rx);

    assert!(matches!(service.next().await?, Event::Input(line) if line == "What is X?"));
    assert!(matches!(service.next().await?, Event::Input(line) if line == "/quit"));
    assert!(matches!(service.next().await?, Event::EndOfInput));
    Ok(())
}

#[tokio::test]
async fn it_delivers_worker_events_after_input_ends() -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut service = EventsService::new(&b""[..], event_rx);

    assert!(matches!(service.next().await?, Event::EndOfInput));

    event_tx.send(Event::NotesLoaded(Ok(vec![])))?;
    assert!(matches!(service.next().await?, Event::NotesLoaded(Ok(notes)) if notes.is_empty()));
    Ok(())
}
