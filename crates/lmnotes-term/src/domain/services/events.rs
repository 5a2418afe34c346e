use anyhow::Result;
use tokio::io::AsyncBufRead;
use tokio::io::AsyncBufReadExt;
use tokio::io::Lines;
use tokio::sync::mpsc;

use crate::domain::models::Event;

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

/// Merges lines typed at the prompt with events coming back from the actions
/// worker.
pub struct EventsService<R> {
    lines: Option<Lines<R>>,
    events: mpsc::UnboundedReceiver<Event>,
}

impl<R> EventsService<R>
where
    R: AsyncBufRead + Unpin,
{
    pub fn new(input: R, events: mpsc::UnboundedReceiver<Event>) -> EventsService<R> {
        EventsService {
            lines: Some(input.lines()),
            events,
        }
    }

    async fn next_line(lines: &mut Option<Lines<R>>) -> Result<Event> {
        match lines {
            Some(reader) => match reader.next_line().await? {
                Some(line) => Ok(Event::Input(line)),
                None => {
                    *lines = None;
                    Ok(Event::EndOfInput)
                }
            },
            None => std::future::pending().await,
        }
    }

    /// Next event to handle. After end of input only worker events are
    /// delivered.
    pub async fn next(&mut self) -> Result<Event> {
        tokio::select! {
            Some(event) = self.events.recv() => Ok(event),
            event = Self::next_line(&mut self.lines) => event,
        }
    }
}
