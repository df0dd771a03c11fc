#[cfg(test)]
#[path = "events_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;
use tui_textarea::Input;
use tui_textarea::Key;

use crate::domain::models::Event;

const TICK: Duration = Duration::from_millis(500);

/// Ctrl+C quits and Ctrl+S submits the resume form from anywhere, so they
/// are lifted out before the page sees the key.
fn translate_key(keyevent: KeyEvent) -> Option<Event> {
    if keyevent.kind == KeyEventKind::Release {
        return None;
    }

    let input: Input = keyevent.into();
    if !input.ctrl {
        return Some(Event::KeyboardInput(input));
    }

    match input.key {
        Key::Char('c') => return Some(Event::KeyboardCTRLC()),
        Key::Char('s') => return Some(Event::KeyboardCTRLS()),
        _ => return Some(Event::KeyboardInput(input)),
    }
}

fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(keyevent) => return translate_key(keyevent),
        CrosstermEvent::Paste(text) => return Some(Event::KeyboardPaste(text)),
        CrosstermEvent::Resize(..) | CrosstermEvent::FocusGained => {
            return Some(Event::UIResize());
        }
        _ => return None,
    }
}

/// Single source of events for the UI loop. Terminal input, worker results
/// and a redraw tick are merged so the loop only ever awaits one thing.
pub struct EventsService {
    terminal: EventStream,
    worker: mpsc::UnboundedReceiver<Event>,
}

impl EventsService {
    pub fn new(worker: mpsc::UnboundedReceiver<Event>) -> EventsService {
        return EventsService {
            terminal: EventStream::new(),
            worker,
        };
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let next = tokio::select! {
                event = self.worker.recv() => event,
                event = self.terminal.next() => match event {
                    Some(Ok(event)) => translate(event),
                    Some(Err(err)) => {
                        tracing::warn!(error = ?err, "terminal event");
                        None
                    }
                    None => None,
                },
                _ = time::sleep(TICK) => Some(Event::UITick()),
            };

            if let Some(event) = next {
                return Ok(event);
            }
        }
    }
}
