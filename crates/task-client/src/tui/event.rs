//! Event handling for the TUI

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal events
#[derive(Debug, Clone)]
pub enum Event {
    /// Terminal tick (expires notifications)
    Tick,
    /// Key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate in milliseconds
    pub fn new(tick_rate_ms: u64) -> Self {
        let tick_rate = Duration::from_millis(tick_rate_ms);
        let (tx, rx) = mpsc::unbounded_channel();

        // crossterm polling blocks, so keep it off the async workers
        tokio::task::spawn_blocking(move || loop {
            let next = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                        Some(Event::Key(key))
                    }
                    Ok(CrosstermEvent::Resize(w, h)) => Some(Event::Resize(w, h)),
                    _ => None,
                }
            } else {
                Some(Event::Tick)
            };

            if let Some(event) = next {
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Get the next event
    pub async fn next(&mut self) -> Result<Event> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("Event channel closed"))
    }
}
