//! Event handling for the TUI
//!
//! Bridges crossterm's blocking event poll to the async main loop. A
//! dedicated thread polls the terminal and forwards events over an
//! unbounded channel, emitting a Tick whenever the tick rate elapses
//! without input.

use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use eyre::Result;
use tokio::sync::mpsc;
use tracing::debug;

/// Events that can occur in the TUI
#[derive(Debug, Clone)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize (width, height)
    Resize(u16, u16),
    /// Periodic tick for refreshing data
    Tick,
}

/// Handles terminal events and periodic ticks
#[derive(Debug)]
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Create a new event handler with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        debug!("EventHandler::new: tick_rate={:?}", tick_rate);
        let (sender, receiver) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                match event::poll(timeout) {
                    Ok(true) => {
                        let send_result = match event::read() {
                            // Only forward key presses, not releases
                            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                                sender.send(Event::Key(key))
                            }
                            Ok(CrosstermEvent::Mouse(mouse)) => sender.send(Event::Mouse(mouse)),
                            Ok(CrosstermEvent::Resize(width, height)) => {
                                sender.send(Event::Resize(width, height))
                            }
                            Ok(_) => Ok(()),
                            Err(e) => {
                                debug!("EventHandler: read error: {}", e);
                                break;
                            }
                        };
                        if send_result.is_err() {
                            // Receiver dropped, exit the thread
                            break;
                        }
                    }
                    Ok(false) => {
                        if last_tick.elapsed() >= tick_rate {
                            if sender.send(Event::Tick).is_err() {
                                break;
                            }
                            last_tick = Instant::now();
                        }
                    }
                    Err(e) => {
                        debug!("EventHandler: poll error: {}", e);
                        break;
                    }
                }
            }
            debug!("EventHandler: event thread exiting");
        });

        Self { receiver }
    }

    /// Wait for the next event
    pub async fn next(&mut self) -> Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| eyre::eyre!("Event channel closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_handler_creation() {
        // Just verify we can create one without panicking; polling the
        // terminal needs a real TTY, so no events are asserted here.
        let _handler = EventHandler::new(Duration::from_millis(100));
    }
}
