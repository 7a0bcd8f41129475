//! Event types and the main event loop driver for the WikiLoc TUI.
//!
//! This module defines the [`Event`] enum (keyboard input, ticks and display
//! updates from the selection pipeline) and the [`EventHandler`], which runs
//! a background task that polls crossterm for key events and emits periodic
//! [`Event::Tick`]s. The main loop in `main.rs` receives events via
//! [`EventHandler::next`]; pipeline tasks post theirs through an
//! [`EventSurface`] built from [`EventHandler::tx`].

use crate::display::{DisplayContent, DisplaySurface};
use crate::models::Coordinate;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::error;

/// Events processed by the application event loop.
///
/// The main loop in `main.rs` matches on these to update [`App`](crate::app::App) state.
#[derive(Debug)]
pub enum Event {
    /// Periodic tick used for UI refresh.
    Tick,
    /// User key press from the terminal.
    Input(KeyEvent),
    /// A write from the selection pipeline to the map or info panel.
    Display(DisplayUpdate),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    SetPin { at: Coordinate, label: Option<String> },
    RemovePin,
    Content(DisplayContent),
}

/// [`DisplaySurface`] that forwards every write into the event loop.
#[derive(Clone)]
pub struct EventSurface {
    tx: mpsc::UnboundedSender<Event>,
}

impl EventSurface {
    pub fn new(tx: mpsc::UnboundedSender<Event>) -> Self {
        Self { tx }
    }

    fn post(&self, update: DisplayUpdate) {
        // The receiver only goes away on shutdown.
        self.tx.send(Event::Display(update)).ok();
    }
}

impl DisplaySurface for EventSurface {
    fn set_pin(&self, at: Coordinate, label: Option<String>) {
        self.post(DisplayUpdate::SetPin { at, label });
    }

    fn remove_pin(&self) {
        self.post(DisplayUpdate::RemovePin);
    }

    fn set_content(&self, content: DisplayContent) {
        self.post(DisplayUpdate::Content(content));
    }
}

/// Multiplexes terminal input and ticks into a single event stream.
///
/// Holds an unbounded channel: the sender ([`tx`](EventHandler::tx)) can be
/// cloned and given to other tasks, while the receiver is consumed by
/// [`next`](EventHandler::next) in the main loop.
pub struct EventHandler {
    /// Sender for posting events (e.g. from the selection pipeline).
    pub tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates a new event handler and starts the input/tick poller.
    ///
    /// crossterm polling blocks, so it runs on the blocking pool rather than
    /// as an async task. It polls with a timeout of `tick_rate_ms`; key
    /// presses become [`Event::Input`] and elapsed intervals [`Event::Tick`].
    /// The poller stops once the receiver is dropped or the terminal errors.
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::task::spawn_blocking(move || {
            let tick_rate = Duration::from_millis(tick_rate_ms);
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::from_secs(0));
                match event::poll(timeout) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            if event_tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                        Ok(_) => {}
                        Err(e) => {
                            error!("Terminal read failed: {}", e);
                            return;
                        }
                    },
                    Ok(false) => {}
                    Err(e) => {
                        error!("Terminal poll failed: {}", e);
                        return;
                    }
                }
                if last_tick.elapsed() >= tick_rate {
                    if event_tx.send(Event::Tick).is_err() {
                        return;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Receives the next event from the channel.
    ///
    /// Returns `None` when all senders have been dropped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}
