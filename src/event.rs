use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

pub enum AppEvent {
    Key(KeyEvent),
    /// Drives exercise completion delays.
    Tick,
    Resize,
}

/// Terminal input pump on a background thread.
pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let app_event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        // Windows reports releases too.
                        Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                            AppEvent::Key(key)
                        }
                        Ok(Event::Resize(..)) => AppEvent::Resize,
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if tx.send(app_event).is_err() {
                    return;
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
