//! In-memory terminal that records writes and accepts injected keys.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::error::TerminalError;
use crate::repl::key::{key_channel, KeyEnvelope, KeyEvent, KeyReceiver, KeySender, Modifiers};

use super::TerminalWidget;

#[derive(Debug, Default)]
struct MemoryState {
    writes: Vec<String>,
    opened: bool,
    fitted: bool,
    focused: bool,
    fail_writes: bool,
    keys: Option<KeyReceiver>,
}

/// Terminal widget that keeps every `write` call in order.
///
/// Clones share state, so a caller can keep one handle for inspection while
/// the REPL owns another.
#[derive(Debug, Clone)]
pub struct MemoryTerminal {
    state: Arc<Mutex<MemoryState>>,
}

/// Feeds key events into a [`MemoryTerminal`]. Dropping every injector
/// closes the key stream.
#[derive(Debug, Clone)]
pub struct KeyInjector {
    tx: KeySender,
}

impl MemoryTerminal {
    pub fn new() -> (Self, KeyInjector) {
        let (tx, rx) = key_channel();
        let state = MemoryState {
            keys: Some(rx),
            ..MemoryState::default()
        };
        (
            Self {
                state: Arc::new(Mutex::new(state)),
            },
            KeyInjector { tx },
        )
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every written chunk, in order.
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    /// All written text concatenated.
    pub fn output(&self) -> String {
        self.lock().writes.concat()
    }

    pub fn clear_writes(&mut self) {
        self.lock().writes.clear();
    }

    pub fn is_opened(&self) -> bool {
        self.lock().opened
    }

    pub fn is_fitted(&self) -> bool {
        self.lock().fitted
    }

    pub fn is_focused(&self) -> bool {
        self.lock().focused
    }

    /// Make subsequent writes fail with a broken-pipe error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.lock().fail_writes = fail;
    }
}

impl TerminalWidget for MemoryTerminal {
    fn open(&mut self) -> Result<(), TerminalError> {
        self.lock().opened = true;
        Ok(())
    }

    fn fit(&mut self) -> Result<(), TerminalError> {
        self.lock().fitted = true;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), TerminalError> {
        self.lock().focused = true;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), TerminalError> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(TerminalError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "memory terminal closed",
            )));
        }
        state.writes.push(text.to_string());
        Ok(())
    }

    fn on_key(&mut self) -> Result<KeyReceiver, TerminalError> {
        self.lock().keys.take().ok_or(TerminalError::AlreadySubscribed)
    }
}

impl KeyInjector {
    /// Queue an unmodified key press. Returns `false` once the session has
    /// gone away or the queue is full.
    pub fn press(&self, key: &str) -> bool {
        self.send(KeyEnvelope::now(KeyEvent::new(key)))
    }

    pub fn press_with(&self, key: &str, modifiers: Modifiers) -> bool {
        self.send(KeyEnvelope::now(KeyEvent::with_modifiers(key, modifiers)))
    }

    /// Queue a key press stamped with an explicit arrival instant.
    pub fn press_at(&self, key: &str, received_at: Instant) -> bool {
        self.send(KeyEnvelope::at(KeyEvent::new(key), received_at))
    }

    /// Press each character of `text` in order.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|ch| self.press(&ch.to_string()))
    }

    pub fn send(&self, envelope: KeyEnvelope) -> bool {
        self.tx.try_send(envelope).is_ok()
    }
}
