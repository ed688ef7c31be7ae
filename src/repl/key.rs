//! Raw key events and the channel that carries them from widget to session.

use std::time::Instant;
use tokio::sync::mpsc;

/// Identifier emitted for the submit key.
pub const KEY_ENTER: &str = "Enter";
/// Identifier emitted for the delete-back key.
pub const KEY_BACKSPACE: &str = "Backspace";

/// Buffered key events a widget may produce ahead of the session.
pub const KEY_CHANNEL_CAPACITY: usize = 256;

/// Modifier flags attached to a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        alt: false,
        ctrl: true,
        meta: false,
    };

    pub const ALT: Self = Self {
        alt: true,
        ctrl: false,
        meta: false,
    };

    pub const META: Self = Self {
        alt: false,
        ctrl: false,
        meta: true,
    };

    /// True when any of alt/ctrl/meta is held.
    pub fn any(self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

/// One key press as reported by a terminal widget.
///
/// `key` follows DOM `KeyboardEvent.key` naming: printable keys carry the
/// character itself (`"a"`, `"+"`), named keys carry their name (`"Enter"`,
/// `"ArrowLeft"`, `"Shift"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Unmodified key press.
    pub fn new(key: impl Into<String>) -> Self {
        Self::with_modifiers(key, Modifiers::NONE)
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    pub fn enter() -> Self {
        Self::new(KEY_ENTER)
    }

    pub fn backspace() -> Self {
        Self::new(KEY_BACKSPACE)
    }
}

/// A key event stamped with the instant the widget produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEnvelope {
    pub event: KeyEvent,
    pub received_at: Instant,
}

impl KeyEnvelope {
    /// Stamp `event` with the current instant.
    pub fn now(event: KeyEvent) -> Self {
        Self::at(event, Instant::now())
    }

    pub fn at(event: KeyEvent, received_at: Instant) -> Self {
        Self { event, received_at }
    }
}

/// Producer half held by the widget.
pub type KeySender = mpsc::Sender<KeyEnvelope>;
/// Consumer half held by the session.
pub type KeyReceiver = mpsc::Receiver<KeyEnvelope>;

/// Create the bounded widget-to-session key channel.
pub fn key_channel() -> (KeySender, KeyReceiver) {
    mpsc::channel(KEY_CHANNEL_CAPACITY)
}
