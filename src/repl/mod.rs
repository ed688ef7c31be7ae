//! The REPL core: key classification, line editing and the session loop.
//!
//! - `key` defines raw key events and the widget-to-session channel.
//! - `classify` maps key events to edit actions.
//! - `buffer` holds the unsubmitted line.
//! - `controller` applies actions and owns the prompt lifecycle.
//! - `session` drives the controller from the key channel.

pub mod buffer;
pub mod classify;
pub mod controller;
pub mod key;
pub mod session;

pub use buffer::InputBuffer;
pub use classify::{classify, EditAction, InsertPolicy};
pub use controller::{Controller, Outcome, DEFAULT_PROMPT};
pub use key::{key_channel, KeyEnvelope, KeyEvent, KeyReceiver, KeySender, Modifiers};
pub use session::{Session, SessionOptions, SessionSummary, TypeaheadPolicy};
