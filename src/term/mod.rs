//! Terminal widgets: the write sink and key event source the REPL drives.
//!
//! The core treats a widget as write-only output plus a single key event
//! channel, and never reads back cursor or scrollback state.

pub mod keymap;
pub mod memory;
pub mod piped;
pub mod tty;

use crate::error::TerminalError;
use crate::repl::key::KeyReceiver;

pub use memory::{KeyInjector, MemoryTerminal};
pub use piped::PipedTerminal;
pub use tty::TtyTerminal;

/// Destructive backspace: move left, overwrite with a space, move left.
pub const ERASE_BACK: &str = "\u{8} \u{8}";

/// Display surface plus key event source.
pub trait TerminalWidget {
    /// One-time setup before anything is written.
    fn open(&mut self) -> Result<(), TerminalError>;

    /// Resize to the hosting container.
    fn fit(&mut self) -> Result<(), TerminalError>;

    /// Give the widget input focus.
    fn focus(&mut self) -> Result<(), TerminalError>;

    /// Append `text` to the display. `text` may embed `\n` and
    /// [`ERASE_BACK`] sequences.
    fn write(&mut self, text: &str) -> Result<(), TerminalError>;

    /// Register the sole key handler and return its event stream.
    ///
    /// Fails with [`TerminalError::AlreadySubscribed`] on a second call.
    fn on_key(&mut self) -> Result<KeyReceiver, TerminalError>;
}
