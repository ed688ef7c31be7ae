//! Raw-mode terminal widget on top of crossterm.

use crossterm::cursor::Show;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::style::Print;
use crossterm::terminal;
use crossterm::{ExecutableCommand, QueueableCommand};
use std::io::{self, Write};
use std::thread;

use crate::error::TerminalError;
use crate::repl::key::{key_channel, KeyEnvelope, KeyReceiver, KeySender};

use super::{keymap, TerminalWidget};

/// Interactive terminal on the process's stdin, writing to `O` (stdout by
/// default).
///
/// `open` switches the terminal to raw mode; it is restored when the widget
/// is dropped. Ctrl-C and Ctrl-D close the key stream.
pub struct TtyTerminal<O = io::Stdout> {
    output: O,
    raw_mode: Option<RawModeGuard>,
    subscribed: bool,
}

impl TtyTerminal {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for TtyTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write> TtyTerminal<O> {
    /// Raw-mode widget whose display output goes to `output`.
    pub fn with_output(output: O) -> Self {
        Self {
            output,
            raw_mode: None,
            subscribed: false,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<O: Write> TerminalWidget for TtyTerminal<O> {
    fn open(&mut self) -> Result<(), TerminalError> {
        if self.raw_mode.is_none() {
            self.raw_mode = Some(RawModeGuard::acquire()?);
        }
        Ok(())
    }

    fn fit(&mut self) -> Result<(), TerminalError> {
        let (cols, rows) = terminal::size()?;
        tracing::debug!(cols, rows, "terminal size");
        Ok(())
    }

    fn focus(&mut self) -> Result<(), TerminalError> {
        self.output.execute(Show)?;
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), TerminalError> {
        // Raw mode disables the terminal's own LF -> CRLF translation.
        let text = text.replace('\n', "\r\n");
        self.output.queue(Print(text))?;
        self.output.flush()?;
        Ok(())
    }

    fn on_key(&mut self) -> Result<KeyReceiver, TerminalError> {
        if self.subscribed {
            return Err(TerminalError::AlreadySubscribed);
        }
        let (tx, rx) = key_channel();
        thread::Builder::new()
            .name("calcline-keys".to_string())
            .spawn(move || read_keys(tx))?;
        self.subscribed = true;
        Ok(rx)
    }
}

/// Blocking reader loop; ends on an exit chord, a read error, or when the
/// session drops its receiver.
fn read_keys(tx: KeySender) {
    loop {
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!(error = %err, "terminal event read failed");
                break;
            }
        };
        if key.kind != KeyEventKind::Press && key.kind != KeyEventKind::Repeat {
            continue;
        }
        if keymap::is_exit_chord(&key) {
            tracing::debug!("exit chord pressed");
            break;
        }
        let Some(event) = keymap::translate(&key) else {
            continue;
        };
        if tx.blocking_send(KeyEnvelope::now(event)).is_err() {
            break;
        }
    }
}

/// Enables raw mode for its lifetime.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
