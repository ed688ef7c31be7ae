//! Line-oriented widget for non-interactive stdin/stdout.
//!
//! Each input line is replayed as one key event per character followed by
//! `Enter`, so piped input goes through the same classification and editing
//! path as typed input.

use std::io::{self, BufRead, Write};
use std::thread;

use crate::error::TerminalError;
use crate::repl::key::{key_channel, KeyEnvelope, KeyEvent, KeyReceiver, KeySender};

use super::TerminalWidget;

/// Widget over a reader/writer pair, stdin/stdout by default.
pub struct PipedTerminal<R = io::BufReader<io::Stdin>, O = io::Stdout> {
    input: Option<R>,
    output: O,
}

impl PipedTerminal {
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, O> PipedTerminal<R, O>
where
    R: BufRead + Send + 'static,
    O: Write,
{
    pub fn new(input: R, output: O) -> Self {
        Self {
            input: Some(input),
            output,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

impl<R, O> TerminalWidget for PipedTerminal<R, O>
where
    R: BufRead + Send + 'static,
    O: Write,
{
    fn open(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }

    fn fit(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }

    fn focus(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }

    fn write(&mut self, text: &str) -> Result<(), TerminalError> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()?;
        Ok(())
    }

    fn on_key(&mut self) -> Result<KeyReceiver, TerminalError> {
        let input = self.input.take().ok_or(TerminalError::AlreadySubscribed)?;
        let (tx, rx) = key_channel();
        thread::Builder::new()
            .name("calcline-stdin".to_string())
            .spawn(move || replay_lines(input, tx))?;
        Ok(rx)
    }
}

fn replay_lines<R: BufRead>(input: R, tx: KeySender) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                tracing::warn!(error = %err, "stdin read failed");
                break;
            }
        };
        let keys = line
            .trim_end_matches('\r')
            .chars()
            .map(|ch| KeyEvent::new(ch.to_string()))
            .chain(std::iter::once(KeyEvent::enter()));
        for event in keys {
            if tx.blocking_send(KeyEnvelope::now(event)).is_err() {
                return;
            }
        }
    }
    tracing::debug!("stdin reached end of input");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn lines_become_characters_then_enter() {
        let mut term = PipedTerminal::new(Cursor::new("1+1\r\n\nab\n"), Vec::new());
        let mut rx = term.on_key().unwrap();

        let mut keys = Vec::new();
        while let Some(envelope) = rx.recv().await {
            keys.push(envelope.event.key);
        }
        assert_eq!(
            keys,
            vec!["1", "+", "1", "Enter", "Enter", "a", "b", "Enter"]
        );
    }

    #[test]
    fn writes_pass_through_unchanged() {
        let mut term = PipedTerminal::new(Cursor::new(""), Vec::new());
        term.write("= 2\n").unwrap();
        term.write("? ").unwrap();
        assert_eq!(term.output().as_slice(), b"= 2\n? ");
    }

    #[test]
    fn stdio_widget_needs_no_setup() {
        let mut term = PipedTerminal::stdio();
        assert!(term.open().is_ok());
        assert!(term.fit().is_ok());
        assert!(term.focus().is_ok());
    }

    #[test]
    fn only_one_subscription() {
        let mut term = PipedTerminal::new(Cursor::new(""), Vec::new());
        assert!(term.on_key().is_ok());
        assert!(matches!(
            term.on_key(),
            Err(TerminalError::AlreadySubscribed)
        ));
    }
}
