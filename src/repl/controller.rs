//! Line buffer and prompt controller.
//!
//! The controller is the only mutator of the input line. Each action runs to
//! completion, including the evaluator round trip on submit, before the
//! caller can hand it the next one.

use crate::error::ReplError;
use crate::eval::Bridge;
use crate::term::{TerminalWidget, ERASE_BACK};

use super::buffer::InputBuffer;
use super::classify::EditAction;

/// Prompt written after the banner and after every result.
pub const DEFAULT_PROMPT: &str = "? ";

/// What an action did to the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The buffer changed (insert or delete).
    Edited,
    /// Nothing changed and nothing was written.
    Unchanged,
    /// The line was evaluated and a fresh prompt written.
    Submitted,
}

/// Owns the input line and drives the prompt lifecycle over a widget.
pub struct Controller<W> {
    terminal: W,
    bridge: Bridge,
    buffer: InputBuffer,
    prompt: String,
    initialized: bool,
}

impl<W: TerminalWidget> Controller<W> {
    pub fn new(terminal: W, bridge: Bridge, prompt: impl Into<String>) -> Self {
        Self {
            terminal,
            bridge,
            buffer: InputBuffer::new(),
            prompt: prompt.into(),
            initialized: false,
        }
    }

    /// Write the welcome banner followed by the first prompt. Runs once.
    pub fn initialize(&mut self) -> Result<(), ReplError> {
        if self.initialized {
            return Err(ReplError::AlreadyInitialized);
        }
        let banner = self.bridge.welcome_banner();
        self.terminal.write(&banner)?;
        self.terminal.write(&self.prompt)?;
        self.initialized = true;
        Ok(())
    }

    /// Apply one edit action.
    ///
    /// `DeleteBack` removes one character from the buffer and writes a
    /// single [`ERASE_BACK`], which clears one terminal cell. A wide glyph
    /// (CJK, most emoji) occupies two cells, so half of it stays visible on
    /// screen even though the buffer no longer holds it.
    pub async fn handle(&mut self, action: EditAction) -> Result<Outcome, ReplError> {
        if !self.initialized {
            return Err(ReplError::NotInitialized);
        }
        match action {
            EditAction::Insert(text) => {
                if !self.buffer.push_str(&text) {
                    return Ok(Outcome::Unchanged);
                }
                // Local echo; the widget does not echo on its own.
                self.terminal.write(&text)?;
                Ok(Outcome::Edited)
            }
            EditAction::DeleteBack => {
                if self.buffer.pop().is_none() {
                    return Ok(Outcome::Unchanged);
                }
                self.terminal.write(ERASE_BACK)?;
                Ok(Outcome::Edited)
            }
            EditAction::Submit => {
                self.submit().await?;
                Ok(Outcome::Submitted)
            }
            EditAction::Ignore => Ok(Outcome::Unchanged),
        }
    }

    async fn submit(&mut self) -> Result<(), ReplError> {
        self.terminal.write("\n")?;
        let result = self.bridge.evaluate(self.buffer.as_str()).await;
        self.terminal.write(&result)?;
        self.terminal.write(&self.prompt)?;
        self.buffer.clear();
        Ok(())
    }

    /// Current unsubmitted line.
    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn terminal(&self) -> &W {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut W {
        &mut self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::FnEvaluator;
    use crate::term::MemoryTerminal;

    fn controller_with<F>(f: F) -> (Controller<MemoryTerminal>, MemoryTerminal)
    where
        F: FnMut(&str) -> String + Send + 'static,
    {
        let (term, _keys) = MemoryTerminal::new();
        let view = term.clone();
        let bridge = Bridge::new(Box::new(FnEvaluator::new("welcome\n", f)));
        (Controller::new(term, bridge, DEFAULT_PROMPT), view)
    }

    fn insert(text: &str) -> EditAction {
        EditAction::Insert(text.to_string())
    }

    #[test]
    fn initialize_writes_banner_then_prompt() {
        let (mut controller, view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        assert_eq!(view.writes(), vec!["welcome\n", "? "]);
    }

    #[test]
    fn initialize_twice_is_rejected_without_output() {
        let (mut controller, view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        let err = controller.initialize().unwrap_err();
        assert!(matches!(err, ReplError::AlreadyInitialized));
        assert_eq!(view.writes().len(), 2);
    }

    #[tokio::test]
    async fn handle_before_initialize_is_rejected() {
        let (mut controller, view) = controller_with(|_: &str| String::new());
        let err = controller.handle(insert("1")).await.unwrap_err();
        assert!(matches!(err, ReplError::NotInitialized));
        assert!(view.writes().is_empty());
        assert_eq!(controller.buffer(), "");
    }

    #[tokio::test]
    async fn inserts_echo_and_accumulate() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        view.clear_writes();

        for key in ["4", "*", "2"] {
            assert_eq!(controller.handle(insert(key)).await.unwrap(), Outcome::Edited);
        }
        assert_eq!(controller.buffer(), "4*2");
        assert_eq!(view.writes(), vec!["4", "*", "2"]);
    }

    #[tokio::test]
    async fn delete_back_on_empty_buffer_is_silent() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        view.clear_writes();

        let outcome = controller.handle(EditAction::DeleteBack).await.unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(view.writes().is_empty());
        assert_eq!(controller.buffer(), "");
    }

    #[tokio::test]
    async fn delete_back_erases_last_character() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        controller.handle(insert("a")).await.unwrap();
        controller.handle(insert("b")).await.unwrap();
        view.clear_writes();

        controller.handle(EditAction::DeleteBack).await.unwrap();
        assert_eq!(controller.buffer(), "a");
        assert_eq!(view.writes(), vec!["\u{8} \u{8}"]);
    }

    #[tokio::test]
    async fn ignore_changes_nothing() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        controller.handle(insert("7")).await.unwrap();
        view.clear_writes();

        let outcome = controller.handle(EditAction::Ignore).await.unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(controller.buffer(), "7");
        assert!(view.writes().is_empty());
    }

    #[tokio::test]
    async fn submit_writes_newline_result_prompt_and_resets() {
        let (mut controller, mut view) =
            controller_with(|line: &str| format!("= {}\n", line.len()));
        controller.initialize().unwrap();
        controller.handle(insert("1")).await.unwrap();
        controller.handle(insert("+")).await.unwrap();
        view.clear_writes();

        let outcome = controller.handle(EditAction::Submit).await.unwrap();
        assert_eq!(outcome, Outcome::Submitted);
        assert_eq!(view.writes(), vec!["\n", "= 2\n", "? "]);
        assert_eq!(controller.buffer(), "");
        assert_eq!(controller.bridge().evaluations(), 1);
    }

    #[tokio::test]
    async fn insert_with_control_character_is_dropped() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        view.clear_writes();

        let outcome = controller.handle(insert("\t")).await.unwrap();
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(view.writes().is_empty());
    }

    #[tokio::test]
    async fn write_failure_propagates() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        view.set_fail_writes(true);

        let err = controller.handle(insert("1")).await.unwrap_err();
        assert!(matches!(err, ReplError::Terminal(_)));
    }

    #[tokio::test]
    async fn custom_prompt_follows_every_result() {
        let (term, _keys) = MemoryTerminal::new();
        let view = term.clone();
        let bridge = Bridge::new(Box::new(FnEvaluator::new("", |_: &str| "ok\n".to_string())));
        let mut controller = Controller::new(term, bridge, ">> ");
        controller.initialize().unwrap();
        controller.handle(EditAction::Submit).await.unwrap();
        controller.handle(EditAction::Submit).await.unwrap();
        assert_eq!(
            view.writes(),
            vec!["", ">> ", "\n", "ok\n", ">> ", "\n", "ok\n", ">> "]
        );
    }

    #[tokio::test]
    async fn delete_back_on_wide_glyph_erases_one_cell() {
        let (mut controller, mut view) = controller_with(|_: &str| String::new());
        controller.initialize().unwrap();
        controller.handle(insert("1")).await.unwrap();
        controller.handle(insert("漢")).await.unwrap();
        view.clear_writes();

        controller.handle(EditAction::DeleteBack).await.unwrap();
        assert_eq!(controller.buffer(), "1");
        assert_eq!(view.writes(), vec![ERASE_BACK]);
    }

    #[cfg(feature = "fuzz-tests")]
    mod prop_tests {
        use super::*;
        use crate::repl::classify::{classify, InsertPolicy};
        use crate::repl::key::KeyEvent;
        use proptest::prelude::*;

        fn printable() -> impl Strategy<Value = char> {
            any::<char>().prop_filter("printable", |ch| !ch.is_control())
        }

        proptest! {
            #[test]
            fn printable_keys_accumulate_in_arrival_order(
                keys in proptest::collection::vec(printable(), 0..32)
            ) {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .expect("runtime");
                let (mut controller, mut view) = controller_with(|_: &str| String::new());
                controller.initialize().expect("initialize");
                view.clear_writes();

                for key in &keys {
                    let action = classify(&KeyEvent::new(key.to_string()), InsertPolicy::SingleChar);
                    let outcome = runtime.block_on(controller.handle(action)).expect("handle");
                    prop_assert_eq!(outcome, Outcome::Edited);
                }

                let expected: String = keys.iter().collect();
                prop_assert_eq!(controller.buffer(), expected.as_str());
                prop_assert_eq!(view.output(), expected);
            }
        }
    }
}
