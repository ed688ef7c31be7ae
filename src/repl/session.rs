//! Session driver: the single dispatch context between widget and controller.
//!
//! Key events travel from the widget over one channel. The session takes one
//! envelope at a time, classifies it, and awaits the controller before
//! taking the next, so a submission's newline, result and prompt are always
//! written before any later key is looked at.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{ReplError, StartupError};
use crate::eval::Bridge;
use crate::term::TerminalWidget;

use super::classify::{classify, InsertPolicy};
use super::controller::{Controller, Outcome, DEFAULT_PROMPT};
use super::key::{KeyEnvelope, KeyReceiver};

/// What happens to keys typed while a submission is being evaluated.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum TypeaheadPolicy {
    /// Keep them and apply them, in order, once the prompt is back.
    #[default]
    Queue,
    /// Drop keys that arrived between the submit key and the new prompt.
    Discard,
}

/// Per-session behaviour knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub prompt: String,
    pub insert_policy: InsertPolicy,
    pub typeahead: TypeaheadPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            insert_policy: InsertPolicy::default(),
            typeahead: TypeaheadPolicy::default(),
        }
    }
}

/// Counters reported when the key stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub keys: u64,
    pub submissions: u64,
    pub discarded: u64,
}

/// Instants bounding the most recent submission.
#[derive(Debug, Clone, Copy)]
struct BusyWindow {
    submitted_at: Instant,
    prompt_at: Instant,
}

impl BusyWindow {
    fn covers(&self, at: Instant) -> bool {
        at >= self.submitted_at && at <= self.prompt_at
    }
}

/// A running REPL: controller plus its key stream.
pub struct Session<W> {
    controller: Controller<W>,
    keys: KeyReceiver,
    insert_policy: InsertPolicy,
    typeahead: TypeaheadPolicy,
}

impl<W: TerminalWidget> Session<W> {
    /// Bring up the widget and REPL.
    ///
    /// Order: open, fit, banner and prompt, focus, then register the key
    /// handler. Nothing is registered if an earlier step fails.
    pub fn start(
        mut terminal: W,
        bridge: Bridge,
        options: &SessionOptions,
    ) -> Result<Self, StartupError> {
        terminal.open()?;
        terminal.fit()?;

        let mut controller = Controller::new(terminal, bridge, options.prompt.clone());
        controller.initialize()?;
        controller.terminal_mut().focus()?;
        let keys = controller.terminal_mut().on_key()?;

        tracing::info!(
            insert_policy = ?options.insert_policy,
            typeahead = ?options.typeahead,
            "repl ready"
        );
        Ok(Self {
            controller,
            keys,
            insert_policy: options.insert_policy,
            typeahead: options.typeahead,
        })
    }

    /// Process key events until the widget closes its stream.
    pub async fn run(&mut self) -> Result<SessionSummary, ReplError> {
        let mut summary = SessionSummary::default();
        let mut busy: Option<BusyWindow> = None;

        while let Some(KeyEnvelope { event, received_at }) = self.keys.recv().await {
            summary.keys += 1;
            if self.typeahead == TypeaheadPolicy::Discard
                && busy.is_some_and(|window| window.covers(received_at))
            {
                summary.discarded += 1;
                tracing::debug!(key = %event.key, "discarded key typed during evaluation");
                continue;
            }

            let action = classify(&event, self.insert_policy);
            tracing::trace!(key = %event.key, ?action, "classified key");
            if self.controller.handle(action).await? == Outcome::Submitted {
                summary.submissions += 1;
                busy = Some(BusyWindow {
                    submitted_at: received_at,
                    prompt_at: Instant::now(),
                });
            }
        }

        tracing::info!(
            keys = summary.keys,
            submissions = summary.submissions,
            discarded = summary.discarded,
            "key stream closed"
        );
        Ok(summary)
    }

    pub fn controller(&self) -> &Controller<W> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::FnEvaluator;
    use crate::term::MemoryTerminal;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn echo_bridge(log: Arc<Mutex<Vec<String>>>) -> Bridge {
        Bridge::new(Box::new(FnEvaluator::new("", move |line: &str| {
            log.lock().unwrap().push(line.to_string());
            format!("[{line}]")
        })))
    }

    #[tokio::test]
    async fn start_runs_setup_in_order_and_subscribes() {
        let (term, _keys) = MemoryTerminal::new();
        let view = term.clone();
        let bridge = Bridge::new(Box::new(FnEvaluator::new("hello\n", |_: &str| String::new())));
        let session = Session::start(term, bridge, &SessionOptions::default()).unwrap();

        assert!(view.is_opened());
        assert!(view.is_fitted());
        assert!(view.is_focused());
        assert_eq!(view.writes(), vec!["hello\n", "? "]);
        assert!(session.controller().is_initialized());
    }

    #[tokio::test]
    async fn start_fails_when_keys_already_taken() {
        let (mut term, _keys) = MemoryTerminal::new();
        let _stolen = term.on_key().unwrap();
        let bridge = Bridge::new(Box::new(FnEvaluator::new("", |_: &str| String::new())));
        let err = Session::start(term, bridge, &SessionOptions::default())
            .err()
            .expect("start should fail");
        assert!(matches!(err, StartupError::Terminal(_)));
    }

    #[tokio::test]
    async fn start_fails_when_banner_cannot_be_written() {
        let (mut term, _keys) = MemoryTerminal::new();
        term.set_fail_writes(true);
        let bridge = Bridge::new(Box::new(FnEvaluator::new("hi", |_: &str| String::new())));
        let err = Session::start(term, bridge, &SessionOptions::default())
            .err()
            .expect("start should fail");
        assert!(matches!(err, StartupError::Repl(ReplError::Terminal(_))));
    }

    #[tokio::test]
    async fn queued_typeahead_is_applied_after_prompt() {
        let (term, keys) = MemoryTerminal::new();
        let view = term.clone();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut session =
            Session::start(term, echo_bridge(log.clone()), &SessionOptions::default()).unwrap();

        let t0 = Instant::now();
        keys.press_at("1", t0);
        keys.press_at("Enter", t0);
        keys.press_at("2", t0);
        keys.press_at("Enter", t0);
        drop(keys);

        let summary = session.run().await.unwrap();
        assert_eq!(summary.submissions, 2);
        assert_eq!(summary.discarded, 0);
        assert_eq!(*log.lock().unwrap(), vec!["1", "2"]);
        assert_eq!(view.output(), "? 1\n[1]? 2\n[2]? ");
    }

    #[tokio::test]
    async fn discard_drops_keys_typed_during_evaluation() {
        let (term, keys) = MemoryTerminal::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let options = SessionOptions {
            typeahead: TypeaheadPolicy::Discard,
            ..SessionOptions::default()
        };
        let mut session = Session::start(term, echo_bridge(log.clone()), &options).unwrap();

        let t0 = Instant::now();
        keys.press_at("1", t0);
        keys.press_at("Enter", t0);
        // Same instant as the submit key: inside the busy window.
        keys.press_at("9", t0);
        // Well after the prompt came back.
        let later = t0 + Duration::from_secs(3600);
        keys.press_at("2", later);
        keys.press_at("Enter", later);
        drop(keys);

        let summary = session.run().await.unwrap();
        assert_eq!(summary.discarded, 1);
        assert_eq!(summary.keys, 5);
        assert_eq!(*log.lock().unwrap(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn run_stops_on_terminal_failure() {
        let (term, keys) = MemoryTerminal::new();
        let mut view = term.clone();
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut session =
            Session::start(term, echo_bridge(log), &SessionOptions::default()).unwrap();

        view.set_fail_writes(true);
        keys.press("x");
        drop(keys);
        assert!(matches!(
            session.run().await,
            Err(ReplError::Terminal(_))
        ));
    }
}
