//! Evaluator capability and the bridge the controller calls through.
//!
//! The controller never talks to an evaluator directly: it owns a [`Bridge`],
//! which forwards lines and passes the evaluator's text back unchanged.
//! Evaluators signal failure by returning error text; the bridge does not
//! distinguish it from a result.

pub mod command;
pub mod loader;

use async_trait::async_trait;
use std::time::Instant;

pub use command::CommandEvaluator;
pub use loader::{load, EvaluatorSpec};

/// Something that turns a submitted line into display text.
#[async_trait]
pub trait Evaluator: Send {
    /// Introductory text written once when the REPL starts.
    fn welcome_banner(&self) -> String;

    /// Evaluate one submitted line. The returned text is written verbatim,
    /// so it carries its own trailing newline when it wants one.
    async fn evaluate(&mut self, line: &str) -> String;
}

/// Evaluator backed by a plain function. Handy for embedding and tests.
pub struct FnEvaluator<F> {
    banner: String,
    f: F,
}

impl<F> FnEvaluator<F>
where
    F: FnMut(&str) -> String + Send,
{
    pub fn new(banner: impl Into<String>, f: F) -> Self {
        Self {
            banner: banner.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> Evaluator for FnEvaluator<F>
where
    F: FnMut(&str) -> String + Send,
{
    fn welcome_banner(&self) -> String {
        self.banner.clone()
    }

    async fn evaluate(&mut self, line: &str) -> String {
        (self.f)(line)
    }
}

/// Isolates the controller from the evaluator's calling convention.
pub struct Bridge {
    evaluator: Box<dyn Evaluator>,
    evaluations: u64,
}

impl Bridge {
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            evaluations: 0,
        }
    }

    pub fn welcome_banner(&self) -> String {
        self.evaluator.welcome_banner()
    }

    /// Forward `line` and return the evaluator's text unchanged.
    pub async fn evaluate(&mut self, line: &str) -> String {
        let started = Instant::now();
        let result = self.evaluator.evaluate(line).await;
        self.evaluations += 1;
        tracing::debug!(
            line_chars = line.chars().count(),
            result_bytes = result.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "evaluated line"
        );
        result
    }

    /// Number of completed `evaluate` calls.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bridge_passes_text_through_unchanged() {
        let mut bridge = Bridge::new(Box::new(FnEvaluator::new("hi\n", |line: &str| {
            format!("line one\n{line}\n")
        })));
        assert_eq!(bridge.evaluate("x").await, "line one\nx\n");
        assert_eq!(bridge.welcome_banner(), "hi\n");
    }

    #[tokio::test]
    async fn bridge_does_not_distinguish_error_text() {
        let mut bridge = Bridge::new(Box::new(FnEvaluator::new("", |_: &str| {
            "ERROR: division by zero\n".to_string()
        })));
        assert_eq!(bridge.evaluate("1/0").await, "ERROR: division by zero\n");
    }

    #[tokio::test]
    async fn bridge_counts_evaluations() {
        let mut seen = Vec::new();
        let mut bridge = Bridge::new(Box::new(FnEvaluator::new("", move |line: &str| {
            seen.push(line.to_string());
            seen.len().to_string()
        })));
        assert_eq!(bridge.evaluate("a").await, "1");
        assert_eq!(bridge.evaluate("b").await, "2");
        assert_eq!(bridge.evaluations(), 2);
    }
}
