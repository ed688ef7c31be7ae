//! calcline: an interactive line-editing console in front of an evaluator.
//!
//! Key events from a terminal widget are classified into edit actions, applied
//! to a line buffer, and on Enter the line is handed to an evaluator whose
//! result is written back followed by a fresh prompt. Only one line is ever
//! being evaluated at a time.
//!
//! # Quick start
//!
//! ```no_run
//! use calcline::calc::Calculator;
//! use calcline::eval::Bridge;
//! use calcline::repl::{Session, SessionOptions};
//! use calcline::term::TtyTerminal;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bridge = Bridge::new(Box::new(Calculator::new()));
//! let mut session = Session::start(TtyTerminal::new(), bridge, &SessionOptions::default())?;
//! let summary = session.run().await?;
//! println!("{} lines evaluated", summary.submissions);
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod calc;
pub mod cli;
pub mod config;
pub mod error;
pub mod eval;
pub mod logging;
pub mod render;
pub mod repl;
pub mod term;
#[cfg(test)]
pub mod testsupport;
