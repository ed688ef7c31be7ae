//! Diagnostics printed outside the REPL: startup failures and the exit note.
//!
//! Everything goes to stderr so stdout carries only the session itself.

use crossterm::style::{Color, Stylize};

pub const LABEL_ERROR: &str = "error:";
pub const LABEL_NOTE: &str = "note:";

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn error(&self, msg: &str) {
        eprintln!("\r{}", self.line(LABEL_ERROR, Color::Red, msg));
    }

    pub fn note(&self, msg: &str) {
        eprintln!("\r{}", self.line(LABEL_NOTE, Color::DarkGrey, msg));
    }

    fn line(&self, label: &str, color: Color, msg: &str) -> String {
        if self.color {
            format!("{} {msg}", label.with(color).bold())
        } else {
            format!("{label} {msg}")
        }
    }
}
