//! Key event classification into edit actions.
//!
//! Classification is pure and total: every key event maps to exactly one
//! [`EditAction`], and the same event always maps to the same action.

use serde::{Deserialize, Serialize};

use super::key::{KeyEvent, KEY_BACKSPACE, KEY_ENTER};

/// Normalized effect of one key press on the input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    /// Evaluate the current line.
    Submit,
    /// Remove the last character, if any.
    DeleteBack,
    /// No effect.
    Ignore,
    /// Append text to the line. One character under [`InsertPolicy::SingleChar`].
    Insert(String),
}

/// How unmodified keys outside the editing set become insertions.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InsertPolicy {
    /// Only identifiers consisting of exactly one printable character insert.
    #[default]
    SingleChar,
    /// Any unmodified identifier is inserted as typed, including names such
    /// as `"Shift"` or `"F1"`.
    Verbatim,
}

/// Map a key event to the edit action it triggers. First matching rule wins.
pub fn classify(event: &KeyEvent, policy: InsertPolicy) -> EditAction {
    let key = event.key.as_str();

    if key == KEY_ENTER {
        return EditAction::Submit;
    }
    if key == KEY_BACKSPACE {
        return EditAction::DeleteBack;
    }
    if key.starts_with("Arrow") || key.starts_with("Page") || key == "Home" || key == "End" {
        return EditAction::Ignore;
    }
    if event.modifiers.any() {
        return EditAction::Ignore;
    }

    insertion(key, policy).unwrap_or(EditAction::Ignore)
}

fn insertion(key: &str, policy: InsertPolicy) -> Option<EditAction> {
    // Control characters never reach the input buffer under either policy.
    if key.is_empty() || key.chars().any(char::is_control) {
        return None;
    }
    match policy {
        InsertPolicy::SingleChar => {
            let mut chars = key.chars();
            let ch = chars.next()?;
            chars
                .next()
                .is_none()
                .then(|| EditAction::Insert(ch.to_string()))
        }
        InsertPolicy::Verbatim => Some(EditAction::Insert(key.to_string())),
    }
}
