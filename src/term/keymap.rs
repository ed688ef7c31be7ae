//! Translation from crossterm key events to DOM-style key identifiers.

use crossterm::event::{KeyCode, KeyEvent as CtKeyEvent, KeyModifiers, ModifierKeyCode};

use crate::repl::key::{KeyEvent, Modifiers};

/// Translate one crossterm key press. Keys with no sensible identifier
/// (media keys, lock keys, `Null`) yield `None`.
pub fn translate(key: &CtKeyEvent) -> Option<KeyEvent> {
    let name = key_name(key.code)?;
    Some(KeyEvent::with_modifiers(name, modifiers(key.modifiers)))
}

/// True for the chords the terminal widget reserves for closing the session.
pub fn is_exit_chord(key: &CtKeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d'))
}

fn modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        alt: mods.contains(KeyModifiers::ALT),
        ctrl: mods.contains(KeyModifiers::CONTROL),
        meta: mods.intersects(KeyModifiers::SUPER | KeyModifiers::META),
    }
}

fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(ch) => return Some(ch.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        KeyCode::Modifier(modifier) => modifier_name(modifier),
        KeyCode::Enter => "Enter",
        KeyCode::Backspace => "Backspace",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Esc => "Escape",
        KeyCode::CapsLock => "CapsLock",
        KeyCode::Menu => "ContextMenu",
        _ => return None,
    };
    Some(name.to_string())
}

fn modifier_name(modifier: ModifierKeyCode) -> &'static str {
    match modifier {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        ModifierKeyCode::LeftSuper | ModifierKeyCode::RightSuper => "Super",
        ModifierKeyCode::LeftHyper | ModifierKeyCode::RightHyper => "Hyper",
        ModifierKeyCode::LeftMeta | ModifierKeyCode::RightMeta => "Meta",
        ModifierKeyCode::IsoLevel3Shift => "AltGraph",
        ModifierKeyCode::IsoLevel5Shift => "Level5Shift",
    }
}
