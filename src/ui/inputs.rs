use super::AppAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Convert a raw `KeyEvent` from crossterm into a high-level [`AppAction`].
/// Returns `None` for keys that are not handled by the UI.
pub fn key_event_to_action(ev: &KeyEvent) -> Option<AppAction> {
    use KeyCode::*;
    if ev.kind == KeyEventKind::Release {
        return None;
    }
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        return match ev.code {
            Char('c') => Some(AppAction::Quit),
            _ => None,
        };
    }
    match ev.code {
        Char('q') | Esc => Some(AppAction::Quit),
        Up | Char('k') => Some(AppAction::Up),
        Down | Char('j') => Some(AppAction::Down),
        PageUp => Some(AppAction::PageUp),
        PageDown | Char(' ') => Some(AppAction::PageDown),
        Home | Char('g') => Some(AppAction::Top),
        End | Char('G') => Some(AppAction::Bottom),
        Left | Char('h') => Some(AppAction::Left),
        Right | Char('l') => Some(AppAction::Right),
        Char('t') => Some(AppAction::ToggleTheme),
        Char('?') => Some(AppAction::Help),
        _ => None,
    }
}
