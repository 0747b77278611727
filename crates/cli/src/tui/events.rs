//! Key mapping for the offer picker

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use scout_lib::Key;

/// Parse a terminal key event into a picker key
///
/// Raw mode swallows SIGINT, so Ctrl-C quits like `q`.
pub fn key_from_event(key: &KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    Some(match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Key::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Char('Q'), _) => Key::Quit,
        (KeyCode::Up, _) => Key::Up,
        (KeyCode::Down, _) => Key::Down,
        (KeyCode::Enter, _) => Key::Enter,
        _ => Key::Other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(key_from_event(&press(KeyCode::Char('q'))), Some(Key::Quit));
        assert_eq!(
            key_from_event(&KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Key::Quit)
        );

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_from_event(&ctrl_c), Some(Key::Quit));
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(key_from_event(&press(KeyCode::Up)), Some(Key::Up));
        assert_eq!(key_from_event(&press(KeyCode::Down)), Some(Key::Down));
        assert_eq!(key_from_event(&press(KeyCode::Enter)), Some(Key::Enter));
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(key_from_event(&press(KeyCode::Char('c'))), Some(Key::Other));
        assert_eq!(key_from_event(&press(KeyCode::Esc)), Some(Key::Other));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut release = press(KeyCode::Down);
        release.kind = KeyEventKind::Release;
        assert_eq!(key_from_event(&release), None);
    }
}
