//! Key mapping from terminal events to viewer actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    ToggleGrid,
    ToggleVision,
    ToggleBackground,
    /// Re-read the world snapshot from disk.
    Reload,
}

/// Map keyboard input to viewer actions.
pub fn handle_key_event(key: KeyEvent) -> Option<ViewerAction> {
    match key.code {
        KeyCode::Char('g') | KeyCode::Char('G') => Some(ViewerAction::ToggleGrid),
        KeyCode::Char('v') | KeyCode::Char('V') => Some(ViewerAction::ToggleVision),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(ViewerAction::ToggleBackground),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => Some(ViewerAction::Reload),
        _ => None,
    }
}

/// Check if key should quit the viewer.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_toggle_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('g'))),
            Some(ViewerAction::ToggleGrid)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('V'))),
            Some(ViewerAction::ToggleVision)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('b'))),
            Some(ViewerAction::ToggleBackground)
        );
    }

    #[test]
    fn test_reload_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(ViewerAction::Reload)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::F(5))),
            Some(ViewerAction::Reload)
        );
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Left)), None);
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('g'))));
    }
}
