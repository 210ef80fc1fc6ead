//! UI actions. Every state change goes through one of these.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use sdnview_core::RenderFrame;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    /// One refresh pass in the background.
    Refresh,
    ToggleAuto,
    /// Terminal resized to (cols, rows).
    Resize(u16, u16),
    FrameReady(Arc<RenderFrame>),
    Render,
}

/// Global key bindings.
pub fn for_key(key: KeyEvent) -> Option<Action> {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c'))
        | (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc) => Some(Action::Quit),
        (KeyModifiers::NONE, KeyCode::Char('r')) => Some(Action::Refresh),
        (KeyModifiers::NONE, KeyCode::Char('a')) => Some(Action::ToggleAuto),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn char_key(c: char) -> Option<Action> {
        for_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn bindings() {
        assert!(matches!(char_key('q'), Some(Action::Quit)));
        assert!(matches!(char_key('r'), Some(Action::Refresh)));
        assert!(matches!(char_key('a'), Some(Action::ToggleAuto)));
        assert!(char_key('x').is_none());

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(for_key(ctrl_c), Some(Action::Quit)));
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(for_key(esc), Some(Action::Quit)));
    }
}
