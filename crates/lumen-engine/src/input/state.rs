use std::collections::HashSet;

use crate::backend::PlatformEvent;

use super::keys::KeyCode;

/// Keys currently held down in the window.
///
/// Only tracks "is down". A key pressed and released between two polls is never
/// observed as held.
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<KeyCode>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one platform event into the state.
    pub fn apply(&mut self, ev: &PlatformEvent) {
        match ev {
            PlatformEvent::Key { code, pressed: true } => {
                self.down.insert(*code);
            }
            PlatformEvent::Key { code, pressed: false } => {
                self.down.remove(code);
            }
            PlatformEvent::FocusLost => {
                // Releases are not delivered to an unfocused window.
                self.down.clear();
            }
            PlatformEvent::Resized { .. } | PlatformEvent::CloseRequested => {}
        }
    }

    pub fn clear(&mut self) {
        self.down.clear();
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.down.contains(&code)
    }

    /// Held key codes in ascending order.
    pub fn pressed_codes(&self) -> Vec<i32> {
        let mut codes: Vec<i32> = self.down.iter().map(|k| k.0).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, pressed: bool) -> PlatformEvent {
        PlatformEvent::Key { code, pressed }
    }

    #[test]
    fn press_then_release_leaves_nothing_held() {
        let mut s = KeyboardState::new();
        s.apply(&key(KeyCode::SPACE, true));
        s.apply(&key(KeyCode::SPACE, false));
        assert!(s.pressed_codes().is_empty());
    }

    #[test]
    fn codes_are_sorted() {
        let mut s = KeyboardState::new();
        s.apply(&key(KeyCode::ESCAPE, true));
        s.apply(&key(KeyCode(65), true));
        s.apply(&key(KeyCode::SPACE, true));
        assert_eq!(s.pressed_codes(), vec![32, 65, 256]);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut s = KeyboardState::new();
        s.apply(&key(KeyCode::UP, true));
        s.apply(&PlatformEvent::FocusLost);
        assert!(!s.is_down(KeyCode::UP));
    }

    #[test]
    fn clear_forgets_held_keys() {
        let mut s = KeyboardState::new();
        s.apply(&key(KeyCode::SPACE, true));
        s.apply(&key(KeyCode::ESCAPE, true));
        s.clear();
        assert!(s.pressed_codes().is_empty());
        assert!(!s.is_down(KeyCode::SPACE));
    }
}
