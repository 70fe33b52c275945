use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode as WinitKey, PhysicalKey};

use crate::input::KeyCode;

/// Translates a winit keyboard event into `(code, pressed)`.
///
/// Returns `None` for keys without a host code. Key repeats report `pressed = true`
/// again; the keyboard state ignores the duplicate.
pub fn translate_key_event(event: &KeyEvent) -> Option<(KeyCode, bool)> {
    let code = map_key(event.physical_key)?;
    let pressed = matches!(event.state, ElementState::Pressed);
    Some((code, pressed))
}

/// Maps a physical key (layout-independent position) to its host key code.
pub fn map_key(pk: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = pk else {
        // winit 0.30 uses NativeKeyCode; no stable numeric is guaranteed here.
        return None;
    };

    let key = match code {
        WinitKey::Space => KeyCode::SPACE,
        WinitKey::Quote => KeyCode::APOSTROPHE,
        WinitKey::Comma => KeyCode::COMMA,
        WinitKey::Minus => KeyCode::MINUS,
        WinitKey::Period => KeyCode::PERIOD,
        WinitKey::Slash => KeyCode::SLASH,
        WinitKey::Semicolon => KeyCode::SEMICOLON,
        WinitKey::Equal => KeyCode::EQUAL,
        WinitKey::BracketLeft => KeyCode::LEFT_BRACKET,
        WinitKey::Backslash => KeyCode::BACKSLASH,
        WinitKey::BracketRight => KeyCode::RIGHT_BRACKET,
        WinitKey::Backquote => KeyCode::GRAVE_ACCENT,

        WinitKey::Digit0 => KeyCode(48),
        WinitKey::Digit1 => KeyCode(49),
        WinitKey::Digit2 => KeyCode(50),
        WinitKey::Digit3 => KeyCode(51),
        WinitKey::Digit4 => KeyCode(52),
        WinitKey::Digit5 => KeyCode(53),
        WinitKey::Digit6 => KeyCode(54),
        WinitKey::Digit7 => KeyCode(55),
        WinitKey::Digit8 => KeyCode(56),
        WinitKey::Digit9 => KeyCode(57),

        WinitKey::KeyA => KeyCode(65),
        WinitKey::KeyB => KeyCode(66),
        WinitKey::KeyC => KeyCode(67),
        WinitKey::KeyD => KeyCode(68),
        WinitKey::KeyE => KeyCode(69),
        WinitKey::KeyF => KeyCode(70),
        WinitKey::KeyG => KeyCode(71),
        WinitKey::KeyH => KeyCode(72),
        WinitKey::KeyI => KeyCode(73),
        WinitKey::KeyJ => KeyCode(74),
        WinitKey::KeyK => KeyCode(75),
        WinitKey::KeyL => KeyCode(76),
        WinitKey::KeyM => KeyCode(77),
        WinitKey::KeyN => KeyCode(78),
        WinitKey::KeyO => KeyCode(79),
        WinitKey::KeyP => KeyCode(80),
        WinitKey::KeyQ => KeyCode(81),
        WinitKey::KeyR => KeyCode(82),
        WinitKey::KeyS => KeyCode(83),
        WinitKey::KeyT => KeyCode(84),
        WinitKey::KeyU => KeyCode(85),
        WinitKey::KeyV => KeyCode(86),
        WinitKey::KeyW => KeyCode(87),
        WinitKey::KeyX => KeyCode(88),
        WinitKey::KeyY => KeyCode(89),
        WinitKey::KeyZ => KeyCode(90),

        WinitKey::Escape => KeyCode::ESCAPE,
        WinitKey::Enter => KeyCode::ENTER,
        WinitKey::Tab => KeyCode::TAB,
        WinitKey::Backspace => KeyCode::BACKSPACE,
        WinitKey::Insert => KeyCode::INSERT,
        WinitKey::Delete => KeyCode::DELETE,
        WinitKey::ArrowRight => KeyCode::RIGHT,
        WinitKey::ArrowLeft => KeyCode::LEFT,
        WinitKey::ArrowDown => KeyCode::DOWN,
        WinitKey::ArrowUp => KeyCode::UP,
        WinitKey::PageUp => KeyCode::PAGE_UP,
        WinitKey::PageDown => KeyCode::PAGE_DOWN,
        WinitKey::Home => KeyCode::HOME,
        WinitKey::End => KeyCode::END,
        WinitKey::CapsLock => KeyCode::CAPS_LOCK,
        WinitKey::ScrollLock => KeyCode::SCROLL_LOCK,
        WinitKey::NumLock => KeyCode::NUM_LOCK,
        WinitKey::PrintScreen => KeyCode::PRINT_SCREEN,
        WinitKey::Pause => KeyCode::PAUSE,

        WinitKey::F1 => KeyCode(290),
        WinitKey::F2 => KeyCode(291),
        WinitKey::F3 => KeyCode(292),
        WinitKey::F4 => KeyCode(293),
        WinitKey::F5 => KeyCode(294),
        WinitKey::F6 => KeyCode(295),
        WinitKey::F7 => KeyCode(296),
        WinitKey::F8 => KeyCode(297),
        WinitKey::F9 => KeyCode(298),
        WinitKey::F10 => KeyCode(299),
        WinitKey::F11 => KeyCode(300),
        WinitKey::F12 => KeyCode(301),

        WinitKey::Numpad0 => KeyCode(320),
        WinitKey::Numpad1 => KeyCode(321),
        WinitKey::Numpad2 => KeyCode(322),
        WinitKey::Numpad3 => KeyCode(323),
        WinitKey::Numpad4 => KeyCode(324),
        WinitKey::Numpad5 => KeyCode(325),
        WinitKey::Numpad6 => KeyCode(326),
        WinitKey::Numpad7 => KeyCode(327),
        WinitKey::Numpad8 => KeyCode(328),
        WinitKey::Numpad9 => KeyCode(329),
        WinitKey::NumpadDecimal => KeyCode::KP_DECIMAL,
        WinitKey::NumpadDivide => KeyCode::KP_DIVIDE,
        WinitKey::NumpadMultiply => KeyCode::KP_MULTIPLY,
        WinitKey::NumpadSubtract => KeyCode::KP_SUBTRACT,
        WinitKey::NumpadAdd => KeyCode::KP_ADD,
        WinitKey::NumpadEnter => KeyCode::KP_ENTER,
        WinitKey::NumpadEqual => KeyCode::KP_EQUAL,

        WinitKey::ShiftLeft => KeyCode::LEFT_SHIFT,
        WinitKey::ControlLeft => KeyCode::LEFT_CONTROL,
        WinitKey::AltLeft => KeyCode::LEFT_ALT,
        WinitKey::SuperLeft => KeyCode::LEFT_SUPER,
        WinitKey::ShiftRight => KeyCode::RIGHT_SHIFT,
        WinitKey::ControlRight => KeyCode::RIGHT_CONTROL,
        WinitKey::AltRight => KeyCode::RIGHT_ALT,
        WinitKey::SuperRight => KeyCode::RIGHT_SUPER,
        WinitKey::ContextMenu => KeyCode::MENU,

        _ => return None,
    };

    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_use_ascii() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::KeyA)), KeyCode::letter('a'));
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::Digit7)), KeyCode::digit(7));
    }

    #[test]
    fn numbered_blocks_line_up() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::F12)), KeyCode::function(12));
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::Numpad5)), KeyCode::keypad(5));
    }

    #[test]
    fn escape_and_unmapped_keys() {
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::Escape)), Some(KeyCode::ESCAPE));
        assert_eq!(map_key(PhysicalKey::Code(WinitKey::AudioVolumeUp)), None);
    }
}
