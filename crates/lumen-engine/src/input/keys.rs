use std::fmt;

/// Host key code.
///
/// Printable keys use their ASCII value (`'A'` is 65, `'0'` is 48). Control and
/// navigation keys start at 256. Letters are always reported in upper case.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct KeyCode(pub i32);

impl KeyCode {
    pub const SPACE: KeyCode = KeyCode(32);
    pub const APOSTROPHE: KeyCode = KeyCode(39);
    pub const COMMA: KeyCode = KeyCode(44);
    pub const MINUS: KeyCode = KeyCode(45);
    pub const PERIOD: KeyCode = KeyCode(46);
    pub const SLASH: KeyCode = KeyCode(47);
    pub const SEMICOLON: KeyCode = KeyCode(59);
    pub const EQUAL: KeyCode = KeyCode(61);
    pub const LEFT_BRACKET: KeyCode = KeyCode(91);
    pub const BACKSLASH: KeyCode = KeyCode(92);
    pub const RIGHT_BRACKET: KeyCode = KeyCode(93);
    pub const GRAVE_ACCENT: KeyCode = KeyCode(96);

    pub const ESCAPE: KeyCode = KeyCode(256);
    pub const ENTER: KeyCode = KeyCode(257);
    pub const TAB: KeyCode = KeyCode(258);
    pub const BACKSPACE: KeyCode = KeyCode(259);
    pub const INSERT: KeyCode = KeyCode(260);
    pub const DELETE: KeyCode = KeyCode(261);
    pub const RIGHT: KeyCode = KeyCode(262);
    pub const LEFT: KeyCode = KeyCode(263);
    pub const DOWN: KeyCode = KeyCode(264);
    pub const UP: KeyCode = KeyCode(265);
    pub const PAGE_UP: KeyCode = KeyCode(266);
    pub const PAGE_DOWN: KeyCode = KeyCode(267);
    pub const HOME: KeyCode = KeyCode(268);
    pub const END: KeyCode = KeyCode(269);
    pub const CAPS_LOCK: KeyCode = KeyCode(280);
    pub const SCROLL_LOCK: KeyCode = KeyCode(281);
    pub const NUM_LOCK: KeyCode = KeyCode(282);
    pub const PRINT_SCREEN: KeyCode = KeyCode(283);
    pub const PAUSE: KeyCode = KeyCode(284);

    /// F1; F2..F12 follow consecutively.
    pub const F1: KeyCode = KeyCode(290);

    /// Keypad 0; keypad 1..9 follow consecutively.
    pub const KP_0: KeyCode = KeyCode(320);
    pub const KP_DECIMAL: KeyCode = KeyCode(330);
    pub const KP_DIVIDE: KeyCode = KeyCode(331);
    pub const KP_MULTIPLY: KeyCode = KeyCode(332);
    pub const KP_SUBTRACT: KeyCode = KeyCode(333);
    pub const KP_ADD: KeyCode = KeyCode(334);
    pub const KP_ENTER: KeyCode = KeyCode(335);
    pub const KP_EQUAL: KeyCode = KeyCode(336);

    pub const LEFT_SHIFT: KeyCode = KeyCode(340);
    pub const LEFT_CONTROL: KeyCode = KeyCode(341);
    pub const LEFT_ALT: KeyCode = KeyCode(342);
    pub const LEFT_SUPER: KeyCode = KeyCode(343);
    pub const RIGHT_SHIFT: KeyCode = KeyCode(344);
    pub const RIGHT_CONTROL: KeyCode = KeyCode(345);
    pub const RIGHT_ALT: KeyCode = KeyCode(346);
    pub const RIGHT_SUPER: KeyCode = KeyCode(347);
    pub const MENU: KeyCode = KeyCode(348);

    /// Letter key for `c` (either case). `None` for non-ASCII letters.
    pub fn letter(c: char) -> Option<KeyCode> {
        c.is_ascii_alphabetic()
            .then(|| KeyCode(c.to_ascii_uppercase() as i32))
    }

    /// Top-row digit key, `0..=9`.
    pub fn digit(d: u8) -> Option<KeyCode> {
        (d <= 9).then(|| KeyCode(48 + i32::from(d)))
    }

    /// Function key `F{n}`, `1..=12`.
    pub fn function(n: u8) -> Option<KeyCode> {
        (1..=12)
            .contains(&n)
            .then(|| KeyCode(Self::F1.0 + i32::from(n) - 1))
    }

    /// Keypad digit, `0..=9`.
    pub fn keypad(d: u8) -> Option<KeyCode> {
        (d <= 9).then(|| KeyCode(Self::KP_0.0 + i32::from(d)))
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.0) {
            Ok(b) if b.is_ascii_graphic() => write!(f, "'{}' ({})", b as char, self.0),
            _ => write!(f, "{}", self.0),
        }
    }
}
