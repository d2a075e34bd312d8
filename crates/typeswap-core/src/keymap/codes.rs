//! Linux input key codes (`EV_KEY` codes from `linux/input-event-codes.h`).
//!
//! These are the numbers the kernel reports in the `code` field of every
//! keyboard event read from `/dev/input/event*`, and the numbers a uinput
//! virtual device must write back to synthesise a keystroke.
//!
//! # What is a Linux key code? (for beginners)
//!
//! The kernel assigns one number per *physical key position*, independent of
//! the keyboard layout configured in the desktop session:
//!
//! | Key          | Code |
//! |--------------|------|
//! | Escape       | 1    |
//! | Letter Q     | 16   |
//! | Letter A     | 30   |
//! | Enter        | 28   |
//! | Left Shift   | 42   |
//!
//! Notice the codes follow the rows of a PC keyboard (Q W E R T Y … is 16–21),
//! not the alphabet.  Turning a code into a character is the job of the
//! tables in [`super::chars`].
//!
//! Only the subset of keys typeswap decodes or injects is listed here; any
//! other code is "unresolvable" and [`KeyCode::from_u16`] returns `None`.

use serde::{Deserialize, Serialize};

/// A Linux `EV_KEY` code for a key typeswap knows about.
///
/// The numeric value of each variant is its kernel key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum KeyCode {
    Esc = 1,

    // Number row
    Digit1 = 2,
    Digit2 = 3,
    Digit3 = 4,
    Digit4 = 5,
    Digit5 = 6,
    Digit6 = 7,
    Digit7 = 8,
    Digit8 = 9,
    Digit9 = 10,
    Digit0 = 11,
    Minus = 12,
    Equal = 13,
    Backspace = 14,

    // Top letter row
    Tab = 15,
    Q = 16,
    W = 17,
    E = 18,
    R = 19,
    T = 20,
    Y = 21,
    U = 22,
    I = 23,
    O = 24,
    P = 25,
    LeftBrace = 26,
    RightBrace = 27,
    Enter = 28,
    LeftCtrl = 29,

    // Home row
    A = 30,
    S = 31,
    D = 32,
    F = 33,
    G = 34,
    H = 35,
    J = 36,
    K = 37,
    L = 38,
    Semicolon = 39,
    Apostrophe = 40,
    Grave = 41,
    LeftShift = 42,
    Backslash = 43,

    // Bottom letter row
    Z = 44,
    X = 45,
    C = 46,
    V = 47,
    B = 48,
    N = 49,
    M = 50,
    Comma = 51,
    Dot = 52,
    Slash = 53,
    RightShift = 54,
    LeftAlt = 56,
    Space = 57,
    CapsLock = 58,

    // Function keys (F11/F12 are not contiguous with F1–F10)
    F1 = 59,
    F2 = 60,
    F3 = 61,
    F4 = 62,
    F5 = 63,
    F6 = 64,
    F7 = 65,
    F8 = 66,
    F9 = 67,
    F10 = 68,
    F11 = 87,
    F12 = 88,

    RightCtrl = 97,
    RightAlt = 100,

    // Navigation cluster
    Home = 102,
    Up = 103,
    PageUp = 104,
    Left = 105,
    Right = 106,
    End = 107,
    Down = 108,
    PageDown = 109,
    Insert = 110,
    Delete = 111,

    LeftMeta = 125,
    RightMeta = 126,
}

impl KeyCode {
    /// Every key code in the table, in ascending numeric order.
    ///
    /// This is also the capability set declared by the virtual keyboard.
    pub const ALL: [KeyCode; 83] = [
        KeyCode::Esc,
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
        KeyCode::Digit0,
        KeyCode::Minus,
        KeyCode::Equal,
        KeyCode::Backspace,
        KeyCode::Tab,
        KeyCode::Q,
        KeyCode::W,
        KeyCode::E,
        KeyCode::R,
        KeyCode::T,
        KeyCode::Y,
        KeyCode::U,
        KeyCode::I,
        KeyCode::O,
        KeyCode::P,
        KeyCode::LeftBrace,
        KeyCode::RightBrace,
        KeyCode::Enter,
        KeyCode::LeftCtrl,
        KeyCode::A,
        KeyCode::S,
        KeyCode::D,
        KeyCode::F,
        KeyCode::G,
        KeyCode::H,
        KeyCode::J,
        KeyCode::K,
        KeyCode::L,
        KeyCode::Semicolon,
        KeyCode::Apostrophe,
        KeyCode::Grave,
        KeyCode::LeftShift,
        KeyCode::Backslash,
        KeyCode::Z,
        KeyCode::X,
        KeyCode::C,
        KeyCode::V,
        KeyCode::B,
        KeyCode::N,
        KeyCode::M,
        KeyCode::Comma,
        KeyCode::Dot,
        KeyCode::Slash,
        KeyCode::RightShift,
        KeyCode::LeftAlt,
        KeyCode::Space,
        KeyCode::CapsLock,
        KeyCode::F1,
        KeyCode::F2,
        KeyCode::F3,
        KeyCode::F4,
        KeyCode::F5,
        KeyCode::F6,
        KeyCode::F7,
        KeyCode::F8,
        KeyCode::F9,
        KeyCode::F10,
        KeyCode::F11,
        KeyCode::F12,
        KeyCode::RightCtrl,
        KeyCode::RightAlt,
        KeyCode::Home,
        KeyCode::Up,
        KeyCode::PageUp,
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::End,
        KeyCode::Down,
        KeyCode::PageDown,
        KeyCode::Insert,
        KeyCode::Delete,
        KeyCode::LeftMeta,
        KeyCode::RightMeta,
    ];

    /// Converts a raw kernel key code to a [`KeyCode`].
    ///
    /// Returns `None` if the code is not in the table.
    pub fn from_u16(value: u16) -> Option<Self> {
        let code = match value {
            1 => KeyCode::Esc,
            2 => KeyCode::Digit1,
            3 => KeyCode::Digit2,
            4 => KeyCode::Digit3,
            5 => KeyCode::Digit4,
            6 => KeyCode::Digit5,
            7 => KeyCode::Digit6,
            8 => KeyCode::Digit7,
            9 => KeyCode::Digit8,
            10 => KeyCode::Digit9,
            11 => KeyCode::Digit0,
            12 => KeyCode::Minus,
            13 => KeyCode::Equal,
            14 => KeyCode::Backspace,
            15 => KeyCode::Tab,
            16 => KeyCode::Q,
            17 => KeyCode::W,
            18 => KeyCode::E,
            19 => KeyCode::R,
            20 => KeyCode::T,
            21 => KeyCode::Y,
            22 => KeyCode::U,
            23 => KeyCode::I,
            24 => KeyCode::O,
            25 => KeyCode::P,
            26 => KeyCode::LeftBrace,
            27 => KeyCode::RightBrace,
            28 => KeyCode::Enter,
            29 => KeyCode::LeftCtrl,
            30 => KeyCode::A,
            31 => KeyCode::S,
            32 => KeyCode::D,
            33 => KeyCode::F,
            34 => KeyCode::G,
            35 => KeyCode::H,
            36 => KeyCode::J,
            37 => KeyCode::K,
            38 => KeyCode::L,
            39 => KeyCode::Semicolon,
            40 => KeyCode::Apostrophe,
            41 => KeyCode::Grave,
            42 => KeyCode::LeftShift,
            43 => KeyCode::Backslash,
            44 => KeyCode::Z,
            45 => KeyCode::X,
            46 => KeyCode::C,
            47 => KeyCode::V,
            48 => KeyCode::B,
            49 => KeyCode::N,
            50 => KeyCode::M,
            51 => KeyCode::Comma,
            52 => KeyCode::Dot,
            53 => KeyCode::Slash,
            54 => KeyCode::RightShift,
            56 => KeyCode::LeftAlt,
            57 => KeyCode::Space,
            58 => KeyCode::CapsLock,
            59 => KeyCode::F1,
            60 => KeyCode::F2,
            61 => KeyCode::F3,
            62 => KeyCode::F4,
            63 => KeyCode::F5,
            64 => KeyCode::F6,
            65 => KeyCode::F7,
            66 => KeyCode::F8,
            67 => KeyCode::F9,
            68 => KeyCode::F10,
            87 => KeyCode::F11,
            88 => KeyCode::F12,
            97 => KeyCode::RightCtrl,
            100 => KeyCode::RightAlt,
            102 => KeyCode::Home,
            103 => KeyCode::Up,
            104 => KeyCode::PageUp,
            105 => KeyCode::Left,
            106 => KeyCode::Right,
            107 => KeyCode::End,
            108 => KeyCode::Down,
            109 => KeyCode::PageDown,
            110 => KeyCode::Insert,
            111 => KeyCode::Delete,
            125 => KeyCode::LeftMeta,
            126 => KeyCode::RightMeta,
            _ => return None,
        };
        Some(code)
    }

    /// Returns the raw kernel key code for this key.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Returns `true` for shift, ctrl, alt and meta on either side.
    ///
    /// Caps Lock is a lock key, not a modifier, and returns `false`.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::LeftShift
                | KeyCode::RightShift
                | KeyCode::LeftCtrl
                | KeyCode::RightCtrl
                | KeyCode::LeftAlt
                | KeyCode::RightAlt
                | KeyCode::LeftMeta
                | KeyCode::RightMeta
        )
    }
}
