//! Character tables keyed by physical key position (US layout).
//!
//! Three tables drive both directions of the pipeline:
//!
//! - **base**: key code → the unshifted character printed on the key.
//! - **shifted**: unshifted symbol → the symbol produced with Shift held
//!   (`1` → `!`, `-` → `_`, …).  Letters are not in this table; their case is
//!   decided by `shift XOR caps` in the decoder.
//! - **reverse**: character → (key code, needs shift), used for injection.
//!
//! # Layout independence
//!
//! These tables assume a US keyboard.  A user on AZERTY who presses the key
//! labelled `A` sends `KEY_Q` (16), and typeswap records `q`.  Honouring the
//! active XKB layout would require talking to the display server, which the
//! capture layer deliberately avoids.

use super::codes::KeyCode;

/// Returns the unshifted character for a key code, if the key prints one.
///
/// Space, Tab and Enter are *named* keys for decoding purposes and are not in
/// this table; see [`char_to_key`] for their injection mapping.
pub fn base_char(code: KeyCode) -> Option<char> {
    let c = match code {
        KeyCode::A => 'a',
        KeyCode::B => 'b',
        KeyCode::C => 'c',
        KeyCode::D => 'd',
        KeyCode::E => 'e',
        KeyCode::F => 'f',
        KeyCode::G => 'g',
        KeyCode::H => 'h',
        KeyCode::I => 'i',
        KeyCode::J => 'j',
        KeyCode::K => 'k',
        KeyCode::L => 'l',
        KeyCode::M => 'm',
        KeyCode::N => 'n',
        KeyCode::O => 'o',
        KeyCode::P => 'p',
        KeyCode::Q => 'q',
        KeyCode::R => 'r',
        KeyCode::S => 's',
        KeyCode::T => 't',
        KeyCode::U => 'u',
        KeyCode::V => 'v',
        KeyCode::W => 'w',
        KeyCode::X => 'x',
        KeyCode::Y => 'y',
        KeyCode::Z => 'z',
        KeyCode::Digit1 => '1',
        KeyCode::Digit2 => '2',
        KeyCode::Digit3 => '3',
        KeyCode::Digit4 => '4',
        KeyCode::Digit5 => '5',
        KeyCode::Digit6 => '6',
        KeyCode::Digit7 => '7',
        KeyCode::Digit8 => '8',
        KeyCode::Digit9 => '9',
        KeyCode::Digit0 => '0',
        KeyCode::Minus => '-',
        KeyCode::Equal => '=',
        KeyCode::LeftBrace => '[',
        KeyCode::RightBrace => ']',
        KeyCode::Semicolon => ';',
        KeyCode::Apostrophe => '\'',
        KeyCode::Grave => '`',
        KeyCode::Backslash => '\\',
        KeyCode::Comma => ',',
        KeyCode::Dot => '.',
        KeyCode::Slash => '/',
        _ => return None,
    };
    Some(c)
}

/// Returns the symbol produced by Shift + the key whose base symbol is `base`.
///
/// Returns `None` for letters and for characters with no shifted variant.
pub fn shifted_symbol(base: char) -> Option<char> {
    let c = match base {
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        ';' => ':',
        '\'' => '"',
        '`' => '~',
        '\\' => '|',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        _ => return None,
    };
    Some(c)
}

/// Inverse of [`shifted_symbol`]: the base symbol whose shifted form is `symbol`.
fn unshifted_symbol(symbol: char) -> Option<char> {
    let c = match symbol {
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        ':' => ';',
        '"' => '\'',
        '~' => '`',
        '|' => '\\',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        _ => return None,
    };
    Some(c)
}

/// Returns the key code for an unshifted printable character.
fn base_key(c: char) -> Option<KeyCode> {
    let code = match c {
        'a' => KeyCode::A,
        'b' => KeyCode::B,
        'c' => KeyCode::C,
        'd' => KeyCode::D,
        'e' => KeyCode::E,
        'f' => KeyCode::F,
        'g' => KeyCode::G,
        'h' => KeyCode::H,
        'i' => KeyCode::I,
        'j' => KeyCode::J,
        'k' => KeyCode::K,
        'l' => KeyCode::L,
        'm' => KeyCode::M,
        'n' => KeyCode::N,
        'o' => KeyCode::O,
        'p' => KeyCode::P,
        'q' => KeyCode::Q,
        'r' => KeyCode::R,
        's' => KeyCode::S,
        't' => KeyCode::T,
        'u' => KeyCode::U,
        'v' => KeyCode::V,
        'w' => KeyCode::W,
        'x' => KeyCode::X,
        'y' => KeyCode::Y,
        'z' => KeyCode::Z,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        '9' => KeyCode::Digit9,
        '0' => KeyCode::Digit0,
        '-' => KeyCode::Minus,
        '=' => KeyCode::Equal,
        '[' => KeyCode::LeftBrace,
        ']' => KeyCode::RightBrace,
        ';' => KeyCode::Semicolon,
        '\'' => KeyCode::Apostrophe,
        '`' => KeyCode::Grave,
        '\\' => KeyCode::Backslash,
        ',' => KeyCode::Comma,
        '.' => KeyCode::Dot,
        '/' => KeyCode::Slash,
        _ => return None,
    };
    Some(code)
}

/// Resolves a character to the key that types it and whether Shift is needed.
///
/// Whitespace that appears in expansion content is typed with its control
/// key: `' '` → Space, `'\t'` → Tab, `'\n'` → Enter.  Characters with no key
/// on a US layout (accents, emoji, CJK, …) return `None`.
pub fn char_to_key(c: char) -> Option<(KeyCode, bool)> {
    match c {
        ' ' => return Some((KeyCode::Space, false)),
        '\t' => return Some((KeyCode::Tab, false)),
        '\n' => return Some((KeyCode::Enter, false)),
        _ => {}
    }
    if c.is_ascii_uppercase() {
        return base_key(c.to_ascii_lowercase()).map(|code| (code, true));
    }
    if let Some(code) = base_key(c) {
        return Some((code, false));
    }
    unshifted_symbol(c)
        .and_then(base_key)
        .map(|code| (code, true))
}
