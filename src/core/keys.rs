//! Key classification for soft submit.
//!
//! Enter alone submits and suppresses the default newline. Shift+Enter inserts
//! a newline. Everything else passes through to the editor.

/// Logical key, independent of terminal encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub fn is_empty(self) -> bool {
        !self.shift && !self.ctrl && !self.alt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn enter() -> Self {
        Self::new(Key::Enter, Modifiers::NONE)
    }

    pub fn shift_enter() -> Self {
        Self::new(Key::Enter, Modifiers::SHIFT)
    }

    pub fn char(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::NONE)
    }

    /// Parses a key id such as `enter`, `shift+enter`, `ctrl+c`, or `a`.
    pub fn parse_id(key_id: &str) -> Option<Self> {
        let lowered = key_id.trim().to_lowercase();
        let parts: Vec<&str> = lowered.split('+').collect();
        let name = *parts.last()?;
        if name.is_empty() {
            return None;
        }

        let modifiers = Modifiers {
            shift: parts.iter().any(|part| *part == "shift"),
            ctrl: parts.iter().any(|part| *part == "ctrl"),
            alt: parts.iter().any(|part| *part == "alt"),
        };

        let key = match name {
            "enter" | "return" => Key::Enter,
            "backspace" => Key::Backspace,
            "space" => Key::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => Key::Other,
                }
            }
        };

        Some(Self { key, modifiers })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Run the submission path.
    Submit,
    /// Insert a line break into the draft.
    InsertNewline,
    /// Not handled by soft submit.
    PassThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: KeyAction,
    /// The host must not apply its native handling of the key.
    pub default_prevented: bool,
}

pub fn classify_key(press: KeyPress) -> KeyOutcome {
    match press.key {
        Key::Enter if press.modifiers.is_empty() => KeyOutcome {
            action: KeyAction::Submit,
            default_prevented: true,
        },
        Key::Enter if press.modifiers == Modifiers::SHIFT => KeyOutcome {
            action: KeyAction::InsertNewline,
            default_prevented: false,
        },
        _ => KeyOutcome {
            action: KeyAction::PassThrough,
            default_prevented: false,
        },
    }
}

/// Maps one line of line-oriented input to the key that terminated it.
///
/// A trailing backslash stands in for Shift+Enter and is stripped from the
/// returned text.
pub fn split_line_terminator(line: &str) -> (&str, KeyPress) {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let line = line.strip_suffix('\r').unwrap_or(line);

    match line.strip_suffix('\\') {
        Some(text) => (text, KeyPress::shift_enter()),
        None => (line, KeyPress::enter()),
    }
}
