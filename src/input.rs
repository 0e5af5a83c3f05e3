//! Input handling - key events, chords and translation from crossterm
//!
//! A `KeyPress` is what the keyboard produced, case intact, so it can be
//! inserted as text. A `Chord` is its normalized form used for shortcut
//! lookup: character keys are lowercased and modifiers form a set, so
//! "super+s", "S+Super" and "SUPER+S" are the same chord.

use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::error::EditorError;

/// Modifier set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0x01);
    pub const ALT: Modifiers = Modifiers(0x02);
    pub const SHIFT: Modifiers = Modifiers(0x04);
    pub const SUPER: Modifiers = Modifiers(0x08);

    /// Check whether every modifier in `other` is held
    pub fn contains(&self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Add modifiers to the set
    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    /// Remove modifiers from the set
    pub fn remove(&mut self, other: Modifiers) {
        self.0 &= !other.0;
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether the set holds nothing besides shift
    pub fn is_plain(&self) -> bool {
        self.0 & !Self::SHIFT.0 == 0
    }

    /// Parse a modifier name
    fn from_name(name: &str) -> Option<Modifiers> {
        match name {
            "ctrl" | "control" => Some(Self::CTRL),
            "alt" | "option" | "meta" => Some(Self::ALT),
            "shift" => Some(Self::SHIFT),
            "super" | "cmd" | "command" | "win" => Some(Self::SUPER),
            _ => None,
        }
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

/// A key, independent of modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// Lowercase character keys; other keys are unchanged
    pub fn normalized(self) -> Key {
        match self {
            Key::Char(ch) => Key::Char(ch.to_lowercase().next().unwrap_or(ch)),
            other => other,
        }
    }

    /// Parse a key name from a shortcut string (already lowercased)
    fn from_name(name: &str) -> Option<Key> {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Some(Key::Char(ch));
        }

        match name {
            "space" => Some(Key::Char(' ')),
            "plus" => Some(Key::Char('+')),
            "minus" => Some(Key::Char('-')),
            "enter" | "return" | "ret" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "pageup" | "pgup" => Some(Key::PageUp),
            "pagedown" | "pgdown" => Some(Key::PageDown),
            _ => name
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=24).contains(n))
                .map(Key::F),
        }
    }

    fn name(&self) -> String {
        match self {
            Key::Char(' ') => "space".to_string(),
            Key::Char('+') => "plus".to_string(),
            Key::Char(ch) => ch.to_string(),
            Key::Enter => "enter".to_string(),
            Key::Tab => "tab".to_string(),
            Key::Backspace => "backspace".to_string(),
            Key::Delete => "delete".to_string(),
            Key::Escape => "escape".to_string(),
            Key::Left => "left".to_string(),
            Key::Right => "right".to_string(),
            Key::Up => "up".to_string(),
            Key::Down => "down".to_string(),
            Key::Home => "home".to_string(),
            Key::End => "end".to_string(),
            Key::PageUp => "pageup".to_string(),
            Key::PageDown => "pagedown".to_string(),
            Key::F(n) => format!("f{}", n),
        }
    }
}

/// A raw key event as delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// An unmodified key
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// The character this press would insert, if any
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(ch) if self.modifiers.is_plain() && !ch.is_control() => Some(ch),
            _ => None,
        }
    }

    /// Normalized chord for shortcut lookup
    pub fn chord(&self) -> Chord {
        Chord::new(self.key, self.modifiers)
    }
}

/// Normalized shortcut: modifier set plus one key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    modifiers: Modifiers,
    key: Key,
}

impl Chord {
    /// Build a chord, normalizing the key
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            key: key.normalized(),
        }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl fmt::Display for Chord {
    /// Canonical form, e.g. "ctrl+shift+s"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (Modifiers::CTRL, "ctrl+"),
            (Modifiers::ALT, "alt+"),
            (Modifiers::SHIFT, "shift+"),
            (Modifiers::SUPER, "super+"),
        ];
        for (modifier, name) in names {
            if self.modifiers.contains(modifier) {
                f.write_str(name)?;
            }
        }
        f.write_str(&self.key.name())
    }
}

impl FromStr for Chord {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| EditorError::InvalidShortcut {
            shortcut: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty shortcut"));
        }

        let mut modifiers = Modifiers::NONE;
        let mut key = None;

        for part in trimmed.split('+') {
            let part = part.trim().to_lowercase();
            if part.is_empty() {
                return Err(invalid("empty key in shortcut"));
            }

            if let Some(modifier) = Modifiers::from_name(&part) {
                if modifiers.contains(modifier) {
                    return Err(invalid(&format!("repeated modifier '{}'", part)));
                }
                modifiers.insert(modifier);
                continue;
            }

            let parsed = Key::from_name(&part).ok_or_else(|| invalid(&format!("unknown key '{}'", part)))?;
            if key.replace(parsed).is_some() {
                return Err(invalid("more than one non-modifier key"));
            }
        }

        let key = key.ok_or_else(|| invalid("no key besides modifiers"))?;
        Ok(Chord::new(key, modifiers))
    }
}

/// Translate a crossterm KeyEvent to our KeyPress representation
///
/// Only press events count; release and repeat are dropped (Windows reports
/// all three).
pub fn translate_key(event: KeyEvent) -> Option<KeyPress> {
    let KeyEvent {
        code, modifiers, kind, ..
    } = event;

    if kind != KeyEventKind::Press {
        return None;
    }

    let mut mods = Modifiers::NONE;
    if modifiers.contains(KeyModifiers::CONTROL) {
        mods.insert(Modifiers::CTRL);
    }
    if modifiers.contains(KeyModifiers::ALT) || modifiers.contains(KeyModifiers::META) {
        mods.insert(Modifiers::ALT);
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        mods.insert(Modifiers::SHIFT);
    }
    if modifiers.contains(KeyModifiers::SUPER) {
        mods.insert(Modifiers::SUPER);
    }

    let key = match code {
        KeyCode::Char(ch) => Key::Char(ch),
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            mods.insert(Modifiers::SHIFT);
            Key::Tab
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    Some(KeyPress::new(key, mods))
}
