//! Key identifiers used by keybindings and category mappings
//!
//! A key is either a single, case-sensitive character or one of a small set
//! of named keys. Keys are written as strings in the configuration file:
//! `"a"`, `"R"`, `"Delete"`, `"Enter"`, `"Space"`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A key the user can press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    /// A printable character, compared exactly (`a` and `A` differ)
    Char(char),
    Enter,
    Delete,
    Backspace,
    Tab,
    Esc,
}

/// Error returned when a key string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseKeyError {
    #[error("key must not be empty")]
    Empty,
    #[error("unknown key '{0}' (use a single character or Enter, Delete, Backspace, Tab, Space, Esc)")]
    Unknown(String),
}

impl FromStr for Key {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseKeyError::Empty);
        }

        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }

        match s.trim().to_ascii_lowercase().as_str() {
            "enter" | "return" => Ok(Key::Enter),
            "delete" | "del" => Ok(Key::Delete),
            "backspace" => Ok(Key::Backspace),
            "tab" => Ok(Key::Tab),
            "space" => Ok(Key::Char(' ')),
            "esc" | "escape" => Ok(Key::Esc),
            _ => Err(ParseKeyError::Unknown(s.to_string())),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = ParseKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> Self {
        key.to_string()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => f.write_str("Space"),
            Key::Char(c) => write!(f, "{}", c),
            Key::Enter => f.write_str("Enter"),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Tab => f.write_str("Tab"),
            Key::Esc => f.write_str("Esc"),
        }
    }
}
