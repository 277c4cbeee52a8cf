//! Mapping from human-readable key names to injectable key codes

use enigo::Key;
use std::fmt;
use thiserror::Error;

/// Keys that can be used for the keep-awake press, in display order.
const KEY_TABLE: [(&str, Key); 16] = [
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("F13", Key::F13),
    ("F14", Key::F14),
    ("F15", Key::F15),
    ("F16", Key::F16),
];

/// Raised when a key name is not in the supported table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported key '{0}' (expected one of F1-F16)")]
pub struct UnsupportedKeyError(pub String);

/// A resolved key, ready to hand to an input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCode {
    name: &'static str,
    key: Key,
}

impl KeyCode {
    /// Canonical name, e.g. "F15"
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key value understood by enigo
    pub fn key(&self) -> Key {
        self.key
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Resolve a key name such as "F15" (case-insensitive, surrounding
/// whitespace ignored)
pub fn resolve(name: &str) -> Result<KeyCode, UnsupportedKeyError> {
    let wanted = name.trim();
    KEY_TABLE
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(wanted))
        .map(|&(name, key)| KeyCode { name, key })
        .ok_or_else(|| UnsupportedKeyError(name.to_string()))
}

/// Names accepted by [`resolve`]
pub fn supported_keys() -> impl Iterator<Item = &'static str> {
    KEY_TABLE.iter().map(|(name, _)| *name)
}
