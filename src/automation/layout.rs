//! Keyboard layouts as seen by macros
//!
//! Macros only ask one question of a layout: "is there a key for this
//! character?". ASCII is on every layout; the table below lists the extra
//! letters each xkb layout carries. Unknown layouts are treated as ASCII-only.

use std::fmt;

/// Non-ASCII letters per xkb layout code
const LAYOUT_LETTERS: &[(&str, &str)] = &[
    ("us", ""),
    ("gb", ""),
    ("de", "äöüß"),
    ("at", "äöüß"),
    ("ch", "äöüàéè"),
    ("se", "åäö"),
    ("fi", "åäö"),
    ("no", "æøå"),
    ("dk", "æøå"),
    ("is", "áæðéíóöúýþ"),
    ("ee", "äõöüšž"),
    ("tr", "çğıöşü"),
    ("fr", "àçéèù"),
    ("es", "ñç"),
];

/// Human-readable keymap names reported by the compositor
const KEYMAP_NAMES: &[(&str, &str)] = &[
    ("english", "us"),
    ("german", "de"),
    ("swiss", "ch"),
    ("swedish", "se"),
    ("finnish", "fi"),
    ("norwegian", "no"),
    ("danish", "dk"),
    ("icelandic", "is"),
    ("estonian", "ee"),
    ("turkish", "tr"),
    ("french", "fr"),
    ("spanish", "es"),
];

/// An xkb layout and the letters it has keys for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyboardLayout {
    code: String,
    letters: &'static str,
}

impl KeyboardLayout {
    /// Builds a layout from an xkb code such as `de` or `se`
    ///
    /// Variants after a `(` or `:` are ignored (`de(nodeadkeys)` → `de`).
    pub fn from_code(code: &str) -> Self {
        let code = code
            .split(['(', ':'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let letters = LAYOUT_LETTERS
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, letters)| *letters)
            .unwrap_or("");

        Self { code, letters }
    }

    /// US layout, the fallback when nothing better is known
    pub fn us() -> Self {
        Self::from_code("us")
    }

    /// Resolves the layout of a keyboard device
    ///
    /// `layouts` is the comma-separated xkb list (`de,us`); `active_keymap`
    /// is the name of the active one (`German`). The keymap name wins when
    /// it is recognised, otherwise the first listed layout is used.
    pub fn from_device(layouts: &str, active_keymap: &str) -> Self {
        let keymap = active_keymap.trim().to_lowercase();

        if let Some((_, code)) = KEYMAP_NAMES.iter().find(|(name, _)| keymap.starts_with(name)) {
            return Self::from_code(code);
        }

        Self::from_code(layouts.split(',').next().unwrap_or("us"))
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns true if the layout has a key producing `c`
    pub fn has_key(&self, c: char) -> bool {
        if c.is_ascii_graphic() || c == ' ' {
            return true;
        }

        c.to_lowercase().all(|lower| self.letters.contains(lower))
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::us()
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}
