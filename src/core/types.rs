//! src/core/types.rs
//!
//! Core type definitions for application automation
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Modifier`: Keyboard modifier keys (SUPER, CTRL, SHIFT, ALT)
//! - `KeyCombo`: A normalised hotkey trigger (modifiers + key)
//! - `Hotkey`: A key combination bound to an application macro
//! - `Architecture`: Binary variant tag (32-bit / 64-bit)
//! - `WindowPattern`: Compiled matcher for window titles and classes
//! - `ApplicationDescriptor`: Static record identifying one automatable application
//!
//! Descriptors are plain data. Behaviour attached to them (macros) lives in the
//! registry, keyed by the identity the registry hands out at registration.

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

/// Keyboard modifier keys
///
/// Represents the four standard modifier keys used in hotkeys and chords.
/// These are mapped from various names (e.g., MOD4, WIN → Super).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Modifier {
    /// Super/Windows/Command key (MOD4)
    Super,
    /// Control key
    Ctrl,
    /// Shift key
    Shift,
    /// Alt key (MOD1)
    Alt,
}

impl Modifier {
    /// Maps a modifier name to a `Modifier`, case-insensitively
    ///
    /// Returns `None` for anything that is not a known modifier name, which
    /// lets callers treat the token as a key instead.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "SUPER" | "MOD4" | "WIN" => Some(Modifier::Super),
            "CTRL" | "CONTROL" => Some(Modifier::Ctrl),
            "SHIFT" => Some(Modifier::Shift),
            "ALT" | "MOD1" => Some(Modifier::Alt),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Super => write!(f, "SUPER"),
            Modifier::Ctrl => write!(f, "CTRL"),
            Modifier::Shift => write!(f, "SHIFT"),
            Modifier::Alt => write!(f, "ALT"),
        }
    }
}

/// Sorts and de-duplicates modifiers so equal sets compare and hash equal
pub(crate) fn normalise_modifiers(mut modifiers: Vec<Modifier>) -> Vec<Modifier> {
    modifiers.sort_by_key(|m| format!("{:?}", m));
    modifiers.dedup();
    modifiers
}

/// A combination of modifier keys and a base key that triggers a hotkey
///
/// Implements Hash and Eq for use as HashMap keys in conflict detection.
///
/// # Hash Implementation
/// The hash is based on a **sorted** list of modifiers plus the key name.
/// This ensures that different orderings of the same modifiers produce
/// the same hash (e.g., SUPER+SHIFT and SHIFT+SUPER are identical).
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct KeyCombo {
    /// Modifier keys, sorted and de-duplicated
    pub modifiers: Vec<Modifier>,

    /// Base key name (e.g., "K", "RETURN", "F1")
    /// Always stored in uppercase for consistent hashing
    pub key: String,
}

impl KeyCombo {
    /// Create a new KeyCombo with normalised data
    ///
    /// Normalisation includes:
    /// - Sorting modifiers for consistent hashing
    /// - Converting key to uppercase
    /// - Removing duplicate modifiers
    pub fn new(modifiers: Vec<Modifier>, key: &str) -> Self {
        Self {
            modifiers: normalise_modifiers(modifiers),
            key: key.trim().to_uppercase(),
        }
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            let mods = self
                .modifiers
                .iter()
                .map(|m| format!("{}", m))
                .collect::<Vec<_>>()
                .join("+");
            write!(f, "{}+{}", mods, self.key)
        }
    }
}

/// A hotkey that runs a named macro of a named application
///
/// # Example
/// ```ignore
/// let hotkey = Hotkey {
///     key_combo: KeyCombo::new(vec![Modifier::Super], "L"),
///     app: "Firefox".to_string(),
///     macro_name: "activate_and_focus_address_bar".to_string(),
/// };
/// // Declared as: hotkey = SUPER, L, Firefox, activate_and_focus_address_bar
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hotkey {
    /// The key combination that triggers this hotkey
    pub key_combo: KeyCombo,

    /// Registered application name
    pub app: String,

    /// Macro attached to that application
    pub macro_name: String,
}

impl Hotkey {
    /// Command line that runs this hotkey's macro
    ///
    /// `config` is passed through with `-c` when the registry file is not
    /// the default one.
    pub fn exec_command(&self, config: Option<&Path>) -> String {
        let mut parts = vec![env!("CARGO_PKG_NAME").to_string()];

        if let Some(path) = config {
            parts.push("-c".to_string());
            parts.push(path.display().to_string());
        }

        parts.push("run".to_string());
        parts.push(self.app.clone());
        parts.push(self.macro_name.clone());
        parts.join(" ")
    }

    /// Value of a Hyprland `bind` keyword: `MODS, KEY, exec, COMMAND`
    pub fn bind_value(&self, config: Option<&Path>) -> String {
        let modifiers = self
            .key_combo
            .modifiers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join("_");

        [
            modifiers,
            self.key_combo.key.clone(),
            "exec".to_string(),
            self.exec_command(config),
        ]
        .join(", ")
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}.{}", self.key_combo, self.app, self.macro_name)
    }
}

/// Binary variant of an application
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Architecture {
    /// 32-bit binary
    X86,
    /// 64-bit binary
    X64,
}

impl Architecture {
    /// Parses an architecture tag (`x86`, `x32`, `32`, `x64`, `64`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "x86" | "x32" | "32" => Some(Architecture::X86),
            "x64" | "64" => Some(Architecture::X64),
            _ => None,
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => write!(f, "x86"),
            Architecture::X64 => write!(f, "x64"),
        }
    }
}

/// Compiled matcher used to recognise an application's window
///
/// Two patterns are equal when their source expressions are equal.
#[derive(Clone, Debug)]
pub struct WindowPattern(Regex);

impl WindowPattern {
    /// Compiles a window pattern from a regular expression
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Returns the source expression
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Tests a window title or class against the pattern
    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl PartialEq for WindowPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for WindowPattern {}

impl fmt::Display for WindowPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.as_str())
    }
}

impl Serialize for WindowPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WindowPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        WindowPattern::new(&source).map_err(serde::de::Error::custom)
    }
}

/// Identity handed out by a registry when a descriptor is registered
///
/// Carries the owning registry's id, so a descriptor registered elsewhere
/// is never mistaken for one of ours.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DescriptorId {
    pub(crate) registry: u64,
    pub(crate) slot: usize,
}

/// Static record identifying one automatable application
///
/// All fields are fixed at construction. `window_pattern` and `window_class`
/// only take part in window lookup; identity comes from registration.
///
/// # Example
/// ```
/// use hypr_app_macros::core::{ApplicationDescriptor, WindowPattern};
///
/// let firefox = ApplicationDescriptor::new(
///     "mozilla firefox/firefox",
///     Some(WindowPattern::new("firefox").unwrap()),
///     "MozillaWindowClass",
///     None,
/// );
/// assert!(firefox.matches_window("mozillawindowclass", "Start Page"));
/// assert!(firefox.id().is_none()); // not registered yet
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ApplicationDescriptor {
    #[serde(skip)]
    id: Option<DescriptorId>,
    identifier: String,
    window_pattern: Option<WindowPattern>,
    window_class: String,
    architecture: Option<Architecture>,
    binary: Option<String>,
}

impl ApplicationDescriptor {
    /// Creates an unregistered descriptor
    pub fn new(
        identifier: &str,
        window_pattern: Option<WindowPattern>,
        window_class: &str,
        architecture: Option<Architecture>,
    ) -> Self {
        Self {
            id: None,
            identifier: identifier.to_string(),
            window_pattern,
            window_class: window_class.to_string(),
            architecture,
            binary: None,
        }
    }

    /// Sets the executable used to launch the application instead of `identifier`
    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = Some(binary.to_string());
        self
    }

    pub(crate) fn assign_id(&mut self, id: DescriptorId) {
        self.id = Some(id);
    }

    /// Registry identity, `None` until registered
    pub fn id(&self) -> Option<DescriptorId> {
        self.id
    }

    /// Launch path or alias
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn window_pattern(&self) -> Option<&WindowPattern> {
        self.window_pattern.as_ref()
    }

    pub fn window_class(&self) -> &str {
        &self.window_class
    }

    pub fn architecture(&self) -> Option<Architecture> {
        self.architecture
    }

    /// Executable override, if any
    pub fn binary(&self) -> Option<&str> {
        self.binary.as_deref()
    }

    /// What to launch: the binary override, or the identifier
    pub fn launch_target(&self) -> &str {
        self.binary.as_deref().unwrap_or(&self.identifier)
    }

    /// Returns true if a running window belongs to this application
    ///
    /// Matches when the class equals `window_class` (ignoring case), or when
    /// the window pattern matches the title or the class.
    pub fn matches_window(&self, class: &str, title: &str) -> bool {
        if !self.window_class.is_empty() && self.window_class.eq_ignore_ascii_case(class) {
            return true;
        }

        self.window_pattern
            .as_ref()
            .map(|pattern| pattern.is_match(title) || pattern.is_match(class))
            .unwrap_or(false)
    }
}

/// Field equality; registration identity is ignored
impl PartialEq for ApplicationDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.window_pattern == other.window_pattern
            && self.window_class == other.window_class
            && self.architecture == other.architecture
            && self.binary == other.binary
    }
}

impl Eq for ApplicationDescriptor {}

impl fmt::Display for ApplicationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.launch_target(), self.window_class)?;

        if let Some(pattern) = &self.window_pattern {
            write!(f, " {}", pattern)?;
        }
        if let Some(arch) = self.architecture {
            write!(f, " ({})", arch)?;
        }

        Ok(())
    }
}
