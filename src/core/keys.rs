// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/keys.rs
//!
//! Keystroke notation used by macros
//!
//! A key sequence mixes literal text and chords:
//! - `hello` types five keys, one per character
//! - `(ctrl l)` presses CTRL+L
//! - `(shift +)` presses SHIFT+plus
//! - `name(tab)value(enter)` mixes both
//!
//! Inside parentheses, tokens are separated by whitespace and the last token
//! is the key. Every key is stored as an xkb keysym name (`l`, `plus`,
//! `Return`, `odiaeresis`), which is what the compositor expects.
//!
//! # Architecture
//! nom splits the input into chord and character tokens; resolving names to
//! keysyms happens afterwards so errors can say exactly what was wrong.

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0, multispace1, none_of},
    combinator::map,
    multi::{many0, separated_list0},
    sequence::delimited,
    IResult, Parser,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::core::types::{normalise_modifiers, Modifier};

/// Key notation errors
#[derive(Debug, Error, PartialEq)]
pub enum KeyParseError {
    #[error("Unclosed '(' at offset {0}")]
    UnclosedChord(usize),

    #[error("Empty chord '()'")]
    EmptyChord,

    #[error("Chord '({0})' has modifiers but no key")]
    MissingKey(String),

    #[error("Unknown modifier '{0}'")]
    UnknownModifier(String),

    #[error("Unknown key name '{0}'")]
    UnknownKey(String),
}

/// Modifiers plus one key, pressed together
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct KeyChord {
    /// Sorted, de-duplicated modifiers
    pub modifiers: Vec<Modifier>,

    /// xkb keysym name
    pub key: String,
}

impl KeyChord {
    pub fn new(modifiers: Vec<Modifier>, key: &str) -> Self {
        Self {
            modifiers: normalise_modifiers(modifiers),
            key: key.to_string(),
        }
    }

    /// Chord that types one literal character
    ///
    /// Uppercase letters become SHIFT + the lowercase letter.
    pub fn from_char(c: char) -> Self {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) if c.is_uppercase() && l != c => {
                KeyChord::new(vec![Modifier::Shift], &char_keysym(l))
            }
            _ => KeyChord::new(Vec::new(), &char_keysym(c)),
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

/// Ordered list of chords injected one after another
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KeySequence(Vec<KeyChord>);

impl KeySequence {
    pub fn new(chords: Vec<KeyChord>) -> Self {
        Self(chords)
    }

    pub fn chords(&self) -> &[KeyChord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyChord> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a KeySequence {
    type Item = &'a KeyChord;
    type IntoIter = std::slice::Iter<'a, KeyChord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chords = self.0.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        write!(f, "{}", chords.join(" "))
    }
}

impl std::str::FromStr for KeySequence {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_key_sequence(s)
    }
}

/// Raw token before keysym resolution
#[derive(Debug, PartialEq)]
enum Token<'a> {
    Chord(Vec<&'a str>),
    Char(char),
}

/// Parse a key sequence in macro notation
///
/// # Example
/// ```
/// use hypr_app_macros::core::keys::parse_key_sequence;
/// use hypr_app_macros::core::Modifier;
///
/// let seq = parse_key_sequence("(ctrl l)").unwrap();
/// assert_eq!(seq.len(), 1);
/// assert_eq!(seq.chords()[0].modifiers, vec![Modifier::Ctrl]);
/// assert_eq!(seq.chords()[0].key, "l");
/// ```
pub fn parse_key_sequence(input: &str) -> Result<KeySequence, KeyParseError> {
    // Tokenising cannot fail outright: many0 stops at the first '(' it cannot close
    let (rest, tokens) = match parse_tokens(input) {
        Ok(parsed) => parsed,
        Err(_) => return Err(KeyParseError::UnclosedChord(0)),
    };

    if !rest.is_empty() {
        return Err(KeyParseError::UnclosedChord(input.len() - rest.len()));
    }

    let chords = tokens
        .into_iter()
        .map(|token| match token {
            Token::Char(c) => Ok(KeyChord::from_char(c)),
            Token::Chord(parts) => resolve_chord(&parts),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(KeySequence::new(chords))
}

fn parse_tokens(input: &str) -> IResult<&str, Vec<Token<'_>>> {
    many0(alt((parse_chord, parse_char))).parse(input)
}

/// Parse `( tok tok ... )`
fn parse_chord(input: &str) -> IResult<&str, Token<'_>> {
    map(
        delimited(
            (char('('), multispace0),
            separated_list0(
                multispace1,
                take_while1(|c: char| !c.is_whitespace() && c != '(' && c != ')'),
            ),
            (multispace0, char(')')),
        ),
        Token::Chord,
    )
    .parse(input)
}

/// Parse one literal character (anything but an opening parenthesis)
fn parse_char(input: &str) -> IResult<&str, Token<'_>> {
    map(none_of("("), Token::Char).parse(input)
}

fn resolve_chord(parts: &[&str]) -> Result<KeyChord, KeyParseError> {
    let (key, modifier_names) = match parts.split_last() {
        Some(split) => split,
        None => return Err(KeyParseError::EmptyChord),
    };

    let mut modifiers = Vec::with_capacity(modifier_names.len());
    for name in modifier_names {
        let modifier = Modifier::from_name(name)
            .ok_or_else(|| KeyParseError::UnknownModifier(name.to_string()))?;
        modifiers.push(modifier);
    }

    if Modifier::from_name(key).is_some() {
        return Err(KeyParseError::MissingKey(parts.join(" ")));
    }

    Ok(KeyChord::new(modifiers, &resolve_key(key)?))
}

/// Resolves a key token to its keysym name
///
/// Single characters always resolve; longer tokens must be a known key name.
pub fn resolve_key(token: &str) -> Result<String, KeyParseError> {
    let mut chars = token.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(char_keysym(c));
    }

    let lower = token.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=24).contains(&n) {
            return Ok(format!("F{}", n));
        }
    }

    let name = match lower.as_str() {
        "enter" | "return" => "Return",
        "tab" => "Tab",
        "esc" | "escape" => "Escape",
        "backspace" => "BackSpace",
        "del" | "delete" => "Delete",
        "ins" | "insert" => "Insert",
        "home" => "Home",
        "end" => "End",
        "pageup" | "pgup" | "prior" => "Prior",
        "pagedown" | "pgdn" | "next" => "Next",
        "left" => "Left",
        "right" => "Right",
        "up" => "Up",
        "down" => "Down",
        "print" => "Print",
        "menu" => "Menu",
        _ => {
            // Any keysym a literal character can produce (`colon`, `question`, ...)
            return CHAR_KEYSYMS
                .iter()
                .find(|(_, keysym)| keysym.eq_ignore_ascii_case(&lower))
                .map(|(_, keysym)| keysym.to_string())
                .ok_or_else(|| KeyParseError::UnknownKey(token.to_string()));
        }
    };

    Ok(name.to_string())
}

/// Named keysyms for characters that are not their own keysym
const CHAR_KEYSYMS: &[(char, &str)] = &[
    (' ', "space"),
    ('\n', "Return"),
    ('\t', "Tab"),
    ('!', "exclam"),
    ('"', "quotedbl"),
    ('#', "numbersign"),
    ('$', "dollar"),
    ('%', "percent"),
    ('&', "ampersand"),
    ('\'', "apostrophe"),
    ('(', "parenleft"),
    (')', "parenright"),
    ('*', "asterisk"),
    ('+', "plus"),
    (',', "comma"),
    ('-', "minus"),
    ('.', "period"),
    ('/', "slash"),
    (':', "colon"),
    (';', "semicolon"),
    ('<', "less"),
    ('=', "equal"),
    ('>', "greater"),
    ('?', "question"),
    ('@', "at"),
    ('[', "bracketleft"),
    ('\\', "backslash"),
    (']', "bracketright"),
    ('^', "asciicircum"),
    ('_', "underscore"),
    ('`', "grave"),
    ('{', "braceleft"),
    ('|', "bar"),
    ('}', "braceright"),
    ('~', "asciitilde"),
    ('ä', "adiaeresis"),
    ('ö', "odiaeresis"),
    ('ü', "udiaeresis"),
    ('ß', "ssharp"),
    ('å', "aring"),
    ('æ', "ae"),
    ('ø', "oslash"),
];

/// Keysym name for a single character
///
/// ASCII letters and digits are their own keysym. Characters without a
/// named keysym fall back to the `UXXXX` Unicode form xkb understands.
pub fn char_keysym(c: char) -> String {
    if c.is_ascii_alphanumeric() {
        return c.to_string();
    }

    CHAR_KEYSYMS
        .iter()
        .find(|(known, _)| *known == c)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("U{:04X}", c as u32))
}
