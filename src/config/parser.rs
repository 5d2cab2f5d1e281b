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

//! src/config/parser.rs
//!
//! Registry config file parser
//!
//! This module turns the line-oriented registry file into directives.
//! It handles:
//! - `app`, `binary`, `macro`, `hotkey` and `layout` directives
//! - Variable substitution ($mozilla)
//! - Comments and whitespace
//! - Line numbers for error reporting
//!
//! # Architecture
//! The parser uses nom combinators for the directive keyword and
//! performs two-pass parsing:
//! 1. First pass: Collect variable definitions
//! 2. Second pass: Parse directives with variable substitution
//!
//! # Security
//! The parser only reads and structures data - it never executes commands
//! or touches the registry. Names and identifiers are validated by the
//! loader after parsing.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, space0},
    sequence::terminated,
    IResult, Parser,
};
use std::{cmp::Reverse, collections::HashMap};
use thiserror::Error;

use crate::core::types::{Architecture, Hotkey, KeyCombo, Modifier, WindowPattern};

/// Parse errors with line number context
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Parse error on line {line}: {message}")]
    InvalidSyntax { line: usize, message: String },

    #[error("Undefined variable '${variable}' on line {line}")]
    UndefinedVariable { variable: String, line: usize },

    #[error("Invalid window pattern on line {line}: {message}")]
    InvalidPattern { line: usize, message: String },
}

/// One parsed config line
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// `app = NAME, IDENTIFIER, PATTERN, CLASS[, ARCH]`
    App {
        name: String,
        identifier: String,
        window_pattern: Option<WindowPattern>,
        window_class: String,
        architecture: Option<Architecture>,
    },

    /// `binary = APP, EXECUTABLE`
    Binary { app: String, executable: String },

    /// `macro = APP, NAME, STEPS`
    Macro { app: String, name: String, body: String },

    /// `hotkey = MODS, KEY, APP, MACRO`
    Hotkey(Hotkey),

    /// `layout = CODE`
    Layout(String),
}

/// A directive and the 1-based line it came from
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedLine {
    pub line: usize,
    pub directive: Directive,
}

/// Parse a complete registry config file
///
/// # Example
/// ```
/// use hypr_app_macros::config::parser::{parse_config, Directive};
///
/// let content = "$ff = firefox\napp = Firefox, $ff, , firefox\nlayout = de\n";
/// let lines = parse_config(content).unwrap();
///
/// assert_eq!(lines.len(), 2);
/// assert_eq!(lines[1].line, 3);
/// assert_eq!(lines[1].directive, Directive::Layout("de".to_string()));
/// ```
pub fn parse_config(content: &str) -> Result<Vec<ParsedLine>, ParseError> {
    // First pass: Collect variable definitions
    let variables = collect_variables(content);

    // Second pass: Parse directives with variable substitution
    let mut directives = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1; // Human-readable numbers start at 1

        let line_trimmed = line.trim();
        if line_trimmed.is_empty() || line_trimmed.starts_with('#') {
            continue;
        }

        if line_trimmed.starts_with('$') {
            if line_trimmed.contains('=') {
                continue;
            }
            return Err(invalid(line_num, "variable definition without '='"));
        }

        let substituted = substitute_variables(line_trimmed, &variables);

        if let Some(variable) = find_undefined_variable(&substituted) {
            return Err(ParseError::UndefinedVariable {
                variable,
                line: line_num,
            });
        }

        directives.push(ParsedLine {
            line: line_num,
            directive: parse_directive(&substituted, line_num)?,
        });
    }

    Ok(directives)
}

/// Collect variable definitions from config
///
/// ```text
/// $mozilla = mozilla firefox/firefox
/// $adobe = Adobe/Adobe Photoshop CS5.1 (64 Bit)
/// ```
///
/// A value may use variables defined on earlier lines.
pub fn collect_variables(contents: &str) -> HashMap<String, String> {
    let mut variables = HashMap::new();

    for line in contents.lines() {
        let line_trimmed = line.trim();

        if let Some(definition) = line_trimmed.strip_prefix('$') {
            if let Some((name, value)) = definition.split_once('=') {
                let value = substitute_variables(value.trim(), &variables);
                variables.insert(name.trim().to_string(), value);
            }
        }
    }

    variables
}

/// Substitute variables in a line
///
/// Longer names are replaced first so `$ff` never clobbers `$ffdev`.
pub fn substitute_variables(line: &str, variables: &HashMap<String, String>) -> String {
    let mut names: Vec<&String> = variables.keys().collect();
    names.sort_by_key(|name| Reverse(name.len()));

    let mut result = line.to_string();
    for name in names {
        result = result.replace(&format!("${}", name), &variables[name]);
    }

    result
}

/// First `$name` left in a line after substitution
fn find_undefined_variable(line: &str) -> Option<String> {
    let is_name_char = |c: char| c.is_alphanumeric() || c == '_';

    line.match_indices('$').find_map(|(pos, _)| {
        let name: String = line[pos + 1..].chars().take_while(|&c| is_name_char(c)).collect();
        (!name.is_empty()).then_some(name)
    })
}

/// Directive keyword and the `=` after it
fn parse_keyword(input: &str) -> IResult<&str, &str> {
    terminated(
        take_while1(|c: char| c.is_ascii_alphabetic()),
        (space0, char('='), space0),
    )
    .parse(input)
}

/// Parse a single directive line (comments and variables already handled)
pub fn parse_directive(input: &str, line: usize) -> Result<Directive, ParseError> {
    let (rest, keyword) =
        parse_keyword(input).map_err(|_| invalid(line, "expected 'directive = value'"))?;

    match keyword {
        "app" => parse_app(rest, line),
        "binary" => {
            let [app, executable] = fields::<2>(rest, line, "binary = APP, EXECUTABLE")?;
            Ok(Directive::Binary {
                app: required(app, line, "application name")?,
                executable: required(executable, line, "executable")?,
            })
        }
        "macro" => {
            let [app, name, body] = fields::<3>(rest, line, "macro = APP, NAME, STEPS")?;
            Ok(Directive::Macro {
                app: required(app, line, "application name")?,
                name: required(name, line, "macro name")?,
                body: required(body, line, "macro steps")?,
            })
        }
        "hotkey" => parse_hotkey(rest, line),
        "layout" => Ok(Directive::Layout(required(rest.trim(), line, "layout code")?)),
        other => Err(invalid(line, &format!("unknown directive '{}'", other))),
    }
}

/// `NAME, IDENTIFIER, PATTERN, CLASS[, ARCH]`
fn parse_app(rest: &str, line: usize) -> Result<Directive, ParseError> {
    let usage = "app = NAME, IDENTIFIER, PATTERN, CLASS[, ARCH]";
    let parts: Vec<&str> = rest.splitn(5, ',').map(str::trim).collect();

    if parts.len() < 4 {
        return Err(invalid(line, &format!("expected {}", usage)));
    }

    let architecture = match parts.get(4) {
        None | Some(&"") => None,
        Some(tag) => Some(
            Architecture::from_tag(tag)
                .ok_or_else(|| invalid(line, &format!("unknown architecture '{}'", tag)))?,
        ),
    };

    Ok(Directive::App {
        name: required(parts[0], line, "application name")?,
        identifier: parts[1].to_string(),
        window_pattern: parse_pattern(parts[2], line)?,
        window_class: parts[3].to_string(),
        architecture,
    })
}

/// Empty, or `/regex/`
fn parse_pattern(field: &str, line: usize) -> Result<Option<WindowPattern>, ParseError> {
    if field.is_empty() {
        return Ok(None);
    }

    let source = field
        .strip_prefix('/')
        .and_then(|s| s.strip_suffix('/'))
        .ok_or_else(|| invalid(line, "window pattern must be empty or /regex/"))?;

    if source.is_empty() {
        return Err(ParseError::InvalidPattern {
            line,
            message: "empty pattern".to_string(),
        });
    }

    WindowPattern::new(source)
        .map(Some)
        .map_err(|e| ParseError::InvalidPattern {
            line,
            message: e.to_string(),
        })
}

/// `MODS, KEY, APP, MACRO`
fn parse_hotkey(rest: &str, line: usize) -> Result<Directive, ParseError> {
    let [modifiers, key, app, macro_name] = fields::<4>(rest, line, "hotkey = MODS, KEY, APP, MACRO")?;

    let modifiers = parse_modifiers(modifiers, line)?;
    let key = required(key, line, "key")?;

    Ok(Directive::Hotkey(Hotkey {
        key_combo: KeyCombo::new(modifiers, &key),
        app: required(app, line, "application name")?,
        macro_name: required(macro_name, line, "macro name")?,
    }))
}

/// Parse modifiers from a string
///
/// Handles formats:
/// - "SUPER" → [Super]
/// - "SUPER_SHIFT" → [Super, Shift]
/// - "SUPER SHIFT" → [Super, Shift]
/// - "" → []
pub fn parse_modifiers(input: &str, line: usize) -> Result<Vec<Modifier>, ParseError> {
    input
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            Modifier::from_name(part)
                .ok_or_else(|| invalid(line, &format!("unknown modifier '{}'", part)))
        })
        .collect()
}

/// Splits into exactly `N` comma-separated fields; the last takes the rest
fn fields<'a, const N: usize>(rest: &'a str, line: usize, usage: &str) -> Result<[&'a str; N], ParseError> {
    let parts: Vec<&str> = rest.splitn(N, ',').map(str::trim).collect();

    parts
        .try_into()
        .map_err(|_| invalid(line, &format!("expected {}", usage)))
}

fn required(field: &str, line: usize, what: &str) -> Result<String, ParseError> {
    if field.is_empty() {
        Err(invalid(line, &format!("missing {}", what)))
    } else {
        Ok(field.to_string())
    }
}

fn invalid(line: usize, message: &str) -> ParseError {
    ParseError::InvalidSyntax {
        line,
        message: message.to_string(),
    }
}
