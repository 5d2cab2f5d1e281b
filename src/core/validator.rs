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

//! Security-focused input validation
//!
//! This module implements whitelist-based validation to prevent:
//! - Shell command injection through names that end up in `exec` binds
//! - Malformed application and macro names
//! - Malformed key names that could confuse the compositor's parser
//!
//! # Security Philosophy
//! We use WHITELIST validation (allow known-good) rather than BLACKLIST
//! (block known-bad) because blacklists can be bypassed. Names are limited
//! to a small character set; free-form strings are scanned for shell
//! metacharacters.

use std::path::Path;
use thiserror::Error;

use crate::core::types::Hotkey;

/// Longest accepted launch identifier or exec command
const MAX_ARGUMENT_LEN: usize = 1000;

/// Validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Application or macro name outside the allowed character set
    #[error("Invalid name '{0}': use letters, digits, '_', '-' or '.'")]
    InvalidName(String),

    /// Key name contains invalid characters
    #[error("Invalid key name '{0}'")]
    InvalidKey(String),

    /// Dangerous shell metacharacters detected in arguments
    #[error("Dangerous shell metacharacters detected in arguments: '{0}'")]
    ShellMetacharacters(String),

    /// Argument exceeds maximum length
    #[error("Argument too long: {0} characters (max 1000)")]
    ArgumentTooLong(usize),

    /// Path would be split into several words by the shell
    #[error("Config path '{0}' contains whitespace and cannot be passed to a hotkey command")]
    WhitespaceInPath(String),
}

/// Validates an application or macro name
///
/// Names are used as registry keys and as words of the `exec` command a
/// hotkey runs, so they must be a single shell-safe word.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name.chars().all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidName(name.to_string()))
    }
}

/// Checks for shell metacharacters that enable command injection
///
/// Detects: ; | & $ ` ( ) { } [ ] < > \ " ' and newlines
pub fn check_shell_metacharacters(input: &str) -> Result<(), ValidationError> {
    const DANGEROUS_CHARS: &[char] = &[
        ';', '|', '&', '$', '`', '(', ')', '{', '}',
        '[', ']', '<', '>', '\\', '"', '\'', '\n', '\r',
    ];

    if input.contains(DANGEROUS_CHARS) {
        return Err(ValidationError::ShellMetacharacters(input.to_string()));
    }

    Ok(())
}

/// Validates a launch identifier (install path or alias)
///
/// Install paths routinely contain parentheses ("Photoshop CS5.1 (64 Bit)"),
/// so those are allowed; everything else the shell would interpret is not.
pub fn validate_identifier(identifier: &str) -> Result<(), ValidationError> {
    if identifier.len() > MAX_ARGUMENT_LEN {
        return Err(ValidationError::ArgumentTooLong(identifier.len()));
    }

    let without_parens: String = identifier.chars().filter(|c| !matches!(c, '(' | ')')).collect();
    check_shell_metacharacters(&without_parens)
        .map_err(|_| ValidationError::ShellMetacharacters(identifier.to_string()))
}

/// Validates key name format
///
/// Accepts alphanumeric, underscores, colons, hyphens (for mouse buttons),
/// and common special keys (Return, Escape, Space, Tab, arrow keys, etc.)
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    let valid = (!key.is_empty()
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':' || c == '-'))
        || matches!(
            key,
            "Return" | "Escape" | "Space" | "Tab" | "BackSpace"
            | "Delete" | "Insert" | "Home" | "End" | "Prior" | "Next"
            | "Left" | "Right" | "Up" | "Down"
        );

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidKey(key.to_string()))
    }
}

/// Validates a hotkey and the command it will run
///
/// Performs all validation checks:
/// - Key name format
/// - Application and macro names
/// - Command length limit (1000 chars)
/// - Shell metacharacter detection on the full command
pub fn validate_hotkey(hotkey: &Hotkey, exec_command: &str) -> Result<(), ValidationError> {
    validate_key(&hotkey.key_combo.key)?;
    validate_name(&hotkey.app)?;
    validate_name(&hotkey.macro_name)?;

    if exec_command.len() > MAX_ARGUMENT_LEN {
        return Err(ValidationError::ArgumentTooLong(exec_command.len()));
    }

    check_shell_metacharacters(exec_command)
}

/// Validates a config path forwarded with `-c` in hotkey commands
///
/// The command is run through the shell unquoted, so the path must be a
/// single word.
pub fn validate_forwarded_path(path: &Path) -> Result<(), ValidationError> {
    let display = path.display().to_string();

    if display.chars().any(char::is_whitespace) {
        return Err(ValidationError::WhitespaceInPath(display));
    }

    check_shell_metacharacters(&display)
}
