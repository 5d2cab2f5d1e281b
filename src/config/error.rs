use std::path::PathBuf;
use thiserror::Error;

use crate::config::parser::ParseError;
use crate::core::macros::MacroParseError;
use crate::core::{RegistryError, ValidationError};

/// Errors that can occur while loading or exporting the registry config.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Path could not be expanded or is not valid UTF-8.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Syntax error, undefined variable or bad window pattern.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An `app` line was rejected by the registry.
    #[error("Line {line}: {source}")]
    Registry {
        line: usize,
        #[source]
        source: RegistryError,
    },

    /// A `macro` body could not be parsed.
    #[error("Line {line}: invalid macro: {source}")]
    InvalidMacro {
        line: usize,
        #[source]
        source: MacroParseError,
    },

    /// A `binary` or `macro` line names an application never declared.
    #[error("Line {line}: unknown application '{app}'")]
    UnknownApp { line: usize, app: String },

    /// A `hotkey` line names a macro that does not exist.
    #[error("Line {line}: hotkey targets unknown macro '{app}.{macro_name}'")]
    UnknownHotkeyTarget {
        line: usize,
        app: String,
        macro_name: String,
    },

    /// A value failed security validation.
    #[error("Line {line}: {source}")]
    Validation {
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// Exported content failed validation before being written.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
