//! Hotkey export
//!
//! Renders hotkeys as Hyprland `bind` lines that run this binary, and
//! writes them atomically (temp file + rename) so a half-written snippet
//! is never sourced by the compositor.

use atomic_write_file::AtomicWriteFile;
use chrono::Local;
use log::debug;
use std::{fs, io::Write, path::Path};

use crate::config::ConfigError;
use crate::core::types::Hotkey;
use crate::core::validator::{validate_forwarded_path, validate_hotkey};

/// Renders the bind snippet
///
/// `config` is forwarded with `-c` in every command; pass `None` when the
/// default registry file is used.
///
/// # Errors
///
/// `ConfigError::ValidationFailed` if any resulting command is unsafe.
pub fn render_hotkeys(hotkeys: &[Hotkey], config: Option<&Path>) -> Result<String, ConfigError> {
    let mut out = format!(
        "# Generated by {} on {}\n# Do not edit by hand; regenerate with `{} export`.\n\n",
        env!("CARGO_PKG_NAME"),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        env!("CARGO_PKG_NAME"),
    );

    if let Some(path) = config {
        validate_forwarded_path(path).map_err(|e| ConfigError::ValidationFailed(e.to_string()))?;
    }

    for hotkey in hotkeys {
        validate_hotkey(hotkey, &hotkey.exec_command(config))
            .map_err(|e| ConfigError::ValidationFailed(format!("{}: {}", hotkey, e)))?;

        out.push_str(&format!("bind = {}\n", hotkey.bind_value(config)));
    }

    Ok(out)
}

/// Renders and atomically writes the bind snippet to `path`
///
/// The parent directory is created if missing.
pub fn write_hotkeys(path: &Path, hotkeys: &[Hotkey], config: Option<&Path>) -> Result<(), ConfigError> {
    let content = render_hotkeys(hotkeys, config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = AtomicWriteFile::options()
        .open(path)
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to open for atomic write: {}", e)))?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    debug!("exported {} hotkeys to {}", hotkeys.len(), path.display());

    Ok(())
}
