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

//! Registry configuration
//!
//! Loads the application registry, its script macros and hotkeys from a
//! Hyprland-style config file, and exports hotkeys as a `bind` snippet.
//!
//! # Example
//!
//! ```no_run
//! use hypr_app_macros::config::RegistryConfig;
//! use std::path::Path;
//!
//! let config = RegistryConfig::load(Path::new("~/.config/hypr/apps.conf"))?;
//!
//! for (name, descriptor) in config.registry().iter() {
//!     println!("{} → {}", name, descriptor);
//! }
//! # Ok::<(), hypr_app_macros::config::ConfigError>(())
//! ```

pub mod error;
pub mod export;
pub mod parser;

pub use error::ConfigError;
pub use export::{render_hotkeys, write_hotkeys};
pub use parser::{Directive, ParseError, ParsedLine};

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::automation::KeyboardLayout;
use crate::core::validator::{validate_identifier, validate_key};
use crate::core::{find_conflicts, ApplicationDescriptor, ApplicationRegistry, Conflict, Hotkey, MacroScript};

/// Registry file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/hypr/apps.conf";

/// Where `export` writes the bind snippet by default
pub const DEFAULT_EXPORT_PATH: &str = "~/.config/hypr/app-macros.conf";

/// Expands a leading `~` to the home directory
pub fn expand_path(path: &Path) -> Result<PathBuf, ConfigError> {
    let raw = path
        .to_str()
        .ok_or_else(|| ConfigError::InvalidPath(format!("{} is not valid UTF-8", path.display())))?;

    Ok(PathBuf::from(shellexpand::tilde(raw).as_ref()))
}

/// A loaded registry file: applications with their macros, hotkeys and
/// the optional layout override.
#[derive(Debug)]
pub struct RegistryConfig {
    /// Path the config was read from
    path: PathBuf,

    registry: ApplicationRegistry,
    hotkeys: Vec<Hotkey>,
    layout: Option<KeyboardLayout>,
}

impl RegistryConfig {
    /// Reads and parses a registry file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist, otherwise
    /// any error of [`RegistryConfig::parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path = expand_path(path)?;

        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let content = fs::read_to_string(&path)?;
        Self::parse(&content, &path)
    }

    /// Builds the registry from config text
    ///
    /// Applications are registered first (with any `binary` override),
    /// then macros are attached, then hotkeys are checked against them.
    /// Hotkeys may therefore appear anywhere in the file; a `binary` line
    /// must follow the `app` line it refers to.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let lines = parser::parse_config(content)?;

        let mut apps: Vec<(usize, String, ApplicationDescriptor)> = Vec::new();
        let mut macros = Vec::new();
        let mut pending_hotkeys = Vec::new();
        let mut layout = None;

        for ParsedLine { line, directive } in lines {
            match directive {
                Directive::App {
                    name,
                    identifier,
                    window_pattern,
                    window_class,
                    architecture,
                } => {
                    validate_identifier(&identifier)
                        .map_err(|source| ConfigError::Validation { line, source })?;

                    let descriptor =
                        ApplicationDescriptor::new(&identifier, window_pattern, &window_class, architecture);
                    apps.push((line, name, descriptor));
                }
                Directive::Binary { app, executable } => {
                    validate_identifier(&executable)
                        .map_err(|source| ConfigError::Validation { line, source })?;

                    let entry = apps
                        .iter_mut()
                        .find(|(_, name, _)| *name == app)
                        .ok_or_else(|| ConfigError::UnknownApp { line, app: app.clone() })?;

                    entry.2 = entry.2.clone().with_binary(&executable);
                }
                Directive::Macro { app, name, body } => macros.push((line, app, name, body)),
                Directive::Hotkey(hotkey) => pending_hotkeys.push((line, hotkey)),
                Directive::Layout(code) => layout = Some(KeyboardLayout::from_code(&code)),
            }
        }

        let mut registry = ApplicationRegistry::new();
        for (line, name, descriptor) in apps {
            registry
                .register_descriptor(&name, descriptor)
                .map_err(|source| ConfigError::Registry { line, source })?;
        }

        for (line, app, name, body) in macros {
            let descriptor = registry
                .lookup(&app)
                .map_err(|_| ConfigError::UnknownApp { line, app: app.clone() })?
                .clone();

            let script = MacroScript::parse(&body).map_err(|source| ConfigError::InvalidMacro { line, source })?;

            registry
                .extend(&descriptor, &name, script)
                .map_err(|source| ConfigError::Registry { line, source })?;
        }

        let mut hotkeys = Vec::with_capacity(pending_hotkeys.len());
        for (line, hotkey) in pending_hotkeys {
            validate_key(&hotkey.key_combo.key).map_err(|source| ConfigError::Validation { line, source })?;

            if !registry.has_macro(&hotkey.app, &hotkey.macro_name) {
                return Err(ConfigError::UnknownHotkeyTarget {
                    line,
                    app: hotkey.app,
                    macro_name: hotkey.macro_name,
                });
            }

            hotkeys.push(hotkey);
        }

        debug!(
            "loaded {} applications and {} hotkeys from {}",
            registry.len(),
            hotkeys.len(),
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            registry,
            hotkeys,
            layout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registry(&self) -> &ApplicationRegistry {
        &self.registry
    }

    /// Mutable access, for attaching Rust macros to config-declared applications
    pub fn registry_mut(&mut self) -> &mut ApplicationRegistry {
        &mut self.registry
    }

    pub fn hotkeys(&self) -> &[Hotkey] {
        &self.hotkeys
    }

    /// Layout forced by a `layout` line, if any
    pub fn layout(&self) -> Option<&KeyboardLayout> {
        self.layout.as_ref()
    }

    /// Key combinations bound to more than one macro
    pub fn conflicts(&self) -> Vec<Conflict> {
        find_conflicts(&self.hotkeys)
    }
}

#[cfg(test)]
mod tests;
