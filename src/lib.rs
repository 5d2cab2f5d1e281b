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

//! Hyprland Application Macros
//!
//! A registry of desktop applications with named keystroke macros attached
//! to each one, driven through Hyprland's IPC socket.
//!
//! # Features
//!
//! - **Application Registry:** Descriptors looked up by human-readable name
//! - **Per-Application Macros:** Named behaviour attached to one descriptor
//! - **Key Notation:** `(ctrl l)` chords mixed with literal text
//! - **Layout Awareness:** Macros branch on the active keyboard layout
//! - **Hotkeys:** Conflict detection and export as Hyprland `bind` lines
//! - **Safety Modes:** DryRun / ReadOnly / Live compositor access
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, registry, macros, key notation, validation)
//! - **`automation`:** Window activation, keystroke injection, layout detection
//! - **`config`:** Registry file parsing and hotkey export
//!
//! # Examples
//!
//! ## Registering an application and a macro
//!
//! ```
//! use hypr_app_macros::automation::{ClientMode, HyprlandClient};
//! use hypr_app_macros::core::{ApplicationRegistry, MacroContext, MacroOutcome, MacroResult};
//!
//! let mut registry = ApplicationRegistry::new();
//! let firefox = registry.register("Firefox", "firefox", None, "firefox", None)?;
//!
//! registry.extend(&firefox, "focus_address_bar", |ctx: &MacroContext<'_>| -> MacroResult {
//!     if !ctx.activate()? {
//!         return Ok(MacroOutcome::Skipped);
//!     }
//!     ctx.type_keys("(ctrl l)")?;
//!     Ok(MacroOutcome::Completed)
//! })?;
//!
//! let client = HyprlandClient::new(ClientMode::DryRun);
//! registry.invoke("Firefox", "focus_address_bar", &client)?;
//!
//! assert_eq!(
//!     client.sent_commands(),
//!     vec!["focuswindow class:(?i)^(firefox)$", "sendshortcut CTRL, l"]
//! );
//! # Ok::<(), hypr_app_macros::core::RegistryError>(())
//! ```
//!
//! ## Loading the registry file
//!
//! ```no_run
//! use hypr_app_macros::config::RegistryConfig;
//! use std::path::Path;
//!
//! let config = RegistryConfig::load(Path::new("~/.config/hypr/apps.conf"))?;
//! for conflict in config.conflicts() {
//!     println!("conflict: {}", conflict);
//! }
//! # Ok::<(), hypr_app_macros::config::ConfigError>(())
//! ```

pub mod automation;
pub mod config;
pub mod core;

// Re-export commonly used types for convenience
pub use core::{ApplicationDescriptor, ApplicationRegistry, Hotkey, KeyCombo, Modifier};
