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

//! Hyprland IPC backend with safety modes
//!
//! # Safety Modes
//!
//! This module operates in three modes:
//! - **DryRun** (default for tests): Records commands, never sends IPC
//! - **ReadOnly**: Can query Hyprland (windows, keyboards), cannot act
//! - **Live**: Full access (requires explicit opt-in)
//!
//! # Example
//! ```
//! use hypr_app_macros::automation::{ClientMode, HyprlandClient, KeystrokeInjector};
//! use hypr_app_macros::core::keys::parse_key_sequence;
//!
//! // Safe: DryRun mode records but never sends IPC
//! let client = HyprlandClient::new(ClientMode::DryRun);
//!
//! let keys = parse_key_sequence("(ctrl l)").unwrap();
//! client.send_keys(&keys).unwrap();
//!
//! assert_eq!(client.sent_commands(), vec!["sendshortcut CTRL, l".to_string()]);
//! ```

use std::cell::RefCell;
use std::fmt::Display;
use std::path::Path;

use ::hyprland::data::{Client, Clients, Devices};
use ::hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier};
use ::hyprland::keyword::Keyword;
use ::hyprland::shared::{HyprData, HyprDataActiveOptional};
use log::{debug, info, warn};

use super::{AutomationError, KeyboardLayout, KeystrokeInjector, LayoutDetector, WindowActivator};
use crate::core::keys::{KeyChord, KeySequence};
use crate::core::types::{ApplicationDescriptor, Hotkey, Modifier};
use crate::core::validator;

/// IPC client operation mode
///
/// Controls what operations are allowed. Tests default to DryRun.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientMode {
    /// Record only - NEVER sends to Hyprland (default for tests)
    DryRun,

    /// Can query Hyprland but cannot focus, type or bind
    ReadOnly,

    /// Full access - requires explicit opt-in
    Live,
}

/// Hyprland IPC client implementing the automation traits
///
/// Before any command is sent it passes through:
/// 1. **Validation** - hotkeys are checked for injection attempts
/// 2. **Command building** - arguments assembled from validated parts
/// 3. **Mode check** - DryRun/ReadOnly/Live enforcement
/// 4. **IPC transmission** - only in Live mode
///
/// In DryRun mode every command that would have been sent is kept, in
/// order, and can be read back with [`HyprlandClient::sent_commands`].
#[derive(Debug)]
pub struct HyprlandClient {
    /// Operation mode (DryRun/ReadOnly/Live)
    mode: ClientMode,

    /// Layout reported instead of asking the compositor
    layout_override: Option<KeyboardLayout>,

    /// Commands recorded in DryRun mode
    sent: RefCell<Vec<String>>,
}

impl HyprlandClient {
    /// Creates a new client in the specified mode
    pub fn new(mode: ClientMode) -> Self {
        Self {
            mode,
            layout_override: None,
            sent: RefCell::new(Vec::new()),
        }
    }

    /// Forces the layout reported by [`LayoutDetector::current_layout`]
    pub fn with_layout(mut self, layout: Option<KeyboardLayout>) -> Self {
        self.layout_override = layout;
        self
    }

    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    /// Commands recorded so far (DryRun only)
    pub fn sent_commands(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }

    /// Registers a hotkey with the running compositor
    ///
    /// The bind runs `hypr-app-macros run APP MACRO`, passing `config` along
    /// when given so the hotkey uses the same registry file.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Command validated (DryRun) or sent successfully (Live)
    /// * `Err(AutomationError::ValidationFailed)` - Injection attempt blocked
    /// * `Err(AutomationError::ReadOnly)` - Client in read-only mode
    pub fn add_hotkey(&self, hotkey: &Hotkey, config: Option<&Path>) -> Result<(), AutomationError> {
        // Layer 1: Validate BEFORE IPC
        if let Some(path) = config {
            validator::validate_forwarded_path(path)
                .map_err(|e| AutomationError::ValidationFailed(e.to_string()))?;
        }
        let exec = hotkey.exec_command(config);
        validator::validate_hotkey(hotkey, &exec)
            .map_err(|e| AutomationError::ValidationFailed(e.to_string()))?;

        // Layer 2: Build command
        let value = hotkey.bind_value(config);

        // Layer 3: Mode check
        match self.mode {
            ClientMode::DryRun => {
                self.record(format!("keyword bind {}", value));
                Ok(())
            }
            ClientMode::ReadOnly => Err(AutomationError::ReadOnly("add hotkeys".to_string())),
            ClientMode::Live => {
                // Layer 4: Actually send to Hyprland
                debug!("keyword bind {}", value);
                Keyword::set("bind", value.as_str()).map_err(|e| map_ipc_error("bind hotkey", e))
            }
        }
    }

    /// Class and title of the focused window
    ///
    /// DryRun never queries, so there is no focused window to report.
    pub fn focused_window(&self) -> Result<Option<(String, String)>, AutomationError> {
        match self.mode {
            ClientMode::DryRun => Ok(None),
            ClientMode::ReadOnly | ClientMode::Live => {
                let active = Client::get_active().map_err(|e| map_ipc_error("query active window", e))?;
                Ok(active.map(|client| (client.class, client.title)))
            }
        }
    }

    /// Arguments of a `sendshortcut` dispatch: `MODS, KEY`
    ///
    /// Modifiers are joined with underscores; an empty modifier field
    /// means the bare key. The window is left out so the shortcut goes to
    /// the focused window.
    pub fn build_shortcut_args(chord: &KeyChord) -> String {
        let modifiers = chord
            .modifiers
            .iter()
            .map(|m| match m {
                Modifier::Super => "SUPER",
                Modifier::Ctrl => "CTRL",
                Modifier::Shift => "SHIFT",
                Modifier::Alt => "ALT",
            })
            .collect::<Vec<_>>()
            .join("_");

        [modifiers, chord.key.clone()].join(", ")
    }

    /// Window selector for a descriptor, in Hyprland's window-rule syntax
    ///
    /// Mirrors the first rule [`ApplicationDescriptor::matches_window`] tries:
    /// the class, compared case-insensitively, then the pattern on the title.
    /// `None` when the descriptor can never match a window.
    pub fn window_selector(descriptor: &ApplicationDescriptor) -> Option<String> {
        if !descriptor.window_class().is_empty() {
            Some(format!("class:(?i)^({})$", regex::escape(descriptor.window_class())))
        } else {
            descriptor
                .window_pattern()
                .map(|pattern| format!("title:{}", pattern.as_str()))
        }
    }

    fn record(&self, command: String) {
        debug!("dry-run: {}", command);
        self.sent.borrow_mut().push(command);
    }

    fn dispatch(&self, dispatch: DispatchType<'_>, context: &str) -> Result<(), AutomationError> {
        Dispatch::call(dispatch).map_err(|e| map_ipc_error(context, e))
    }
}

impl WindowActivator for HyprlandClient {
    fn activate(&self, descriptor: &ApplicationDescriptor) -> Result<bool, AutomationError> {
        match self.mode {
            ClientMode::DryRun => match Self::window_selector(descriptor) {
                Some(selector) => {
                    self.record(format!("focuswindow {}", selector));
                    Ok(true)
                }
                None => {
                    info!("{} has no window class or pattern to match", descriptor);
                    Ok(false)
                }
            },
            ClientMode::ReadOnly => Err(AutomationError::ReadOnly("activate windows".to_string())),
            ClientMode::Live => {
                let clients = Clients::get().map_err(|e| map_ipc_error("list windows", e))?;

                let window = clients
                    .into_iter()
                    .find(|client| descriptor.matches_window(&client.class, &client.title));

                match window {
                    Some(client) => {
                        debug!("focusing {} ({})", client.title, client.class);
                        self.dispatch(
                            DispatchType::FocusWindow(WindowIdentifier::Address(client.address)),
                            "focus window",
                        )?;
                        Ok(true)
                    }
                    None => {
                        info!("no window found for {}", descriptor);
                        Ok(false)
                    }
                }
            }
        }
    }
}

impl KeystrokeInjector for HyprlandClient {
    fn send_keys(&self, sequence: &KeySequence) -> Result<(), AutomationError> {
        if self.mode == ClientMode::ReadOnly {
            return Err(AutomationError::ReadOnly("send keys".to_string()));
        }

        for chord in sequence {
            let args = Self::build_shortcut_args(chord);

            match self.mode {
                ClientMode::Live => {
                    debug!("sendshortcut {}", args);
                    self.dispatch(DispatchType::Custom("sendshortcut", &args), "send shortcut")?;
                }
                _ => self.record(format!("sendshortcut {}", args)),
            }
        }

        Ok(())
    }
}

impl LayoutDetector for HyprlandClient {
    fn current_layout(&self) -> Result<KeyboardLayout, AutomationError> {
        if let Some(layout) = &self.layout_override {
            return Ok(layout.clone());
        }

        if self.mode == ClientMode::DryRun {
            return Ok(KeyboardLayout::us());
        }

        let devices = Devices::get().map_err(|e| map_ipc_error("query keyboards", e))?;

        match devices.keyboards.first() {
            Some(keyboard) => Ok(KeyboardLayout::from_device(&keyboard.layout, &keyboard.active_keymap)),
            None => {
                warn!("no keyboard reported by Hyprland, assuming us layout");
                Ok(KeyboardLayout::us())
            }
        }
    }
}

/// Distinguishes "Hyprland is not running" from other IPC failures
fn map_ipc_error(context: &str, error: impl Display) -> AutomationError {
    let message = error.to_string();

    if message.contains("No such file or directory") || message.contains("HYPRLAND_INSTANCE_SIGNATURE") {
        AutomationError::NotRunning("Hyprland IPC socket not found - is Hyprland running?".to_string())
    } else {
        AutomationError::CommandFailed(format!("Failed to {}: {}", context, message))
    }
}
