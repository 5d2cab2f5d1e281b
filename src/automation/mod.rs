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

//! Input automation seams
//!
//! The registry never focuses windows or injects keys itself. It calls into
//! three collaborators, each a trait so tests and other compositors can
//! provide their own:
//!
//! - [`WindowActivator`]: bring an application's window to the front
//! - [`KeystrokeInjector`]: send a key sequence to the focused window
//! - [`LayoutDetector`]: report the active keyboard layout
//!
//! [`HyprlandClient`] implements all three on top of Hyprland's IPC socket.

pub mod client;
pub mod layout;

pub use client::{ClientMode, HyprlandClient};
pub use layout::KeyboardLayout;

use thiserror::Error;

use crate::core::keys::{KeyParseError, KeySequence};
use crate::core::types::ApplicationDescriptor;

/// Errors raised while talking to the input-automation subsystem
#[derive(Debug, Error)]
pub enum AutomationError {
    /// Compositor is not running or its socket is missing
    #[error("Hyprland not running (socket not found: {0})")]
    NotRunning(String),

    /// Command was sent but the compositor returned an error
    #[error("Hyprland command failed: {0}")]
    CommandFailed(String),

    /// Mutating operation attempted on a read-only client
    #[error("Client in read-only mode - cannot {0}")]
    ReadOnly(String),

    /// A key sequence handed to a macro could not be parsed
    #[error("Invalid key sequence: {0}")]
    InvalidKeys(#[from] KeyParseError),

    /// Command rejected before transmission
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

/// Window-focus primitive
pub trait WindowActivator {
    /// Brings the application's window to the front
    ///
    /// Returns `Ok(false)` when no running window belongs to the application.
    fn activate(&self, descriptor: &ApplicationDescriptor) -> Result<bool, AutomationError>;
}

/// Keystroke-injection primitive
pub trait KeystrokeInjector {
    /// Sends each chord of the sequence, in order, to the focused window
    fn send_keys(&self, sequence: &KeySequence) -> Result<(), AutomationError>;
}

/// Keyboard-layout detection service
pub trait LayoutDetector {
    fn current_layout(&self) -> Result<KeyboardLayout, AutomationError>;
}

/// Everything a macro can call into
pub trait AutomationBackend: WindowActivator + KeystrokeInjector + LayoutDetector {}

impl<T> AutomationBackend for T where T: WindowActivator + KeystrokeInjector + LayoutDetector + ?Sized {}

#[cfg(test)]
mod tests;
