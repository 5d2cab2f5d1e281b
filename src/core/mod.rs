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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the fundamental data structures and algorithms
//! for application automation, including:
//! - Type definitions for descriptors, hotkeys and key combinations
//! - The application registry and its per-descriptor macros
//! - Keystroke notation parsing
//! - Hotkey conflict detection reported as `APP.MACRO` targets
//! - Input validation with security whitelisting
//!
//! All business logic is isolated from the compositor and the filesystem;
//! macros run against the traits in `automation`, so everything here can be
//! tested without a running Hyprland.

pub mod conflict;
pub mod keys;
pub mod macros;
pub mod registry;
pub mod types;
pub mod validator;

pub use conflict::{find_conflicts, Conflict};
pub use keys::{KeyChord, KeyParseError, KeySequence};
pub use macros::{Macro, MacroContext, MacroOutcome, MacroResult, MacroScript, MacroStep};
pub use registry::{ApplicationRegistry, RegistryError};
pub use types::*;
pub use validator::ValidationError;

#[cfg(test)]
pub(crate) mod tests;
