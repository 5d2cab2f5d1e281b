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

//! Application registry with per-descriptor macro extension
//!
//! The registry maps human-readable application names to descriptors and
//! keeps, next to each descriptor, the named macros attached to it. Macros
//! are stored alongside descriptors rather than inside them: a descriptor
//! stays plain data and is resolved to its macros by explicit lookup.
//!
//! # Identity
//! Every registration gets a fresh [`DescriptorId`] that names both the
//! registry and the slot. Macro storage is indexed by that id, so two
//! descriptors with identical fields never share macros, and a descriptor
//! from another registry is rejected.
//!
//! # Lifecycle
//! Populated once at startup, read-only afterwards. Nothing is ever removed.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use thiserror::Error;

use crate::automation::{AutomationBackend, AutomationError};
use crate::core::macros::{Macro, MacroContext, MacroOutcome};
use crate::core::types::{ApplicationDescriptor, Architecture, DescriptorId, WindowPattern};
use crate::core::validator::{validate_name, ValidationError};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An application with this name is already registered
    #[error("Application '{0}' is already registered")]
    DuplicateName(String),

    /// The descriptor was never registered here
    #[error("Descriptor '{0}' is not registered in this registry")]
    UnknownDescriptor(String),

    /// No application with this name
    #[error("Application '{0}' not found")]
    NotFound(String),

    /// The descriptor already has a macro with this name
    #[error("Application '{app}' already has a macro named '{name}'")]
    DuplicateMacro { app: String, name: String },

    /// The application has no macro with this name
    #[error("Application '{app}' has no macro named '{name}'")]
    UnknownMacro { app: String, name: String },

    #[error(transparent)]
    InvalidName(#[from] ValidationError),

    #[error(transparent)]
    Automation(#[from] AutomationError),
}

type MacroTable = BTreeMap<String, Box<dyn Macro>>;

/// Process-wide lookup table of application descriptors and their macros
///
/// # Example
/// ```
/// use hypr_app_macros::core::{ApplicationRegistry, MacroContext, MacroOutcome, MacroResult};
///
/// let mut registry = ApplicationRegistry::new();
/// let firefox = registry
///     .register("Firefox", "mozilla firefox/firefox", None, "MozillaWindowClass", None)
///     .unwrap();
///
/// registry
///     .extend(&firefox, "focus_address_bar", |ctx: &MacroContext<'_>| -> MacroResult {
///         if !ctx.activate()? {
///             return Ok(MacroOutcome::Skipped);
///         }
///         ctx.type_keys("(ctrl l)")?;
///         Ok(MacroOutcome::Completed)
///     })
///     .unwrap();
///
/// assert_eq!(registry.lookup("Firefox").unwrap(), &firefox);
/// ```
pub struct ApplicationRegistry {
    /// Distinguishes descriptors registered here from those of other registries
    id: u64,

    /// Registered applications, indexed by slot, in registration order
    entries: Vec<(String, ApplicationDescriptor)>,

    /// Name → slot
    by_name: HashMap<String, usize>,

    /// Macros per slot, stored alongside the descriptors
    macros: Vec<MacroTable>,
}

impl ApplicationRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            by_name: HashMap::new(),
            macros: Vec::new(),
        }
    }

    /// Registers an application under `name`
    ///
    /// # Errors
    ///
    /// * `RegistryError::DuplicateName` - `name` is already registered
    /// * `RegistryError::InvalidName` - `name` is not a valid application name
    pub fn register(
        &mut self,
        name: &str,
        identifier: &str,
        window_pattern: Option<WindowPattern>,
        window_class: &str,
        architecture: Option<Architecture>,
    ) -> Result<ApplicationDescriptor, RegistryError> {
        let descriptor = ApplicationDescriptor::new(identifier, window_pattern, window_class, architecture);
        self.register_descriptor(name, descriptor)
    }

    /// Registers a pre-built descriptor under `name`
    ///
    /// The stored copy gets a fresh identity, even if `descriptor` was
    /// registered before; the returned descriptor carries it.
    pub fn register_descriptor(
        &mut self,
        name: &str,
        mut descriptor: ApplicationDescriptor,
    ) -> Result<ApplicationDescriptor, RegistryError> {
        validate_name(name)?;

        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName(name.to_string()));
        }

        let slot = self.entries.len();
        descriptor.assign_id(DescriptorId { registry: self.id, slot });

        debug!("registered {} as {}", descriptor, name);

        self.by_name.insert(name.to_string(), slot);
        self.entries.push((name.to_string(), descriptor.clone()));
        self.macros.push(MacroTable::new());

        Ok(descriptor)
    }

    /// Attaches a named macro to one registered descriptor
    ///
    /// # Errors
    ///
    /// * `RegistryError::UnknownDescriptor` - descriptor not registered here
    /// * `RegistryError::DuplicateMacro` - the descriptor already has `macro_name`
    /// * `RegistryError::InvalidName` - `macro_name` is not a valid name
    pub fn extend<M>(
        &mut self,
        descriptor: &ApplicationDescriptor,
        macro_name: &str,
        implementation: M,
    ) -> Result<(), RegistryError>
    where
        M: Macro + 'static,
    {
        let slot = self.slot_of(descriptor)?;
        validate_name(macro_name)?;

        let app = &self.entries[slot].0;
        let table = &mut self.macros[slot];

        if table.contains_key(macro_name) {
            return Err(RegistryError::DuplicateMacro {
                app: app.clone(),
                name: macro_name.to_string(),
            });
        }

        debug!("attached macro {} to {}", macro_name, app);
        table.insert(macro_name.to_string(), Box::new(implementation));

        Ok(())
    }

    /// Looks up an application by name
    ///
    /// # Errors
    ///
    /// * `RegistryError::NotFound` - no application registered under `name`
    pub fn lookup(&self, name: &str) -> Result<&ApplicationDescriptor, RegistryError> {
        self.by_name
            .get(name)
            .map(|&slot| &self.entries[slot].1)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Runs a macro of a registered application
    pub fn invoke(
        &self,
        name: &str,
        macro_name: &str,
        backend: &dyn AutomationBackend,
    ) -> Result<MacroOutcome, RegistryError> {
        let slot = *self
            .by_name
            .get(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let implementation = self.macros[slot].get(macro_name).ok_or_else(|| RegistryError::UnknownMacro {
            app: name.to_string(),
            name: macro_name.to_string(),
        })?;

        debug!("running {}.{}", name, macro_name);

        let ctx = MacroContext::new(&self.entries[slot].1, backend);
        Ok(implementation.run(&ctx)?)
    }

    /// Names of the macros attached to a descriptor, sorted
    pub fn macro_names(&self, descriptor: &ApplicationDescriptor) -> Result<Vec<&str>, RegistryError> {
        let slot = self.slot_of(descriptor)?;
        Ok(self.macros[slot].keys().map(String::as_str).collect())
    }

    /// Returns true if application `name` has a macro `macro_name`
    pub fn has_macro(&self, name: &str, macro_name: &str) -> bool {
        self.by_name
            .get(name)
            .map(|&slot| self.macros[slot].contains_key(macro_name))
            .unwrap_or(false)
    }

    /// First application (in registration order) owning a running window
    pub fn find_by_window(&self, class: &str, title: &str) -> Option<(&str, &ApplicationDescriptor)> {
        self.iter()
            .find(|(_, descriptor)| descriptor.matches_window(class, title))
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, descriptor)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ApplicationDescriptor)> {
        self.entries.iter().map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a descriptor to its slot, checking it belongs to this registry
    fn slot_of(&self, descriptor: &ApplicationDescriptor) -> Result<usize, RegistryError> {
        descriptor
            .id()
            .filter(|id| id.registry == self.id && id.slot < self.entries.len())
            .map(|id| id.slot)
            .ok_or_else(|| RegistryError::UnknownDescriptor(descriptor.identifier().to_string()))
    }
}

impl Default for ApplicationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ApplicationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for ((name, descriptor), macros) in self.entries.iter().zip(&self.macros) {
            let names = macros.keys().collect::<Vec<_>>();
            map.entry(name, &(descriptor, names));
        }
        map.finish()
    }
}
