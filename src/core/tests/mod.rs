//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Registry tests (register, extend, lookup, invoke)
//! - Key notation tests
//! - Macro script tests
//! - Hotkey conflict detection tests
//! - Input validation tests
//!
//! Also provides `RecordingBackend`, an automation backend that records
//! what a macro asked for instead of touching the compositor.

use std::cell::RefCell;

use crate::automation::{
    AutomationError, KeyboardLayout, KeystrokeInjector, LayoutDetector, WindowActivator,
};
use crate::core::keys::KeySequence;
use crate::core::types::ApplicationDescriptor;

#[cfg(test)]
mod macros_tests;

/// Test backend: records activations and keystrokes in order
pub(crate) struct RecordingBackend {
    /// What `activate` reports
    pub running: bool,
    pub layout: KeyboardLayout,
    events: RefCell<Vec<String>>,
}

impl RecordingBackend {
    /// Application running, US layout
    pub fn new() -> Self {
        Self {
            running: true,
            layout: KeyboardLayout::us(),
            events: RefCell::new(Vec::new()),
        }
    }

    pub fn with_layout(code: &str) -> Self {
        Self {
            layout: KeyboardLayout::from_code(code),
            ..Self::new()
        }
    }

    /// Every activation attempt reports "no window"
    pub fn not_running() -> Self {
        Self {
            running: false,
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl WindowActivator for RecordingBackend {
    fn activate(&self, descriptor: &ApplicationDescriptor) -> Result<bool, AutomationError> {
        self.events
            .borrow_mut()
            .push(format!("activate {}", descriptor.identifier()));
        Ok(self.running)
    }
}

impl KeystrokeInjector for RecordingBackend {
    fn send_keys(&self, sequence: &KeySequence) -> Result<(), AutomationError> {
        self.events.borrow_mut().push(format!("keys {}", sequence));
        Ok(())
    }
}

impl LayoutDetector for RecordingBackend {
    fn current_layout(&self) -> Result<KeyboardLayout, AutomationError> {
        Ok(self.layout.clone())
    }
}
