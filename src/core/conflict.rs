//! Hotkey conflict detection
//!
//! Two hotkeys conflict when they share a key combination but run different
//! macros: the compositor only ever fires one of them. Binding the same
//! `APP.MACRO` twice is redundant, not a conflict, and is folded together.

use std::collections::HashMap;
use std::fmt;

use crate::core::types::{Hotkey, KeyCombo};

/// One key combination claimed by more than one macro
#[derive(Clone, Debug, PartialEq)]
pub struct Conflict {
    pub key_combo: KeyCombo,

    /// Distinct `APP.MACRO` targets in declaration order (always 2 or more)
    pub targets: Vec<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key_combo, self.targets.join(", "))
    }
}

/// Groups hotkeys by normalised key combination and reports the contested ones
///
/// Modifier order and key case do not matter (see [`KeyCombo`]). The report
/// is sorted by key combination so `check` output is stable between runs.
pub fn find_conflicts<'a, I>(hotkeys: I) -> Vec<Conflict>
where
    I: IntoIterator<Item = &'a Hotkey>,
{
    let mut by_combo: HashMap<&KeyCombo, Vec<String>> = HashMap::new();

    for hotkey in hotkeys {
        let target = format!("{}.{}", hotkey.app, hotkey.macro_name);
        let targets = by_combo.entry(&hotkey.key_combo).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    let mut conflicts: Vec<Conflict> = by_combo
        .into_iter()
        .filter(|(_, targets)| targets.len() > 1)
        .map(|(key_combo, targets)| Conflict { key_combo: key_combo.clone(), targets })
        .collect();

    conflicts.sort_by_key(|c| c.key_combo.to_string());
    conflicts
}
