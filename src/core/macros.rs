//! src/core/macros.rs
//!
//! Macro model
//!
//! A macro is any [`Macro`] implementation attached to one descriptor. Two
//! kinds exist in practice:
//! - closures registered from Rust code (`Fn(&MacroContext) -> MacroResult`)
//! - [`MacroScript`]s declared in the registry config file
//!
//! Macros never talk to the compositor directly; they go through the
//! [`MacroContext`], which carries the descriptor they belong to and the
//! automation backend they run against.

use std::fmt;
use thiserror::Error;

use crate::automation::{AutomationBackend, AutomationError, KeyboardLayout};
use crate::core::keys::{parse_key_sequence, KeyParseError, KeySequence};
use crate::core::types::ApplicationDescriptor;

/// How a macro run ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MacroOutcome {
    /// Every step ran
    Completed,
    /// The application could not be activated, remaining steps were skipped
    Skipped,
}

pub type MacroResult = Result<MacroOutcome, AutomationError>;

/// Everything a running macro may use
pub struct MacroContext<'a> {
    descriptor: &'a ApplicationDescriptor,
    backend: &'a dyn AutomationBackend,
}

impl<'a> MacroContext<'a> {
    pub fn new(descriptor: &'a ApplicationDescriptor, backend: &'a dyn AutomationBackend) -> Self {
        Self { descriptor, backend }
    }

    /// The descriptor this macro is attached to
    pub fn descriptor(&self) -> &ApplicationDescriptor {
        self.descriptor
    }

    /// Activates the macro's application, `false` when it has no window
    pub fn activate(&self) -> Result<bool, AutomationError> {
        self.backend.activate(self.descriptor)
    }

    /// Injects an already parsed key sequence
    pub fn send(&self, sequence: &KeySequence) -> Result<(), AutomationError> {
        self.backend.send_keys(sequence)
    }

    /// Parses key notation and injects it
    ///
    /// # Example
    /// ```ignore
    /// ctx.type_keys("(ctrl l)")?;
    /// ```
    pub fn type_keys(&self, notation: &str) -> Result<(), AutomationError> {
        let sequence = parse_key_sequence(notation)?;
        self.send(&sequence)
    }

    pub fn layout(&self) -> Result<KeyboardLayout, AutomationError> {
        self.backend.current_layout()
    }

    /// Returns true if the active layout has a key for `c`
    pub fn layout_has(&self, c: char) -> Result<bool, AutomationError> {
        Ok(self.layout()?.has_key(c))
    }
}

/// Behaviour attached to a single descriptor
pub trait Macro {
    fn run(&self, ctx: &MacroContext<'_>) -> MacroResult;
}

impl<F> Macro for F
where
    F: Fn(&MacroContext<'_>) -> MacroResult,
{
    fn run(&self, ctx: &MacroContext<'_>) -> MacroResult {
        self(ctx)
    }
}

/// Errors in a config-declared macro body
#[derive(Debug, Error, PartialEq)]
pub enum MacroParseError {
    #[error("Macro body is empty")]
    EmptyBody,

    #[error("Unknown macro step '{0}' (expected activate, type or layout)")]
    UnknownStep(String),

    #[error("Malformed layout step '{0}': expected 'layout <char> ? <keys> : <keys>'")]
    MalformedLayoutStep(String),

    #[error(transparent)]
    Keys(#[from] KeyParseError),
}

/// One step of a [`MacroScript`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MacroStep {
    /// Activate the application; stop with `Skipped` if that fails
    Activate,

    /// Inject a key sequence
    Type(KeySequence),

    /// Inject `present` when the layout has a key for `probe`, else `absent`
    LayoutSwitch {
        probe: char,
        present: KeySequence,
        absent: KeySequence,
    },
}

impl fmt::Display for MacroStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacroStep::Activate => write!(f, "activate"),
            MacroStep::Type(keys) => write!(f, "type {}", keys),
            MacroStep::LayoutSwitch { probe, present, absent } => {
                write!(f, "layout {} ? {} : {}", probe, present, absent)
            }
        }
    }
}

/// A macro declared as text, steps separated by `;`
///
/// ```text
/// activate; type (ctrl l)
/// layout ö ? (shift 0) : (shift +)
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacroScript {
    steps: Vec<MacroStep>,
}

impl MacroScript {
    pub fn new(steps: Vec<MacroStep>) -> Self {
        Self { steps }
    }

    /// Parses a macro body
    pub fn parse(body: &str) -> Result<Self, MacroParseError> {
        let steps = body
            .split(';')
            .map(str::trim)
            .filter(|step| !step.is_empty())
            .map(parse_step)
            .collect::<Result<Vec<_>, _>>()?;

        if steps.is_empty() {
            return Err(MacroParseError::EmptyBody);
        }

        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[MacroStep] {
        &self.steps
    }
}

impl Macro for MacroScript {
    fn run(&self, ctx: &MacroContext<'_>) -> MacroResult {
        for step in &self.steps {
            match step {
                MacroStep::Activate => {
                    if !ctx.activate()? {
                        return Ok(MacroOutcome::Skipped);
                    }
                }
                MacroStep::Type(keys) => ctx.send(keys)?,
                MacroStep::LayoutSwitch { probe, present, absent } => {
                    if ctx.layout_has(*probe)? {
                        ctx.send(present)?;
                    } else {
                        ctx.send(absent)?;
                    }
                }
            }
        }

        Ok(MacroOutcome::Completed)
    }
}

impl fmt::Display for MacroScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps = self.steps.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        write!(f, "{}", steps.join("; "))
    }
}

fn parse_step(step: &str) -> Result<MacroStep, MacroParseError> {
    if step == "activate" {
        return Ok(MacroStep::Activate);
    }

    if let Some(keys) = step.strip_prefix("type ") {
        return Ok(MacroStep::Type(parse_key_sequence(keys.trim())?));
    }

    if let Some(rest) = step.strip_prefix("layout ") {
        return parse_layout_step(step, rest.trim_start());
    }

    Err(MacroParseError::UnknownStep(step.to_string()))
}

/// Parses `<char> ? <keys> : <keys>`
fn parse_layout_step(step: &str, rest: &str) -> Result<MacroStep, MacroParseError> {
    let malformed = || MacroParseError::MalformedLayoutStep(step.to_string());

    let mut chars = rest.chars();
    let probe = chars.next().ok_or_else(malformed)?;

    let branches = chars.as_str().trim_start().strip_prefix('?').ok_or_else(malformed)?;
    let (present, absent) = split_branches(branches).ok_or_else(malformed)?;

    Ok(MacroStep::LayoutSwitch {
        probe,
        present: parse_key_sequence(present.trim())?,
        absent: parse_key_sequence(absent.trim())?,
    })
}

/// Splits `<keys> : <keys>` on the first `:` outside a chord
///
/// `(shift :)` is a chord typing a colon, not the branch separator.
fn split_branches(branches: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;

    for (pos, c) in branches.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some((&branches[..pos], &branches[pos + 1..])),
            _ => {}
        }
    }

    None
}
