//! Macro script tests
//!
//! Tests for config-declared macros:
//! - Step parsing (activate, type, layout)
//! - Execution order against a recording backend
//! - Skipping after a failed activation

use super::RecordingBackend;
use crate::core::keys::parse_key_sequence;
use crate::core::{
    ApplicationDescriptor, KeyParseError, Macro, MacroContext, MacroOutcome, MacroScript, MacroStep,
};
use crate::core::macros::MacroParseError;

fn descriptor() -> ApplicationDescriptor {
    ApplicationDescriptor::new("firefox", None, "firefox", None)
}

#[test]
fn test_parse_activate_and_type() {
    let script = MacroScript::parse("activate; type (ctrl l)").unwrap();

    assert_eq!(
        script.steps(),
        &[
            MacroStep::Activate,
            MacroStep::Type(parse_key_sequence("(ctrl l)").unwrap()),
        ]
    );
}

#[test]
fn test_parse_layout_step() {
    let script = MacroScript::parse("layout ö ? (shift 0) : (shift +)").unwrap();

    match &script.steps()[0] {
        MacroStep::LayoutSwitch { probe, present, absent } => {
            assert_eq!(*probe, 'ö');
            assert_eq!(present.to_string(), "SHIFT+0");
            assert_eq!(absent.to_string(), "SHIFT+plus");
        }
        other => panic!("Expected LayoutSwitch, got {:?}", other),
    }
}

#[test]
fn test_layout_branch_may_type_a_colon() {
    let script = MacroScript::parse("layout ö ? (shift :) : (shift +)").unwrap();

    match &script.steps()[0] {
        MacroStep::LayoutSwitch { present, absent, .. } => {
            assert_eq!(present.to_string(), "SHIFT+colon");
            assert_eq!(absent.to_string(), "SHIFT+plus");
        }
        other => panic!("Expected LayoutSwitch, got {:?}", other),
    }

    // Colon in the second branch is left to the key parser
    let script = MacroScript::parse("layout å ? a : (shift :)").unwrap();
    assert_eq!(script.to_string(), "layout å ? a : SHIFT+colon");
}

#[test]
fn test_parse_ignores_empty_steps() {
    let script = MacroScript::parse(" ; type x ;; ").unwrap();
    assert_eq!(script.steps().len(), 1);
}

#[test]
fn test_parse_errors() {
    assert_eq!(MacroScript::parse("  ;  "), Err(MacroParseError::EmptyBody));
    assert_eq!(
        MacroScript::parse("launch"),
        Err(MacroParseError::UnknownStep("launch".to_string()))
    );
    assert!(matches!(
        MacroScript::parse("layout ö (shift 0) (shift +)"),
        Err(MacroParseError::MalformedLayoutStep(_))
    ));
    assert_eq!(
        MacroScript::parse("type (ctrl"),
        Err(MacroParseError::Keys(KeyParseError::UnclosedChord(0)))
    );
}

#[test]
fn test_script_display_round_trips_steps() {
    let script = MacroScript::parse("activate;type (ctrl l)").unwrap();
    assert_eq!(script.to_string(), "activate; type CTRL+l");
}

#[test]
fn test_run_in_order() {
    let script = MacroScript::parse("activate; type (ctrl l); type ok").unwrap();
    let backend = RecordingBackend::new();
    let descriptor = descriptor();

    let outcome = script.run(&MacroContext::new(&descriptor, &backend)).unwrap();

    assert_eq!(outcome, MacroOutcome::Completed);
    assert_eq!(
        backend.events(),
        vec![
            "activate firefox".to_string(),
            "keys CTRL+l".to_string(),
            "keys o k".to_string(),
        ]
    );
}

#[test]
fn test_run_stops_when_not_running() {
    let script = MacroScript::parse("activate; type (ctrl l)").unwrap();
    let backend = RecordingBackend::not_running();
    let descriptor = descriptor();

    let outcome = script.run(&MacroContext::new(&descriptor, &backend)).unwrap();

    assert_eq!(outcome, MacroOutcome::Skipped);
    assert_eq!(backend.events(), vec!["activate firefox".to_string()]);
}

#[test]
fn test_context_layout_query() {
    let backend = RecordingBackend::with_layout("se");
    let descriptor = descriptor();
    let ctx = MacroContext::new(&descriptor, &backend);

    assert!(ctx.layout_has('å').unwrap());
    assert!(!ctx.layout_has('ß').unwrap());
    assert_eq!(ctx.descriptor().identifier(), "firefox");
}
