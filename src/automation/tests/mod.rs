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

//! Automation module tests
//!
//! Contains test suites for the Hyprland backend.
//! Note: Some tests require a running Hyprland instance and are marked #[ignore].

use std::path::Path;

use crate::{
    automation::{
        AutomationError, ClientMode, HyprlandClient, KeyboardLayout, KeystrokeInjector,
        LayoutDetector, WindowActivator,
    },
    core::{
        keys::parse_key_sequence, ApplicationDescriptor, ApplicationRegistry, Hotkey, KeyChord,
        KeyCombo, MacroOutcome, MacroScript, Modifier, WindowPattern,
    },
};

/// Helper: Creates a safe test hotkey
fn create_safe_hotkey(key: &str, app: &str) -> Hotkey {
    Hotkey {
        key_combo: KeyCombo::new(vec![Modifier::Super], key),
        app: app.to_string(),
        macro_name: "activate".to_string(),
    }
}

#[test]
fn test_dryrun_mode_records_hotkey() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    let hotkey = create_safe_hotkey("K", "Firefox");

    let result = client.add_hotkey(&hotkey, None);
    assert!(result.is_ok(), "Safe hotkey should validate in DryRun mode");

    assert_eq!(
        client.sent_commands(),
        vec!["keyword bind SUPER, K, exec, hypr-app-macros run Firefox activate".to_string()]
    );
}

#[test]
fn test_hotkey_passes_config_path() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    let hotkey = create_safe_hotkey("K", "Firefox");

    client.add_hotkey(&hotkey, Some(Path::new("/home/user/apps.conf"))).unwrap();

    let sent = client.sent_commands();
    assert!(
        sent[0].ends_with("hypr-app-macros -c /home/user/apps.conf run Firefox activate"),
        "Config path should be forwarded: {}",
        sent[0]
    );
}

#[test]
fn test_dryrun_mode_blocks_injection() {
    let client = HyprlandClient::new(ClientMode::DryRun);

    // Injection attempt through the config path
    let hotkey = create_safe_hotkey("K", "Firefox");
    let result = client.add_hotkey(&hotkey, Some(Path::new("/tmp/x;reboot")));

    match result {
        Err(AutomationError::ValidationFailed(msg)) => {
            assert!(msg.contains("metacharacters"), "Error should mention metacharacters: {}", msg);
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert!(client.sent_commands().is_empty(), "Nothing may be recorded");
}

#[test]
fn test_config_path_with_spaces_is_not_bound() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    let hotkey = create_safe_hotkey("K", "Firefox");

    let result = client.add_hotkey(&hotkey, Some(Path::new("/home/u/My Configs/apps.conf")));

    match result {
        Err(AutomationError::ValidationFailed(msg)) => {
            assert!(msg.contains("whitespace"), "Error should mention whitespace: {}", msg);
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
    assert!(client.sent_commands().is_empty(), "Nothing may be recorded");
}

#[test]
fn test_dryrun_mode_blocks_bad_app_name() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    let hotkey = create_safe_hotkey("K", "firefox`id`");

    assert!(matches!(
        client.add_hotkey(&hotkey, None),
        Err(AutomationError::ValidationFailed(_))
    ));
}

#[test]
fn test_readonly_mode_blocks_modifications() {
    let client = HyprlandClient::new(ClientMode::ReadOnly);
    let descriptor = ApplicationDescriptor::new("firefox", None, "firefox", None);
    let keys = parse_key_sequence("(ctrl l)").unwrap();

    let result = client.add_hotkey(&create_safe_hotkey("M", "Kitty"), None);
    match result {
        Err(AutomationError::ReadOnly(msg)) => assert!(msg.contains("hotkeys"), "{}", msg),
        other => panic!("Expected ReadOnly, got {:?}", other),
    }

    assert!(matches!(client.activate(&descriptor), Err(AutomationError::ReadOnly(_))));
    assert!(matches!(client.send_keys(&keys), Err(AutomationError::ReadOnly(_))));
}

#[test]
fn test_send_keys_one_shortcut_per_chord() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    let keys = parse_key_sequence("(ctrl l)hi(enter)").unwrap();

    client.send_keys(&keys).unwrap();

    assert_eq!(
        client.sent_commands(),
        vec![
            "sendshortcut CTRL, l".to_string(),
            "sendshortcut , h".to_string(),
            "sendshortcut , i".to_string(),
            "sendshortcut , Return".to_string(),
        ]
    );
}

#[test]
fn test_shortcut_args_multiple_modifiers() {
    let chord = KeyChord::new(vec![Modifier::Shift, Modifier::Ctrl], "Tab");

    let args = HyprlandClient::build_shortcut_args(&chord);

    assert!(args.contains("CTRL") && args.contains("SHIFT"), "Should contain both modifiers: {}", args);
    assert!(args.ends_with(", Tab"), "Key comes last: {}", args);
}

#[test]
fn test_window_selector_prefers_class() {
    let with_class = ApplicationDescriptor::new("firefox", None, "Mozilla.Firefox", None);
    assert_eq!(
        HyprlandClient::window_selector(&with_class).as_deref(),
        Some("class:(?i)^(Mozilla\\.Firefox)$")
    );

    let with_pattern = ApplicationDescriptor::new("firefox", Some(WindowPattern::new("Firefox$").unwrap()), "", None);
    assert_eq!(HyprlandClient::window_selector(&with_pattern).as_deref(), Some("title:Firefox$"));

    let bare = ApplicationDescriptor::new("emacs", None, "", None);
    assert_eq!(HyprlandClient::window_selector(&bare), None);
}

#[test]
fn test_class_selector_ignores_case_like_window_matching() {
    let descriptor = ApplicationDescriptor::new("firefox", None, "firefox", None);
    assert!(descriptor.matches_window("Firefox", "Mozilla Firefox"));

    let selector = HyprlandClient::window_selector(&descriptor).unwrap();
    let rule = regex::Regex::new(selector.trim_start_matches("class:")).unwrap();
    assert!(rule.is_match("Firefox"));
    assert!(rule.is_match("firefox"));
    assert!(!rule.is_match("firefox-esr"));
}

#[test]
fn test_dryrun_skips_descriptor_without_class_or_pattern() {
    let mut registry = ApplicationRegistry::new();
    let emacs = registry.register("Emacs", "emacs", None, "", None).unwrap();
    registry
        .extend(&emacs, "save", MacroScript::parse("activate; type (ctrl x)(ctrl s)").unwrap())
        .unwrap();

    let client = HyprlandClient::new(ClientMode::DryRun);
    let descriptor = ApplicationDescriptor::new("emacs", None, "", None);
    assert!(!descriptor.matches_window("emacs", "emacs"));

    assert!(!client.activate(&descriptor).unwrap());
    assert_eq!(registry.invoke("Emacs", "save", &client).unwrap(), MacroOutcome::Skipped);
    assert!(client.sent_commands().is_empty(), "Nothing may be recorded");
}

#[test]
fn test_layout_override_and_dryrun_default() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    assert_eq!(client.current_layout().unwrap(), KeyboardLayout::us());

    let client = HyprlandClient::new(ClientMode::DryRun).with_layout(Some(KeyboardLayout::from_code("se")));
    assert_eq!(client.current_layout().unwrap().code(), "se");
}

#[test]
fn test_focused_window_in_dryrun() {
    let client = HyprlandClient::new(ClientMode::DryRun);
    assert_eq!(client.focused_window().unwrap(), None);
}

#[test]
fn test_registry_macro_through_dryrun_client() {
    let mut registry = ApplicationRegistry::new();
    let firefox = registry
        .register("Firefox", "mozilla firefox/firefox", None, "firefox", None)
        .unwrap();
    registry
        .extend(&firefox, "focus", MacroScript::parse("activate; type (ctrl l)").unwrap())
        .unwrap();

    let client = HyprlandClient::new(ClientMode::DryRun);
    let outcome = registry.invoke("Firefox", "focus", &client).unwrap();

    assert_eq!(outcome, MacroOutcome::Completed);
    assert_eq!(
        client.sent_commands(),
        vec!["focuswindow class:(?i)^(firefox)$".to_string(), "sendshortcut CTRL, l".to_string()]
    );
}

// Integration test - requires Hyprland running
// This test is IGNORED by default and should ONLY be run in a VM
#[test]
#[ignore]
fn test_live_mode_integration() {
    // ⚠️ WARNING: This test requires Hyprland to be running
    // ⚠️ Only run this in a VM with: cargo test -- --ignored

    let client = HyprlandClient::new(ClientMode::Live);

    match client.current_layout() {
        Ok(layout) => println!("✓ Active layout: {}", layout),
        Err(AutomationError::NotRunning(msg)) => {
            println!("⚠ Hyprland not running: {}", msg);
        }
        Err(e) => panic!("Unexpected error: {:?}", e),
    }
}
