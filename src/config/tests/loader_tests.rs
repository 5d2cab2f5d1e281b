use std::fs;
use std::path::Path;
use tempfile::TempDir;

use super::SAMPLE_CONFIG;
use crate::config::{ConfigError, ParseError, RegistryConfig};
use crate::core::tests::RecordingBackend;
use crate::core::{Architecture, MacroContext, MacroOutcome, MacroResult, RegistryError, ValidationError};

fn parse(content: &str) -> Result<RegistryConfig, ConfigError> {
    RegistryConfig::parse(content, Path::new("apps.conf"))
}

#[test]
fn test_sample_builds_registry() {
    let config = parse(SAMPLE_CONFIG).unwrap();
    let registry = config.registry();

    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["Firefox", "Photoshop", "Emacs"]);

    let photoshop = registry.lookup("Photoshop").unwrap();
    assert_eq!(photoshop.architecture(), Some(Architecture::X64));
    assert_eq!(photoshop.identifier(), "Adobe/Adobe Photoshop CS5.1 (64 Bit)/Photoshop");

    let emacs = registry.lookup("Emacs").unwrap();
    assert_eq!(emacs.binary(), Some("emacs"));
    assert_eq!(emacs.launch_target(), "emacs");

    assert_eq!(config.hotkeys().len(), 2);
    assert_eq!(config.layout().map(|l| l.code()), Some("de"));
    assert!(config.conflicts().is_empty());
}

#[test]
fn test_script_macros_are_attached() {
    let config = parse(SAMPLE_CONFIG).unwrap();
    let registry = config.registry();

    let backend = RecordingBackend::new();
    let outcome = registry
        .invoke("Firefox", "activate_and_focus_address_bar", &backend)
        .unwrap();

    assert_eq!(outcome, MacroOutcome::Completed);
    assert_eq!(
        backend.events(),
        vec!["activate mozilla firefox/firefox".to_string(), "keys CTRL+l".to_string()]
    );

    let firefox = registry.lookup("Firefox").unwrap();
    assert_eq!(registry.macro_names(firefox).unwrap(), vec!["activate_and_focus_address_bar"]);
}

#[test]
fn test_rust_macros_can_extend_loaded_apps() {
    let mut config = parse(SAMPLE_CONFIG).unwrap();
    let emacs = config.registry().lookup("Emacs").unwrap().clone();

    config
        .registry_mut()
        .extend(&emacs, "save", |ctx: &MacroContext<'_>| -> MacroResult {
            ctx.type_keys("(ctrl x)(ctrl s)")?;
            Ok(MacroOutcome::Completed)
        })
        .unwrap();

    let backend = RecordingBackend::new();
    config.registry().invoke("Emacs", "save", &backend).unwrap();
    assert_eq!(backend.events(), vec!["keys CTRL+x CTRL+s".to_string()]);
}

#[test]
fn test_hotkey_to_unknown_macro_rejected() {
    let content = "app = Firefox, firefox, , firefox\nhotkey = SUPER, L, Firefox, missing\n";

    match parse(content) {
        Err(ConfigError::UnknownHotkeyTarget { line, app, macro_name }) => {
            assert_eq!(line, 2);
            assert_eq!(app, "Firefox");
            assert_eq!(macro_name, "missing");
        }
        other => panic!("Expected UnknownHotkeyTarget, got {:?}", other),
    }
}

#[test]
fn test_binary_before_app_rejected() {
    let content = "binary = Emacs, emacs\napp = Emacs, , , Emacs\n";

    assert!(matches!(
        parse(content),
        Err(ConfigError::UnknownApp { line: 1, ref app }) if app == "Emacs"
    ));
}

#[test]
fn test_macro_for_unknown_app_rejected() {
    let content = "macro = Thunderbird, compose, type (ctrl n)\n";

    assert!(matches!(parse(content), Err(ConfigError::UnknownApp { line: 1, .. })));
}

#[test]
fn test_duplicate_app_reports_line() {
    let content = "app = Firefox, firefox, , firefox\n\napp = Firefox, firefox-esr, , firefox\n";

    assert!(matches!(
        parse(content),
        Err(ConfigError::Registry {
            line: 3,
            source: RegistryError::DuplicateName(_)
        })
    ));
}

#[test]
fn test_duplicate_macro_reports_line() {
    let content = "app = Emacs, emacs, , Emacs\nmacro = Emacs, save, type (ctrl s)\nmacro = Emacs, save, type (ctrl x)\n";

    assert!(matches!(
        parse(content),
        Err(ConfigError::Registry {
            line: 3,
            source: RegistryError::DuplicateMacro { .. }
        })
    ));
}

#[test]
fn test_identifier_injection_rejected() {
    let content = "app = Evil, firefox; rm -rf ~, , firefox\n";

    assert!(matches!(
        parse(content),
        Err(ConfigError::Validation {
            line: 1,
            source: ValidationError::ShellMetacharacters(_)
        })
    ));
}

#[test]
fn test_invalid_macro_reports_line() {
    let content = "app = Emacs, emacs, , Emacs\nmacro = Emacs, broken, type (ctrl\n";

    assert!(matches!(parse(content), Err(ConfigError::InvalidMacro { line: 2, .. })));
}

#[test]
fn test_parse_errors_pass_through() {
    assert!(matches!(
        parse("app = Firefox, $nope, , firefox\n"),
        Err(ConfigError::Parse(ParseError::UndefinedVariable { line: 1, .. }))
    ));
}

#[test]
fn test_conflicting_hotkeys_detected() {
    let content = "\
app = Firefox, firefox, , firefox
app = Emacs, emacs, , Emacs
macro = Firefox, focus, activate
macro = Emacs, focus, activate
hotkey = SUPER_SHIFT, K, Firefox, focus
hotkey = SHIFT_SUPER, k, Emacs, focus
";

    let conflicts = parse(content).unwrap().conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].targets, vec!["Firefox.focus", "Emacs.focus"]);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("apps.conf");
    fs::write(&config_path, SAMPLE_CONFIG).unwrap();

    let config = RegistryConfig::load(&config_path).unwrap();

    assert_eq!(config.path(), config_path.as_path());
    assert_eq!(config.registry().len(), 3);
}

#[test]
fn test_load_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("missing.conf");

    assert!(matches!(
        RegistryConfig::load(&config_path),
        Err(ConfigError::NotFound(path)) if path == config_path
    ));
}
