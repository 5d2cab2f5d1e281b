//! Config module tests
//!
//! Parser, loader and export tests. Filesystem tests use temporary
//! directories and never touch the real config.

mod loader_tests;

/// A registry file exercising every directive
pub(crate) const SAMPLE_CONFIG: &str = "\
# Applications
$mozilla = mozilla firefox/firefox
$adobe = Adobe/Adobe Photoshop CS5.1 (64 Bit)

layout = de

app = Firefox, $mozilla, /firefox/, MozillaWindowClass
app = Photoshop, $adobe/Photoshop, , Photoshop, x64
app = Emacs, , , Emacs
binary = Emacs, emacs

macro = Firefox, activate_and_focus_address_bar, activate; type (ctrl l)
macro = Photoshop, next_blend_mode, layout ö ? (shift 0) : (shift +)

hotkey = SUPER, L, Firefox, activate_and_focus_address_bar
hotkey = SUPER_SHIFT, B, Photoshop, next_blend_mode
";
