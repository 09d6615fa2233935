//! Named preset themes.

use crate::highlight::Theme;

/// Look up a builtin theme by name.
///
/// Returns `None` if the name is not recognized.
#[must_use]
pub fn builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "default" | "ansi" => Some(Theme::ansi()),
        "mono" | "monochrome" => Some(Theme::mono()),
        _ => None,
    }
}

/// List all available builtin theme names.
#[must_use]
pub const fn builtin_names() -> &'static [&'static str] {
    &["default", "ansi", "mono", "monochrome"]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
