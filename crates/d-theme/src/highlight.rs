//! Theme assembly — highlight groups for JSON tokens and UI chrome.
//!
//! A `Theme` is the complete set of `HighlightGroup`s the screens and the
//! editor view use. No screen hardcodes a color.

use d_json::TokenClass;
use d_term::cell::Attr;
use d_term::color::CellColor;
use thiserror::Error;

// ---------------------------------------------------------------------------
// HighlightGroup
// ---------------------------------------------------------------------------

/// A resolved style for one UI element or token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightGroup {
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl HighlightGroup {
    /// Create a highlight group with just foreground color.
    #[must_use]
    pub const fn fg_only(fg: CellColor) -> Self {
        Self {
            fg,
            bg: CellColor::Default,
            attrs: Attr::empty(),
        }
    }

    /// Create a highlight group with foreground and attributes.
    #[must_use]
    pub const fn fg_attrs(fg: CellColor, attrs: Attr) -> Self {
        Self {
            fg,
            bg: CellColor::Default,
            attrs,
        }
    }

    /// Create a highlight group with foreground and background.
    #[must_use]
    pub const fn fg_bg(fg: CellColor, bg: CellColor) -> Self {
        Self {
            fg,
            bg,
            attrs: Attr::empty(),
        }
    }

    /// Default colors with only attributes set.
    #[must_use]
    pub const fn attrs_only(attrs: Attr) -> Self {
        Self {
            fg: CellColor::Default,
            bg: CellColor::Default,
            attrs,
        }
    }
}

impl Default for HighlightGroup {
    fn default() -> Self {
        Self::attrs_only(Attr::empty())
    }
}

// ---------------------------------------------------------------------------
// JsonPalette
// ---------------------------------------------------------------------------

/// Display attributes keyed by JSON token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPalette {
    pub key: HighlightGroup,
    pub string: HighlightGroup,
    pub number: HighlightGroup,
    pub boolean: HighlightGroup,
    pub null: HighlightGroup,
    pub punctuation: HighlightGroup,
    pub plain: HighlightGroup,
}

impl JsonPalette {
    /// The group for a token class.
    #[inline]
    #[must_use]
    pub const fn group(&self, class: TokenClass) -> HighlightGroup {
        match class {
            TokenClass::Key => self.key,
            TokenClass::StringValue => self.string,
            TokenClass::Number => self.number,
            TokenClass::Boolean => self.boolean,
            TokenClass::Null => self.null,
            TokenClass::Punctuation => self.punctuation,
            TokenClass::Plain => self.plain,
        }
    }

    /// Mutable access to the group for a token class.
    pub const fn group_mut(&mut self, class: TokenClass) -> &mut HighlightGroup {
        match class {
            TokenClass::Key => &mut self.key,
            TokenClass::StringValue => &mut self.string,
            TokenClass::Number => &mut self.number,
            TokenClass::Boolean => &mut self.boolean,
            TokenClass::Null => &mut self.null,
            TokenClass::Punctuation => &mut self.punctuation,
            TokenClass::Plain => &mut self.plain,
        }
    }

    /// Apply foreground overrides written as `class=color` pairs separated
    /// by commas, e.g. `"key=blue,string=#a6e3a1"`.
    ///
    /// Class names are [`TokenClass::name`]; colors are anything
    /// [`CellColor::parse`] accepts. Nothing is changed if any pair is bad.
    ///
    /// # Errors
    ///
    /// Returns the first malformed pair, unknown class or unknown color.
    pub fn apply_overrides(&mut self, spec: &str) -> Result<(), OverrideError> {
        let mut staged = *self;
        for pair in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, color) = pair
                .split_once('=')
                .ok_or_else(|| OverrideError::Malformed(pair.to_string()))?;
            let class = TokenClass::ALL
                .into_iter()
                .find(|c| c.name() == name.trim())
                .ok_or_else(|| OverrideError::UnknownClass(name.trim().to_string()))?;
            let fg = CellColor::parse(color)
                .ok_or_else(|| OverrideError::UnknownColor(color.trim().to_string()))?;
            staged.group_mut(class).fg = fg;
        }
        *self = staged;
        Ok(())
    }
}

/// A rejected palette override.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// A pair without `=`.
    #[error("expected class=color, got '{0}'")]
    Malformed(String),
    /// A class name that is not a token class.
    #[error("unknown token class '{0}'")]
    UnknownClass(String),
    /// A color [`CellColor::parse`] does not understand.
    #[error("unknown color '{0}'")]
    UnknownColor(String),
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// A complete theme: UI chrome groups plus the JSON palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Name of this theme (e.g., "default", "mono").
    pub name: String,

    // ── UI chrome groups ──────────────────────────────────────
    /// Normal text.
    pub normal: HighlightGroup,
    /// Title bar at the top of each screen.
    pub header: HighlightGroup,
    /// Selected list row.
    pub selected: HighlightGroup,
    /// Key hint bar at the bottom of the screen.
    pub status: HighlightGroup,
    /// Box borders and separators.
    pub border: HighlightGroup,
    /// Secondary text: instructions, dialog footers, counters.
    pub hint: HighlightGroup,

    // ── Messages ──────────────────────────────────────────────
    pub info: HighlightGroup,
    pub success: HighlightGroup,
    pub warning: HighlightGroup,
    pub error: HighlightGroup,

    /// Token colors for JSON text.
    pub json: JsonPalette,
}

impl Theme {
    /// ANSI colors of a classic curses client: cyan header, blue status
    /// bar, white-on-color message bars, colored JSON tokens.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            name: "default".to_string(),

            normal: HighlightGroup::default(),
            header: HighlightGroup {
                fg: CellColor::BLACK,
                bg: CellColor::CYAN,
                attrs: Attr::BOLD,
            },
            selected: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::WHITE),
            status: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::BLUE),
            border: HighlightGroup::default(),
            hint: HighlightGroup::attrs_only(Attr::DIM),

            info: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::CYAN),
            success: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::GREEN),
            warning: HighlightGroup::fg_bg(CellColor::BLACK, CellColor::YELLOW),
            error: HighlightGroup::fg_bg(CellColor::WHITE, CellColor::RED),

            json: JsonPalette {
                key: HighlightGroup::fg_only(CellColor::CYAN),
                string: HighlightGroup::fg_only(CellColor::GREEN),
                number: HighlightGroup::fg_only(CellColor::YELLOW),
                boolean: HighlightGroup::fg_only(CellColor::MAGENTA),
                null: HighlightGroup::fg_only(CellColor::RED),
                punctuation: HighlightGroup::fg_only(CellColor::WHITE),
                plain: HighlightGroup::default(),
            },
        }
    }

    /// No colors at all: structure is carried by bold, dim and inverse.
    #[must_use]
    pub fn mono() -> Self {
        let inverse = HighlightGroup::attrs_only(Attr::INVERSE);
        Self {
            name: "mono".to_string(),

            normal: HighlightGroup::default(),
            header: HighlightGroup::attrs_only(Attr::BOLD.union(Attr::INVERSE)),
            selected: inverse,
            status: inverse,
            border: HighlightGroup::attrs_only(Attr::DIM),
            hint: HighlightGroup::attrs_only(Attr::DIM),

            info: HighlightGroup::default(),
            success: HighlightGroup::attrs_only(Attr::BOLD),
            warning: HighlightGroup::attrs_only(Attr::UNDERLINE),
            error: HighlightGroup::attrs_only(Attr::BOLD.union(Attr::INVERSE)),

            json: JsonPalette {
                key: HighlightGroup::attrs_only(Attr::BOLD),
                string: HighlightGroup::default(),
                number: HighlightGroup::default(),
                boolean: HighlightGroup::attrs_only(Attr::ITALIC),
                null: HighlightGroup::attrs_only(Attr::ITALIC),
                punctuation: HighlightGroup::attrs_only(Attr::DIM),
                plain: HighlightGroup::default(),
            },
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::ansi()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
