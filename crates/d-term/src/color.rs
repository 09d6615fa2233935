// SPDX-License-Identifier: MIT
//
// Terminal colors.
//
// A cell stores a fully resolved `CellColor`: either a 24-bit RGB triple,
// an index into the 256-color palette, or the terminal's own default.
// The browser's palettes stick to the first eight ANSI colors so they
// follow whatever theme the user's terminal is configured with.

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A color as the terminal understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color.
    #[default]
    Default,
}

impl CellColor {
    /// ANSI 0.
    pub const BLACK: Self = Self::Ansi256(0);
    /// ANSI 1.
    pub const RED: Self = Self::Ansi256(1);
    /// ANSI 2.
    pub const GREEN: Self = Self::Ansi256(2);
    /// ANSI 3.
    pub const YELLOW: Self = Self::Ansi256(3);
    /// ANSI 4.
    pub const BLUE: Self = Self::Ansi256(4);
    /// ANSI 5.
    pub const MAGENTA: Self = Self::Ansi256(5);
    /// ANSI 6.
    pub const CYAN: Self = Self::Ansi256(6);
    /// ANSI 7.
    pub const WHITE: Self = Self::Ansi256(7);

    /// Whether this is the terminal default.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Parse a color name (`"cyan"`, `"default"`), a palette index
    /// (`"208"`) or a hex triple (`"#1e1e2e"`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "default" | "none" => Some(Self::Default),
            "black" => Some(Self::BLACK),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "yellow" => Some(Self::YELLOW),
            "blue" => Some(Self::BLUE),
            "magenta" => Some(Self::MAGENTA),
            "cyan" => Some(Self::CYAN),
            "white" => Some(Self::WHITE),
            _ => None,
        };
        if named.is_some() {
            return named;
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        s.parse::<u8>().ok().map(Self::Ansi256)
    }
}

// ─── Hex Parsing ─────────────────────────────────────────────────────────────

fn parse_hex(s: &str) -> Option<CellColor> {
    let bytes = s.as_bytes();
    match bytes.len() {
        3 => {
            let r = parse_hex_digit(bytes[0])?;
            let g = parse_hex_digit(bytes[1])?;
            let b = parse_hex_digit(bytes[2])?;
            Some(CellColor::Rgb(r << 4 | r, g << 4 | g, b << 4 | b))
        }
        6 => {
            let r = parse_hex_byte(&bytes[0..2])?;
            let g = parse_hex_byte(&bytes[2..4])?;
            let b = parse_hex_byte(&bytes[4..6])?;
            Some(CellColor::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
