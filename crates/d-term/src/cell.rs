// SPDX-License-Identifier: MIT
//
// Cell — one character position on screen.
//
// Every screen of the browser paints into a grid of these. A cell holds a
// Unicode codepoint, foreground and background colors and a small set of
// text attributes. The diff renderer compares cells and emits escape
// codes only where they differ, so equality here is the whole contract.
//
// Wide characters occupy two columns. The first cell holds the codepoint,
// the second is a continuation cell (ch = 0) that only carries colors.

use crate::color::CellColor;

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes stored as a compact bitfield.
    ///
    /// These map directly to SGR parameters:
    ///
    /// ```
    /// use d_term::cell::Attr;
    ///
    /// let style = Attr::BOLD | Attr::INVERSE;
    /// assert!(style.contains(Attr::BOLD));
    /// assert!(!style.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1 — increased intensity.
        const BOLD      = 1 << 0;
        /// SGR 2 — decreased intensity.
        const DIM       = 1 << 1;
        /// SGR 3 — italic.
        const ITALIC    = 1 << 2;
        /// SGR 4 — straight underline.
        const UNDERLINE = 1 << 3;
        /// SGR 7 — swap foreground and background. Selection bars use it.
        const INVERSE   = 1 << 4;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Unicode codepoint. `0` marks a continuation cell, `b' '` is empty.
    pub ch: u32,
    /// Foreground (text) color.
    pub fg: CellColor,
    /// Background color.
    pub bg: CellColor,
    /// Text attributes.
    pub attrs: Attr,
}

const CONTINUATION: u32 = 0;
const SPACE: u32 = b' ' as u32;

impl Cell {
    /// An empty cell: space, default colors, no attributes.
    pub const EMPTY: Self = Self {
        ch: SPACE,
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// A cell with a character and default styling.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self {
            ch: ch as u32,
            ..Self::EMPTY
        }
    }

    /// A cell with full styling.
    #[inline]
    #[must_use]
    pub const fn styled(ch: char, fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: ch as u32,
            fg,
            bg,
            attrs,
        }
    }

    /// The second column of a wide character. Carries the parent's colors
    /// so the background fills correctly.
    #[inline]
    #[must_use]
    pub const fn continuation(fg: CellColor, bg: CellColor, attrs: Attr) -> Self {
        Self {
            ch: CONTINUATION,
            fg,
            bg,
            attrs,
        }
    }

    /// Whether this is a continuation cell.
    #[inline]
    #[must_use]
    pub const fn is_continuation(self) -> bool {
        self.ch == CONTINUATION
    }

    /// Whether this cell is visually empty.
    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The codepoint as a `char`. `None` for continuation cells.
    #[inline]
    #[must_use]
    pub const fn character(self) -> Option<char> {
        if self.ch == CONTINUATION {
            return None;
        }
        char::from_u32(self.ch)
    }

    /// Whether two cells share colors and attributes, ignoring content.
    #[inline]
    #[must_use]
    pub fn same_style(self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_continuation() {
            return write!(f, "Cell(continuation)");
        }
        let ch = char::from_u32(self.ch).unwrap_or('?');
        write!(f, "Cell({ch:?}")?;
        if self.fg != CellColor::Default {
            write!(f, ", fg={:?}", self.fg)?;
        }
        if self.bg != CellColor::Default {
            write!(f, ", bg={:?}", self.bg)?;
        }
        if !self.attrs.is_empty() {
            write!(f, ", {:?}", self.attrs)?;
        }
        write!(f, ")")
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn cell_stays_small() {
        assert!(mem::size_of::<Cell>() <= 16);
        assert_eq!(mem::size_of::<Attr>(), 1);
    }

    #[test]
    fn default_cell_is_empty() {
        let cell = Cell::default();
        assert!(cell.is_empty());
        assert_eq!(cell, Cell::EMPTY);
        assert_eq!(cell.character(), Some(' '));
    }

    #[test]
    fn styling_makes_cell_non_empty() {
        let plain = CellColor::Default;
        assert!(!Cell::styled(' ', CellColor::Ansi256(1), plain, Attr::empty()).is_empty());
        assert!(!Cell::styled(' ', plain, plain, Attr::INVERSE).is_empty());
    }

    #[test]
    fn continuation_carries_colors() {
        let cell = Cell::continuation(CellColor::Ansi256(2), CellColor::Ansi256(4), Attr::BOLD);
        assert!(cell.is_continuation());
        assert!(cell.character().is_none());
        assert_eq!(cell.bg, CellColor::Ansi256(4));
    }

    #[test]
    fn same_style_ignores_character() {
        let a = Cell::styled('a', CellColor::Ansi256(3), CellColor::Default, Attr::BOLD);
        let b = Cell::styled('b', CellColor::Ansi256(3), CellColor::Default, Attr::BOLD);
        assert!(a.same_style(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn debug_shows_styling() {
        let cell = Cell::styled('A', CellColor::Ansi256(6), CellColor::Default, Attr::BOLD);
        let dbg = format!("{cell:?}");
        assert!(dbg.contains("Cell('A'"));
        assert!(dbg.contains("fg="));
        assert!(dbg.contains("BOLD"));
        let cont = Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty());
        assert_eq!(format!("{cont:?}"), "Cell(continuation)");
    }
}
