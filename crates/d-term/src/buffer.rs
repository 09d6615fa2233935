// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D cell grid every screen paints to.
//
// Screens, dialogs and the text editor all paint here. The diff renderer
// then compares this frame against the previous one and emits escape
// sequences only for the cells that changed.
//
// Layout is a flat `Vec<Cell>` with row-major indexing, so a row's cells
// are contiguous and the renderer's left-to-right walk is a linear scan.
//
// Paint operations accept an optional `ClipRect`: a dialog paints freely
// and the clip keeps it inside its box.
//
// Wide characters occupy two columns. The first cell holds the codepoint,
// the second is a continuation cell. Paint methods create continuations
// and clean up wide characters they partially overwrite.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── ClipRect ───────────────────────────────────────────────────────────────

/// A clipping rectangle in screen coordinates.
///
/// ```
/// use d_term::buffer::ClipRect;
///
/// let clip = ClipRect::new(10, 5, 60, 20);
/// assert!(clip.contains(10, 5));
/// assert!(clip.contains(69, 24));
/// assert!(!clip.contains(70, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    /// Left edge.
    pub x: u16,
    /// Top edge.
    pub y: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl ClipRect {
    /// Create a clipping rectangle.
    #[inline]
    #[must_use]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn right(self) -> u32 {
        self.x as u32 + self.width as u32
    }

    /// Bottom edge (exclusive).
    #[inline]
    #[must_use]
    pub const fn bottom(self) -> u32 {
        self.y as u32 + self.height as u32
    }

    /// Whether a point lies inside the rectangle.
    #[inline]
    #[must_use]
    pub fn contains(self, px: u16, py: u16) -> bool {
        px >= self.x
            && u32::from(px) < self.right()
            && py >= self.y
            && u32::from(py) < self.bottom()
    }
}

// ─── FrameBuffer ────────────────────────────────────────────────────────────

/// A 2D buffer of terminal cells.
///
/// ```
/// use d_term::buffer::FrameBuffer;
/// use d_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// buf.set(5, 3, Cell::new('X'));
/// assert_eq!(buf.get(5, 3).unwrap().character(), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY; size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Buffer width in columns.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in rows.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Whether `(x, y)` is within the buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// The raw cell slice (for the diff renderer's hot loop).
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A single row as a slice.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of row `y` as a string, continuation cells skipped.
    ///
    /// Handy for tests and debug dumps.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y)
            .unwrap_or_default()
            .iter()
            .filter_map(|cell| cell.character())
            .collect()
    }

    // ─── Clear & Resize ──────────────────────────────────────────────────

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    /// Make this buffer an exact copy of `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clone_from(&other.cells);
    }

    // ─── Direct Cell Access ──────────────────────────────────────────────

    /// Bounds-checked write with no clipping or wide-char cleanup.
    ///
    /// Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    // ─── Wide Character Cleanup ──────────────────────────────────────────

    /// Break any wide character that touches `(x, y)`.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
    }

    // ─── Paint ───────────────────────────────────────────────────────────

    /// Paint one character with clipping.
    ///
    /// Returns `true` if the cell was painted.
    #[allow(clippy::too_many_arguments)]
    pub fn paint_cell(
        &mut self,
        x: u16,
        y: u16,
        ch: char,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        self.break_wide_char_at(x, y);
        let idx = self.index(x, y);
        self.cells[idx] = Cell::styled(ch, fg, bg, attrs);
        true
    }

    /// Fill a rectangle with blank cells in the given colors.
    pub fn fill_rect(&mut self, rect: ClipRect, fg: CellColor, bg: CellColor, attrs: Attr) {
        let blank = Cell::styled(' ', fg, bg, attrs);
        let x2 = rect.right().min(u32::from(self.width));
        let y2 = rect.bottom().min(u32::from(self.height));
        let w = usize::from(self.width);
        for row in u32::from(rect.y)..y2 {
            let base = row as usize * w;
            for col in u32::from(rect.x)..x2 {
                self.cells[base + col as usize] = blank;
            }
        }
    }

    // ─── Text Painting ───────────────────────────────────────────────────

    /// Paint a string left-to-right starting at `(x, y)`.
    ///
    /// Wide characters take two columns, zero-width ones are skipped. A
    /// wide character that would straddle the right edge becomes a space.
    ///
    /// Returns the number of columns consumed.
    #[allow(clippy::too_many_arguments)]
    pub fn paint_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: CellColor,
        attrs: Attr,
        clip: Option<&ClipRect>,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }
        let limit = clip.map_or(u32::from(self.width), |c| c.right().min(u32::from(self.width)));

        let mut col = x;
        for ch in text.chars() {
            if u32::from(col) >= limit {
                break;
            }
            let char_w = ch.width().unwrap_or(0);
            if char_w == 0 {
                continue;
            }
            let is_wide = char_w == 2;

            if is_wide && u32::from(col) + 1 >= limit {
                self.paint_cell(col, y, ' ', fg, bg, attrs, clip);
                col += 1;
                break;
            }

            if self.paint_cell(col, y, ch, fg, bg, attrs, clip) && is_wide {
                let cont_x = col + 1;
                self.break_wide_char_at(cont_x, y);
                let cont_idx = self.index(cont_x, y);
                self.cells[cont_idx] = Cell::continuation(fg, bg, attrs);
            }

            #[allow(clippy::cast_possible_truncation)]
            let w = char_w as u16;
            col = col.saturating_add(w);
        }

        col.saturating_sub(x)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────

/// Display width of a string in terminal columns.
///
/// ```
/// use d_term::buffer::string_width;
///
/// assert_eq!(string_width("hello"), 5);
/// assert_eq!(string_width("中文"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paint(buf: &mut FrameBuffer, x: u16, y: u16, text: &str) -> u16 {
        buf.paint_text(x, y, text, CellColor::Default, CellColor::Default, Attr::empty(), None)
    }

    #[test]
    fn new_cells_are_empty() {
        let buf = FrameBuffer::new(10, 5);
        assert_eq!(buf.cells().len(), 50);
        assert!(buf.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn zero_size_buffer() {
        let buf = FrameBuffer::new(0, 0);
        assert!(buf.get(0, 0).is_none());
        assert!(buf.row(0).is_none());
    }

    #[test]
    fn set_out_of_bounds_is_refused() {
        let mut buf = FrameBuffer::new(4, 2);
        assert!(buf.set(3, 1, Cell::new('z')));
        assert!(!buf.set(4, 1, Cell::new('z')));
        assert!(!buf.set(0, 2, Cell::new('z')));
    }

    #[test]
    fn paint_text_places_characters() {
        let mut buf = FrameBuffer::new(10, 2);
        assert_eq!(paint(&mut buf, 2, 1, "hey"), 3);
        assert_eq!(buf.row_text(1), "  hey     ");
    }

    #[test]
    fn paint_text_stops_at_edge() {
        let mut buf = FrameBuffer::new(5, 1);
        assert_eq!(paint(&mut buf, 2, 0, "abcdef"), 3);
        assert_eq!(buf.row_text(0), "  abc");
    }

    #[test]
    fn paint_text_respects_clip() {
        let mut buf = FrameBuffer::new(10, 1);
        let clip = ClipRect::new(0, 0, 4, 1);
        let plain = CellColor::Default;
        buf.paint_text(1, 0, "abcdef", plain, plain, Attr::empty(), Some(&clip));
        assert_eq!(buf.row_text(0), " abc      ");
    }

    #[test]
    fn wide_char_gets_continuation() {
        let mut buf = FrameBuffer::new(6, 1);
        assert_eq!(paint(&mut buf, 0, 0, "中a"), 3);
        assert!(buf.get(1, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "中a   ");
    }

    #[test]
    fn wide_char_at_edge_becomes_space() {
        let mut buf = FrameBuffer::new(3, 1);
        paint(&mut buf, 2, 0, "中");
        assert_eq!(buf.get(2, 0).unwrap().character(), Some(' '));
    }

    #[test]
    fn overwriting_continuation_breaks_wide_char() {
        let mut buf = FrameBuffer::new(4, 1);
        paint(&mut buf, 0, 0, "中");
        paint(&mut buf, 1, 0, "x");
        assert_eq!(buf.row_text(0), " x  ");
    }

    #[test]
    fn fill_rect_clamps_to_buffer() {
        let mut buf = FrameBuffer::new(4, 3);
        let rect = ClipRect::new(2, 1, 10, 10);
        buf.fill_rect(rect, CellColor::Default, CellColor::BLUE, Attr::empty());
        assert_eq!(buf.get(1, 1).unwrap().bg, CellColor::Default);
        assert_eq!(buf.get(2, 1).unwrap().bg, CellColor::BLUE);
        assert_eq!(buf.get(3, 2).unwrap().bg, CellColor::BLUE);
    }

    #[test]
    fn copy_from_matches_source() {
        let mut a = FrameBuffer::new(3, 3);
        let mut b = FrameBuffer::new(5, 1);
        paint(&mut a, 0, 2, "abc");
        b.copy_from(&a);
        assert_eq!(a, b);
        assert_eq!(b.width(), 3);
    }

    #[test]
    fn resize_clears() {
        let mut buf = FrameBuffer::new(3, 1);
        paint(&mut buf, 0, 0, "abc");
        buf.resize(2, 2);
        assert_eq!(buf.cells().len(), 4);
        assert!(buf.cells().iter().all(|c| c.is_empty()));
    }

    #[test]
    fn string_width_counts_wide() {
        assert_eq!(string_width("a中b"), 4);
        assert_eq!(string_width(""), 0);
    }
}
