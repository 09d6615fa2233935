//! Line mapping — buffer offsets to wrapped screen positions.
//!
//! Text is laid out byte by byte: every byte except `\n` takes one column,
//! a `\n` starts a new row, and a row that reaches `wrap_width` columns
//! wraps. All of that lives in one function, [`advance`]. The cursor math
//! in [`TextBuffer`](crate::text::TextBuffer) and the painting in
//! [`view`](crate::view) both fold it, so they can never disagree about
//! where a byte lands.
//!
//! Nothing is cached. Edit buffers are a few kilobytes at most and every
//! query is a linear scan from the start.
//!
//! A `wrap_width` of 0 is treated as 1.

// ---------------------------------------------------------------------------
// VisualPosition
// ---------------------------------------------------------------------------

/// A wrapped (row, column) position, both 0-indexed.
///
/// Always derived from `(content, offset, wrap_width)`, never stored.
/// `column < wrap_width` holds for every position [`advance`] produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VisualPosition {
    pub row: usize,
    pub column: usize,
}

impl VisualPosition {
    /// Row 0, column 0.
    pub const ORIGIN: Self = Self { row: 0, column: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// The position after `byte` is laid out at `pos`.
#[inline]
#[must_use]
pub const fn advance(pos: VisualPosition, byte: u8, wrap_width: usize) -> VisualPosition {
    let width = if wrap_width == 0 { 1 } else { wrap_width };
    if byte == b'\n' || pos.column + 1 >= width {
        VisualPosition::new(pos.row + 1, 0)
    } else {
        VisualPosition::new(pos.row, pos.column + 1)
    }
}

/// Where the cursor at `offset` sits. Offsets past the end clamp.
#[must_use]
pub fn offset_to_visual(content: &[u8], offset: usize, wrap_width: usize) -> VisualPosition {
    content[..offset.min(content.len())]
        .iter()
        .fold(VisualPosition::ORIGIN, |pos, &b| advance(pos, b, wrap_width))
}

/// Number of rows `content` occupies: every completed row (by `\n` or by
/// wrapping), plus one for a non-empty trailing row.
///
/// ```
/// use d_editor::wrap::visual_rows;
///
/// assert_eq!(visual_rows(b"", 10), 0);
/// assert_eq!(visual_rows(b"{\n}\n", 10), 2);
/// assert_eq!(visual_rows(b"abcdef", 4), 2);
/// ```
#[must_use]
pub fn visual_rows(content: &[u8], wrap_width: usize) -> usize {
    let end = offset_to_visual(content, content.len(), wrap_width);
    end.row + usize::from(end.column > 0)
}

// ---------------------------------------------------------------------------
// Placements
// ---------------------------------------------------------------------------

/// One laid-out byte: its offset, value and screen position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub offset: usize,
    pub byte: u8,
    pub pos: VisualPosition,
}

/// Iterator over the placement of every byte, line breaks included.
///
/// A `\n` is reported at the position it ends; renderers skip it.
#[derive(Debug, Clone)]
pub struct Placements<'a> {
    content: &'a [u8],
    offset: usize,
    pos: VisualPosition,
    wrap_width: usize,
}

/// Walk `content` once, yielding where each byte is drawn.
#[must_use]
pub const fn placements(content: &[u8], wrap_width: usize) -> Placements<'_> {
    Placements {
        content,
        offset: 0,
        pos: VisualPosition::ORIGIN,
        wrap_width,
    }
}

impl Iterator for Placements<'_> {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        let byte = *self.content.get(self.offset)?;
        let placed = Placement {
            offset: self.offset,
            byte,
            pos: self.pos,
        };
        self.pos = advance(self.pos, byte, self.wrap_width);
        self.offset += 1;
        Some(placed)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.content.len() - self.offset;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Placements<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const fn vp(row: usize, column: usize) -> VisualPosition {
        VisualPosition::new(row, column)
    }

    // ── advance ───────────────────────────────────────────────────────────

    #[test]
    fn advance_steps_column() {
        assert_eq!(advance(vp(0, 0), b'a', 10), vp(0, 1));
        assert_eq!(advance(vp(3, 5), b'a', 10), vp(3, 6));
    }

    #[test]
    fn advance_wraps_at_width() {
        assert_eq!(advance(vp(0, 8), b'a', 10), vp(0, 9));
        assert_eq!(advance(vp(0, 9), b'a', 10), vp(1, 0));
    }

    #[test]
    fn advance_breaks_line() {
        assert_eq!(advance(vp(2, 4), b'\n', 10), vp(3, 0));
    }

    #[test]
    fn zero_width_acts_as_one() {
        assert_eq!(advance(vp(0, 0), b'a', 0), vp(1, 0));
        assert_eq!(offset_to_visual(b"abc", 3, 0), vp(3, 0));
    }

    // ── offset_to_visual ──────────────────────────────────────────────────

    #[test]
    fn visual_of_lines() {
        let text = b"ab\ncd\n\nefg";
        assert_eq!(offset_to_visual(text, 0, 80), vp(0, 0));
        assert_eq!(offset_to_visual(text, 2, 80), vp(0, 2));
        assert_eq!(offset_to_visual(text, 3, 80), vp(1, 0));
        assert_eq!(offset_to_visual(text, 6, 80), vp(2, 0));
        assert_eq!(offset_to_visual(text, 7, 80), vp(3, 0));
        assert_eq!(offset_to_visual(text, 10, 80), vp(3, 3));
    }

    #[test]
    fn visual_with_wrapping() {
        let text = b"abcdefg";
        assert_eq!(offset_to_visual(text, 3, 3), vp(1, 0));
        assert_eq!(offset_to_visual(text, 5, 3), vp(1, 2));
        assert_eq!(offset_to_visual(text, 7, 3), vp(2, 1));
    }

    #[test]
    fn full_row_then_break_leaves_empty_row() {
        // The wrap already moved to row 1, the break moves to row 2.
        assert_eq!(offset_to_visual(b"abc\nd", 4, 3), vp(2, 0));
    }

    #[test]
    fn offset_past_end_clamps() {
        assert_eq!(offset_to_visual(b"ab", 99, 80), vp(0, 2));
    }

    #[test]
    fn visual_is_monotonic_in_offset() {
        let text = b"{\n  \"name\": \"a long value that wraps\",\n  \"n\": 1\n}\n";
        for width in [1, 2, 5, 7, 80] {
            let mut prev = VisualPosition::ORIGIN;
            for offset in 0..=text.len() {
                let pos = offset_to_visual(text, offset, width);
                assert!(pos >= prev, "width {width}, offset {offset}");
                assert!(pos.column < width);
                prev = pos;
            }
        }
    }

    // ── visual_rows ───────────────────────────────────────────────────────

    #[test]
    fn rows_counted_like_lines() {
        assert_eq!(visual_rows(b"", 10), 0);
        assert_eq!(visual_rows(b"a", 10), 1);
        assert_eq!(visual_rows(b"a\n", 10), 1);
        assert_eq!(visual_rows(b"a\nb", 10), 2);
        assert_eq!(visual_rows(b"\n\n", 10), 2);
        assert_eq!(visual_rows(b"abcd", 4), 1);
        assert_eq!(visual_rows(b"abcde", 4), 2);
    }

    // ── placements ────────────────────────────────────────────────────────

    #[test]
    fn placements_match_offset_to_visual() {
        let text = b"ab\ncdefgh\ni";
        for p in placements(text, 4) {
            assert_eq!(p.pos, offset_to_visual(text, p.offset, 4));
            assert_eq!(p.byte, text[p.offset]);
        }
        assert_eq!(placements(text, 4).len(), text.len());
    }

    #[test]
    fn placements_positions() {
        let got: Vec<_> = placements(b"ab\nc", 80)
            .filter(|p| p.byte != b'\n')
            .map(|p| (p.byte, p.pos))
            .collect();
        assert_eq!(
            got,
            vec![(b'a', vp(0, 0)), (b'b', vp(0, 1)), (b'c', vp(1, 0))]
        );
    }

    #[test]
    fn placements_report_line_breaks() {
        let breaks: Vec<_> = placements(b"ab\nc\n", 80)
            .filter(|p| p.byte == b'\n')
            .map(|p| (p.offset, p.pos))
            .collect();
        assert_eq!(breaks, vec![(2, vp(0, 2)), (4, vp(1, 1))]);
    }
}
