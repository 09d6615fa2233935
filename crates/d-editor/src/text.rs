//! Fixed-capacity text buffer with a byte cursor.
//!
//! The buffer is the editor's only mutable state: a `Vec<u8>` that never
//! holds more than `capacity - 1` bytes, and a cursor offset in
//! `0..=len`. Line breaks are ordinary bytes; there is no line index.
//! Every edit shifts the tail in place.
//!
//! Edits that would break an invariant (full buffer, non-printable input,
//! moving past either end) are refused silently. Callers only ever observe
//! that nothing changed; the `bool` results are there for tests and for
//! repaint decisions.
//!
//! Vertical motion works on *logical* lines (runs between `\n` bytes) but
//! takes its target column from the wrapped [`VisualPosition`]. Moving
//! through a shorter line clamps the column, and the clamped column is
//! what the next move starts from.
//!
//! [`VisualPosition`]: crate::wrap::VisualPosition

use crate::wrap::{offset_to_visual, VisualPosition};

/// Direction of a single cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Whether `c` can be typed into a buffer: printable ASCII only.
#[inline]
#[must_use]
pub const fn is_insertable(c: char) -> bool {
    matches!(c, ' '..='~')
}

// ---------------------------------------------------------------------------
// TextBuffer
// ---------------------------------------------------------------------------

/// Editable bytes with a cursor, bounded by a fixed capacity.
///
/// ```
/// use d_editor::text::{Direction, TextBuffer};
///
/// let mut buf = TextBuffer::new("{}", 16);
/// buf.move_cursor(Direction::Left, 80);
/// buf.insert_char('x');
/// assert_eq!(buf.content(), "{x}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    content: Vec<u8>,
    cursor: usize,
    capacity: usize,
}

impl TextBuffer {
    /// A buffer holding `initial`, truncated to `capacity - 1` bytes, with
    /// the cursor at the end.
    #[must_use]
    pub fn new(initial: &str, capacity: usize) -> Self {
        let max = capacity.saturating_sub(1);
        let mut content = Vec::with_capacity(max);
        content.extend_from_slice(&initial.as_bytes()[..initial.len().min(max)]);
        let cursor = content.len();
        Self {
            content,
            cursor,
            capacity,
        }
    }

    // -- accessors --

    /// The text. Bytes that do not form valid UTF-8 (a truncated initial
    /// string, a half-deleted character) come out as U+FFFD.
    #[must_use]
    pub fn content(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.content.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cursor offset in bytes, `0..=len`.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Capacity including the reserved terminator slot.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether another byte would exceed `capacity - 1`.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.content.len() >= self.capacity.saturating_sub(1)
    }

    /// Cursor position under wrapping at `wrap_width`.
    #[must_use]
    pub fn visual_cursor(&self, wrap_width: usize) -> VisualPosition {
        offset_to_visual(&self.content, self.cursor, wrap_width)
    }

    /// Place the cursor, clamped to `0..=len`.
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.content.len());
    }

    // -- editing --

    /// Insert a printable ASCII character at the cursor.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !is_insertable(c) {
            return false;
        }
        u8::try_from(c).is_ok_and(|b| self.insert_byte(b))
    }

    /// Insert a line break at the cursor.
    pub fn insert_break(&mut self) -> bool {
        self.insert_byte(b'\n')
    }

    fn insert_byte(&mut self, b: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.content.insert(self.cursor, b);
        self.cursor += 1;
        true
    }

    /// Delete the byte before the cursor (Backspace).
    pub fn delete_before(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.content.remove(self.cursor);
        true
    }

    /// Empty the buffer.
    pub fn delete_all(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    // -- motion --

    /// Move the cursor one step. Returns whether it moved.
    ///
    /// Up and Down move between logical lines, keeping the visual column.
    /// They never stop on a wrapped continuation row of the same line, so
    /// on wrapped text Up then Down can land on an earlier row.
    pub fn move_cursor(&mut self, direction: Direction, wrap_width: usize) -> bool {
        let target = match direction {
            Direction::Left => self.cursor.checked_sub(1),
            Direction::Right => (self.cursor < self.content.len()).then_some(self.cursor + 1),
            Direction::Up => self.line_above(wrap_width),
            Direction::Down => self.line_below(wrap_width),
        };
        match target {
            Some(offset) if offset != self.cursor => {
                self.cursor = offset;
                true
            }
            _ => false,
        }
    }

    /// Start of the logical line containing `offset`.
    fn line_start(&self, offset: usize) -> usize {
        self.content[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1)
    }

    /// Offset `column` bytes into the line starting at `start`, stopping
    /// early at a line break or the end of the buffer.
    fn column_in_line(&self, start: usize, column: usize) -> usize {
        let line = &self.content[start..];
        let line_len = line.iter().position(|&b| b == b'\n').unwrap_or(line.len());
        start + column.min(line_len)
    }

    fn line_above(&self, wrap_width: usize) -> Option<usize> {
        let column = self.visual_cursor(wrap_width).column;
        let start = self.line_start(self.cursor);
        if start == 0 {
            return None;
        }
        let prev_start = self.line_start(start - 1);
        Some(self.column_in_line(prev_start, column))
    }

    fn line_below(&self, wrap_width: usize) -> Option<usize> {
        let column = self.visual_cursor(wrap_width).column;
        let end = self.cursor
            + self.content[self.cursor..]
                .iter()
                .position(|&b| b == b'\n')?;
        Some(self.column_in_line(end + 1, column))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const W: usize = 80;

    fn at(text: &str, cursor: usize) -> TextBuffer {
        let mut buf = TextBuffer::new(text, 4096);
        buf.set_cursor(cursor);
        buf
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn new_puts_cursor_at_end() {
        let buf = TextBuffer::new("abc", 10);
        assert_eq!(buf.cursor(), 3);
        assert_eq!(buf.content(), "abc");
    }

    #[test]
    fn new_truncates_to_capacity_minus_one() {
        let buf = TextBuffer::new("abcdef", 4);
        assert_eq!(buf.content(), "abc");
        assert!(buf.is_full());
    }

    #[test]
    fn zero_capacity_holds_nothing() {
        let mut buf = TextBuffer::new("abc", 0);
        assert!(buf.is_empty());
        assert!(!buf.insert_char('a'));
    }

    #[test]
    fn set_cursor_clamps() {
        let mut buf = TextBuffer::new("ab", 10);
        buf.set_cursor(99);
        assert_eq!(buf.cursor(), 2);
    }

    // ── insert ────────────────────────────────────────────────────────────

    #[test]
    fn insert_shifts_tail() {
        let mut buf = at("ac", 1);
        assert!(buf.insert_char('b'));
        assert_eq!(buf.content(), "abc");
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn insert_refuses_non_printable() {
        let mut buf = at("", 0);
        assert!(!buf.insert_char('\t'));
        assert!(!buf.insert_char('\n'));
        assert!(!buf.insert_char('é'));
        assert!(!buf.insert_char('\u{7f}'));
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn capacity_boundary() {
        let mut buf = TextBuffer::new("", 4);
        assert!(buf.insert_char('a'));
        assert!(buf.insert_char('b'));
        assert!(buf.insert_char('c'));
        assert!(!buf.insert_char('d'));
        assert!(!buf.insert_break());
        assert_eq!(buf.content(), "abc");
        assert_eq!(buf.cursor(), 3);

        assert!(buf.delete_before());
        assert!(buf.insert_break());
        assert_eq!(buf.content(), "ab\n");
    }

    #[test]
    fn insert_break_mid_line() {
        let mut buf = at("{}", 1);
        assert!(buf.insert_break());
        assert_eq!(buf.content(), "{\n}");
        assert_eq!(buf.cursor(), 2);
    }

    // ── delete ────────────────────────────────────────────────────────────

    #[test]
    fn delete_before_shifts_left() {
        let mut buf = at("abc", 2);
        assert!(buf.delete_before());
        assert_eq!(buf.content(), "ac");
        assert_eq!(buf.cursor(), 1);
    }

    #[test]
    fn delete_before_at_start_is_noop() {
        let mut buf = at("abc", 0);
        assert!(!buf.delete_before());
        assert_eq!(buf.content(), "abc");
    }

    #[test]
    fn delete_before_joins_lines() {
        let mut buf = at("a\nb", 2);
        buf.delete_before();
        assert_eq!(buf.content(), "ab");
    }

    #[test]
    fn delete_all_resets() {
        let mut buf = at("abc", 1);
        buf.delete_all();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }

    // ── horizontal motion ─────────────────────────────────────────────────

    #[test]
    fn left_right_clamp() {
        let mut buf = at("ab", 0);
        assert!(!buf.move_cursor(Direction::Left, W));
        buf.set_cursor(2);
        assert!(!buf.move_cursor(Direction::Right, W));
    }

    #[test]
    fn right_then_left_round_trips() {
        let text = "{\n  \"a\": 1\n}";
        for start in 1..text.len() {
            let mut buf = at(text, start);
            buf.move_cursor(Direction::Right, W);
            buf.move_cursor(Direction::Left, W);
            assert_eq!(buf.cursor(), start);
        }
    }

    #[test]
    fn right_crosses_line_breaks() {
        let mut buf = at("a\nb", 1);
        buf.move_cursor(Direction::Right, W);
        assert_eq!(buf.cursor(), 2);
        assert_eq!(buf.visual_cursor(W), VisualPosition::new(1, 0));
    }

    // ── vertical motion ───────────────────────────────────────────────────

    #[test]
    fn up_on_first_line_is_noop() {
        let mut buf = at("abc\ndef", 2);
        assert!(!buf.move_cursor(Direction::Up, W));
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn down_on_last_line_is_noop() {
        let mut buf = at("abc\ndef", 5);
        assert!(!buf.move_cursor(Direction::Down, W));
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn down_keeps_column() {
        let mut buf = at("abc\ndef", 2);
        buf.move_cursor(Direction::Down, W);
        assert_eq!(buf.cursor(), 6);
    }

    #[test]
    fn up_keeps_column() {
        let mut buf = at("abc\ndef", 6);
        buf.move_cursor(Direction::Up, W);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn down_clamps_to_shorter_line() {
        let mut buf = at("abcdef\nab\nabcdef", 5);
        buf.move_cursor(Direction::Down, W);
        assert_eq!(buf.cursor(), 9);
        // Ragged right: the clamped column carries on.
        buf.move_cursor(Direction::Down, W);
        assert_eq!(buf.cursor(), 12);
    }

    #[test]
    fn up_clamps_to_shorter_line() {
        let mut buf = at("ab\nabcdef", 8);
        buf.move_cursor(Direction::Up, W);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn up_into_empty_line() {
        let mut buf = at("a\n\nabc", 5);
        buf.move_cursor(Direction::Up, W);
        assert_eq!(buf.cursor(), 2);
    }

    #[test]
    fn up_from_second_line_of_leading_break() {
        let mut buf = at("\nabc", 3);
        buf.move_cursor(Direction::Up, W);
        assert_eq!(buf.cursor(), 0);
    }

    #[test]
    fn up_down_round_trip_with_growing_lines() {
        let text = "ab\nabcd\nabcdef\nabcdefgh";
        let starts = [0, 3, 8, 15];
        let lens = [2, 4, 6, 8];
        for line in 0..3 {
            for col in 0..=lens[line] {
                let start = starts[line] + col;
                let mut buf = at(text, start);
                assert!(buf.move_cursor(Direction::Down, W));
                assert_eq!(buf.visual_cursor(W).row, line + 1);
                assert!(buf.move_cursor(Direction::Up, W));
                assert_eq!(buf.visual_cursor(W).row, line);
                assert_eq!(buf.cursor(), start, "line {line} col {col}");
            }
        }
    }

    #[test]
    fn down_up_round_trip_restores_row() {
        let text = "ab\nabcd\nabcdef\nabcdefgh";
        let starts = [0, 3, 8, 15];
        let lens = [2, 4, 6, 8];
        for line in 1..4 {
            for col in 0..=lens[line] {
                let mut buf = at(text, starts[line] + col);
                let row = buf.visual_cursor(W).row;
                assert!(buf.move_cursor(Direction::Up, W));
                assert_eq!(buf.visual_cursor(W).row, row - 1);
                assert!(buf.move_cursor(Direction::Down, W));
                assert_eq!(buf.visual_cursor(W).row, row, "line {line} col {col}");
            }
        }
    }

    #[test]
    fn vertical_motion_skips_wrapped_rows() {
        // "abcdefgh" wraps at 4 into rows 1 and 2; offset 8 is row 2.
        let mut buf = at("ab\nabcdefgh", 8);
        assert_eq!(buf.visual_cursor(4).row, 2);
        buf.move_cursor(Direction::Up, 4);
        assert_eq!(buf.cursor(), 1);
        buf.move_cursor(Direction::Down, 4);
        assert_eq!(buf.cursor(), 4);
        assert_eq!(buf.visual_cursor(4).row, 1);
    }

    #[test]
    fn vertical_target_uses_wrapped_column() {
        // "abcdef" wraps at 4, so offset 5 is visual column 1.
        let mut buf = at("abcdef\nxyz", 5);
        buf.move_cursor(Direction::Down, 4);
        assert_eq!(buf.cursor(), 8);
    }

    #[test]
    fn down_from_line_start_on_json() {
        let mut buf = at("{\n}\n", 0);
        buf.move_cursor(Direction::Down, W);
        assert_eq!(buf.cursor(), 2);
        buf.move_cursor(Direction::Down, W);
        assert_eq!(buf.cursor(), 4);
        assert!(!buf.move_cursor(Direction::Down, W));
    }
}
