//! View — painting buffer text into a viewport of the frame.
//!
//! The editor and the read-only JSON views share one renderer. It is
//! stateless: the viewport geometry, the content and the cursor are passed
//! per call, and the frame is repainted from scratch every time.
//!
//! ```text
//! content bytes      placements()        FrameBuffer (d-term)
//! ┌────────────┐   ┌──────────────┐    ┌──────────────────┐
//! │ {\n  "a":1 │──▶│ (row, col)   │──▶ │ {                │
//! │ \n}        │   │ per byte     │    │   "a":1          │
//! └────────────┘   │ + style      │    │ }                │
//!                  └──────────────┘    └──────────────────┘
//! ```
//!
//! The whole text is assumed to fit in the viewport; rows past its height
//! are dropped, not scrolled. Each byte is one column. Bytes outside
//! printable ASCII are drawn as `?` (tab as a space).

use d_json::Colorizer;
use d_term::buffer::{ClipRect, FrameBuffer};
use d_theme::{HighlightGroup, JsonPalette};

use crate::wrap::{offset_to_visual, placements};

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// A rectangle of the screen the text is painted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top_row: u16,
    pub left_col: u16,
    pub height: u16,
    pub width: u16,
}

impl Viewport {
    #[must_use]
    pub const fn new(top_row: u16, left_col: u16, height: u16, width: u16) -> Self {
        Self {
            top_row,
            left_col,
            height,
            width,
        }
    }

    /// The viewport as a clip rectangle.
    #[must_use]
    pub const fn rect(self) -> ClipRect {
        ClipRect::new(self.left_col, self.top_row, self.width, self.height)
    }

    /// Screen cell for a wrapped position, if it falls inside.
    #[must_use]
    pub fn screen_pos(self, row: usize, column: usize) -> Option<(u16, u16)> {
        let row = u16::try_from(row).ok().filter(|&r| r < self.height)?;
        let column = u16::try_from(column).ok().filter(|&c| c < self.width)?;
        Some((
            self.left_col.saturating_add(column),
            self.top_row.saturating_add(row),
        ))
    }
}

/// The glyph drawn for a content byte.
#[inline]
#[must_use]
pub fn display_char(byte: u8) -> char {
    match byte {
        b' '..=b'~' => char::from(byte),
        b'\t' => ' ',
        _ => '?',
    }
}

// ---------------------------------------------------------------------------
// Repaint
// ---------------------------------------------------------------------------

/// Repaint `viewport` with `content` in a single style.
///
/// Returns the screen position for the terminal cursor at byte offset
/// `cursor`, or `None` if there is no cursor or it falls outside.
pub fn repaint(
    frame: &mut FrameBuffer,
    viewport: Viewport,
    content: &[u8],
    cursor: Option<usize>,
    wrap_width: usize,
    style: HighlightGroup,
) -> Option<(u16, u16)> {
    repaint_styled(
        frame,
        viewport,
        content,
        cursor,
        wrap_width,
        style,
        std::iter::repeat(style),
    )
}

/// Repaint `viewport` with `content` colorized as JSON.
pub fn repaint_json(
    frame: &mut FrameBuffer,
    viewport: Viewport,
    content: &[u8],
    cursor: Option<usize>,
    wrap_width: usize,
    palette: &JsonPalette,
) -> Option<(u16, u16)> {
    repaint_styled(
        frame,
        viewport,
        content,
        cursor,
        wrap_width,
        palette.plain,
        Colorizer::new(content).map(|t| palette.group(t.class)),
    )
}

/// Repaint `viewport` with one style per content byte.
///
/// Every viewport cell is first reset to `fill`. `styles` yields a style
/// for each byte in order, line breaks included; if it runs short the
/// remaining bytes use `fill`.
pub fn repaint_styled<I>(
    frame: &mut FrameBuffer,
    viewport: Viewport,
    content: &[u8],
    cursor: Option<usize>,
    wrap_width: usize,
    fill: HighlightGroup,
    styles: I,
) -> Option<(u16, u16)>
where
    I: IntoIterator<Item = HighlightGroup>,
{
    let clip = viewport.rect();
    frame.fill_rect(clip, fill.fg, fill.bg, fill.attrs);

    let mut styles = styles.into_iter();
    for placed in placements(content, wrap_width) {
        let style = styles.next().unwrap_or(fill);
        if placed.byte == b'\n' {
            continue;
        }
        if usize::from(viewport.height) <= placed.pos.row {
            break;
        }
        if let Some((x, y)) = viewport.screen_pos(placed.pos.row, placed.pos.column) {
            frame.paint_cell(
                x,
                y,
                display_char(placed.byte),
                style.fg,
                style.bg,
                style.attrs,
                Some(&clip),
            );
        }
    }

    let pos = offset_to_visual(content, cursor?, wrap_width);
    viewport.screen_pos(pos.row, pos.column)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use d_term::cell::Attr;
    use d_term::color::CellColor;
    use d_theme::Theme;
    use pretty_assertions::assert_eq;

    fn row_chars(frame: &FrameBuffer, y: u16) -> String {
        frame.row_text(y)
    }

    fn plain() -> HighlightGroup {
        HighlightGroup::default()
    }

    #[test]
    fn paints_lines_at_offset() {
        let mut frame = FrameBuffer::new(10, 4);
        let vp = Viewport::new(1, 2, 3, 6);
        repaint(&mut frame, vp, b"ab\ncd", None, 6, plain());
        assert_eq!(row_chars(&frame, 0), "          ");
        assert_eq!(row_chars(&frame, 1), "  ab      ");
        assert_eq!(row_chars(&frame, 2), "  cd      ");
    }

    #[test]
    fn wraps_at_wrap_width() {
        let mut frame = FrameBuffer::new(4, 3);
        repaint(&mut frame, Viewport::new(0, 0, 3, 4), b"abcdefg", None, 3, plain());
        assert_eq!(row_chars(&frame, 0), "abc ");
        assert_eq!(row_chars(&frame, 1), "def ");
        assert_eq!(row_chars(&frame, 2), "g   ");
    }

    #[test]
    fn rows_past_height_are_dropped() {
        let mut frame = FrameBuffer::new(4, 4);
        repaint(&mut frame, Viewport::new(0, 0, 2, 4), b"a\nb\nc\nd", None, 4, plain());
        assert_eq!(row_chars(&frame, 1), "b   ");
        assert_eq!(row_chars(&frame, 2), "    ");
    }

    #[test]
    fn clears_stale_text_in_viewport_only() {
        let mut frame = FrameBuffer::new(6, 2);
        let default = CellColor::Default;
        frame.paint_text(0, 0, "xxxxxx", default, default, Attr::empty(), None);
        frame.paint_text(0, 1, "yyyyyy", default, default, Attr::empty(), None);
        repaint(&mut frame, Viewport::new(0, 1, 1, 4), b"a", None, 4, plain());
        assert_eq!(row_chars(&frame, 0), "xa   x");
        assert_eq!(row_chars(&frame, 1), "yyyyyy");
    }

    #[test]
    fn cursor_position_returned() {
        let mut frame = FrameBuffer::new(10, 5);
        let vp = Viewport::new(2, 3, 3, 5);
        assert_eq!(repaint(&mut frame, vp, b"ab\ncd", Some(4), 5, plain()), Some((4, 3)));
        assert_eq!(repaint(&mut frame, vp, b"", Some(0), 5, plain()), Some((3, 2)));
    }

    #[test]
    fn cursor_after_full_row_moves_down() {
        let mut frame = FrameBuffer::new(10, 5);
        let vp = Viewport::new(0, 0, 3, 3);
        assert_eq!(repaint(&mut frame, vp, b"abc", Some(3), 3, plain()), Some((0, 1)));
    }

    #[test]
    fn cursor_outside_viewport_is_none() {
        let mut frame = FrameBuffer::new(10, 5);
        let vp = Viewport::new(0, 0, 1, 5);
        assert_eq!(repaint(&mut frame, vp, b"a\nb", Some(3), 5, plain()), None);
        assert_eq!(repaint(&mut frame, vp, b"a", None, 5, plain()), None);
    }

    #[test]
    fn repaint_is_idempotent() {
        let text = b"{\n  \"k\":\"v\",\n  \"n\":[1,true,null]\n}";
        let palette = Theme::ansi().json;
        let vp = Viewport::new(1, 1, 6, 12);
        let mut a = FrameBuffer::new(14, 8);
        let mut b = FrameBuffer::new(14, 8);
        let ca = repaint_json(&mut a, vp, text, Some(7), 12, &palette);
        let cb = repaint_json(&mut b, vp, text, Some(7), 12, &palette);
        repaint_json(&mut b, vp, text, Some(7), 12, &palette);
        assert_eq!(ca, cb);
        assert_eq!(a.cells(), b.cells());
    }

    #[test]
    fn json_colors_follow_palette() {
        let palette = Theme::ansi().json;
        let mut frame = FrameBuffer::new(20, 1);
        let text = br#"{"a":1,"b":"x"}"#;
        repaint_json(&mut frame, Viewport::new(0, 0, 1, 20), text, None, 20, &palette);
        let fg = |x: u16| frame.get(x, 0).map(|c| c.fg);
        assert_eq!(fg(0), Some(CellColor::WHITE));
        assert_eq!(fg(1), Some(CellColor::CYAN));
        assert_eq!(fg(5), Some(CellColor::YELLOW));
        assert_eq!(fg(12), Some(CellColor::GREEN));
        assert_eq!(row_chars(&frame, 0), "{\"a\":1,\"b\":\"x\"}     ");
    }

    #[test]
    fn styles_running_short_fall_back_to_fill() {
        let mut frame = FrameBuffer::new(3, 1);
        let bold = HighlightGroup::fg_attrs(CellColor::Default, Attr::BOLD);
        repaint_styled(&mut frame, Viewport::new(0, 0, 1, 3), b"ab", None, 3, plain(), [bold]);
        assert!(frame.get(0, 0).is_some_and(|c| c.attrs.contains(Attr::BOLD)));
        assert!(frame.get(1, 0).is_some_and(|c| c.attrs.is_empty()));
    }

    #[test]
    fn unprintable_bytes_show_as_placeholder() {
        assert_eq!(display_char(b'a'), 'a');
        assert_eq!(display_char(b'\t'), ' ');
        assert_eq!(display_char(0xc3), '?');
    }
}
