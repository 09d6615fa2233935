// SPDX-License-Identifier: MIT
//
// Screen chrome shared by every screen and dialog: boxes with a centered
// "[ title ]", separators, the status bar, the one-line message bar and
// single-line input fields. Also the selection/scroll state of a list.
//
// Everything paints straight into the FrameBuffer with the theme's
// groups; nothing here keeps state between frames except `ListState`.

use d_editor::view::{repaint, Viewport};
use d_editor::EditSession;
use d_term::buffer::{string_width, ClipRect, FrameBuffer};
use d_theme::{HighlightGroup, Theme};

// ─── Messages ───────────────────────────────────────────────────────────────

/// How a message bar is colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageKind {
    #[must_use]
    pub const fn style(self, theme: &Theme) -> HighlightGroup {
        match self {
            Self::Info => theme.info,
            Self::Success => theme.success,
            Self::Warning => theme.warning,
            Self::Error => theme.error,
        }
    }
}

/// A one-shot notice shown on the message row until the next key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageKind,
    pub text: String,
}

impl Message {
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// The whole frame as a rectangle.
#[must_use]
pub fn full(frame: &FrameBuffer) -> ClipRect {
    ClipRect::new(0, 0, frame.width(), frame.height())
}

/// `rect` without its left and right border columns.
#[must_use]
pub const fn inner(rect: ClipRect) -> ClipRect {
    ClipRect::new(rect.x + 1, rect.y, rect.width.saturating_sub(2), rect.height)
}

/// A `height` × `width` box centered in a `cols` × `rows` screen, shrunk
/// to fit if the screen is smaller.
#[must_use]
pub const fn centered(cols: u16, rows: u16, height: u16, width: u16) -> ClipRect {
    let width = if width < cols { width } else { cols };
    let height = if height < rows { height } else { rows };
    ClipRect::new((cols - width) / 2, (rows - height) / 2, width, height)
}

// ─── Painting ───────────────────────────────────────────────────────────────

/// Paint `text` at `(x, y)` in `style`, clipped to `clip`.
pub fn text(
    frame: &mut FrameBuffer,
    x: u16,
    y: u16,
    text: &str,
    style: HighlightGroup,
    clip: Option<&ClipRect>,
) -> u16 {
    frame.paint_text(x, y, text, style.fg, style.bg, style.attrs, clip)
}

/// Blank `rect` and draw a single-line border with `[ title ]` centered
/// on the top edge. The title is dropped if it does not fit.
pub fn draw_box(frame: &mut FrameBuffer, rect: ClipRect, title: &str, theme: &Theme) {
    let normal = theme.normal;
    frame.fill_rect(rect, normal.fg, normal.bg, normal.attrs);
    if rect.width < 2 || rect.height < 2 {
        return;
    }

    let b = theme.border;
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;
    for x in rect.x + 1..right {
        frame.paint_cell(x, rect.y, '─', b.fg, b.bg, b.attrs, None);
        frame.paint_cell(x, bottom, '─', b.fg, b.bg, b.attrs, None);
    }
    for y in rect.y + 1..bottom {
        frame.paint_cell(rect.x, y, '│', b.fg, b.bg, b.attrs, None);
        frame.paint_cell(right, y, '│', b.fg, b.bg, b.attrs, None);
    }
    frame.paint_cell(rect.x, rect.y, '┌', b.fg, b.bg, b.attrs, None);
    frame.paint_cell(right, rect.y, '┐', b.fg, b.bg, b.attrs, None);
    frame.paint_cell(rect.x, bottom, '└', b.fg, b.bg, b.attrs, None);
    frame.paint_cell(right, bottom, '┘', b.fg, b.bg, b.attrs, None);

    let title_width = string_width(title) + 4;
    let title_x = (usize::from(rect.width)).saturating_sub(title_width) / 2;
    if title_x > 0 {
        let label = format!("[ {title} ]");
        #[allow(clippy::cast_possible_truncation)]
        let x = rect.x + title_x as u16;
        text(frame, x, rect.y, &label, theme.header, Some(&rect));
    }
}

/// A horizontal separator of `width` cells.
pub fn hline(frame: &mut FrameBuffer, x: u16, y: u16, width: u16, theme: &Theme) {
    let b = theme.border;
    for col in x..x.saturating_add(width) {
        frame.paint_cell(col, y, '─', b.fg, b.bg, b.attrs, None);
    }
}

/// The key hint bar on the last row of `rect`.
pub fn status_bar(frame: &mut FrameBuffer, rect: ClipRect, hint: &str, theme: &Theme) {
    if rect.height == 0 {
        return;
    }
    let s = theme.status;
    let y = rect.y + rect.height - 1;
    let row = ClipRect::new(rect.x, y, rect.width, 1);
    frame.fill_rect(row, s.fg, s.bg, s.attrs);
    text(frame, rect.x.saturating_add(1), y, hint, s, Some(&row));
}

/// A full-width message bar on row `y` of `rect`, inside the border.
pub fn message_bar(
    frame: &mut FrameBuffer,
    rect: ClipRect,
    y: u16,
    message: &Message,
    theme: &Theme,
) {
    let style = message.kind.style(theme);
    let row = ClipRect::new(rect.x + 1, y, rect.width.saturating_sub(2), 1);
    frame.fill_rect(row, style.fg, style.bg, style.attrs);
    text(frame, rect.x.saturating_add(2), y, &message.text, style, Some(&row));
}

/// Paint a single-line input field of `width` cells at `(x, y)`.
///
/// Text longer than the field shows the part that ends at the cursor.
/// Returns the screen position of the cursor.
pub fn field(
    frame: &mut FrameBuffer,
    x: u16,
    y: u16,
    width: u16,
    session: &EditSession,
    style: HighlightGroup,
) -> Option<(u16, u16)> {
    if width == 0 {
        return None;
    }
    let content = session.buffer().as_bytes();
    let cursor = session.buffer().cursor();
    let start = (cursor + 1).saturating_sub(usize::from(width));
    repaint(
        frame,
        Viewport::new(y, x, 1, width),
        &content[start..],
        Some(cursor - start),
        usize::from(width),
        style,
    )
}

// ─── ListState ──────────────────────────────────────────────────────────────

/// Selection and scroll offset of a vertical list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListState {
    pub selected: usize,
    pub scroll: usize,
}

impl ListState {
    pub const fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub const fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Keep the selection inside a list of `len` items.
    pub const fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Scroll so the selection is one of the `visible` rows. Returns the
    /// index range to draw.
    pub fn visible(&mut self, len: usize, visible: usize) -> std::ops::Range<usize> {
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if visible > 0 && self.selected >= self.scroll + visible {
            self.scroll = self.selected + 1 - visible;
        }
        self.scroll.min(len)..(self.scroll + visible).min(len)
    }
}

/// Paint the rows of a list starting at `top`: ` > name` for the
/// selection in the selected style, `   name` otherwise.
pub fn list(
    frame: &mut FrameBuffer,
    rect: ClipRect,
    top: u16,
    items: &[String],
    state: &mut ListState,
    visible: usize,
    theme: &Theme,
) {
    let inner = inner(rect);
    for (row, i) in (top..).zip(state.visible(items.len(), visible)) {
        if i == state.selected {
            text(frame, rect.x + 2, row, &format!(" > {}", items[i]), theme.selected, Some(&inner));
        } else {
            text(frame, rect.x + 2, row, &format!("   {}", items[i]), theme.normal, Some(&inner));
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
