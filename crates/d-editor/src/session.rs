//! Edit sessions — key bindings on top of a [`TextBuffer`].
//!
//! A session owns one buffer for the lifetime of one dialog. It comes in
//! two flavors sharing the same buffer primitives:
//!
//! | Key         | Single-line      | Multi-line          |
//! |-------------|------------------|---------------------|
//! | printable   | insert           | insert              |
//! | Backspace   | delete before    | delete before       |
//! | Delete      | clear field      | —                   |
//! | Left/Right  | move             | move                |
//! | Up/Down     | —                | move (logical line) |
//! | Enter       | commit           | insert line break   |
//! | F2          | —                | commit              |
//! | Escape      | cancel           | cancel              |
//!
//! The host feeds keys with [`EditSession::handle_key`] and repaints after
//! each one. Once the session reports [`SessionStatus::Committed`] the host
//! validates the text; if it is rejected the host calls
//! [`resume`](EditSession::resume) and the user keeps editing with the
//! text intact.

use d_term::input::{KeyCode, KeyEvent, Modifiers};

use crate::text::{Direction, TextBuffer};

/// Which key map a session uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    SingleLine,
    MultiLine,
}

/// Where a session stands after the last key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Editing,
    Committed,
    Cancelled,
}

/// The result handed back to the host. `text` is meaningful only when
/// `committed` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub committed: bool,
    pub text: String,
}

// ---------------------------------------------------------------------------
// EditSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct EditSession {
    buffer: TextBuffer,
    mode: EditMode,
    wrap_width: usize,
    status: SessionStatus,
}

impl EditSession {
    /// A one-line field pre-filled with `initial`.
    #[must_use]
    pub fn single_line(initial: &str, capacity: usize, width: usize) -> Self {
        Self::new(EditMode::SingleLine, initial, capacity, width)
    }

    /// A multi-line editor pre-filled with `initial`, wrapping at
    /// `wrap_width` columns.
    #[must_use]
    pub fn multi_line(initial: &str, capacity: usize, wrap_width: usize) -> Self {
        Self::new(EditMode::MultiLine, initial, capacity, wrap_width)
    }

    fn new(mode: EditMode, initial: &str, capacity: usize, wrap_width: usize) -> Self {
        Self {
            buffer: TextBuffer::new(initial, capacity),
            mode,
            wrap_width,
            status: SessionStatus::Editing,
        }
    }

    // -- accessors --

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    #[inline]
    pub const fn buffer_mut(&mut self) -> &mut TextBuffer {
        &mut self.buffer
    }

    #[inline]
    #[must_use]
    pub const fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Change the wrap width, e.g. after the dialog was resized.
    pub const fn set_wrap_width(&mut self, wrap_width: usize) {
        self.wrap_width = wrap_width;
    }

    /// Current buffer text.
    #[must_use]
    pub fn text(&self) -> String {
        self.buffer.content()
    }

    /// The outcome so far. Only final once the status left `Editing`.
    #[must_use]
    pub fn outcome(&self) -> EditOutcome {
        EditOutcome {
            committed: self.status == SessionStatus::Committed,
            text: self.buffer.content(),
        }
    }

    /// Reopen a committed session after the host rejected its text.
    pub fn resume(&mut self) {
        self.status = SessionStatus::Editing;
    }

    // -- input --

    /// Apply one key. Keys arriving after commit or cancel are ignored.
    pub fn handle_key(&mut self, key: &KeyEvent) -> SessionStatus {
        if self.status != SessionStatus::Editing {
            return self.status;
        }
        let multi = self.mode == EditMode::MultiLine;
        match key.code {
            KeyCode::Escape => self.status = SessionStatus::Cancelled,
            KeyCode::Enter if multi => {
                self.buffer.insert_break();
            }
            KeyCode::Enter => self.status = SessionStatus::Committed,
            KeyCode::F(2) if multi => self.status = SessionStatus::Committed,
            KeyCode::Backspace => {
                self.buffer.delete_before();
            }
            KeyCode::Delete if !multi => self.buffer.delete_all(),
            KeyCode::Left => self.step(Direction::Left),
            KeyCode::Right => self.step(Direction::Right),
            KeyCode::Up if multi => self.step(Direction::Up),
            KeyCode::Down if multi => self.step(Direction::Down),
            KeyCode::Char(c) if !key.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT) => {
                self.buffer.insert_char(c);
            }
            _ => {}
        }
        self.status
    }

    fn step(&mut self, direction: Direction) {
        self.buffer.move_cursor(direction, self.wrap_width);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
