// SPDX-License-Identifier: MIT
//
// Modal dialogs drawn over the current screen.
//
//   Prompt   8 × 60   instructions, separator, prompt, one-line field
//   Editor  20 × 70   instructions, separator, multi-line JSON editor
//   Confirm  7 × 60   question, Y / N
//
// A dialog owns its edit session and reports what the user did as a
// `Reply`. What the reply means (create a collection, save a document,
// ...) is the `Intent` the app attached when it opened the dialog.

use d_editor::view::{repaint_json, Viewport};
use d_editor::{EditSession, SessionStatus};
use d_term::buffer::{ClipRect, FrameBuffer};
use d_term::input::{KeyCode, KeyEvent};
use d_theme::Theme;

use crate::store::Document;
use crate::ui;

pub const PROMPT_SIZE: (u16, u16) = (8, 60);
pub const EDITOR_SIZE: (u16, u16) = (20, 70);
pub const CONFIRM_SIZE: (u16, u16) = (7, 60);

/// Bytes a prompt field holds, terminator slot included.
pub const PROMPT_CAPACITY: usize = 256;
/// Bytes the document editor holds, terminator slot included.
pub const EDITOR_CAPACITY: usize = 4096;

// ─── Intent & Reply ─────────────────────────────────────────────────────────

/// What the app does with the dialog's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    CreateCollection,
    DropCollection(String),
    SetFilter,
    InsertDocument,
    /// The document as it was before editing.
    EditDocument(Document),
    DeleteDocument(Document),
}

/// The outcome of one key in a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Still open.
    Pending,
    Cancelled,
    /// Prompt or editor committed with this text.
    Text(String),
    /// Confirm answered yes.
    Yes,
}

// ─── Dialog ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum Body {
    Prompt {
        prompt: String,
        session: EditSession,
    },
    Editor {
        session: EditSession,
        error: Option<String>,
    },
    Confirm {
        question: String,
    },
}

#[derive(Debug)]
pub struct Dialog {
    pub title: String,
    pub instructions: String,
    pub intent: Intent,
    pub body: Body,
}

/// Text columns of the editor for a `cols`-wide screen.
#[must_use]
pub fn editor_wrap_width(cols: u16) -> usize {
    let (h, w) = EDITOR_SIZE;
    usize::from(ui::centered(cols, h, h, w).width.saturating_sub(4)).max(1)
}

impl Dialog {
    /// A one-line prompt pre-filled with `initial`.
    pub fn prompt(
        intent: Intent,
        title: &str,
        prompt: &str,
        instructions: &str,
        initial: &str,
    ) -> Self {
        let width = usize::from(PROMPT_SIZE.1 - 4);
        Self {
            title: title.to_string(),
            instructions: instructions.to_string(),
            intent,
            body: Body::Prompt {
                prompt: prompt.to_string(),
                session: EditSession::single_line(initial, PROMPT_CAPACITY, width),
            },
        }
    }

    /// A multi-line JSON editor pre-filled with `initial`, cursor at the end.
    pub fn editor(
        intent: Intent,
        title: &str,
        instructions: &str,
        initial: &str,
        cols: u16,
    ) -> Self {
        Self {
            title: title.to_string(),
            instructions: instructions.to_string(),
            intent,
            body: Body::Editor {
                session: EditSession::multi_line(initial, EDITOR_CAPACITY, editor_wrap_width(cols)),
                error: None,
            },
        }
    }

    /// A yes/no question.
    pub fn confirm(intent: Intent, title: &str, question: &str) -> Self {
        Self {
            title: title.to_string(),
            instructions: String::new(),
            intent,
            body: Body::Confirm {
                question: question.to_string(),
            },
        }
    }

    /// Feed one key.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Reply {
        match &mut self.body {
            Body::Prompt { session, .. } => session_reply(session, key),
            Body::Editor { session, error } => {
                *error = None;
                session_reply(session, key)
            }
            Body::Confirm { .. } => match key.code {
                KeyCode::Char('y' | 'Y') => Reply::Yes,
                KeyCode::Char('n' | 'N') | KeyCode::Escape => Reply::Cancelled,
                _ => Reply::Pending,
            },
        }
    }

    /// Keep the editor open after a rejected commit and show `error`.
    pub fn reject(&mut self, message: String) {
        match &mut self.body {
            Body::Prompt { session, .. } => session.resume(),
            Body::Editor { session, error } => {
                session.resume();
                *error = Some(message);
            }
            Body::Confirm { .. } => {}
        }
    }

    /// The editor's wrap width follows the screen width.
    pub fn resize(&mut self, cols: u16) {
        if let Body::Editor { session, .. } = &mut self.body {
            session.set_wrap_width(editor_wrap_width(cols));
        }
    }

    /// The rejection shown in the editor, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.body {
            Body::Editor { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        match self.body {
            Body::Prompt { .. } => PROMPT_SIZE,
            Body::Editor { .. } => EDITOR_SIZE,
            Body::Confirm { .. } => CONFIRM_SIZE,
        }
    }

    /// Paint the dialog centered on the frame. Returns the text cursor.
    pub fn paint(&self, frame: &mut FrameBuffer, theme: &Theme) -> Option<(u16, u16)> {
        let (h, w) = self.size();
        let rect = ui::centered(frame.width(), frame.height(), h, w);
        ui::draw_box(frame, rect, &self.title, theme);
        let inner = ClipRect::new(
            rect.x + 1,
            rect.y + 1,
            rect.width.saturating_sub(2),
            rect.height.saturating_sub(2),
        );
        let x = rect.x + 2;
        let footer_y = (rect.y + rect.height).saturating_sub(2);

        match &self.body {
            Body::Prompt { prompt, session } => {
                let mut y = rect.y + 1;
                if !self.instructions.is_empty() {
                    ui::text(frame, x, y, &self.instructions, theme.hint, Some(&inner));
                    ui::hline(frame, rect.x + 1, y + 1, inner.width, theme);
                    y += 2;
                }
                if !prompt.is_empty() {
                    ui::text(frame, x, y, prompt, theme.normal, Some(&inner));
                    y += 1;
                }
                ui::text(frame, x, footer_y, "ENTER: Save | ESC: Cancel", theme.hint, Some(&inner));
                ui::field(frame, x, y, rect.width.saturating_sub(4), session, theme.normal)
            }
            Body::Editor { session, error } => {
                let (line, style) = match error {
                    Some(e) => (e.as_str(), theme.error),
                    None => (self.instructions.as_str(), theme.hint),
                };
                ui::text(frame, x, rect.y + 1, line, style, Some(&inner));
                ui::hline(frame, rect.x + 1, rect.y + 2, inner.width, theme);
                ui::text(frame, x, footer_y, "F2: Save | ESC: Cancel", theme.hint, Some(&inner));

                let viewport = Viewport::new(
                    rect.y + 3,
                    x,
                    rect.height.saturating_sub(5),
                    rect.width.saturating_sub(4),
                );
                repaint_json(
                    frame,
                    viewport,
                    session.buffer().as_bytes(),
                    Some(session.buffer().cursor()),
                    session.wrap_width(),
                    &theme.json,
                )
            }
            Body::Confirm { question } => {
                ui::text(frame, x, rect.y + 2, question, theme.normal, Some(&inner));
                ui::text(
                    frame,
                    x,
                    rect.y + 4,
                    "Press 'Y' to confirm or 'N' to cancel",
                    theme.hint,
                    Some(&inner),
                );
                None
            }
        }
    }
}

fn session_reply(session: &mut EditSession, key: &KeyEvent) -> Reply {
    match session.handle_key(key) {
        SessionStatus::Editing => Reply::Pending,
        SessionStatus::Cancelled => Reply::Cancelled,
        SessionStatus::Committed => Reply::Text(session.text()),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
