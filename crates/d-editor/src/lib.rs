//! # d-editor — Editor core for d-tui
//!
//! The in-terminal text editing subsystem, leaves first:
//!
//! - **[`wrap`]** — byte offset → wrapped `(row, column)`, one shared
//!   wrapping primitive
//! - **[`text`]** — `TextBuffer`, fixed-capacity bytes with a cursor
//! - **[`session`]** — single- and multi-line key bindings, commit/cancel
//! - **[`view`]** — repaint a viewport of d-term's `FrameBuffer`, plain or
//!   JSON-colorized
//!
//! Everything is synchronous and allocation-light; the host event loop
//! calls `handle_key` then repaints, once per keystroke.

pub mod session;
pub mod text;
pub mod view;
pub mod wrap;

pub use session::{EditMode, EditOutcome, EditSession, SessionStatus};
pub use text::{Direction, TextBuffer};
pub use view::Viewport;
pub use wrap::VisualPosition;
