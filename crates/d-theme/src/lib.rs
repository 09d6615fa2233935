//! # d-theme — Styles for the document browser
//!
//! Everything d-tui paints goes through a [`HighlightGroup`]:
//!
//! - **[`JsonPalette`]** — one group per JSON [`TokenClass`](d_json::TokenClass),
//!   consumed by the editor's styled repaint
//! - **[`Theme`]** — the palette plus the UI chrome roles (header bar,
//!   selection, status bar, messages, dialog borders)
//!
//! Colors are plain terminal values (`CellColor`), so rendering never does
//! color math. Builtin themes live in [`builtin`].

pub mod builtin;
pub mod highlight;

pub use builtin::{builtin_names, builtin_theme};
pub use highlight::{HighlightGroup, JsonPalette, OverrideError, Theme};
