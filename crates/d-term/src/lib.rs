// SPDX-License-Identifier: MIT
//
// d-term — Terminal rendering engine for d-tui.
//
// A small, dependency-light terminal backend: raw mode and alternate
// screen through termios, a cell grid that every screen paints into,
// a differential renderer that only emits escape codes for cells that
// changed, and a key parser for the legacy CSI / SS3 encodings every
// terminal speaks.
//
// Input is strictly synchronous. The event loop blocks on stdin, turns
// the bytes into key events, lets the application mutate its state,
// and repaints before reading the next key. No reader thread, no tick.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
