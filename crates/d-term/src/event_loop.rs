// SPDX-License-Identifier: MIT
//
// Event loop — read a key, update, repaint, repeat.
//
// The loop is synchronous and strictly ordered: each event is fully
// handled and the resulting frame is on screen, cursor placed and
// flushed, before the next key is read. There is no tick and no
// background thread; an idle browser sits in `poll()` at 0% CPU.
//
// Per iteration:
//
//   1. The app paints the whole screen into a cleared FrameBuffer.
//   2. The diff renderer writes only the changed cells.
//   3. The hardware cursor is shown at `App::cursor()` or hidden.
//   4. Block for the next event; resize events resize the frame first.

use std::io::{self, Write};

use crate::ansi::{self, CursorShape};
use crate::buffer::FrameBuffer;
use crate::diff::DiffRenderer;
use crate::input::Event;
use crate::reader::{install_resize_handler, KeyReader};
use crate::terminal::{Size, TerminalContext};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep running.
    Continue,
    /// Leave the loop.
    Quit,
}

/// Application interface for the event loop.
///
/// Only [`paint`](App::paint) is required.
pub trait App {
    /// Handle one input event. Return [`Action::Quit`] to exit.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// The terminal changed size. The frame is already resized.
    fn on_resize(&mut self, _size: Size) {}

    /// Paint the current state. The buffer is cleared beforehand.
    fn paint(&mut self, buf: &mut FrameBuffer);

    /// Where to show the hardware cursor after painting, if anywhere.
    fn cursor(&self) -> Option<(u16, u16, CursorShape)> {
        None
    }
}

// ─── Frame Presentation ──────────────────────────────────────────────────────

/// Paint `app` into `frame`, diff it, and write the frame plus cursor
/// placement to `w`, flushing so the cursor is visible immediately.
///
/// # Errors
///
/// Returns an error if writing to `w` fails.
pub fn present(
    app: &mut impl App,
    frame: &mut FrameBuffer,
    renderer: &mut DiffRenderer,
    w: &mut impl Write,
) -> io::Result<()> {
    frame.clear();
    app.paint(frame);
    renderer.render(frame);
    renderer.flush_to(w)?;

    if let Some((x, y, shape)) = app.cursor() {
        ansi::cursor_to(w, x, y)?;
        ansi::set_cursor_shape(w, shape)?;
        ansi::cursor_show(w)?;
    } else {
        ansi::cursor_hide(w)?;
    }
    w.flush()
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal context, the key reader and the diff renderer.
///
/// ```no_run
/// use d_term::buffer::FrameBuffer;
/// use d_term::event_loop::{Action, App, EventLoop};
/// use d_term::input::{Event, KeyCode, KeyEvent};
///
/// struct Quitter;
///
/// impl App for Quitter {
///     fn on_event(&mut self, event: &Event) -> Action {
///         match event {
///             Event::Key(KeyEvent { code: KeyCode::Char('q'), .. }) => Action::Quit,
///             _ => Action::Continue,
///         }
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// EventLoop::new().run(&mut Quitter)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: TerminalContext,
    reader: KeyReader,
    renderer: DiffRenderer,
}

impl EventLoop {
    /// A loop over the process terminal. Nothing is changed until
    /// [`run`](Self::run).
    #[must_use]
    pub fn new() -> Self {
        Self {
            terminal: TerminalContext::new(),
            reader: KeyReader::new(),
            renderer: DiffRenderer::new(),
        }
    }

    /// The current terminal size.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Enter the terminal, run until the app quits, restore the terminal.
    ///
    /// The terminal is restored even if the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if entering/leaving the terminal, reading input
    /// or writing output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        install_resize_handler();

        let result = self.run_inner(app);
        let restored = self.terminal.leave();
        result.and(restored)
    }

    fn run_inner(&mut self, app: &mut impl App) -> io::Result<()> {
        let size = self.terminal.refresh_size();
        app.on_resize(size);
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let stdout = io::stdout();

        loop {
            present(app, &mut frame, &mut self.renderer, &mut stdout.lock())?;

            let event = self.reader.next_event()?;
            if let Event::Resize(..) = event {
                let size = self.terminal.refresh_size();
                frame.resize(size.cols, size.rows);
                self.renderer.force_redraw();
                app.on_resize(size);
            }
            if app.on_event(&event) == Action::Quit {
                return Ok(());
            }
        }
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
