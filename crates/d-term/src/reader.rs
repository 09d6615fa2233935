// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Blocking key reader.
//
// The browser has nothing to do between keystrokes, so input is read on
// the main thread: `poll()` on stdin with no timeout, `read()` whatever
// arrived, decode it, hand back one event. The only timed wait is the
// ~10ms follow-up poll that tells a lone Escape from the start of an
// escape sequence.
//
// Resize: a SIGWINCH handler sets an `AtomicBool`. The handler is
// installed without SA_RESTART, so a blocked `poll()` returns EINTR and
// the reader reports `Event::Resize` right away.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::input::{Event, Parser};
use crate::terminal::{get_size, FALLBACK_SIZE};

/// Chunk size for one `read()`. A keypress is 1–6 bytes.
const READ_BUF_SIZE: usize = 1024;

/// How long to wait for the rest of an escape sequence before treating
/// a pending ESC as the Escape key (milliseconds).
pub const ESC_TIMEOUT_MS: i32 = 10;

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Install the SIGWINCH handler. Setting an atomic is async-signal-safe.
#[cfg(unix)]
pub fn install_resize_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = 0;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
pub fn install_resize_handler() {}

// ─── KeyReader ───────────────────────────────────────────────────────────────

/// Reads stdin synchronously and yields one [`Event`] per call.
///
/// ```no_run
/// use d_term::reader::KeyReader;
///
/// let mut reader = KeyReader::new();
/// let event = reader.next_event()?;
/// println!("{event:?}");
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct KeyReader {
    parser: Parser,
    queue: VecDeque<Event>,
}

impl KeyReader {
    /// A reader with an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            queue: VecDeque::new(),
        }
    }

    /// Decode `bytes` and queue the resulting key events.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.queue
            .extend(self.parser.advance(bytes).into_iter().map(Event::Key));
    }

    /// Resolve pending bytes (a lone ESC) into key events.
    pub fn flush_pending(&mut self) {
        self.queue
            .extend(self.parser.flush().into_iter().map(Event::Key));
    }

    /// Whether a decoded event is waiting.
    #[must_use]
    pub fn has_queued(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Take the next decoded event without reading stdin.
    pub fn pop(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Block until the next key or resize.
    ///
    /// # Errors
    ///
    /// Returns an error if polling or reading stdin fails, or
    /// `UnexpectedEof` if stdin is closed.
    pub fn next_event(&mut self) -> io::Result<Event> {
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Ok(event);
            }
            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let size = get_size().unwrap_or(FALLBACK_SIZE);
                return Ok(Event::Resize(size.cols, size.rows));
            }

            let timeout = if self.parser.has_pending() { ESC_TIMEOUT_MS } else { -1 };
            match wait_readable(timeout) {
                Ok(true) => {}
                Ok(false) => {
                    self.flush_pending();
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }

            match read_stdin(&mut buf) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(n) => self.feed(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for KeyReader {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Raw stdin ───────────────────────────────────────────────────────────────

/// Wait until stdin is readable. `Ok(false)` on timeout; `timeout_ms < 0`
/// waits forever.
#[cfg(unix)]
fn wait_readable(timeout_ms: i32) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let ready = unsafe { libc::poll(&raw mut pfd, 1, timeout_ms) };
    if ready < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(ready > 0)
}

#[cfg(unix)]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
    if n < 0 {
        return Err(io::Error::last_os_error());
    }
    #[allow(clippy::cast_sign_loss)]
    Ok(n as usize)
}

#[cfg(not(unix))]
fn wait_readable(timeout_ms: i32) -> io::Result<bool> {
    // No poll: a pending ESC resolves immediately, anything else blocks in read.
    Ok(timeout_ms < 0)
}

#[cfg(not(unix))]
fn read_stdin(buf: &mut [u8]) -> io::Result<usize> {
    use std::io::Read;
    io::stdin().lock().read(buf)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
