//! String-literal tracking shared by the colorizer and the pretty printer.
//!
//! JSON structure only exists outside string literals, so both passes need
//! the same answer to "is this byte inside a string?". [`StringTracker`] is
//! that answer as a two-flag state machine. [`peek_is_key`] is the one
//! bounded lookahead the colorizer does at an opening quote.

// ---------------------------------------------------------------------------
// StringTracker
// ---------------------------------------------------------------------------

/// What a byte did to the string state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Outside any string; the byte is structural or a scalar.
    Outside,
    /// An opening `"`.
    Open,
    /// An ordinary byte inside a string.
    Inside,
    /// A `\` inside a string; the next byte is escaped.
    Escape,
    /// The byte following a `\`.
    Escaped,
    /// The closing `"`.
    Close,
}

impl Step {
    /// Whether the byte is part of a string literal (quotes included).
    #[inline]
    #[must_use]
    pub const fn in_literal(self) -> bool {
        !matches!(self, Self::Outside)
    }
}

/// In-string / in-escape state, advanced one byte at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringTracker {
    in_string: bool,
    in_escape: bool,
}

impl StringTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_string: false,
            in_escape: false,
        }
    }

    /// Whether the last byte left us inside a string.
    #[inline]
    #[must_use]
    pub const fn in_string(&self) -> bool {
        self.in_string
    }

    /// Feed one byte.
    pub const fn step(&mut self, b: u8) -> Step {
        if self.in_escape {
            self.in_escape = false;
            return Step::Escaped;
        }
        if !self.in_string {
            if b == b'"' {
                self.in_string = true;
                return Step::Open;
            }
            return Step::Outside;
        }
        match b {
            b'\\' => {
                self.in_escape = true;
                Step::Escape
            }
            b'"' => {
                self.in_string = false;
                Step::Close
            }
            _ => Step::Inside,
        }
    }
}

// ---------------------------------------------------------------------------
// Key lookahead
// ---------------------------------------------------------------------------

/// Decide whether the string opened by the quote at `open` is an object key.
///
/// Scans forward to the first unescaped closing quote, skips whitespace and
/// checks for `:`. The scan gives up at a line break or end of input, so an
/// unterminated string is a value.
#[must_use]
pub fn peek_is_key(text: &[u8], open: usize) -> bool {
    let mut escaped = false;
    for (i, &b) in text.iter().enumerate().skip(open + 1) {
        match b {
            b'\n' => return false,
            _ if escaped => escaped = false,
            b'\\' => escaped = true,
            b'"' => {
                return text[i + 1..]
                    .iter()
                    .find(|b| !b.is_ascii_whitespace())
                    .is_some_and(|&b| b == b':');
            }
            _ => {}
        }
    }
    false
}
