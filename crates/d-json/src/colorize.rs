//! Single-pass JSON colorizer.
//!
//! [`Colorizer`] walks the text once and yields one [`Token`] per byte.
//! Classification, in priority order:
//!
//! 1. `\n` is [`Plain`](TokenClass::Plain) and leaves all state untouched;
//!    the renderer starts a new row there.
//! 2. Bytes of a string literal (quotes, escapes and escaped bytes
//!    included) are [`Key`](TokenClass::Key) when the literal is followed by
//!    `:`, otherwise [`StringValue`](TokenClass::StringValue). The decision
//!    is made once, at the opening quote, by [`peek_is_key`].
//! 3. `{ } [ ] , :` are [`Punctuation`](TokenClass::Punctuation).
//! 4. Digits and `- + .` are [`Number`](TokenClass::Number).
//! 5. `true`, `false` and `null` are classified as a unit.
//! 6. Everything else is [`Plain`](TokenClass::Plain).
//!
//! The scanner never fails. Truncated or malformed input still gets a class
//! for every byte.

use crate::scan::{peek_is_key, Step, StringTracker};
use crate::token::TokenClass;

/// One classified byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Byte offset into the text.
    pub offset: usize,
    /// The byte itself.
    pub byte: u8,
    pub class: TokenClass,
}

const KEYWORDS: [(&[u8], TokenClass); 3] = [
    (b"true", TokenClass::Boolean),
    (b"false", TokenClass::Boolean),
    (b"null", TokenClass::Null),
];

/// Iterator over the [`Token`]s of a JSON text.
#[derive(Debug, Clone)]
pub struct Colorizer<'a> {
    text: &'a [u8],
    pos: usize,
    tracker: StringTracker,
    is_key: bool,
    /// Class and remaining byte count of a keyword in progress.
    keyword: Option<(TokenClass, usize)>,
}

/// Classify every byte of `text`.
///
/// ```
/// use d_json::{colorize, TokenClass};
///
/// let classes: Vec<_> = colorize("[null]").map(|t| t.class).collect();
/// assert_eq!(classes[1..5], [TokenClass::Null; 4]);
/// ```
#[must_use]
pub fn colorize(text: &str) -> Colorizer<'_> {
    Colorizer::new(text.as_bytes())
}

impl<'a> Colorizer<'a> {
    #[must_use]
    pub const fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            pos: 0,
            tracker: StringTracker::new(),
            is_key: false,
            keyword: None,
        }
    }

    const fn string_class(&self) -> TokenClass {
        if self.is_key {
            TokenClass::Key
        } else {
            TokenClass::StringValue
        }
    }

    fn classify_outside(&mut self, b: u8) -> TokenClass {
        if let Some((class, left)) = self.keyword {
            self.keyword = (left > 1).then_some((class, left - 1));
            return class;
        }
        match b {
            b'{' | b'}' | b'[' | b']' | b',' | b':' => TokenClass::Punctuation,
            b'0'..=b'9' | b'-' | b'+' | b'.' => TokenClass::Number,
            _ => {
                let rest = &self.text[self.pos..];
                match KEYWORDS.iter().find(|(word, _)| rest.starts_with(word)) {
                    Some(&(word, class)) => {
                        self.keyword = Some((class, word.len() - 1));
                        class
                    }
                    None => TokenClass::Plain,
                }
            }
        }
    }
}

impl Iterator for Colorizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let byte = *self.text.get(self.pos)?;
        let offset = self.pos;

        let class = if byte == b'\n' {
            TokenClass::Plain
        } else {
            match self.tracker.step(byte) {
                Step::Open => {
                    self.is_key = peek_is_key(self.text, offset);
                    self.string_class()
                }
                Step::Outside => self.classify_outside(byte),
                _ => self.string_class(),
            }
        };

        self.pos += 1;
        Some(Token {
            offset,
            byte,
            class,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.text.len() - self.pos;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Colorizer<'_> {}
