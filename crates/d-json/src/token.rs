//! Lexical token classes.

use std::fmt;

/// What a byte of JSON text is, for highlighting purposes.
///
/// Classes are assigned per byte and consumed immediately by the renderer;
/// nothing stores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    /// An object key, quotes included.
    Key,
    /// A string in value position, quotes included.
    StringValue,
    /// Digits and the sign, decimal point and exponent-sign bytes.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// Structural bytes: `{ } [ ] , :`.
    Punctuation,
    /// Whitespace, line breaks and anything unrecognized.
    Plain,
}

impl TokenClass {
    /// Every class, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Key,
        Self::StringValue,
        Self::Number,
        Self::Boolean,
        Self::Null,
        Self::Punctuation,
        Self::Plain,
    ];

    /// Lowercase name, as used in theme definitions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::StringValue => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Punctuation => "punctuation",
            Self::Plain => "plain",
        }
    }

    /// Whether the class belongs to a string literal.
    #[inline]
    #[must_use]
    pub const fn is_string(self) -> bool {
        matches!(self, Self::Key | Self::StringValue)
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
