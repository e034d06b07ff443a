use std::fmt::Display;

use miette::SourceSpan;

use crate::identifier::is_newline;

/// A position inside KDL source text.
///
/// `line` and `column` are 1-based and count characters; `offset` is the
/// 0-based byte offset into the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, in characters.
    pub column: usize,
    /// Byte offset from the start of the input.
    pub offset: usize,
}

impl SourceLocation {
    /// The location of the very first character of an input.
    pub const START: SourceLocation = SourceLocation {
        line: 1,
        column: 1,
        offset: 0,
    };

    /// Creates a new location.
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Builds a span of `len` bytes starting at this location.
    pub fn span(&self, len: usize) -> SourceSpan {
        SourceSpan::new(self.offset.into(), len)
    }

    /// Moves past `c`. `next` is the character after it; the `\n` of a
    /// `\r\n` pair does the line accounting.
    pub(crate) fn advance(&mut self, c: char, next: Option<char>) {
        self.offset += c.len_utf8();
        if is_newline(c) && !(c == '\r' && next == Some('\n')) {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    /// The location just past the end of `text`.
    pub(crate) fn end_of(text: &str) -> SourceLocation {
        let mut location = SourceLocation::START;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            location.advance(c, chars.peek().copied());
        }
        location
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl From<SourceLocation> for SourceSpan {
    fn from(location: SourceLocation) -> Self {
        location.span(0)
    }
}
