use std::fmt::Display;

use crate::SourceLocation;

/// One lexical unit of KDL source, as produced by [`crate::Lexer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What the token is.
    pub kind: TokenKind,
    /// Where the token starts.
    pub location: SourceLocation,
    /// Raw whitespace, comments, line continuations and any version marker
    /// that came right before this token.
    pub leading_trivia: String,
}

/// The different kinds of [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A bare identifier, e.g. `node` or `-`.
    Identifier(String),
    /// A quoted string with escapes already processed (and dedented, for
    /// `"""` strings).
    String(String),
    /// A raw string such as `r#"…"#` or `#"…"#`.
    RawString(String),
    /// An integer literal in any radix.
    Integer(i64),
    /// A number with a fraction or exponent, or `#inf`/`#-inf`/`#nan`.
    Float(f64),
    /// `true`/`false` (v1) or `#true`/`#false`.
    Bool(bool),
    /// `null` (v1) or `#null`.
    Null,
    /// `=`
    Equals,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,
    /// A line break. `\r\n` produces a single token.
    Newline,
    /// `(name)` in front of a node name or value.
    TypeAnnotation(String),
    /// `/-`
    Slashdash,
    /// End of input. Trailing trivia hangs off this token.
    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::String(s) | TokenKind::RawString(s) => write!(f, "string {s:?}"),
            TokenKind::Integer(i) => write!(f, "integer {i}"),
            TokenKind::Float(x) => write!(f, "number {x}"),
            TokenKind::Bool(b) => write!(f, "boolean {b}"),
            TokenKind::Null => write!(f, "null"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::TypeAnnotation(name) => write!(f, "type annotation ({name})"),
            TokenKind::Slashdash => write!(f, "'/-'"),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

impl Token {
    /// Length in bytes of the token's text, where that is cheap to know.
    /// Used to size error spans.
    pub(crate) fn span_len(&self) -> usize {
        match &self.kind {
            TokenKind::Identifier(name) => name.len(),
            TokenKind::Slashdash => 2,
            _ => 1,
        }
    }
}
