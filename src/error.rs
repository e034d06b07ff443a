use std::sync::Arc;

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::SourceLocation;

/// The toplevel `Error` type for KDL: this is returned when a KDL document
/// failed to parse.
///
/// Parsing stops at the first problem, so there is exactly one error per
/// failed call. The error implements [`miette::Diagnostic`] and can be used
/// to display detailed, pretty-printed diagnostic messages when using
/// [`miette::Result`] and the `"fancy"` feature flag for `miette`:
///
/// ```no_run
/// fn main() -> miette::Result<()> {
///     "foo \"bar".parse::<kdlite::KdlDocument>()?;
///     Ok(())
/// }
/// ```
///
/// This will display a message like:
/// ```text
/// Error:
///   × line 1, column 5: Unterminated string.
///    ╭────
///  1 │ foo "bar
///    ·     ┬
///    ·     ╰── string starts here
///    ╰────
///   help: Close the string with a matching `"`.
/// ```
#[derive(Debug, Diagnostic, Clone, Eq, PartialEq, Error)]
#[error("{}{kind}", .location.map(|l| format!("{l}: ")).unwrap_or_default())]
pub struct KdlError {
    /// Original input that this failure came from.
    #[source_code]
    pub input: Arc<String>,

    /// Byte span of the offending text.
    #[label("{}", label.unwrap_or("here"))]
    pub span: SourceSpan,

    /// Label text for this span. Defaults to `"here"`.
    pub label: Option<&'static str>,

    /// Suggestion for fixing the problem.
    #[help]
    pub help: Option<String>,

    /// Where the problem was found. `None` when the input ended early.
    pub location: Option<SourceLocation>,

    /// What went wrong.
    pub kind: KdlErrorKind,
}

impl KdlError {
    pub(crate) fn new(input: &str, kind: KdlErrorKind, location: SourceLocation, len: usize) -> Self {
        let len = len.min(input.len().saturating_sub(location.offset));
        KdlError {
            input: Arc::new(input.into()),
            span: location.span(len),
            label: kind.label(),
            help: Some(kind.help().into()),
            location: Some(location),
            kind,
        }
    }

    pub(crate) fn end_of_file(input: &str) -> Self {
        let kind = KdlErrorKind::UnexpectedEndOfFile;
        KdlError {
            input: Arc::new(input.into()),
            span: SourceSpan::new(input.len().into(), 0),
            label: kind.label(),
            help: Some(kind.help().into()),
            location: None,
            kind,
        }
    }
}

/// A type representing the different kinds of errors that can occur while
/// reading KDL text.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum KdlErrorKind {
    /// A character that cannot start any token.
    #[error("Unexpected character {0:?}.")]
    UnexpectedCharacter(char),

    /// A well-formed token in a place the grammar does not allow it.
    #[error("Unexpected {found}, expected {expected}.")]
    UnexpectedToken {
        /// Description of the token that was found.
        found: String,
        /// Description of what the parser wanted instead.
        expected: &'static str,
    },

    /// A quoted or raw string with no closing delimiter on its line (or
    /// anywhere, for multi-line strings).
    #[error("Unterminated string.")]
    UnterminatedString,

    /// A `/*` block comment whose nesting never closes.
    #[error("Unterminated block comment.")]
    UnterminatedComment,

    /// A number literal that does not follow any numeric syntax, or overflows
    /// a 64-bit integer.
    #[error("Invalid number {0:?}.")]
    InvalidNumber(String),

    /// An unknown or malformed `\` escape inside a quoted string.
    #[error("Invalid escape sequence {0:?}.")]
    InvalidEscape(String),

    /// An identifier or `#` keyword that is not allowed.
    #[error("Invalid identifier {0:?}.")]
    InvalidIdentifier(String),

    /// The same property key appears twice on one node.
    #[error("Duplicate property {0:?}.")]
    DuplicateProperty(String),

    /// Children blocks nested deeper than [`crate::MAX_NESTING_DEPTH`].
    #[error("Nodes are nested more than {0} levels deep.")]
    NestingTooDeep(usize),

    /// The input ended in the middle of a construct.
    #[error("Unexpected end of file.")]
    UnexpectedEndOfFile,

    /// The bytes handed to [`crate::parse_bytes`] are not UTF-8.
    #[error("Input is not valid UTF-8.")]
    InvalidUtf8,
}

impl KdlErrorKind {
    fn label(&self) -> Option<&'static str> {
        use KdlErrorKind::*;
        match self {
            UnterminatedString => Some("string starts here"),
            UnterminatedComment => Some("comment starts here"),
            DuplicateProperty(_) => Some("duplicate key"),
            UnexpectedEndOfFile => Some("input ends here"),
            _ => None,
        }
    }

    fn help(&self) -> &'static str {
        use KdlErrorKind::*;
        match self {
            UnexpectedCharacter(_) => {
                "Quote the text if it is meant to be part of a string or identifier."
            }
            UnexpectedToken { .. } => "Check for a missing node terminator or a stray token.",
            UnterminatedString => "Close the string with a matching `\"`.",
            UnterminatedComment => "Every `/*` needs a matching `*/`, including nested ones.",
            InvalidNumber(_) => {
                "Numbers are decimal (with optional fraction and exponent) or use a 0x, 0o or 0b prefix, and must fit in 64 bits."
            }
            InvalidEscape(_) => {
                "Valid escapes are \\n \\r \\t \\\\ \\\" \\/ \\b \\f \\s and \\u{XXXXXX}."
            }
            InvalidIdentifier(_) => "Keywords are #true, #false, #null, #inf, #-inf and #nan.",
            DuplicateProperty(_) => "Each property key may appear only once per node.",
            NestingTooDeep(_) => "Flatten the document or split it into several documents.",
            UnexpectedEndOfFile => "The input stops in the middle of a node.",
            InvalidUtf8 => "KDL documents must be encoded as UTF-8.",
        }
    }
}
