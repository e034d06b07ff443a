use std::fmt::Display;

use crate::KdlVersion;

/// Represents a KDL
/// [Identifier](https://github.com/kdl-org/kdl/blob/main/SPEC.md#identifier)
/// used as a type annotation, as in `(date)"2024-01-01"` or `(author)node`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KdlIdentifier {
    pub(crate) value: String,
}

impl KdlIdentifier {
    /// Creates a new identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Gets the string value for this identifier.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Sets the string value for this identifier.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Length of the identifier's value, in bytes.
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Returns true if the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl Display for KdlIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write_identifier(f, &self.value, KdlVersion::V1, false)
    }
}

impl From<&str> for KdlIdentifier {
    fn from(value: &str) -> Self {
        KdlIdentifier::new(value)
    }
}

impl From<String> for KdlIdentifier {
    fn from(value: String) -> Self {
        KdlIdentifier { value }
    }
}

impl From<KdlIdentifier> for String {
    fn from(value: KdlIdentifier) -> Self {
        value.value
    }
}

/// Line breaks. `\r\n` counts as one.
pub(crate) fn is_newline(c: char) -> bool {
    matches!(
        c,
        '\u{000A}' | '\u{000D}' | '\u{0085}' | '\u{000C}' | '\u{2028}' | '\u{2029}'
    )
}

static UNICODE_SPACES: [char; 20] = [
    '\u{0009}', '\u{000B}', '\u{0020}', '\u{00A0}', '\u{1680}', '\u{2000}', '\u{2001}', '\u{2002}',
    '\u{2003}', '\u{2004}', '\u{2005}', '\u{2006}', '\u{2007}', '\u{2008}', '\u{2009}', '\u{200A}',
    '\u{202F}', '\u{205F}', '\u{3000}', '\u{FEFF}',
];

/// Non-newline whitespace, including the BOM.
pub(crate) fn is_unicode_space(c: char) -> bool {
    UNICODE_SPACES.contains(&c)
}

static DISALLOWED_IDENT_CHARS: [char; 15] = [
    '\\', '/', '(', ')', '{', '}', '[', ']', '<', '>', ';', '"', '#', '=', ',',
];

/// Code points that may not appear literally anywhere in a document.
pub(crate) fn is_disallowed_unicode(c: char) -> bool {
    matches!(c,
        '\u{0000}'..='\u{0008}'
        | '\u{000E}'..='\u{001F}'
        | '\u{007F}'
        | '\u{200E}'..='\u{200F}'
        | '\u{202A}'..='\u{202E}'
        | '\u{2066}'..='\u{2069}'
    )
}

pub(crate) fn is_identifier_char(c: char) -> bool {
    !(is_newline(c)
        || is_unicode_space(c)
        || is_disallowed_unicode(c)
        || DISALLOWED_IDENT_CHARS.contains(&c))
}

pub(crate) fn is_initial_char(c: char) -> bool {
    !c.is_ascii_digit() && is_identifier_char(c)
}

/// Words that need quoting when used as an identifier under `version`.
pub(crate) fn is_reserved_word(word: &str, version: KdlVersion) -> bool {
    version.has_bare_keywords() && matches!(word, "true" | "false" | "null")
}

/// Whether `name` would lex back as a single bare identifier token under
/// `version`.
pub(crate) fn is_bare_identifier(name: &str, version: KdlVersion) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_initial_char(first) {
        return false;
    }
    if matches!(first, '+' | '-') && name[1..].starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    chars.all(is_identifier_char) && !is_reserved_word(name, version)
}

/// Writes `name` bare when that is unambiguous, as a quoted string otherwise.
pub(crate) fn write_identifier(
    f: &mut impl std::fmt::Write,
    name: &str,
    version: KdlVersion,
    quote: bool,
) -> std::fmt::Result {
    if !quote && is_bare_identifier(name, version) {
        write!(f, "{name}")
    } else {
        crate::value::write_quoted(f, name)
    }
}
