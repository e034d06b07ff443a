use std::fmt::Display;

use num::ToPrimitive;

use crate::{KdlConversionError, KdlVersion};

/// A specific [KDL Value](https://github.com/kdl-org/kdl/blob/main/SPEC.md#value).
#[derive(Debug, Clone, PartialOrd)]
pub enum KdlValue {
    /// A [KDL String](https://github.com/kdl-org/kdl/blob/main/SPEC.md#string),
    /// whether it was written quoted, raw or as a bare identifier.
    String(String),

    /// A [KDL
    /// Number](https://github.com/kdl-org/kdl/blob/main/SPEC.md#number) without
    /// a fractional part or exponent, in any radix.
    Integer(i64),

    /// A [KDL
    /// Number](https://github.com/kdl-org/kdl/blob/main/SPEC.md#number) with a
    /// fractional part or exponent, or one of `#inf`, `#-inf`, `#nan`.
    Float(f64),

    /// A [KDL Boolean](https://github.com/kdl-org/kdl/blob/main/SPEC.md#boolean).
    Bool(bool),

    /// The [KDL Null Value](https://github.com/kdl-org/kdl/blob/main/SPEC.md#null).
    Null,
}

// NaN equals NaN.
impl PartialEq for KdlValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::String(l), Self::String(r)) => l == r,
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => l == r || (l.is_nan() && r.is_nan()),
            (Self::Bool(l), Self::Bool(r)) => l == r,
            (Self::Null, Self::Null) => true,
            _ => false,
        }
    }
}

impl Eq for KdlValue {}

impl std::hash::Hash for KdlValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            KdlValue::String(val) => val.hash(state),
            KdlValue::Integer(val) => val.hash(state),
            KdlValue::Float(val) => {
                let val = if val.is_nan() {
                    f64::NAN.to_bits()
                } else if *val == 0.0 {
                    0.0f64.to_bits()
                } else {
                    val.to_bits()
                };
                val.hash(state);
            }
            KdlValue::Bool(val) => val.hash(state),
            KdlValue::Null => {}
        }
    }
}

impl KdlValue {
    /// Returns `true` if the value is a [`KdlValue::String`].
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Bool`].
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `Some(&str)` if the `KdlValue` is a [`KdlValue::String`],
    /// otherwise returns `None`.
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an `i64`. Integers are returned as-is; finite
    /// floats are truncated towards zero (saturating at the `i64` bounds).
    /// Anything else, including infinities and NaN, is `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Float(f) if f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Returns the value as an `f64`. Integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => i.to_f64(),
            _ => None,
        }
    }

    /// Returns `Some(bool)` if the `KdlValue` is a [`KdlValue::Bool`], otherwise returns `None`.
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    /// A short name for the variant, for error messages.
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "boolean",
            Self::Null => "null",
        }
    }

    /// Writes this value as KDL source text for the given (concrete) version.
    pub(crate) fn write_kdl(
        &self,
        f: &mut impl std::fmt::Write,
        version: KdlVersion,
    ) -> std::fmt::Result {
        let hash = if version.has_bare_keywords() { "" } else { "#" };
        match self {
            Self::String(s) => write_quoted(f, s),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write_float(f, *value),
            Self::Bool(value) => write!(f, "{hash}{value}"),
            Self::Null => write!(f, "{hash}null"),
        }
    }
}

/// Values display as KDL 1.x source, the formatter's default dialect.
impl Display for KdlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_kdl(f, KdlVersion::V1)
    }
}

/// Writes `string` as a quoted KDL string, escaping anything that would not
/// read back verbatim.
pub(crate) fn write_quoted(f: &mut impl std::fmt::Write, string: &str) -> std::fmt::Result {
    write!(f, "\"")?;
    for char in string.chars() {
        match char {
            '\\' | '"' => write!(f, "\\{}", char)?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            '\u{08}' => write!(f, "\\b")?,
            '\u{0C}' => write!(f, "\\f")?,
            c if needs_unicode_escape(c) => write!(f, "\\u{{{:x}}}", c as u32)?,
            _ => write!(f, "{}", char)?,
        }
    }
    write!(f, "\"")
}

fn needs_unicode_escape(c: char) -> bool {
    c.is_control()
        || crate::identifier::is_newline(c)
        || crate::identifier::is_disallowed_unicode(c)
        || c == '\u{FEFF}'
}

/// Floats inside `[1e-4, 1e6)` print positionally, everything else in
/// exponent form. The output always reads back as a float.
fn write_float(f: &mut impl std::fmt::Write, value: f64) -> std::fmt::Result {
    if value.is_nan() {
        return write!(f, "#nan");
    }
    if value.is_infinite() {
        return write!(f, "{}", if value > 0.0 { "#inf" } else { "#-inf" });
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e6).contains(&magnitude) {
        let text = value.to_string();
        if text.contains('.') {
            write!(f, "{text}")
        } else {
            write!(f, "{text}.0")
        }
    } else {
        write!(f, "{value:e}")
    }
}

impl From<i64> for KdlValue {
    fn from(value: i64) -> Self {
        KdlValue::Integer(value)
    }
}

impl From<f64> for KdlValue {
    fn from(value: f64) -> Self {
        KdlValue::Float(value)
    }
}

impl From<&str> for KdlValue {
    fn from(value: &str) -> Self {
        KdlValue::String(value.to_string())
    }
}

impl From<String> for KdlValue {
    fn from(value: String) -> Self {
        KdlValue::String(value)
    }
}

impl From<bool> for KdlValue {
    fn from(value: bool) -> Self {
        KdlValue::Bool(value)
    }
}

impl<T> From<Option<T>> for KdlValue
where
    T: Into<KdlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => KdlValue::Null,
        }
    }
}

impl TryFrom<&KdlValue> for i64 {
    type Error = KdlConversionError;

    fn try_from(value: &KdlValue) -> Result<Self, Self::Error> {
        value
            .as_i64()
            .ok_or_else(|| KdlConversionError::mismatch("integer", value))
    }
}

impl TryFrom<&KdlValue> for f64 {
    type Error = KdlConversionError;

    fn try_from(value: &KdlValue) -> Result<Self, Self::Error> {
        value
            .as_f64()
            .ok_or_else(|| KdlConversionError::mismatch("float", value))
    }
}

impl TryFrom<&KdlValue> for bool {
    type Error = KdlConversionError;

    fn try_from(value: &KdlValue) -> Result<Self, Self::Error> {
        value
            .as_bool()
            .ok_or_else(|| KdlConversionError::mismatch("boolean", value))
    }
}

impl TryFrom<&KdlValue> for String {
    type Error = KdlConversionError;

    fn try_from(value: &KdlValue) -> Result<Self, Self::Error> {
        value
            .as_string()
            .map(String::from)
            .ok_or_else(|| KdlConversionError::mismatch("string", value))
    }
}
