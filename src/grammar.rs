//! Small `winnow` grammars for token bodies whose extent the lexer already
//! knows: numeric literals and the `/- kdl-version N` document marker.

use num::ToPrimitive;
use winnow::{
    combinator::{alt, not, opt, preceded},
    prelude::*,
    token::{one_of, take_while},
};

use crate::{
    identifier::{is_identifier_char, is_unicode_space},
    KdlVersion,
};

/// A successfully parsed numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Integer(i64),
    Float(f64),
}

/// Parses `text` as one complete number literal. `None` means the text is not
/// a valid number (bad digits for the radix, dangling `.`, overflow, …).
pub(crate) fn number(text: &str) -> Option<Number> {
    alt((radix_integer, decimal)).parse(text).ok()
}

/// Recognizes a version marker at the very start of `input`, returning the
/// version and the number of bytes it spans.
pub(crate) fn version_marker(input: &str) -> Option<(KdlVersion, usize)> {
    let mut rest = input;
    let version = marker.parse_next(&mut rest).ok()?;
    Some((version, input.len() - rest.len()))
}

/// `marker := '/-' unicode-space* 'kdl-version' unicode-space+ ('1' | '2')`
fn marker(input: &mut &str) -> PResult<KdlVersion> {
    (
        "/-",
        take_while(0.., is_unicode_space),
        "kdl-version",
        take_while(1.., is_unicode_space),
        alt(('1'.value(KdlVersion::V1), '2'.value(KdlVersion::V2))),
        not(one_of(is_identifier_char)),
    )
        .map(|(_, _, _, _, version, _)| version)
        .parse_next(input)
}

/// ```text
/// hex := sign? '0x' hex-digit (hex-digit | '_')*
/// octal := sign? '0o' [0-7] [0-7_]*
/// binary := sign? '0b' ('0' | '1') ('0' | '1' | '_')*
/// ```
fn radix_integer(input: &mut &str) -> PResult<Number> {
    (
        signum,
        alt((
            preceded(alt(("0x", "0X")), digits(16)).map(|d| (16u32, d)),
            preceded(alt(("0o", "0O")), digits(8)).map(|d| (8u32, d)),
            preceded(alt(("0b", "0B")), digits(2)).map(|d| (2u32, d)),
        )),
    )
        .verify_map(|(positive, (radix, digits))| integer_from_digits(digits, radix, positive))
        .map(Number::Integer)
        .parse_next(input)
}

/// ```text
/// decimal := sign? integer ('.' integer)? exponent?
/// exponent := ('e' | 'E') sign? integer
/// ```
///
/// Without a fraction or exponent the result is an integer.
fn decimal(input: &mut &str) -> PResult<Number> {
    (
        signum,
        digits(10),
        opt(preceded('.', digits(10))),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digits(10))),
    )
        .with_taken()
        .verify_map(|((_, _, fraction, exponent), text)| {
            let text = text.replace('_', "");
            if fraction.is_some() || exponent.is_some() {
                text.parse::<f64>().ok().map(Number::Float)
            } else {
                text.parse::<i64>().ok().map(Number::Integer)
            }
        })
        .parse_next(input)
}

/// `digit (digit | '_')*` for the given radix.
fn digits<'i>(radix: u32) -> impl Parser<&'i str, &'i str, winnow::error::ContextError> {
    (
        one_of(move |c: char| c.is_digit(radix)),
        take_while(0.., move |c: char| c.is_digit(radix) || c == '_'),
    )
        .take()
}

fn signum(input: &mut &str) -> PResult<bool> {
    opt(one_of(['+', '-']))
        .map(|sign| sign != Some('-'))
        .parse_next(input)
}

fn integer_from_digits(digits: &str, radix: u32, positive: bool) -> Option<i64> {
    let magnitude = i128::from_str_radix(&digits.replace('_', ""), radix).ok()?;
    let value = if positive { magnitude } else { -magnitude };
    value.to_i64()
}
