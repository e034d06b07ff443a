//! `kdlite` reads and writes the [KDL Document Language](https://kdl.dev), a
//! node-based, human-friendly configuration and serialization format.
//!
//! Text goes through a [`Lexer`] and a recursive-descent [`KdlParser`] into a
//! plain [`KdlDocument`] tree, and [`format`] turns a tree back into
//! canonically formatted text. Comments and original spelling are not kept;
//! if you need lossless editing, look at the [`kdl`](https://crates.io/crates/kdl)
//! crate instead.
//!
//! ## Example
//!
//! ```rust
//! use kdlite::{FormatOptions, KdlDocument, KdlValue};
//!
//! let doc_str = r#"
//! hello 1 2 3
//!
//! // a comment
//! world prop="value" {
//!     child 1
//!     child 2
//! }
//! "#;
//!
//! let doc: KdlDocument = doc_str.parse().expect("failed to parse KDL");
//!
//! assert_eq!(
//!     doc.get_args("hello"),
//!     vec![&KdlValue::Integer(1), &KdlValue::Integer(2), &KdlValue::Integer(3)]
//! );
//!
//! assert_eq!(
//!     doc.node_named("world").map(|node| &node["prop"]),
//!     Some(&"value".into())
//! );
//!
//! assert_eq!(
//!     kdlite::format(&doc, &FormatOptions::default().indent("  ")),
//!     "hello 1 2 3\nworld prop=\"value\" {\n  child 1\n  child 2\n}"
//! );
//! ```
//!
//! ## KDL versions
//!
//! KDL 1 spells booleans and null `true`, `false` and `null`; KDL 2 spells
//! them `#true`, `#false` and `#null` and treats the bare words as plain
//! identifiers. By default every call works out which one it is looking at:
//!
//! * A `/- kdl-version 1` or `/- kdl-version 2` line at the very start of the
//!   input decides it outright.
//! * Otherwise the first keyword literal decides it, and the choice sticks
//!   for the rest of the input.
//!
//! Use [`parse_with_version`] or [`FormatOptions::version`] to pick one
//! explicitly.
//!
//! ```rust
//! use kdlite::{KdlParser, KdlVersion};
//!
//! let mut parser = KdlParser::new("node true\nother #false");
//! parser.parse_document()?;
//! assert_eq!(parser.version(), Some(KdlVersion::V1));
//! # Ok::<(), kdlite::KdlError>(())
//! ```
//!
//! ## Error Reporting
//!
//! [`KdlError`] implements [`miette::Diagnostic`] and can be used to display
//! detailed, pretty-printed diagnostic messages when using [`miette::Result`]
//! and the `"fancy"` feature flag for `miette`:
//!
//! ```toml
//! # Cargo.toml
//! [dependencies]
//! miette = { version = "x.y.z", features = ["fancy"] }
//! ```
//!
//! ```no_run
//! fn main() -> miette::Result<()> {
//!     "node a=1 a=2".parse::<kdlite::KdlDocument>()?;
//!     Ok(())
//! }
//! ```
//!
//! This will display a message like:
//! ```text
//! Error:
//!   × line 1, column 10: Duplicate property "a".
//!    ╭────
//!  1 │ node a=1 a=2
//!    ·          ┬
//!    ·          ╰── duplicate key
//!    ╰────
//!   help: Each property key may appear only once per node.
//! ```
//!
//! ## Quirks
//!
//! ### Properties
//!
//! Properties live in a map, so their source order is not kept and the
//! formatter writes them sorted by key. A key that appears twice on one node
//! is an error.
//!
//! ### Numbers
//!
//! * Numbers without a fraction or exponent are [`i64`]; anything that does
//!   not fit is an error rather than being silently widened.
//! * Numbers with a fraction or exponent are [`f64`].
//! * `#inf`, `#-inf` and `#nan` are accepted and written under both versions.
//!
//! ### Type annotations
//!
//! Node type annotations are kept. Annotations on values are accepted and
//! dropped.
//!
//! ## Logging
//!
//! Parsing and formatting emit [`tracing`](https://docs.rs/tracing) events at
//! `debug` and `trace` level. Nothing is printed unless you install a
//! subscriber.
//!
//! ## License
//!
//! The code in this repository is covered by the Apache-2.0 License.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub, rust_2018_idioms)]
#![cfg_attr(test, deny(warnings))]
#![doc(html_favicon_url = "https://kdl.dev/favicon.ico")]
#![doc(html_logo_url = "https://kdl.dev/logo.svg")]

pub use convert::*;
pub use document::*;
pub use error::*;
pub use fmt::{format, FormatOptions};
pub use identifier::*;
pub use lexer::Lexer;
pub use location::*;
pub use node::*;
pub use parser::{KdlParser, MAX_NESTING_DEPTH};
pub use token::*;
pub use value::*;
pub use version::KdlVersion;

mod convert;
mod document;
mod error;
mod fmt;
mod grammar;
mod identifier;
mod lexer;
mod location;
mod node;
mod parser;
mod token;
mod value;
mod version;

/// Parses a KDL document, detecting the KDL version from the input.
pub fn parse(input: &str) -> Result<KdlDocument, KdlError> {
    parse_with_version(input, KdlVersion::Auto)
}

/// Parses a KDL document as a specific KDL version.
pub fn parse_with_version(input: &str, version: KdlVersion) -> Result<KdlDocument, KdlError> {
    KdlParser::with_version(input, version).parse_document()
}

/// Parses a KDL document from raw bytes, such as the contents of a file.
/// Bytes that are not UTF-8 are reported as [`KdlErrorKind::InvalidUtf8`]
/// at the first bad byte.
pub fn parse_bytes(bytes: &[u8], version: KdlVersion) -> Result<KdlDocument, KdlError> {
    match std::str::from_utf8(bytes) {
        Ok(input) => parse_with_version(input, version),
        Err(err) => {
            let valid = String::from_utf8_lossy(&bytes[..err.valid_up_to()]);
            let location = SourceLocation::end_of(&valid);
            let input = String::from_utf8_lossy(bytes);
            Err(KdlError::new(
                &input,
                KdlErrorKind::InvalidUtf8,
                location,
                char::REPLACEMENT_CHARACTER.len_utf8(),
            ))
        }
    }
}
