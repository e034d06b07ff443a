//! Mapping your own types to and from KDL trees.
//!
//! This crate does not derive anything. Implement [`ToKdlNode`] and
//! [`FromKdlNode`] by hand for the types you want to store, and the `Vec`
//! impls give you whole documents for free:
//!
//! ```rust
//! use kdlite::{FromKdlDocument, FromKdlNode, KdlConversionError, KdlNode, ToKdlDocument, ToKdlNode};
//!
//! #[derive(Debug, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: i64,
//! }
//!
//! impl ToKdlNode for Server {
//!     fn to_kdl_node(&self) -> KdlNode {
//!         let mut node = KdlNode::new("server");
//!         node.push(self.host.as_str());
//!         node.insert("port", self.port);
//!         node
//!     }
//! }
//!
//! impl FromKdlNode for Server {
//!     fn from_kdl_node(node: &KdlNode) -> Result<Self, KdlConversionError> {
//!         KdlConversionError::expect_name(node, "server")?;
//!         Ok(Server {
//!             host: node.require_arg(0)?.try_into()?,
//!             port: node.require_prop("port")?.try_into()?,
//!         })
//!     }
//! }
//!
//! let servers = vec![Server { host: "a".into(), port: 1 }];
//! let text = servers.to_kdl_document().to_string();
//! assert_eq!(text, "server \"a\" port=1");
//! let back = Vec::<Server>::from_kdl_document(&text.parse()?)?;
//! assert_eq!(back, servers);
//! # Ok::<(), miette::Report>(())
//! ```

use miette::Diagnostic;
use thiserror::Error;

use crate::{KdlDocument, KdlNode, KdlValue};

/// Builds a [`KdlNode`] from a value.
pub trait ToKdlNode {
    /// Converts `self` into a node.
    fn to_kdl_node(&self) -> KdlNode;
}

/// Reads a value back out of a [`KdlNode`].
pub trait FromKdlNode: Sized {
    /// Converts `node` into a value, or explains why it can't.
    fn from_kdl_node(node: &KdlNode) -> Result<Self, KdlConversionError>;
}

/// Builds a whole [`KdlDocument`] from a value.
pub trait ToKdlDocument {
    /// Converts `self` into a document.
    fn to_kdl_document(&self) -> KdlDocument;
}

/// Reads a value back out of a whole [`KdlDocument`].
pub trait FromKdlDocument: Sized {
    /// Converts `doc` into a value, or explains why it can't.
    fn from_kdl_document(doc: &KdlDocument) -> Result<Self, KdlConversionError>;
}

impl<T: ToKdlNode> ToKdlDocument for Vec<T> {
    fn to_kdl_document(&self) -> KdlDocument {
        self.iter().map(ToKdlNode::to_kdl_node).collect()
    }
}

impl<T: FromKdlNode> FromKdlDocument for Vec<T> {
    fn from_kdl_document(doc: &KdlDocument) -> Result<Self, KdlConversionError> {
        doc.nodes().iter().map(T::from_kdl_node).collect()
    }
}

impl ToKdlNode for KdlNode {
    fn to_kdl_node(&self) -> KdlNode {
        self.clone()
    }
}

impl FromKdlNode for KdlNode {
    fn from_kdl_node(node: &KdlNode) -> Result<Self, KdlConversionError> {
        Ok(node.clone())
    }
}

/// Why a tree could not be turned into the requested type.
#[derive(Debug, Clone, Eq, PartialEq, Error, Diagnostic)]
pub enum KdlConversionError {
    /// A value had the wrong type.
    #[error("Expected {expected}, found {found}.")]
    #[diagnostic(help("Check the value's type in the document."))]
    TypeMismatch {
        /// What the conversion wanted.
        expected: &'static str,
        /// What it got.
        found: &'static str,
    },

    /// A node is missing a positional argument.
    #[error("Node `{node}` has no argument {index}.")]
    MissingArgument {
        /// Name of the node.
        node: String,
        /// Index of the missing argument.
        index: usize,
    },

    /// A node is missing a property.
    #[error("Node `{node}` has no property `{key}`.")]
    MissingProperty {
        /// Name of the node.
        node: String,
        /// Key of the missing property.
        key: String,
    },

    /// A node had a different name than the conversion expected.
    #[error("Expected a `{expected}` node, found `{found}`.")]
    UnexpectedNode {
        /// The name the conversion wanted.
        expected: String,
        /// The name it got.
        found: String,
    },
}

impl KdlConversionError {
    pub(crate) fn mismatch(expected: &'static str, value: &KdlValue) -> Self {
        KdlConversionError::TypeMismatch {
            expected,
            found: value.type_name(),
        }
    }

    /// Checks that `node` is called `name`.
    pub fn expect_name(node: &KdlNode, name: &str) -> Result<(), KdlConversionError> {
        if node.name() == name {
            Ok(())
        } else {
            Err(KdlConversionError::UnexpectedNode {
                expected: name.into(),
                found: node.name().into(),
            })
        }
    }
}
