use std::{fmt::Display, str::FromStr};

use crate::{fmt::Formatted, FormatOptions, KdlError, KdlNode, KdlValue};

/// Represents a KDL
/// [`Document`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#document):
/// an ordered list of root nodes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KdlDocument {
    pub(crate) nodes: Vec<KdlNode>,
}

impl KdlDocument {
    /// Creates a new, empty Document.
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a reference to this document's nodes.
    pub fn nodes(&self) -> &[KdlNode] {
        &self.nodes
    }

    /// Returns a mutable reference to this document's nodes.
    pub fn nodes_mut(&mut self) -> &mut Vec<KdlNode> {
        &mut self.nodes
    }

    /// Gets the first node with a matching name.
    pub fn node_named(&self, name: &str) -> Option<&KdlNode> {
        self.nodes.iter().find(move |n| n.name() == name)
    }

    /// Gets a mutable reference to the first node with a matching name.
    pub fn node_named_mut(&mut self, name: &str) -> Option<&mut KdlNode> {
        self.nodes.iter_mut().find(move |n| n.name() == name)
    }

    /// Gets every node with a matching name, in document order.
    pub fn nodes_named(&self, name: &str) -> Vec<&KdlNode> {
        self.nodes.iter().filter(move |n| n.name() == name).collect()
    }

    /// Gets the first argument (value) of the first node with a matching
    /// name. This is a shorthand utility for cases where a document is being
    /// used as a key/value store.
    ///
    /// # Examples
    ///
    /// Given a document like this:
    /// ```kdl
    /// foo 1
    /// bar false
    /// ```
    ///
    /// You can fetch the value of `foo` in a single call like this:
    /// ```rust
    /// # use kdlite::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo 1\nbar false".parse().unwrap();
    /// assert_eq!(doc.get_arg("foo"), Some(&KdlValue::Integer(1)));
    /// ```
    pub fn get_arg(&self, name: &str) -> Option<&KdlValue> {
        self.node_named(name).and_then(|node| node.first_argument())
    }

    /// Gets all arguments of the first node with a matching name. This is a
    /// shorthand utility for cases where a document is being used as a
    /// key/value store and the value is expected to be array-ish.
    ///
    /// If the node has no arguments, or doesn't exist, this returns an empty
    /// vector.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use kdlite::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo 1 2 3\nbar false".parse().unwrap();
    /// assert_eq!(
    ///     doc.get_args("foo"),
    ///     vec![&KdlValue::Integer(1), &KdlValue::Integer(2), &KdlValue::Integer(3)]
    /// );
    /// ```
    pub fn get_args(&self, name: &str) -> Vec<&KdlValue> {
        self.node_named(name)
            .map(|node| node.arguments().iter().collect())
            .unwrap_or_default()
    }

    /// This utility makes it easy to interact with a KDL convention where
    /// child nodes named `-` are treated as array-ish values.
    ///
    /// # Examples
    ///
    /// Given a document like this:
    /// ```kdl
    /// foo {
    ///   - 1
    ///   - 2
    ///   - false
    /// }
    /// ```
    ///
    /// You can fetch the dashed child values of `foo` in a single call like this:
    /// ```rust
    /// # use kdlite::{KdlDocument, KdlValue};
    /// # let doc: KdlDocument = "foo {\n - 1\n - 2\n - false\n}".parse().unwrap();
    /// assert_eq!(
    ///     doc.get_dash_vals("foo"),
    ///     vec![&KdlValue::Integer(1), &KdlValue::Integer(2), &KdlValue::Bool(false)]
    /// );
    /// ```
    pub fn get_dash_vals(&self, name: &str) -> Vec<&KdlValue> {
        self.node_named(name)
            .map(|node| node.children())
            .unwrap_or_default()
            .iter()
            .filter(|child| child.name() == "-")
            .filter_map(|child| child.first_argument())
            .collect()
    }
}

/// Formats the document with default [`FormatOptions`].
impl Display for KdlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Formatted::new(&self.nodes, &FormatOptions::default()).fmt(f)
    }
}

impl FromStr for KdlDocument {
    type Err = KdlError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        crate::parse(input)
    }
}

impl From<Vec<KdlNode>> for KdlDocument {
    fn from(nodes: Vec<KdlNode>) -> Self {
        KdlDocument { nodes }
    }
}

impl FromIterator<KdlNode> for KdlDocument {
    fn from_iter<T: IntoIterator<Item = KdlNode>>(iter: T) -> Self {
        KdlDocument {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for KdlDocument {
    type Item = KdlNode;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a KdlDocument {
    type Item = &'a KdlNode;
    type IntoIter = std::slice::Iter<'a, KdlNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
