use std::{
    collections::HashMap,
    fmt::Display,
    ops::{Index, IndexMut},
};

use crate::{
    fmt::Printer, FormatOptions, KdlConversionError, KdlIdentifier, KdlValue, KdlVersion,
    SourceLocation,
};

/// Represents an individual KDL
/// [`Node`](https://github.com/kdl-org/kdl/blob/main/SPEC.md#node) inside a
/// KDL Document.
///
/// Arguments keep their source order. Properties are keyed by name and each
/// key appears at most once.
#[derive(Debug, Clone, Default)]
pub struct KdlNode {
    pub(crate) name: String,
    pub(crate) ty: Option<KdlIdentifier>,
    pub(crate) arguments: Vec<KdlValue>,
    pub(crate) properties: HashMap<String, KdlValue>,
    pub(crate) children: Vec<KdlNode>,
    pub(crate) location: Option<SourceLocation>,
}

// Equality ignores `location`.
impl PartialEq for KdlNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.ty == other.ty
            && self.arguments == other.arguments
            && self.properties == other.properties
            && self.children == other.children
    }
}

impl Eq for KdlNode {}

impl KdlNode {
    /// Creates a new KdlNode with a given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Gets this node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets this node's name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Gets the node's type annotation, if any.
    pub fn ty(&self) -> Option<&KdlIdentifier> {
        self.ty.as_ref()
    }

    /// Gets a mutable reference to the node's type annotation.
    pub fn ty_mut(&mut self) -> &mut Option<KdlIdentifier> {
        &mut self.ty
    }

    /// Sets the node's type annotation.
    pub fn set_ty(&mut self, ty: impl Into<KdlIdentifier>) {
        self.ty = Some(ty.into());
    }

    /// Where the node started in the source it was parsed from. Always
    /// `None` for nodes built in code, and when the `span` feature is off.
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// Positional arguments, in source order.
    pub fn arguments(&self) -> &[KdlValue] {
        &self.arguments
    }

    /// Mutable access to the positional arguments.
    pub fn arguments_mut(&mut self) -> &mut Vec<KdlValue> {
        &mut self.arguments
    }

    /// The first argument, if there is one.
    pub fn first_argument(&self) -> Option<&KdlValue> {
        self.arguments.first()
    }

    /// Appends an argument.
    pub fn push(&mut self, value: impl Into<KdlValue>) {
        self.arguments.push(value.into());
    }

    /// Properties by key.
    pub fn properties(&self) -> &HashMap<String, KdlValue> {
        &self.properties
    }

    /// Mutable access to the properties.
    pub fn properties_mut(&mut self) -> &mut HashMap<String, KdlValue> {
        &mut self.properties
    }

    /// Gets a property's value.
    pub fn property(&self, key: &str) -> Option<&KdlValue> {
        self.properties.get(key)
    }

    /// Sets a property, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<KdlValue>) -> Option<KdlValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<KdlValue> {
        self.properties.remove(key)
    }

    /// Child nodes, in source order. Empty when the node has no children
    /// block.
    pub fn children(&self) -> &[KdlNode] {
        &self.children
    }

    /// Mutable access to the child nodes.
    pub fn children_mut(&mut self) -> &mut Vec<KdlNode> {
        &mut self.children
    }

    /// All children called `name`, in source order.
    pub fn children_named(&self, name: &str) -> Vec<&KdlNode> {
        self.children.iter().filter(|n| n.name == name).collect()
    }

    /// The first child called `name`.
    pub fn child_named(&self, name: &str) -> Option<&KdlNode> {
        self.children.iter().find(|n| n.name == name)
    }

    /// Gets the argument at `index`, or a [`KdlConversionError`] naming
    /// this node if there is none.
    pub fn require_arg(&self, index: usize) -> Result<&KdlValue, KdlConversionError> {
        self.arguments
            .get(index)
            .ok_or_else(|| KdlConversionError::MissingArgument {
                node: self.name.clone(),
                index,
            })
    }

    /// Gets the property `key`, or a [`KdlConversionError`] naming this node
    /// if there is none.
    pub fn require_prop(&self, key: &str) -> Result<&KdlValue, KdlConversionError> {
        self.properties
            .get(key)
            .ok_or_else(|| KdlConversionError::MissingProperty {
                node: self.name.clone(),
                key: key.into(),
            })
    }
}

impl Index<usize> for KdlNode {
    type Output = KdlValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.arguments[index]
    }
}

impl IndexMut<usize> for KdlNode {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.arguments[index]
    }
}

impl Index<&str> for KdlNode {
    type Output = KdlValue;

    fn index(&self, key: &str) -> &Self::Output {
        self.property(key).expect("No such property.")
    }
}

impl IndexMut<&str> for KdlNode {
    fn index_mut(&mut self, key: &str) -> &mut Self::Output {
        self.properties.entry(key.into()).or_insert(KdlValue::Null)
    }
}

/// Formats the node (and its children) with default [`FormatOptions`],
/// pinned to KDL v1 since a single node carries no `/- kdl-version` line.
/// Names spelled like `true`, `false` or `null` come out quoted.
impl Display for KdlNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let options = FormatOptions::default().version(KdlVersion::V1);
        Printer::new(&options, std::slice::from_ref(self)).write_node(f, self, 0)
    }
}
