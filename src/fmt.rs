//! Turning a document tree back into KDL text.

use std::fmt::{Display, Write};

use crate::{
    identifier::{is_reserved_word, write_identifier},
    KdlDocument, KdlNode, KdlVersion,
};

/// Settings for [`crate::format`].
///
/// ```rust
/// # use kdlite::{FormatOptions, KdlVersion};
/// let options = FormatOptions::default()
///     .indent("  ")
///     .use_semicolons(true)
///     .version(KdlVersion::V2);
/// assert_eq!(options.indent, "  ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormatOptions {
    /// Text repeated once per nesting level in front of each node.
    pub indent: String,
    /// End every node with `;`.
    pub use_semicolons: bool,
    /// Quote node names, property keys and type annotations even where a
    /// bare identifier would do.
    pub quote_all_identifiers: bool,
    /// Reserved. Lines are never wrapped.
    pub max_line_length: usize,
    /// Keyword dialect to write. [`KdlVersion::Auto`] picks one from the
    /// document.
    pub version: KdlVersion,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent: "    ".into(),
            use_semicolons: false,
            quote_all_identifiers: false,
            max_line_length: 0,
            version: KdlVersion::Auto,
        }
    }
}

impl FormatOptions {
    /// Sets [`FormatOptions::indent`].
    pub fn indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Sets [`FormatOptions::use_semicolons`].
    pub fn use_semicolons(mut self, use_semicolons: bool) -> Self {
        self.use_semicolons = use_semicolons;
        self
    }

    /// Sets [`FormatOptions::quote_all_identifiers`].
    pub fn quote_all_identifiers(mut self, quote_all_identifiers: bool) -> Self {
        self.quote_all_identifiers = quote_all_identifiers;
        self
    }

    /// Sets [`FormatOptions::max_line_length`].
    pub fn max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    /// Sets [`FormatOptions::version`].
    pub fn version(mut self, version: KdlVersion) -> Self {
        self.version = version;
        self
    }
}

/// Formats `doc` as KDL text.
///
/// Nodes go one per line with their properties sorted by key. There is no
/// trailing newline. When the output uses v2 keywords it starts with a
/// `/- kdl-version 2` line so it reads back the same way.
pub fn format(doc: &KdlDocument, options: &FormatOptions) -> String {
    Formatted::new(doc.nodes(), options).to_string()
}

/// Picks the dialect for one formatting call. A node named like a v1
/// keyword can only be written bare under v2.
fn resolve_version(nodes: &[KdlNode], requested: KdlVersion) -> KdlVersion {
    fn reserved_name(node: &KdlNode) -> bool {
        is_reserved_word(&node.name, KdlVersion::V1) || node.children.iter().any(reserved_name)
    }
    match requested {
        KdlVersion::Auto if nodes.iter().any(reserved_name) => KdlVersion::V2,
        KdlVersion::Auto => KdlVersion::V1,
        version => version,
    }
}

/// A list of root nodes rendered with a set of options.
#[derive(Debug)]
pub(crate) struct Formatted<'a> {
    nodes: &'a [KdlNode],
    printer: Printer<'a>,
}

impl<'a> Formatted<'a> {
    pub(crate) fn new(nodes: &'a [KdlNode], options: &'a FormatOptions) -> Self {
        Self {
            nodes,
            printer: Printer::new(options, nodes),
        }
    }
}

impl Display for Formatted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let version = self.printer.version;
        tracing::debug!(nodes = self.nodes.len(), %version, "formatting KDL document");
        if version == KdlVersion::V2 && !self.nodes.is_empty() {
            writeln!(f, "/- kdl-version 2")?;
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            self.printer.write_node(f, node, 0)?;
        }
        Ok(())
    }
}

/// Writes nodes under one resolved version.
#[derive(Debug)]
pub(crate) struct Printer<'a> {
    options: &'a FormatOptions,
    version: KdlVersion,
}

impl<'a> Printer<'a> {
    pub(crate) fn new(options: &'a FormatOptions, nodes: &[KdlNode]) -> Self {
        Self {
            options,
            version: resolve_version(nodes, options.version),
        }
    }

    fn identifier(&self, f: &mut impl Write, name: &str) -> std::fmt::Result {
        write_identifier(f, name, self.version, self.options.quote_all_identifiers)
    }

    pub(crate) fn write_node(
        &self,
        f: &mut impl Write,
        node: &KdlNode,
        depth: usize,
    ) -> std::fmt::Result {
        for _ in 0..depth {
            f.write_str(&self.options.indent)?;
        }
        if let Some(ty) = node.ty() {
            f.write_char('(')?;
            self.identifier(f, ty.value())?;
            f.write_char(')')?;
        }
        self.identifier(f, node.name())?;
        for arg in node.arguments() {
            f.write_char(' ')?;
            arg.write_kdl(f, self.version)?;
        }
        let mut properties: Vec<_> = node.properties().iter().collect();
        properties.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (key, value) in properties {
            f.write_char(' ')?;
            self.identifier(f, key)?;
            f.write_char('=')?;
            value.write_kdl(f, self.version)?;
        }
        if !node.children().is_empty() {
            f.write_str(" {\n")?;
            for child in node.children() {
                self.write_node(f, child, depth + 1)?;
                f.write_char('\n')?;
            }
            for _ in 0..depth {
                f.write_str(&self.options.indent)?;
            }
            f.write_char('}')?;
        }
        if self.options.use_semicolons {
            f.write_char(';')?;
        }
        Ok(())
    }
}
