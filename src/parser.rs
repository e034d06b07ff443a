//! Recursive-descent parser turning [`Lexer`] tokens into a [`KdlDocument`].

use crate::{
    KdlDocument, KdlError, KdlErrorKind, KdlNode, KdlValue, KdlVersion, Lexer, Token, TokenKind,
};

/// How many children blocks may be nested inside each other. Deeper input
/// is rejected with [`KdlErrorKind::NestingTooDeep`].
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser for a single KDL input.
///
/// ```rust
/// # use kdlite::{KdlParser, KdlVersion};
/// let mut parser = KdlParser::new("node #true");
/// let doc = parser.parse_document()?;
/// assert_eq!(doc.nodes().len(), 1);
/// assert_eq!(parser.version(), Some(KdlVersion::V2));
/// # Ok::<(), kdlite::KdlError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KdlParser<'a> {
    input: &'a str,
    requested: KdlVersion,
    lexer: Lexer<'a>,
    peeked: Option<Token>,
    depth: usize,
}

impl<'a> KdlParser<'a> {
    /// Creates a parser that detects the KDL version from the input.
    pub fn new(input: &'a str) -> Self {
        Self::with_version(input, KdlVersion::Auto)
    }

    /// Creates a parser for a specific KDL version.
    pub fn with_version(input: &'a str, version: KdlVersion) -> Self {
        Self {
            input,
            requested: version,
            lexer: Lexer::with_version(input, version),
            peeked: None,
            depth: 0,
        }
    }

    /// The version the input was read as. `None` until a marker or keyword
    /// literal decided it, which may be never.
    pub fn version(&self) -> Option<KdlVersion> {
        self.lexer.version()
    }

    /// Parses the entire input. The first problem aborts the parse.
    pub fn parse_document(&mut self) -> Result<KdlDocument, KdlError> {
        tracing::debug!(
            len = self.input.len(),
            requested = %self.requested,
            "parsing KDL document"
        );
        let nodes = self.parse_nodes(true, false)?;
        tracing::debug!(
            nodes = nodes.len(),
            version = ?self.version(),
            "parsed KDL document"
        );
        Ok(KdlDocument { nodes })
    }

    fn next(&mut self) -> Result<Token, KdlError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    fn push_back(&mut self, token: Token) {
        debug_assert!(self.peeked.is_none(), "only one token of lookahead");
        self.peeked = Some(token);
    }

    fn next_skipping_newlines(&mut self) -> Result<Token, KdlError> {
        loop {
            let token = self.next()?;
            if token.kind != TokenKind::Newline {
                return Ok(token);
            }
        }
    }

    fn unexpected(&self, token: &Token, expected: &'static str) -> KdlError {
        if token.kind == TokenKind::Eof && expected != "'}'" {
            return KdlError::end_of_file(self.input);
        }
        KdlError::new(
            self.input,
            KdlErrorKind::UnexpectedToken {
                found: token.kind.to_string(),
                expected,
            },
            token.location,
            token.span_len(),
        )
    }

    /// A children block whose `{` is `open`.
    fn parse_children(&mut self, build: bool, open: &Token) -> Result<Vec<KdlNode>, KdlError> {
        if self.depth == MAX_NESTING_DEPTH {
            return Err(KdlError::new(
                self.input,
                KdlErrorKind::NestingTooDeep(MAX_NESTING_DEPTH),
                open.location,
                open.span_len(),
            ));
        }
        self.depth += 1;
        let children = self.parse_nodes(build, true);
        self.depth -= 1;
        children
    }

    /// A run of nodes: the whole document, or a children block whose `{` has
    /// already been consumed. `nested` blocks end at (and consume) `}`.
    fn parse_nodes(&mut self, build: bool, nested: bool) -> Result<Vec<KdlNode>, KdlError> {
        let mut nodes = Vec::new();
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Newline => {}
                TokenKind::Eof if nested => return Err(self.unexpected(&token, "'}'")),
                TokenKind::Eof => return Ok(nodes),
                TokenKind::RBrace if nested => return Ok(nodes),
                TokenKind::Slashdash => {
                    let next = self.next_skipping_newlines()?;
                    self.push_back(next);
                    self.parse_node(false)?;
                }
                _ => {
                    self.push_back(token);
                    if let Some(node) = self.parse_node(build)? {
                        nodes.push(node);
                    }
                }
            }
        }
    }

    /// One node including its terminator. With `build` unset the node is
    /// checked for syntax only and `None` is returned.
    fn parse_node(&mut self, build: bool) -> Result<Option<KdlNode>, KdlError> {
        let first = self.next()?;
        let location = first.location;
        let (ty, token) = match first.kind {
            TokenKind::TypeAnnotation(ty) => (Some(ty), self.next()?),
            kind => (None, Token { kind, ..first }),
        };
        let name = match &token.kind {
            TokenKind::Identifier(name) | TokenKind::String(name) | TokenKind::RawString(name) => {
                name.clone()
            }
            _ => return Err(self.unexpected(&token, "node name")),
        };

        let mut node = KdlNode::new(name);
        if let Some(ty) = ty {
            node.set_ty(ty);
        }
        if cfg!(feature = "span") {
            node.location = Some(location);
        }

        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Newline | TokenKind::Semicolon => break,
                TokenKind::Eof | TokenKind::RBrace => {
                    self.push_back(token);
                    break;
                }
                TokenKind::LBrace => {
                    let children = self.parse_children(build, &token)?;
                    node.children_mut().extend(children);
                    self.parse_after_children()?;
                    break;
                }
                TokenKind::Slashdash => {
                    let next = self.next_skipping_newlines()?;
                    if next.kind == TokenKind::LBrace {
                        self.parse_children(false, &next)?;
                    } else {
                        self.require_space(&token)?;
                        self.push_back(next);
                        self.parse_entry(&mut node, false)?;
                    }
                }
                _ => {
                    self.require_space(&token)?;
                    self.push_back(token);
                    self.parse_entry(&mut node, build)?;
                }
            }
        }
        Ok(build.then_some(node))
    }

    /// After a children block only slashdashed blocks and the terminator may
    /// follow.
    fn parse_after_children(&mut self) -> Result<(), KdlError> {
        loop {
            let token = self.next()?;
            match token.kind {
                TokenKind::Newline | TokenKind::Semicolon => return Ok(()),
                TokenKind::Eof | TokenKind::RBrace => {
                    self.push_back(token);
                    return Ok(());
                }
                TokenKind::Slashdash => {
                    let next = self.next_skipping_newlines()?;
                    if next.kind != TokenKind::LBrace {
                        return Err(self.unexpected(&next, "'{'"));
                    }
                    self.parse_children(false, &next)?;
                }
                _ => return Err(self.unexpected(&token, "end of node")),
            }
        }
    }

    /// Entries must be separated from what comes before them by whitespace
    /// or a comment.
    fn require_space(&self, token: &Token) -> Result<(), KdlError> {
        if token.leading_trivia.is_empty() {
            Err(self.unexpected(token, "whitespace before it"))
        } else {
            Ok(())
        }
    }

    /// An argument or a `key=value` property.
    fn parse_entry(&mut self, node: &mut KdlNode, build: bool) -> Result<(), KdlError> {
        let first = self.next()?;
        let (annotated, token) = match first.kind {
            TokenKind::TypeAnnotation(_) => (true, self.next()?),
            _ => (false, first),
        };

        let key = match &token.kind {
            TokenKind::Identifier(key) | TokenKind::String(key) | TokenKind::RawString(key)
                if !annotated =>
            {
                Some(key.clone())
            }
            _ => None,
        };
        if let Some(key) = key {
            let equals = self.next()?;
            if equals.kind == TokenKind::Equals {
                let value = self.parse_property_value()?;
                if build {
                    if node.properties().contains_key(&key) {
                        return Err(KdlError::new(
                            self.input,
                            KdlErrorKind::DuplicateProperty(key),
                            token.location,
                            token.span_len(),
                        ));
                    }
                    node.insert(key, value);
                }
                return Ok(());
            }
            self.push_back(equals);
        }

        let Some(value) = value_of(&token.kind) else {
            let expected = if annotated { "value" } else { "argument or property" };
            return Err(self.unexpected(&token, expected));
        };
        if build {
            node.push(value);
        }
        Ok(())
    }

    fn parse_property_value(&mut self) -> Result<KdlValue, KdlError> {
        let mut token = self.next()?;
        if let TokenKind::TypeAnnotation(_) = token.kind {
            token = self.next()?;
        }
        value_of(&token.kind).ok_or_else(|| self.unexpected(&token, "value"))
    }
}

/// The value a token stands for in argument or property position. Bare
/// identifiers are strings.
fn value_of(kind: &TokenKind) -> Option<KdlValue> {
    match kind {
        TokenKind::Identifier(s) | TokenKind::String(s) | TokenKind::RawString(s) => {
            Some(KdlValue::String(s.clone()))
        }
        TokenKind::Integer(i) => Some(KdlValue::Integer(*i)),
        TokenKind::Float(x) => Some(KdlValue::Float(*x)),
        TokenKind::Bool(b) => Some(KdlValue::Bool(*b)),
        TokenKind::Null => Some(KdlValue::Null),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SourceLocation;

    fn parse(input: &str) -> Result<KdlDocument, KdlError> {
        KdlParser::new(input).parse_document()
    }

    fn names(doc: &KdlDocument) -> Vec<&str> {
        doc.nodes().iter().map(|node| node.name()).collect()
    }

    #[test]
    fn empty_documents() -> miette::Result<()> {
        assert!(parse("")?.nodes().is_empty());
        assert!(parse("\n\n  // nothing\n/* here */")?.nodes().is_empty());
        Ok(())
    }

    #[test]
    fn arguments_and_properties() -> miette::Result<()> {
        let doc = parse("node \"x\" k=1 \"y\"")?;
        let node = &doc.nodes()[0];
        assert_eq!(
            node.arguments(),
            &[KdlValue::from("x"), KdlValue::from("y")][..]
        );
        assert_eq!(node.properties().len(), 1);
        assert_eq!(node.property("k"), Some(&KdlValue::Integer(1)));
        Ok(())
    }

    #[test]
    fn terminators() -> miette::Result<()> {
        let doc = parse("a; b 1; c {\n}; d")?;
        assert_eq!(names(&doc), vec!["a", "b", "c", "d"]);
        let doc = parse("parent { child1; child2 }")?;
        assert_eq!(names(&doc), vec!["parent"]);
        assert_eq!(doc.nodes()[0].children().len(), 2);
        Ok(())
    }

    #[test]
    fn slashdash() -> miette::Result<()> {
        let doc = parse("a\n/-b\nc")?;
        assert_eq!(names(&doc), vec!["a", "c"]);

        let doc = parse("node \"keep\" /-\"skip\" 1")?;
        assert_eq!(
            doc.nodes()[0].arguments(),
            &[KdlValue::from("keep"), KdlValue::from(1i64)][..]
        );

        let doc = parse("node /-k=1 k=2 /-{ skipped { deeply } } {\n  kept\n} /-{ also skipped }")?;
        let node = &doc.nodes()[0];
        assert_eq!(node.property("k"), Some(&2i64.into()));
        assert_eq!(names_of(node.children()), vec!["kept"]);

        let doc = parse("/-\n  gone {\n  child\n}\nkept")?;
        assert_eq!(names(&doc), vec!["kept"]);
        Ok(())
    }

    fn names_of(nodes: &[KdlNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.name()).collect()
    }

    #[test]
    fn slashdashed_duplicates_are_ignored() -> miette::Result<()> {
        let doc = parse("node a=1 /-a=2\n/-other a=1 a=2")?;
        assert_eq!(doc.nodes()[0].property("a"), Some(&1i64.into()));
        Ok(())
    }

    #[test]
    fn duplicate_properties() {
        let err = parse("node a=1 a=2").unwrap_err();
        assert_eq!(err.kind, KdlErrorKind::DuplicateProperty("a".into()));
        assert_eq!(err.location, Some(SourceLocation::new(1, 10, 9)));
    }

    #[test]
    fn quoted_names_and_keys() -> miette::Result<()> {
        let doc = parse("\"my node\" \"a b\"=1 r\"raw\"=2")?;
        let node = &doc.nodes()[0];
        assert_eq!(node.name(), "my node");
        assert_eq!(node.property("a b"), Some(&1i64.into()));
        assert_eq!(node.property("raw"), Some(&2i64.into()));
        Ok(())
    }

    #[test]
    fn type_annotations() -> miette::Result<()> {
        let doc = parse("(author)node (u8)5 k=(date)\"2024\"")?;
        let node = &doc.nodes()[0];
        assert_eq!(node.ty().map(|ty| ty.value()), Some("author"));
        assert_eq!(node.arguments(), &[KdlValue::Integer(5)][..]);
        assert_eq!(node.property("k"), Some(&"2024".into()));
        Ok(())
    }

    #[test]
    fn node_locations() -> miette::Result<()> {
        let doc = parse("a\n  (t)b {\n    c\n  }")?;
        if cfg!(feature = "span") {
            assert_eq!(doc.nodes()[0].location(), Some(SourceLocation::new(1, 1, 0)));
            let b = &doc.nodes()[1];
            assert_eq!(b.location(), Some(SourceLocation::new(2, 3, 4)));
            assert_eq!(
                b.children()[0].location(),
                Some(SourceLocation::new(3, 5, 15))
            );
        } else {
            assert_eq!(doc.nodes()[0].location(), None);
        }
        Ok(())
    }

    #[test]
    fn missing_close_brace() {
        let err = parse("a {\n  b").unwrap_err();
        assert_eq!(
            err.kind,
            KdlErrorKind::UnexpectedToken {
                found: "end of file".into(),
                expected: "'}'",
            }
        );
        assert_eq!(err.location, Some(SourceLocation::new(2, 4, 7)));
    }

    #[test]
    fn bad_node_names() {
        let err = parse("5 a").unwrap_err();
        assert!(matches!(
            err.kind,
            KdlErrorKind::UnexpectedToken {
                expected: "node name",
                ..
            }
        ));
        let err = parse("a\n}").unwrap_err();
        assert_eq!(err.location, Some(SourceLocation::new(2, 1, 2)));
        let err = parse("(ty)").unwrap_err();
        assert_eq!(err.kind, KdlErrorKind::UnexpectedEndOfFile);
    }

    #[test]
    fn premature_end_of_file() {
        assert_eq!(
            parse("node key=").unwrap_err().kind,
            KdlErrorKind::UnexpectedEndOfFile
        );
        assert_eq!(
            parse("node /-").unwrap_err().kind,
            KdlErrorKind::UnexpectedEndOfFile
        );
    }

    #[test]
    fn junk_after_children() {
        let err = parse("a { b } c").unwrap_err();
        assert!(matches!(
            err.kind,
            KdlErrorKind::UnexpectedToken {
                expected: "end of node",
                ..
            }
        ));
    }

    #[test]
    fn nesting_limit() -> miette::Result<()> {
        let nested = |depth: usize| "a {".repeat(depth) + &"}".repeat(depth);

        let doc = parse(&nested(MAX_NESTING_DEPTH))?;
        let mut node = &doc.nodes()[0];
        let mut depth = 0;
        while let Some(child) = node.children().first() {
            node = child;
            depth += 1;
        }
        assert_eq!(depth, MAX_NESTING_DEPTH - 1);

        let err = parse(&nested(MAX_NESTING_DEPTH + 1)).unwrap_err();
        assert_eq!(err.kind, KdlErrorKind::NestingTooDeep(MAX_NESTING_DEPTH));
        let offset = 3 * MAX_NESTING_DEPTH + 2;
        assert_eq!(err.location, Some(SourceLocation::new(1, offset + 1, offset)));

        let err = parse(&format!("n /-{{{}}}", nested(MAX_NESTING_DEPTH))).unwrap_err();
        assert_eq!(err.kind, KdlErrorKind::NestingTooDeep(MAX_NESTING_DEPTH));
        Ok(())
    }

    #[test]
    fn entries_need_leading_space() -> miette::Result<()> {
        for input in ["n 1/-2", "n \"a\"\"b\"", "n r\"\"\"x\"\"\"", "n\"a\"", "n 1 k=1\"x\""] {
            let err = parse(input).unwrap_err();
            assert!(
                matches!(
                    err.kind,
                    KdlErrorKind::UnexpectedToken {
                        expected: "whitespace before it",
                        ..
                    }
                ),
                "{input:?}: {err}"
            );
        }

        let doc = parse("n 1 /*c*/2 \\\n 3 /-4 k=(t)5{ child }")?;
        let node = &doc.nodes()[0];
        assert_eq!(
            node.arguments(),
            &[KdlValue::Integer(1), KdlValue::Integer(2), KdlValue::Integer(3)][..]
        );
        assert_eq!(node.children().len(), 1);
        Ok(())
    }

    #[test]
    fn stray_equals() {
        let err = parse("node = 1").unwrap_err();
        assert_eq!(
            err.kind,
            KdlErrorKind::UnexpectedToken {
                found: "'='".into(),
                expected: "argument or property",
            }
        );
    }
}
