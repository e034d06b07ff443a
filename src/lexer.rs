//! Pull-based tokenizer for KDL text.
//!
//! The lexer hands out one [`Token`] per call to [`Lexer::next_token`]. All
//! whitespace, comments and line continuations in front of a token are kept
//! verbatim in [`Token::leading_trivia`]. The lexer also owns the version
//! state of a parse: a leading `/- kdl-version N` marker or the first keyword
//! literal decides between the v1 and v2 spellings of `true`, `false` and
//! `null`.

use crate::{
    grammar::{self, Number},
    identifier::{is_identifier_char, is_initial_char, is_newline, is_unicode_space},
    version::VersionLock,
    KdlError, KdlErrorKind, KdlVersion, SourceLocation, Token, TokenKind,
};

/// Tokenizer over a single input string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    position: SourceLocation,
    version: VersionLock,
    at_line_start: bool,
    started: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer that detects the KDL version from the input.
    pub fn new(input: &'a str) -> Self {
        Self::with_version(input, KdlVersion::Auto)
    }

    /// Creates a lexer for a specific KDL version. With [`KdlVersion::Auto`]
    /// the version is detected from the input.
    pub fn with_version(input: &'a str, version: KdlVersion) -> Self {
        Self {
            input,
            position: SourceLocation::START,
            version: VersionLock::new(version),
            at_line_start: true,
            started: false,
        }
    }

    /// The version keywords are being read as, if it has been decided yet.
    pub fn version(&self) -> Option<KdlVersion> {
        self.version.get()
    }

    /// Lexes the whole input, up to and including the [`TokenKind::Eof`]
    /// token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, KdlError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    /// Returns the next token. Once the input is exhausted this keeps
    /// returning [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Result<Token, KdlError> {
        let mut trivia = String::new();
        if !self.started {
            self.started = true;
            self.document_start(&mut trivia);
        }
        self.skip_trivia(&mut trivia)?;
        let location = self.location();
        let kind = self.lex_token(location)?;
        self.at_line_start = kind == TokenKind::Newline;
        Ok(Token {
            kind,
            location,
            leading_trivia: trivia,
        })
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn location(&self) -> SourceLocation {
        self.position
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position.advance(c, self.peek_nth(1));
        Some(c)
    }

    fn bump_into(&mut self, out: &mut String) -> Option<char> {
        let c = self.bump()?;
        out.push(c);
        Some(c)
    }

    /// Consumes one line break, treating `\r\n` as a unit.
    fn bump_newline(&mut self, out: &mut String) {
        if self.bump_into(out) == Some('\r') && self.peek() == Some('\n') {
            self.bump_into(out);
        }
    }

    fn bump_str(&mut self, text: &str, out: &mut String) {
        let end = self.position.offset + text.len();
        while self.position.offset < end && self.bump_into(out).is_some() {}
    }

    fn take_word(&mut self) -> &'a str {
        let start = self.position.offset;
        while self.peek().is_some_and(is_identifier_char) {
            self.bump();
        }
        &self.input[start..self.position.offset]
    }

    fn error(&self, kind: KdlErrorKind, location: SourceLocation, len: usize) -> KdlError {
        KdlError::new(self.input, kind, location, len)
    }

    /// BOM and version marker. Both only count at the very start of input.
    fn document_start(&mut self, trivia: &mut String) {
        if self.peek() == Some('\u{FEFF}') {
            self.bump_into(trivia);
        }
        if !self.version.is_open() {
            return;
        }
        if let Some((version, len)) = grammar::version_marker(self.rest()) {
            let marker = &self.rest()[..len];
            self.bump_str(marker, trivia);
            self.version.lock(version, "version marker");
        }
    }

    fn skip_trivia(&mut self, trivia: &mut String) -> Result<(), KdlError> {
        loop {
            let rest = self.rest();
            match self.peek() {
                Some(c) if is_unicode_space(c) => {
                    self.bump_into(trivia);
                }
                Some('/') if rest.starts_with("//") => {
                    self.line_comment(trivia);
                    // A line holding nothing but a comment yields no newline
                    // token.
                    if self.at_line_start && self.peek().is_some_and(is_newline) {
                        self.bump_newline(trivia);
                    }
                }
                Some('/') if rest.starts_with("/*") => self.block_comment(trivia)?,
                Some('\\') => self.line_continuation(trivia)?,
                _ => return Ok(()),
            }
        }
    }

    /// `//` up to, not including, the end of the line.
    fn line_comment(&mut self, trivia: &mut String) {
        while self.peek().is_some_and(|c| !is_newline(c)) {
            self.bump_into(trivia);
        }
    }

    fn block_comment(&mut self, trivia: &mut String) -> Result<(), KdlError> {
        let start = self.location();
        self.bump_str("/*", trivia);
        let mut depth = 1usize;
        while depth > 0 {
            let rest = self.rest();
            if rest.starts_with("/*") {
                self.bump_str("/*", trivia);
                depth += 1;
            } else if rest.starts_with("*/") {
                self.bump_str("*/", trivia);
                depth -= 1;
            } else if self.bump_into(trivia).is_none() {
                return Err(self.error(KdlErrorKind::UnterminatedComment, start, 2));
            }
        }
        Ok(())
    }

    /// `\` followed by optional spaces and comments, then a line break or the
    /// end of input.
    fn line_continuation(&mut self, trivia: &mut String) -> Result<(), KdlError> {
        let start = self.location();
        self.bump_into(trivia);
        loop {
            let rest = self.rest();
            match self.peek() {
                Some(c) if is_unicode_space(c) => {
                    self.bump_into(trivia);
                }
                Some('/') if rest.starts_with("/*") => self.block_comment(trivia)?,
                Some('/') if rest.starts_with("//") => self.line_comment(trivia),
                _ => break,
            }
        }
        match self.peek() {
            None => Ok(()),
            Some(c) if is_newline(c) => {
                self.bump_newline(trivia);
                Ok(())
            }
            Some(_) => Err(self.error(KdlErrorKind::UnexpectedCharacter('\\'), start, 1)),
        }
    }

    fn lex_token(&mut self, location: SourceLocation) -> Result<TokenKind, KdlError> {
        let Some(c) = self.peek() else {
            return Ok(TokenKind::Eof);
        };
        match c {
            c if is_newline(c) => {
                self.bump_newline(&mut String::new());
                Ok(TokenKind::Newline)
            }
            '{' => Ok(self.single(TokenKind::LBrace)),
            '}' => Ok(self.single(TokenKind::RBrace)),
            ';' => Ok(self.single(TokenKind::Semicolon)),
            '=' => Ok(self.single(TokenKind::Equals)),
            '(' => self.type_annotation(location),
            '/' if self.rest().starts_with("/-") => {
                self.bump_str("/-", &mut String::new());
                Ok(TokenKind::Slashdash)
            }
            '"' => self.quoted_string(location).map(TokenKind::String),
            _ if self.at_raw_string() => self.raw_string(location).map(TokenKind::RawString),
            '#' => self.keyword(location),
            '+' | '-' if self.peek_nth(1) == Some('#') => self.signed_keyword(location),
            '+' | '-' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.number(location)
            }
            c if c.is_ascii_digit() => self.number(location),
            c if is_initial_char(c) => Ok(self.identifier()),
            c => Err(self.error(KdlErrorKind::UnexpectedCharacter(c), location, c.len_utf8())),
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn identifier(&mut self) -> TokenKind {
        let word = self.take_word();
        let keyword = match word {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "null" => TokenKind::Null,
            _ => return TokenKind::Identifier(word.into()),
        };
        match self.version.get() {
            Some(KdlVersion::V2) => TokenKind::Identifier(word.into()),
            Some(_) => keyword,
            None => {
                self.version.lock(KdlVersion::V1, "bare keyword");
                keyword
            }
        }
    }

    /// `#true`, `#false`, `#null`, `#inf`, `#-inf` and `#nan`.
    fn keyword(&mut self, location: SourceLocation) -> Result<TokenKind, KdlError> {
        self.bump();
        let word = self.take_word();
        let kind = match word {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "null" => TokenKind::Null,
            "inf" => return Ok(TokenKind::Float(f64::INFINITY)),
            "-inf" => return Ok(TokenKind::Float(f64::NEG_INFINITY)),
            "nan" => return Ok(TokenKind::Float(f64::NAN)),
            _ => {
                return Err(self.error(
                    KdlErrorKind::InvalidIdentifier(format!("#{word}")),
                    location,
                    word.len() + 1,
                ))
            }
        };
        self.version.lock(KdlVersion::V2, "keyword literal");
        Ok(kind)
    }

    /// `+#inf`, `-#inf`, `+#nan`, `-#nan`.
    fn signed_keyword(&mut self, location: SourceLocation) -> Result<TokenKind, KdlError> {
        let negative = self.bump() == Some('-');
        self.bump();
        let word = self.take_word();
        match word {
            "inf" if negative => Ok(TokenKind::Float(f64::NEG_INFINITY)),
            "inf" => Ok(TokenKind::Float(f64::INFINITY)),
            "nan" => Ok(TokenKind::Float(f64::NAN)),
            _ => {
                let text = &self.input[location.offset..self.position.offset];
                Err(self.error(
                    KdlErrorKind::InvalidIdentifier(text.into()),
                    location,
                    text.len(),
                ))
            }
        }
    }

    fn number(&mut self, location: SourceLocation) -> Result<TokenKind, KdlError> {
        let word = self.take_word();
        match grammar::number(word) {
            Some(Number::Integer(value)) => Ok(TokenKind::Integer(value)),
            Some(Number::Float(value)) => Ok(TokenKind::Float(value)),
            None => Err(self.error(
                KdlErrorKind::InvalidNumber(word.into()),
                location,
                word.len(),
            )),
        }
    }

    fn type_annotation(&mut self, location: SourceLocation) -> Result<TokenKind, KdlError> {
        self.bump();
        self.skip_spaces();
        let here = self.location();
        let name = match self.peek() {
            None => return Err(KdlError::end_of_file(self.input)),
            Some('"') => self.quoted_string(here)?,
            Some(_) if self.at_raw_string() => self.raw_string(here)?,
            Some(')') => {
                return Err(self.error(KdlErrorKind::InvalidIdentifier(String::new()), location, 2))
            }
            Some(c) if is_initial_char(c) => self.take_word().into(),
            Some(c) => {
                return Err(self.error(KdlErrorKind::UnexpectedCharacter(c), here, c.len_utf8()))
            }
        };
        self.skip_spaces();
        match self.peek() {
            Some(')') => {
                self.bump();
                Ok(TokenKind::TypeAnnotation(name))
            }
            None => Err(KdlError::end_of_file(self.input)),
            Some(c) => {
                let here = self.location();
                Err(self.error(KdlErrorKind::UnexpectedCharacter(c), here, c.len_utf8()))
            }
        }
    }

    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(is_unicode_space) {
            self.bump();
        }
    }

    /// `"…"` or `"""…"""`, with escapes processed.
    fn quoted_string(&mut self, start: SourceLocation) -> Result<String, KdlError> {
        let multiline = self.rest().starts_with("\"\"\"");
        if multiline {
            self.bump_str("\"\"\"", &mut String::new());
            if self.peek().is_some_and(is_newline) {
                self.bump_newline(&mut String::new());
            }
        } else {
            self.bump();
        }
        let len = if multiline { 3 } else { 1 };
        let unterminated = |lexer: &Self| lexer.error(KdlErrorKind::UnterminatedString, start, len);

        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err(unterminated(self)),
                Some('"') if !multiline => {
                    self.bump();
                    return Ok(out);
                }
                Some('"') if self.rest().starts_with("\"\"\"") => {
                    self.bump_str("\"\"\"", &mut String::new());
                    return Ok(dedent(&out));
                }
                Some('\\') => self.escape(&mut out)?,
                Some(c) if is_newline(c) => {
                    if !multiline {
                        return Err(unterminated(self));
                    }
                    self.bump_newline(&mut String::new());
                    out.push('\n');
                }
                Some(c) => {
                    self.bump();
                    out.push(c);
                }
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<(), KdlError> {
        let start = self.location();
        self.bump();
        let Some(c) = self.peek() else {
            // The caller reports the string as unterminated.
            return Ok(());
        };
        let simple = match c {
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            '\\' => Some('\\'),
            '"' => Some('"'),
            '/' => Some('/'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            's' => Some(' '),
            _ => None,
        };
        if let Some(escaped) = simple {
            self.bump();
            out.push(escaped);
            return Ok(());
        }
        if c == 'u' {
            return self.unicode_escape(start, out);
        }
        if is_unicode_space(c) || is_newline(c) {
            while self
                .peek()
                .is_some_and(|c| is_unicode_space(c) || is_newline(c))
            {
                self.bump();
            }
            return Ok(());
        }
        Err(self.error(
            KdlErrorKind::InvalidEscape(format!("\\{c}")),
            start,
            1 + c.len_utf8(),
        ))
    }

    /// `\u{XXXXXX}` with one to six hex digits naming a Unicode scalar value.
    fn unicode_escape(&mut self, start: SourceLocation, out: &mut String) -> Result<(), KdlError> {
        self.bump();
        let digits_start = self.position.offset + 1;
        let mut valid = self.peek() == Some('{');
        if valid {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
        }
        let digits = &self.input[digits_start.min(self.position.offset)..self.position.offset];
        valid = valid && (1..=6).contains(&digits.len()) && self.peek() == Some('}');
        let decoded = if valid {
            self.bump();
            u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
        } else {
            None
        };
        match decoded {
            Some(c) => {
                out.push(c);
                Ok(())
            }
            None => {
                let text = &self.input[start.offset..self.position.offset];
                Err(self.error(
                    KdlErrorKind::InvalidEscape(text.into()),
                    start,
                    text.len(),
                ))
            }
        }
    }

    /// True when the input continues with `r"`, `r#…"` or `#…"`.
    fn at_raw_string(&self) -> bool {
        let rest = self.rest();
        let (prefixed, body) = match rest.strip_prefix('r') {
            Some(body) => (true, body),
            None => (false, rest),
        };
        let unhashed = body.trim_start_matches('#');
        unhashed.starts_with('"') && (prefixed || unhashed.len() < body.len())
    }

    /// A raw string, closed by a quote followed by the same number of `#`
    /// that opened it. `"""` plus a line break opens a dedented multi-line
    /// raw string.
    fn raw_string(&mut self, start: SourceLocation) -> Result<String, KdlError> {
        let mut opening = String::new();
        if self.peek() == Some('r') {
            self.bump_into(&mut opening);
        }
        let mut hashes = 0usize;
        while self.peek() == Some('#') {
            self.bump();
            hashes += 1;
        }
        let fence = "#".repeat(hashes);
        let multiline = self.rest().starts_with("\"\"\"")
            && self.rest()[3..].starts_with(is_newline);
        let closing = if multiline {
            self.bump_str("\"\"\"", &mut opening);
            self.bump_newline(&mut opening);
            format!("\"\"\"{fence}")
        } else {
            self.bump_into(&mut opening);
            format!("\"{fence}")
        };

        let Some(len) = self.rest().find(&closing) else {
            return Err(self.error(
                KdlErrorKind::UnterminatedString,
                start,
                opening.len() + hashes,
            ));
        };
        let body = &self.rest()[..len];
        let mut content = String::new();
        self.bump_str(body, &mut content);
        self.bump_str(&closing, &mut String::new());
        if multiline {
            Ok(dedent(&normalize_newlines(&content)))
        } else {
            Ok(content)
        }
    }
}

/// Turns every line break, `\r\n` included, into `\n`.
fn normalize_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            continue;
        }
        out.push(if is_newline(c) { '\n' } else { c });
    }
    out
}

/// Strips the indentation shared by every non-blank line. Lines holding only
/// whitespace become empty.
pub(crate) fn dedent(text: &str) -> String {
    let is_blank = |line: &str| line.chars().all(is_unicode_space);
    let indent = text
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(|line| line.chars().take_while(|c| is_unicode_space(*c)).count())
        .min()
        .unwrap_or(0);
    text.split('\n')
        .map(|line| {
            if is_blank(line) {
                ""
            } else {
                line.char_indices()
                    .nth(indent)
                    .map_or("", |(at, _)| &line[at..])
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
