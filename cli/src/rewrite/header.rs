//! # Applicator Go Header Scanner
//!
//! File: cli/src/rewrite/header.rs
//!
//! ## Overview
//!
//! A header-only parser for Go compilation units. It reads the `package`
//! clause and the `import` declarations that follow it, recording the byte span
//! of every token the rewriter may need to change, and stops at the first other
//! top-level token. The rest of the file is never looked at, so unusual or even
//! invalid code below the imports cannot cause a failure.
//!
//! ## Recognized Syntax
//!
//! - line (`//`) and block (`/* */`) comments, whitespace, explicit `;`
//! - a leading UTF-8 byte order mark
//! - `package <name>`
//! - `import "path"`, `import name "path"`, `import . "path"`, `import _ "path"`
//! - grouped imports: `import ( ... )`
//! - interpreted (`"..."`) and raw (`` `...` ``) string literals
//!
use super::naming::GO_KEYWORDS;
use std::fmt;
use std::ops::Range;

/// An identifier and where it sits in the original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Range<usize>,
}

/// One import spec from the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    /// Explicit local name (`name`, `.` or `_`), if any.
    pub alias: Option<Ident>,
    /// The unquoted import path. `None` when the literal could not be unquoted.
    pub path: Option<String>,
    /// Span of the quoted literal, quotes included.
    pub literal: Range<usize>,
}

/// The parsed header of a Go file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub package: Ident,
    pub imports: Vec<ImportDeclaration>,
}

/// A header syntax error with a 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for HeaderError {}

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses the package clause and import declarations of `src`.
pub fn parse_header(src: &[u8]) -> Result<FileHeader, HeaderError> {
    let mut scanner = Scanner::new(src);
    if src.starts_with(BOM) {
        scanner.pos = BOM.len();
    }

    scanner.skip_trivia()?;
    if !scanner.at_keyword("package") {
        return Err(scanner.error("expected 'package'"));
    }
    scanner.pos += "package".len();
    scanner.skip_trivia()?;
    let package = scanner
        .ident()?
        .ok_or_else(|| scanner.error("expected package name"))?;
    if package.name == "_" {
        return Err(scanner.error_at(package.span.start, "invalid package name _"));
    }
    if GO_KEYWORDS.contains(&package.name.as_str()) {
        return Err(scanner.error_at(package.span.start, "expected package name"));
    }

    let mut imports = Vec::new();
    loop {
        scanner.skip_trivia_and_semicolons()?;
        if !scanner.at_keyword("import") {
            break;
        }
        scanner.pos += "import".len();
        scanner.skip_trivia()?;
        if scanner.peek() == Some(b'(') {
            scanner.pos += 1;
            loop {
                scanner.skip_trivia_and_semicolons()?;
                match scanner.peek() {
                    Some(b')') => {
                        scanner.pos += 1;
                        break;
                    }
                    Some(_) => imports.push(scanner.import_spec()?),
                    None => return Err(scanner.error("expected ')' to close import group")),
                }
            }
        } else {
            imports.push(scanner.import_spec()?);
        }
    }

    Ok(FileHeader { package, imports })
}

/// Unquotes a Go string literal (interpreted or raw).
pub fn unquote(literal: &str) -> Option<String> {
    if let Some(body) = literal
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    {
        return Some(body.replace('\r', ""));
    }

    let body = literal.strip_prefix('"')?.strip_suffix('"')?;
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next()? {
            'a' => bytes.push(0x07),
            'b' => bytes.push(0x08),
            'f' => bytes.push(0x0C),
            'n' => bytes.push(b'\n'),
            'r' => bytes.push(b'\r'),
            't' => bytes.push(b'\t'),
            'v' => bytes.push(0x0B),
            '\\' => bytes.push(b'\\'),
            '"' => bytes.push(b'"'),
            'x' => bytes.push(u8::from_str_radix(&take(&mut chars, 2)?, 16).ok()?),
            'u' => push_char(&mut bytes, &take(&mut chars, 4)?)?,
            'U' => push_char(&mut bytes, &take(&mut chars, 8)?)?,
            d @ '0'..='7' => {
                let rest = take(&mut chars, 2)?;
                let value = u32::from_str_radix(&format!("{d}{rest}"), 8).ok()?;
                bytes.push(u8::try_from(value).ok()?);
            }
            _ => return None,
        }
    }
    String::from_utf8(bytes).ok()
}

/// Quotes `value` as an interpreted Go string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn take(chars: &mut std::str::Chars<'_>, n: usize) -> Option<String> {
    let taken: String = chars.by_ref().take(n).collect();
    (taken.chars().count() == n).then_some(taken)
}

fn push_char(bytes: &mut Vec<u8>, hex: &str) -> Option<()> {
    let c = char::from_u32(u32::from_str_radix(hex, 16).ok()?)?;
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Some(())
}

struct Scanner<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a [u8]) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn rest(&self) -> &'a [u8] {
        &self.src[self.pos..]
    }

    fn error(&self, message: &str) -> HeaderError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: &str) -> HeaderError {
        let before = &self.src[..pos.min(self.src.len())];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |idx| idx + 1);
        let found = match self.src.get(pos) {
            None => "EOF".to_string(),
            Some(b) => format!("{:?}", *b as char),
        };
        HeaderError {
            line,
            column: pos - line_start + 1,
            message: format!("{message}, found {found}"),
        }
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), HeaderError> {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                Some(b'/') if self.rest().starts_with(b"//") => {
                    self.pos = match self.rest().iter().position(|&b| b == b'\n') {
                        Some(idx) => self.pos + idx + 1,
                        None => self.src.len(),
                    };
                }
                Some(b'/') if self.rest().starts_with(b"/*") => {
                    let start = self.pos;
                    match self.rest()[2..].windows(2).position(|w| w == b"*/") {
                        Some(idx) => self.pos += 2 + idx + 2,
                        None => return Err(self.error_at(start, "comment not terminated")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_trivia_and_semicolons(&mut self) -> Result<(), HeaderError> {
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b';') {
                self.pos += 1;
            } else {
                return Ok(());
            }
        }
    }

    /// Reports whether `keyword` starts at the cursor as a whole word.
    fn at_keyword(&self, keyword: &str) -> bool {
        self.rest().starts_with(keyword.as_bytes())
            && !self
                .src
                .get(self.pos + keyword.len())
                .is_some_and(|&b| is_ident_byte(b))
    }

    /// Reads an identifier at the cursor, if one starts there.
    fn ident(&mut self) -> Result<Option<Ident>, HeaderError> {
        let start = self.pos;
        match self.peek() {
            Some(b) if is_ident_byte(b) && !b.is_ascii_digit() => {}
            _ => return Ok(None),
        }
        let len = self
            .rest()
            .iter()
            .position(|&b| !is_ident_byte(b))
            .unwrap_or(self.src.len() - start);
        let raw = &self.src[start..start + len];
        let name = std::str::from_utf8(raw)
            .ok()
            .filter(|s| {
                s.chars()
                    .all(|c| c == '_' || c.is_alphabetic() || c.is_numeric())
            })
            .ok_or_else(|| self.error_at(start, "invalid identifier"))?;
        self.pos = start + len;
        Ok(Some(Ident {
            name: name.to_string(),
            span: start..start + len,
        }))
    }

    /// Reads one `[name] "path"` import spec.
    fn import_spec(&mut self) -> Result<ImportDeclaration, HeaderError> {
        let alias = if self.peek() == Some(b'.') {
            self.pos += 1;
            Some(Ident {
                name: ".".to_string(),
                span: self.pos - 1..self.pos,
            })
        } else {
            self.ident()?
        };
        if alias.is_some() {
            self.skip_trivia()?;
        }

        let literal = self.string_literal()?;
        let path = std::str::from_utf8(&self.src[literal.clone()])
            .ok()
            .and_then(unquote);
        Ok(ImportDeclaration {
            alias,
            path,
            literal,
        })
    }

    fn string_literal(&mut self) -> Result<Range<usize>, HeaderError> {
        let start = self.pos;
        match self.peek() {
            Some(b'"') => {
                let mut i = start + 1;
                loop {
                    match self.src.get(i) {
                        Some(b'\\') => i += 2,
                        Some(b'"') => break,
                        Some(b'\n') | None => {
                            return Err(self.error_at(start, "string literal not terminated"))
                        }
                        Some(_) => i += 1,
                    }
                }
                self.pos = i + 1;
            }
            Some(b'`') => match self.src[start + 1..].iter().position(|&b| b == b'`') {
                Some(idx) => self.pos = start + 1 + idx + 1,
                None => return Err(self.error_at(start, "raw string literal not terminated")),
            },
            _ => return Err(self.error("expected import path")),
        }
        Ok(start..self.pos)
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
