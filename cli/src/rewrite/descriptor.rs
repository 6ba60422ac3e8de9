//! # Applicator Module Descriptor Rewriter
//!
//! File: cli/src/rewrite/descriptor.rs
//!
//! ## Overview
//!
//! Rewrites the `module` directive of a `go.mod` file. The file is parsed
//! leniently into a small syntax tree (lines, `verb ( ... )` blocks, comments
//! and blank lines). Only the `module` directive is interpreted; `go`,
//! `toolchain`, `require`, `replace`, `exclude`, `retract` and any unknown
//! directive are kept as opaque token lists and written back unchanged.
//!
//! ## Failure Policy
//!
//! - A descriptor that cannot be parsed is fatal (`DescriptorParse`): the new
//!   project would not build without it.
//! - A descriptor that parsed but cannot be written back is *recovered*: the
//!   original bytes are returned together with the `DescriptorSerialize` error
//!   so the caller can log it and carry on with the clone.
//!
//! The formatter is a trait (`DescriptorFormatter`). Its output is re-parsed
//! and must declare the requested module path before it is accepted.
//!
//! ## Canonical Form
//!
//! ```text
//! module github.com/HardDie/newapp
//!
//! go 1.22
//!
//! require (
//! 	github.com/joho/godotenv v1.5.1
//! 	golang.org/x/mod v0.17.0 // indirect
//! )
//! ```
//!
//! Tokens are joined by one space, block bodies are indented with a tab,
//! trailing comments are kept, runs of blank lines collapse to one and the
//! file ends with a single newline.
//!
use crate::core::error::{ApplicatorError, RewriteResult};
use crate::rewrite::header::{quote, unquote};

/// Reserved file name of the module descriptor.
pub const DESCRIPTOR_FILE: &str = "go.mod";

/// One directive line: its tokens plus an optional trailing `//` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tokens: Vec<String>,
    pub comment: Option<String>,
    /// 1-based source line; 0 for lines added by the rewriter.
    pub line: usize,
}

/// A `verb ( ... )` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The tokens before `(`, with the comment on the opening line.
    pub header: Line,
    /// Body entries; never contains a nested block.
    pub body: Vec<Stmt>,
    /// Comment on the closing `)` line.
    pub close_comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Blank,
    Comment(String),
    Line(Line),
    Block(Block),
}

/// Where the module path token lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModuleSlot {
    /// `module path` at top level: statement index.
    Line(usize),
    /// `module ( path )`: block index and body index.
    Block(usize, usize),
}

/// A leniently parsed `go.mod` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub stmts: Vec<Stmt>,
    module: Option<(ModuleSlot, String)>,
}

/// Result of a descriptor rewrite.
#[derive(Debug)]
pub struct DescriptorRewrite {
    pub bytes: Vec<u8>,
    /// Set when formatting failed and `bytes` are the original content.
    pub recovered: Option<ApplicatorError>,
}

/// Serializes a parsed descriptor.
pub trait DescriptorFormatter {
    fn format(&self, descriptor: &Descriptor) -> Result<Vec<u8>, String>;
}

/// Writes the canonical form described in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

/// Sets the module path of `data` to `dst_mod` using the canonical formatter.
pub fn rewrite_descriptor(data: &[u8], dst_mod: &str) -> RewriteResult<DescriptorRewrite> {
    rewrite_descriptor_with(data, dst_mod, &CanonicalFormatter)
}

/// Sets the module path of `data` to `dst_mod`, serializing with `formatter`.
pub fn rewrite_descriptor_with(
    data: &[u8],
    dst_mod: &str,
    formatter: &dyn DescriptorFormatter,
) -> RewriteResult<DescriptorRewrite> {
    let mut descriptor = Descriptor::parse(data)?;
    descriptor.set_module_path(dst_mod);

    let formatted = formatter.format(&descriptor).and_then(|bytes| {
        // The output must read back with the module we asked for.
        match Descriptor::parse(&bytes) {
            Ok(check) if check.module_path() == Some(dst_mod) => Ok(bytes),
            Ok(check) => Err(format!(
                "formatted output declares module {:?}, expected {:?}",
                check.module_path().unwrap_or_default(),
                dst_mod
            )),
            Err(e) => Err(format!("formatted output does not parse: {e}")),
        }
    });

    Ok(match formatted {
        Ok(bytes) => DescriptorRewrite {
            bytes,
            recovered: None,
        },
        Err(message) => DescriptorRewrite {
            bytes: data.to_vec(),
            recovered: Some(ApplicatorError::DescriptorSerialize {
                file: DESCRIPTOR_FILE.to_string(),
                message,
            }),
        },
    })
}

impl Descriptor {
    /// Parses `data` leniently. Only the `module` directive is validated.
    pub fn parse(data: &[u8]) -> RewriteResult<Self> {
        let text = std::str::from_utf8(data).map_err(|e| {
            let line = data[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            parse_error(line, "invalid UTF-8")
        })?;

        let mut stmts = Vec::new();
        let mut open: Option<(usize, Block)> = None;
        for (idx, raw) in text.split('\n').enumerate() {
            let lineno = idx + 1;
            let line = tokenize(raw.trim_end_matches('\r'), lineno)?;

            let opens = line.tokens.last().is_some_and(|t| t == "(");
            let closes = line.tokens.len() == 1 && line.tokens[0] == ")";
            if let Some(bad) = line.tokens.iter().enumerate().find_map(|(i, t)| {
                let misplaced = (t == "(" && i + 1 != line.tokens.len())
                    || (t == ")" && !closes)
                    || (t == "(" && line.tokens.len() == 1);
                misplaced.then_some(t)
            }) {
                return Err(parse_error(lineno, &format!("unexpected '{bad}'")));
            }

            match open.take() {
                Some((start, mut block)) => {
                    if closes {
                        block.close_comment = line.comment;
                        stmts.push(Stmt::Block(block));
                    } else if opens {
                        return Err(parse_error(lineno, "nested block"));
                    } else {
                        block.body.push(classify(line));
                        open = Some((start, block));
                    }
                }
                None if closes => return Err(parse_error(lineno, "unexpected ')'")),
                None if opens => {
                    let mut header = line;
                    header.tokens.pop();
                    open = Some((
                        lineno,
                        Block {
                            header,
                            body: Vec::new(),
                            close_comment: None,
                        },
                    ));
                }
                None => stmts.push(classify(line)),
            }
        }
        if let Some((start, _)) = open {
            return Err(parse_error(start, "block is not closed"));
        }

        let module = find_module(&stmts)?;
        Ok(Self { stmts, module })
    }

    /// The declared module path, unquoted.
    pub fn module_path(&self) -> Option<&str> {
        self.module.as_ref().map(|(_, path)| path.as_str())
    }

    /// Sets the module path, adding a `module` line at the top when the file
    /// has none.
    pub fn set_module_path(&mut self, path: &str) {
        let token = auto_quote(path);
        match self.module.as_ref().map(|(slot, _)| *slot) {
            Some(ModuleSlot::Line(i)) => {
                if let Stmt::Line(line) = &mut self.stmts[i] {
                    line.tokens[1] = token;
                }
            }
            Some(ModuleSlot::Block(b, i)) => {
                if let Stmt::Block(block) = &mut self.stmts[b] {
                    if let Stmt::Line(line) = &mut block.body[i] {
                        line.tokens[0] = token;
                    }
                }
            }
            None => {
                self.stmts.insert(
                    0,
                    Stmt::Line(Line {
                        tokens: vec!["module".to_string(), token],
                        comment: None,
                        line: 0,
                    }),
                );
                self.stmts.insert(1, Stmt::Blank);
                // Existing slots are not tracked past this point; record the new one.
                self.module = Some((ModuleSlot::Line(0), path.to_string()));
                return;
            }
        }
        if let Some((_, current)) = self.module.as_mut() {
            *current = path.to_string();
        }
    }
}

impl DescriptorFormatter for CanonicalFormatter {
    fn format(&self, descriptor: &Descriptor) -> Result<Vec<u8>, String> {
        let mut out = String::new();
        write_stmts(&mut out, &descriptor.stmts, "")?;
        Ok(out.into_bytes())
    }
}

fn write_stmts(out: &mut String, stmts: &[Stmt], indent: &str) -> Result<(), String> {
    let mut pending_blank = false;
    let mut wrote_any = false;
    for stmt in stmts {
        if matches!(stmt, Stmt::Blank) {
            pending_blank = wrote_any;
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        wrote_any = true;
        match stmt {
            Stmt::Blank => {}
            Stmt::Comment(text) => {
                out.push_str(indent);
                out.push_str(text);
                out.push('\n');
            }
            Stmt::Line(line) => {
                out.push_str(indent);
                write_line(out, &line.tokens, line.comment.as_deref())?;
            }
            Stmt::Block(block) => {
                if !indent.is_empty() {
                    return Err("nested block cannot be formatted".to_string());
                }
                let mut tokens = block.header.tokens.clone();
                tokens.push("(".to_string());
                write_line(out, &tokens, block.header.comment.as_deref())?;
                write_stmts(out, &block.body, "\t")?;
                write_line(out, &[")".to_string()], block.close_comment.as_deref())?;
            }
        }
    }
    Ok(())
}

fn write_line(out: &mut String, tokens: &[String], comment: Option<&str>) -> Result<(), String> {
    if let Some(bad) = tokens.iter().find(|t| t.is_empty() || t.contains('\n')) {
        return Err(format!("cannot format token {:?}", bad));
    }
    out.push_str(&tokens.join(" "));
    if let Some(comment) = comment {
        if !tokens.is_empty() {
            out.push(' ');
        }
        out.push_str(comment);
    }
    out.push('\n');
    Ok(())
}

fn classify(line: Line) -> Stmt {
    match (line.tokens.is_empty(), line.comment) {
        (true, None) => Stmt::Blank,
        (true, Some(comment)) => Stmt::Comment(comment),
        (false, comment) => Stmt::Line(Line {
            tokens: line.tokens,
            comment,
            line: line.line,
        }),
    }
}

fn find_module(stmts: &[Stmt]) -> RewriteResult<Option<(ModuleSlot, String)>> {
    let mut found: Option<(ModuleSlot, String)> = None;
    let mut record = |slot: ModuleSlot, lineno: usize, args: &[String]| -> RewriteResult<()> {
        if found.is_some() {
            return Err(parse_error(lineno, "repeated module statement"));
        }
        let [arg] = args else {
            return Err(parse_error(lineno, "usage: module module/path"));
        };
        let path = if arg.starts_with('"') || arg.starts_with('`') {
            unquote(arg)
                .ok_or_else(|| parse_error(lineno, &format!("invalid quoted string {arg}")))?
        } else {
            arg.clone()
        };
        found = Some((slot, path));
        Ok(())
    };

    for (i, stmt) in stmts.iter().enumerate() {
        match stmt {
            Stmt::Line(line) if line.tokens[0] == "module" => {
                record(ModuleSlot::Line(i), line.line, &line.tokens[1..])?;
            }
            Stmt::Block(block) if block.header.tokens == ["module"] => {
                for (j, entry) in block.body.iter().enumerate() {
                    if let Stmt::Line(line) = entry {
                        record(ModuleSlot::Block(i, j), line.line, &line.tokens)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(found)
}

/// Splits one line into tokens and a trailing comment.
fn tokenize(line: &str, lineno: usize) -> RewriteResult<Line> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b' ' | b'\t' => i += 1,
            b'/' if bytes[i..].starts_with(b"//") => {
                comment = Some(line[i..].trim_end().to_string());
                break;
            }
            b'(' | b')' => {
                tokens.push(line[i..i + 1].to_string());
                i += 1;
            }
            quote_char @ (b'"' | b'`') => {
                let start = i;
                i += 1;
                loop {
                    match bytes.get(i) {
                        None => return Err(parse_error(lineno, "unterminated quoted string")),
                        Some(b'\\') if quote_char == b'"' => i += 2,
                        Some(&b) if b == quote_char => break,
                        Some(_) => i += 1,
                    }
                }
                i += 1;
                tokens.push(line[start..i].to_string());
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b' ' | b'\t' | b'(' | b')') {
                    i += 1;
                }
                tokens.push(line[start..i].to_string());
            }
        }
    }
    Ok(Line {
        tokens,
        comment,
        line: lineno,
    })
}

/// Quotes `path` only when it cannot be written as a bare token.
fn auto_quote(path: &str) -> String {
    let must_quote = path.is_empty()
        || path.contains("//")
        || path.contains("/*")
        || path.chars().any(|c| {
            c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '`' | '(' | ')')
        });
    if must_quote {
        quote(path)
    } else {
        path.to_string()
    }
}

fn parse_error(line: usize, message: &str) -> ApplicatorError {
    ApplicatorError::DescriptorParse {
        file: DESCRIPTOR_FILE.to_string(),
        line,
        message: message.to_string(),
    }
}
