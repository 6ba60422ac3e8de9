//! # Applicator Package Naming Rules
//!
//! File: cli/src/rewrite/naming.rs
//!
//! ## Overview
//!
//! Shared validators for the two kinds of names the clone touches:
//!
//! - **Module paths** (`github.com/owner/project`): checked with the same rules
//!   the Go toolchain applies to module paths, so a destination that passes here
//!   is a path `go build` will accept in `go.mod`.
//! - **Identifiers**: Go package names, which must be legal identifiers and not
//!   keywords.
//!
//! Both validators are pure and report *why* a name is rejected through
//! `NamingError`. Callers never truncate or substitute a rejected name.
//!
use thiserror::Error;

/// A rejected module path or identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("malformed module path \"{path}\": {reason}")]
    ModulePath { path: String, reason: String },

    #[error("invalid identifier \"{name}\": {reason}")]
    Identifier { name: String, reason: String },
}

/// Go reserved words. None of them may be used as a package name.
pub(crate) const GO_KEYWORDS: [&str; 25] = [
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Short names Windows refuses as file names, compared case-insensitively
/// against the part of a path element before its first dot.
const WINDOWS_RESERVED: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Returns the final segment of a module path (`github.com/a/b` -> `b`).
pub fn short_name(module_path: &str) -> &str {
    let trimmed = module_path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Checks that `name` is a legal Go identifier.
///
/// Letters (including Unicode letters) and `_` may start the identifier;
/// digits may follow. Keywords are rejected.
pub fn check_identifier(name: &str) -> Result<(), NamingError> {
    let fail = |reason: String| NamingError::Identifier {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let first = chars.next().ok_or_else(|| fail("empty string".to_string()))?;
    if !(first == '_' || first.is_alphabetic()) {
        return Err(fail(format!("cannot start with {:?}", first)));
    }
    if let Some(bad) = chars.find(|&c| !(c == '_' || c.is_alphabetic() || c.is_numeric())) {
        return Err(fail(format!("invalid character {:?}", bad)));
    }
    if GO_KEYWORDS.contains(&name) {
        return Err(fail("reserved keyword".to_string()));
    }
    Ok(())
}

/// Checks that `path` is a valid module path.
///
/// Rules:
/// - no leading dash, no empty elements, no leading or trailing slash
/// - every element uses ASCII letters, digits and `-._~`, with no leading or
///   trailing dot, and is not a Windows reserved name
/// - the first element looks like a domain: it contains a dot and uses only
///   lowercase letters, digits, `-` and `.`
/// - a `/vN` major version suffix must be `v2` or higher with no leading zero
pub fn check_module_path(path: &str) -> Result<(), NamingError> {
    let fail = |reason: String| NamingError::ModulePath {
        path: path.to_string(),
        reason,
    };

    check_path_elements(path).map_err(fail)?;

    let first = path.split('/').next().unwrap_or_default();
    if !first.contains('.') {
        return Err(fail("missing dot in first path element".to_string()));
    }
    if first.starts_with('-') {
        return Err(fail("leading dash in first path element".to_string()));
    }
    if let Some(bad) = first
        .chars()
        .find(|&c| !(c == '-' || c == '.' || c.is_ascii_digit() || c.is_ascii_lowercase()))
    {
        return Err(fail(format!("invalid char {:?} in first path element", bad)));
    }

    check_major_version_suffix(path).map_err(fail)?;
    Ok(())
}

/// Structural checks shared by every element of the path.
fn check_path_elements(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("empty string".to_string());
    }
    if path.starts_with('-') {
        return Err("leading dash".to_string());
    }
    if path.contains("//") {
        return Err("double slash".to_string());
    }
    if path.ends_with('/') {
        return Err("trailing slash".to_string());
    }
    for elem in path.split('/') {
        check_element(elem)?;
    }
    Ok(())
}

/// Checks that `elem` can stand alone as one element of a module path.
pub fn check_path_element(elem: &str) -> Result<(), NamingError> {
    check_element(elem).map_err(|reason| NamingError::ModulePath {
        path: elem.to_string(),
        reason,
    })
}

fn check_element(elem: &str) -> Result<(), String> {
    if elem.is_empty() {
        return Err("empty path element".to_string());
    }
    if elem.chars().all(|c| c == '.') {
        return Err(format!("invalid path element {:?}", elem));
    }
    if elem.starts_with('.') {
        return Err("leading dot in path element".to_string());
    }
    if elem.ends_with('.') {
        return Err("trailing dot in path element".to_string());
    }
    if let Some(bad) = elem.chars().find(|&c| !module_path_char_ok(c)) {
        return Err(format!("invalid char {:?}", bad));
    }

    let short = elem.split('.').next().unwrap_or(elem);
    if WINDOWS_RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(short))
    {
        return Err(format!("{:?} disallowed as path element component on Windows", short));
    }
    // Windows 8.3 short names look like `PROGRA~1`.
    if let Some(tilde) = short.rfind('~') {
        let digits = &short[tilde + 1..];
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("trailing tilde and digits in path element {:?}", elem));
        }
    }
    Ok(())
}

fn module_path_char_ok(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn check_major_version_suffix(path: &str) -> Result<(), String> {
    let Some((_, last)) = path.rsplit_once('/') else {
        return Ok(());
    };
    let Some(digits) = last.strip_prefix('v') else {
        return Ok(());
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Ok(());
    }
    if digits.starts_with('0') || digits == "1" {
        return Err(format!("invalid major version suffix \"/{}\"", last));
    }
    Ok(())
}
