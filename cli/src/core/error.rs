//! # Applicator Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Applicator. The rewrite
//! engine returns `ApplicatorError` directly so callers can match on the kind
//! of failure; command handlers work with `anyhow` and add context as errors
//! travel up to `main`.
//!
//! ## Architecture
//!
//! - `ApplicatorError`: a `thiserror` enum covering rewrite failures
//!   (header parse, package rename, module path, descriptor) and the
//!   orchestration failures around them (configuration, filesystem, external
//!   commands, arguments).
//! - `Result<T>`: alias for `anyhow::Result<T>` used by application code.
//!
//! Every rewrite error that concerns a single file carries that file's path
//! relative to the template root, so the user learns which file blocked the
//! clone.
//!
//! ## Examples
//!
//! ```rust
//! match rewrite::imports::rewrite_imports(data, "main.go", src, dst, true) {
//!     Ok(bytes) => write(bytes),
//!     Err(ApplicatorError::InvalidIdentifier { from, to, .. }) => {
//!         eprintln!("cannot rename {from} to {to}");
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```
//!
use crate::rewrite::header::HeaderError;
use crate::rewrite::naming::NamingError;
use thiserror::Error;

/// Custom error type for Applicator.
#[derive(Error, Debug)]
pub enum ApplicatorError {
    /// The package clause or import block of a Go file could not be read.
    #[error("{file}: parsing source module: {cause}")]
    Parse {
        file: String,
        cause: HeaderError,
    },

    /// Renaming the root package would produce an illegal identifier.
    #[error("{file}: cannot rename package {from} to package {to}: {cause}")]
    InvalidIdentifier {
        file: String,
        from: String,
        to: String,
        cause: NamingError,
    },

    /// The source or destination module path is malformed.
    #[error("invalid {role} module name: {cause}")]
    InvalidModulePath {
        role: &'static str,
        cause: NamingError,
    },

    #[error("{file}:{line}: parsing module descriptor: {message}")]
    DescriptorParse {
        file: String,
        line: usize,
        message: String,
    },

    /// Recoverable: the descriptor parsed but could not be written back.
    #[error("{file}: formatting module descriptor: {message}")]
    DescriptorSerialize { file: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Result type for the rewrite engine, which never needs `anyhow`.
pub type RewriteResult<T> = std::result::Result<T, ApplicatorError>;

/// Type alias for Result using anyhow::Error for application code.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let rename = ApplicatorError::InvalidIdentifier {
            file: "main.go".into(),
            from: "tmpl".into(),
            to: "my-app".into(),
            cause: NamingError::Identifier {
                name: "my-app".into(),
                reason: "invalid character '-'".into(),
            },
        };
        assert_eq!(
            rename.to_string(),
            "main.go: cannot rename package tmpl to package my-app: \
             invalid identifier \"my-app\": invalid character '-'"
        );

        let module = ApplicatorError::InvalidModulePath {
            role: "destination",
            cause: NamingError::ModulePath {
                path: "github.com/a b".into(),
                reason: "invalid char ' '".into(),
            },
        };
        assert_eq!(
            module.to_string(),
            "invalid destination module name: malformed module path \"github.com/a b\": invalid char ' '"
        );

        let parse = ApplicatorError::Parse {
            file: "internal/x/x.go".into(),
            cause: HeaderError {
                line: 3,
                column: 1,
                message: "expected import path, found EOF".into(),
            },
        };
        assert_eq!(
            parse.to_string(),
            "internal/x/x.go: parsing source module: 3:1: expected import path, found EOF"
        );

        let descriptor = ApplicatorError::DescriptorParse {
            file: "go.mod".into(),
            line: 4,
            message: "unexpected ')'".into(),
        };
        assert_eq!(
            descriptor.to_string(),
            "go.mod:4: parsing module descriptor: unexpected ')'"
        );
    }
}
