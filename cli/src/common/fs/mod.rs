//! # Applicator Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Entry point for filesystem helpers. Functionality lives in submodules and
//! is imported from them directly:
//!
//! - **`io`**: directory checks (`ensure_dir_exists`, `is_empty_or_missing_dir`)
//!   and byte I/O (`read_file_bytes`, `write_bytes_to_file`).
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! if io::is_empty_or_missing_dir(target)? {
//!     io::ensure_dir_exists(target)?;
//! }
//! ```
//!

/// Basic file I/O operations.
pub mod io;
