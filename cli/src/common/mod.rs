//! # Applicator Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utilities for cross-cutting concerns, kept apart from command logic
//! (`commands::`) and core infrastructure (`core::`):
//!
//! - **`fs`**: filesystem operations (directory checks, byte I/O).
//! - **`process`**: running external commands and capturing their output.
//!
//! ```rust
//! use crate::common::{fs, process};
//!
//! fs::io::ensure_dir_exists(target)?;
//! let output = process::run_command_capture("go", &["version"]).await?;
//! ```
//!

/// Utilities for filesystem operations.
pub mod fs;
/// Utilities for executing external processes.
pub mod process;
