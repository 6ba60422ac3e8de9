//! # Applicator Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem input/output operations used by the
//! `create` command. It provides thin wrappers around `std::fs` that add
//! context to errors, so a failure names the path it happened on.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: creates a directory (and parents) unless it
//!   already exists; fails if the path is a file.
//! - **`is_empty_or_missing_dir`**: reports whether a clone target is usable.
//! - **`read_file_bytes`** / **`write_bytes_to_file`**: raw byte I/O. Template
//!   files are not assumed to be UTF-8.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! io::ensure_dir_exists(&target.join("internal"))?;
//! let data = io::read_file_bytes(&src)?;
//! io::write_bytes_to_file(&dst, &data)?;
//! ```
//!
use crate::core::error::{ApplicatorError, Result}; // Use standard Result and custom Error types
use anyhow::Context; // For adding context to errors
use std::fs; // Standard filesystem module
use std::io::ErrorKind;
use std::path::Path; // Filesystem path type
use tracing::{debug, info}; // Logging utilities

/// Ensures that a directory exists at the specified path.
///
/// If the path does not exist, this function creates the directory,
/// including any necessary parent directories (similar to `mkdir -p`).
///
/// # Errors
///
/// Returns an `Err` if:
/// - The path exists but is not a directory.
/// - Creating the directory fails (e.g., due to permissions).
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(ApplicatorError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Returns `true` when `path` does not exist or is an empty directory.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is a file, or cannot be listed.
pub fn is_empty_or_missing_dir(path: &Path) -> Result<bool> {
    match fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_none()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(true),
        Err(_) if path.exists() && !path.is_dir() => {
            anyhow::bail!(ApplicatorError::FileSystem(format!(
                "Path exists but is not a directory: {:?}",
                path
            )))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to list directory {:?}", path)),
    }
}

/// Reads the entire content of a file as bytes.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, creating the parent directory if needed and
/// overwriting any existing file.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to file: {:?}", content.len(), path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_dir_exists_creates_new() -> Result<()> {
        let base_dir = tempdir()?;
        let new_dir = base_dir.path().join("new/subdir");
        assert!(!new_dir.exists());
        ensure_dir_exists(&new_dir)?;
        assert!(new_dir.is_dir());
        // Second call is a no-op.
        ensure_dir_exists(&new_dir)?;
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_path_is_file() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("a_file.txt");
        fs::write(&file_path, "hello")?;
        let result = ensure_dir_exists(&file_path);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Path exists but is not a directory"));
        Ok(())
    }

    #[test]
    fn test_is_empty_or_missing_dir() -> Result<()> {
        let base_dir = tempdir()?;
        assert!(is_empty_or_missing_dir(base_dir.path())?);
        assert!(is_empty_or_missing_dir(&base_dir.path().join("missing"))?);

        fs::write(base_dir.path().join("file.txt"), "x")?;
        assert!(!is_empty_or_missing_dir(base_dir.path())?);
        assert!(is_empty_or_missing_dir(&base_dir.path().join("file.txt")).is_err());
        Ok(())
    }

    #[test]
    fn test_read_write_bytes() -> Result<()> {
        let base_dir = tempdir()?;
        let file_path = base_dir.path().join("nested/dir/data.bin");
        let content = [0xFFu8, 0x00, b'g', b'o'];
        write_bytes_to_file(&file_path, &content)?;
        assert_eq!(read_file_bytes(&file_path)?, content);
        assert!(read_file_bytes(&base_dir.path().join("nonexistent")).is_err());
        Ok(())
    }
}
