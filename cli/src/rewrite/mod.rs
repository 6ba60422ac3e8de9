//! # Applicator Rewrite Engine
//!
//! File: cli/src/rewrite/mod.rs
//!
//! ## Overview
//!
//! The rewrite engine turns the bytes of one template file into the bytes of
//! the corresponding file in the new project. Every function here is a pure
//! in-memory transform: no filesystem access, no logging, no state shared
//! between files. The `create` command owns all I/O and decides what to log.
//!
//! ## Architecture
//!
//! - `edit`: the `EditBuffer` splicing primitive.
//! - `header`: header-only scanner for Go files (package clause + imports).
//! - `naming`: module path and identifier validators.
//! - `imports`: package and import rewriting for `.go` files.
//! - `descriptor`: `go.mod` module directive rewriting.
//! - `config_text`: slug substitution for every other file.
//!
//! `rewrite_file` picks the rewriters from the file's `FileRole`, which is
//! derived from its path relative to the template root:
//!
//! | Role | Path | Rewriters |
//! |---|---|---|
//! | `RootCompilationUnit` | `*.go` at the root | imports + package rename |
//! | `CompilationUnit` | `*.go` in a subdirectory | imports |
//! | `Descriptor` | `go.mod` at the root | config text, then descriptor |
//! | `Plain` | anything else | config text |
//!
pub mod config_text;
pub mod descriptor;
pub mod edit;
pub mod header;
pub mod imports;
pub mod naming;

use crate::core::error::{ApplicatorError, RewriteResult};
use std::path::{Component, Path};

/// File extension of Go compilation units.
pub const SOURCE_EXTENSION: &str = "go";

/// How a template file is rewritten, derived from its relative path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    RootCompilationUnit,
    CompilationUnit,
    Descriptor,
    Plain,
}

impl FileRole {
    pub fn classify(relative: &Path) -> Self {
        let at_root = relative.components().count() == 1;
        if at_root && relative == Path::new(descriptor::DESCRIPTOR_FILE) {
            FileRole::Descriptor
        } else if relative.extension().is_some_and(|ext| ext == SOURCE_EXTENSION) {
            if at_root {
                FileRole::RootCompilationUnit
            } else {
                FileRole::CompilationUnit
            }
        } else {
            FileRole::Plain
        }
    }
}

/// The identities involved in one clone run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonePlan {
    pub source_module: String,
    pub destination_module: String,
    /// Template token replaced in plain files.
    pub slug: String,
    pub app_name: String,
}

impl ClonePlan {
    /// Builds a plan after validating both module paths.
    pub fn new(
        source_module: impl Into<String>,
        destination_module: impl Into<String>,
        slug: impl Into<String>,
        app_name: impl Into<String>,
    ) -> RewriteResult<Self> {
        let plan = Self {
            source_module: source_module.into(),
            destination_module: destination_module.into(),
            slug: slug.into(),
            app_name: app_name.into(),
        };
        naming::check_module_path(&plan.source_module).map_err(|cause| {
            ApplicatorError::InvalidModulePath {
                role: "source",
                cause,
            }
        })?;
        naming::check_module_path(&plan.destination_module).map_err(|cause| {
            ApplicatorError::InvalidModulePath {
                role: "destination",
                cause,
            }
        })?;
        Ok(plan)
    }
}

/// Output of `rewrite_file`.
#[derive(Debug)]
pub struct RewrittenFile {
    pub role: FileRole,
    pub bytes: Vec<u8>,
    /// A non-fatal failure; `bytes` hold the best available content.
    pub recovered: Option<ApplicatorError>,
}

/// Rewrites one template file according to its role.
pub fn rewrite_file(relative: &Path, data: &[u8], plan: &ClonePlan) -> RewriteResult<RewrittenFile> {
    let role = FileRole::classify(relative);
    let file = slash_path(relative);

    let (bytes, recovered) = match role {
        FileRole::RootCompilationUnit | FileRole::CompilationUnit => {
            let bytes = imports::rewrite_imports(
                data,
                &file,
                &plan.source_module,
                &plan.destination_module,
                role == FileRole::RootCompilationUnit,
            )?;
            (bytes, None)
        }
        FileRole::Descriptor => {
            let text = config_text::rewrite_config(data, &plan.slug, &plan.app_name);
            let result = descriptor::rewrite_descriptor(&text, &plan.destination_module)?;
            (result.bytes, result.recovered)
        }
        FileRole::Plain => (
            config_text::rewrite_config(data, &plan.slug, &plan.app_name),
            None,
        ),
    };

    Ok(RewrittenFile {
        role,
        bytes,
        recovered,
    })
}

/// Renders a relative path with `/` separators for messages.
pub fn slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
