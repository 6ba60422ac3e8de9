//! # Applicator Create Command
//!
//! File: cli/src/commands/create.rs
//!
//! ## Overview
//!
//! This module implements `applicator create`, which clones a Go template
//! into a new project under a new module identity. It handles:
//! - Parsing command-line arguments and forming the destination module path
//! - Checking that the target directory is missing or empty
//! - Locating the template (local directory or `go mod download`)
//! - Walking the template and passing every file through the rewrite engine
//! - Printing next steps after the project is created
//!
//! ## Architecture
//!
//! The command flow follows these steps:
//! 1. Load configuration and build a validated `ClonePlan`
//! 2. Resolve the target directory and reject non-empty targets
//! 3. Resolve the template source to a directory
//! 4. Walk the template in file-name order, rewriting and writing each file
//! 5. Print a completion message
//!
//! The first fatal error stops the walk. Files written before it stay on disk.
//!
//! ## Examples
//!
//! ```bash
//! # Clone the default template as github.com/HardDie/shop into ./shop
//! applicator create shop ./shop
//!
//! # Clone a local checkout under a custom module path
//! applicator create shop ./shop --template-dir ~/src/tmpl --module example.com/acme/shop
//! ```
//!
use crate::common::fs::io;
use crate::core::config::{self, Config};
use crate::core::error::{ApplicatorError, Result};
use crate::core::template::TemplateSource;
use crate::rewrite::{self, naming, ClonePlan};
use anyhow::Context;
use clap::Parser;
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Name of the version-control directory never copied from a template.
const VCS_DIR: &str = ".git";

/// # Create Arguments (`CreateArgs`)
///
/// Defines the command-line arguments accepted by `applicator create`.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Name of the new application. Becomes the last element of the module
    /// path and the new name of the template's root package.
    app_name: String,

    /// Directory to create the project in. Must not exist or be empty.
    dir: PathBuf,

    /// Clone from this local template directory instead of downloading it.
    #[arg(long, value_name = "PATH")]
    template_dir: Option<PathBuf>,

    /// Template version passed to `go mod download` (default from config).
    #[arg(long, value_name = "VERSION")]
    template_version: Option<String>,

    /// Full module path of the new project. Defaults to `<module_prefix>/<APP_NAME>`.
    #[arg(long, value_name = "PATH")]
    module: Option<String>,
}

/// # Handle Create Command (`handle_create`)
///
/// Orchestrates the clone. See the module documentation for the flow.
pub async fn handle_create(args: CreateArgs) -> Result<()> {
    info!("Handling create command for '{}'", args.app_name);

    let cfg = config::load_config().context("Failed to load Applicator configuration")?;
    let plan = build_clone_plan(&args, &cfg)?;
    debug!("Clone plan: {:?}", plan);

    let target_dir = resolve_target_dir(&args.dir)?;
    if !io::is_empty_or_missing_dir(&target_dir)? {
        anyhow::bail!(ApplicatorError::FileSystem(format!(
            "target directory '{}' exists and is non-empty",
            target_dir.display()
        )));
    }

    let source = TemplateSource::from_config(
        &cfg.template,
        args.template_dir.as_deref(),
        args.template_version.as_deref(),
    );
    let template_dir = source.resolve().await?;

    io::ensure_dir_exists(&target_dir)?;
    let written = clone_tree(&template_dir, &target_dir, &plan)?;

    info!(
        "initialized {} in {}",
        plan.destination_module,
        target_dir.display()
    );
    print_completion_message(&target_dir, &plan, written);
    Ok(())
}

/// Forms the destination module path and validates both module identities.
fn build_clone_plan(args: &CreateArgs, cfg: &Config) -> Result<ClonePlan> {
    let app_name = args.app_name.as_str();
    if app_name.is_empty() {
        anyhow::bail!(ApplicatorError::ArgumentParsing(
            "application name cannot be empty".to_string()
        ));
    }
    // The name lands in go.mod and plain files even when --module is given.
    naming::check_path_element(app_name).map_err(|e| {
        ApplicatorError::ArgumentParsing(format!("invalid application name: {}", e))
    })?;

    let destination = match &args.module {
        Some(module) => module.clone(),
        None => format!(
            "{}/{}",
            cfg.destination.module_prefix.trim_end_matches('/'),
            app_name
        ),
    };

    let plan = ClonePlan::new(
        cfg.template.module.as_str(),
        destination,
        cfg.template.slug.as_str(),
        app_name,
    )?;
    Ok(plan)
}

fn resolve_target_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(env::current_dir()
            .context("Failed to get current directory")?
            .join(dir))
    }
}

/// Copies `template_dir` into `target_dir`, rewriting every regular file.
/// Returns the number of files written.
fn clone_tree(template_dir: &Path, target_dir: &Path, plan: &ClonePlan) -> Result<usize> {
    info!(
        "Cloning template from '{}' to '{}'",
        template_dir.display(),
        target_dir.display()
    );

    let walker = WalkDir::new(template_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() == 1 && entry.file_type().is_dir() && entry.file_name() == VCS_DIR)
        });

    let mut written = 0;
    for entry_result in walker {
        let entry = entry_result.with_context(|| {
            format!("Failed to walk template directory '{}'", template_dir.display())
        })?;
        let src_path = entry.path();
        let relative_path = src_path.strip_prefix(template_dir).with_context(|| {
            format!(
                "Could not determine relative path for '{}'",
                src_path.display()
            )
        })?;
        if relative_path.as_os_str().is_empty() {
            continue;
        }
        let target_path = target_dir.join(relative_path);

        if entry.file_type().is_dir() {
            io::ensure_dir_exists(&target_path)?;
        } else if entry.file_type().is_file() {
            let data = io::read_file_bytes(src_path)?;
            let rewritten = rewrite::rewrite_file(relative_path, &data, plan)?;
            if let Some(recovered) = &rewritten.recovered {
                warn!("{}; copied unchanged", recovered);
            }
            io::write_bytes_to_file(&target_path, &rewritten.bytes)?;
            debug!(
                "Wrote {} ({:?})",
                rewrite::slash_path(relative_path),
                rewritten.role
            );
            written += 1;
        } else {
            warn!(
                "Skipping unsupported file system entry type at '{}'",
                src_path.display()
            );
        }
    }

    info!("Template cloned: {} files written.", written);
    Ok(written)
}

fn print_completion_message(target_path: &Path, plan: &ClonePlan, written: usize) {
    println!(
        "Initialized {} in {} ({} files)",
        plan.destination_module,
        target_path.display(),
        written
    );

    let display_path = match env::current_dir() {
        Ok(cwd) => pathdiff::diff_paths(target_path, &cwd)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| target_path.display().to_string()),
        Err(_) => target_path.display().to_string(),
    };

    println!("\nNext steps:");
    println!("  1. Navigate to your project: cd {}", display_path);
    if target_path.join("README.md").exists() {
        println!("  2. Review project instructions: cat README.md");
        println!("  3. Tidy Go modules and build: go mod tidy && go build ./...");
    } else {
        println!("  2. Tidy Go modules and build: go mod tidy && go build ./...");
    }
}
