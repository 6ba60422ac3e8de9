//! # Applicator Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the settings that describe *which* template is cloned and
//! how destination module paths are formed. It supports a multi-level approach
//! that combines defaults, user settings, project overrides and environment
//! variables.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence, highest first):
//! 1. Environment variables (`APPLICATOR_SOURCE_MODULE`, `APPLICATOR_TEMPLATE_SLUG`,
//!    `APPLICATOR_TEMPLATE_VERSION`, `APPLICATOR_MODULE_PREFIX`, `APPLICATOR_TEMPLATE_DIR`)
//! 2. Project-specific `.applicator.toml` in the current directory or ancestors
//! 3. User-specific `~/.config/applicator/config.toml`
//! 4. Default values defined in the code
//!
//! Paths are expanded (`~` to the home directory) and the result is validated
//! before use.
//!
//! ## Examples
//!
//! ```toml
//! [template]
//! module = "github.com/HardDie/harddie_go_template"
//! slug = "harddie_go_template"
//! version = "latest"
//! directory = "~/src/harddie_go_template"   # optional, skips the download
//!
//! [destination]
//! module_prefix = "github.com/HardDie"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let dst = format!("{}/{}", cfg.destination.module_prefix, app_name);
//! ```
//!
use crate::core::error::{ApplicatorError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub destination: DestinationConfig,
}

/// Which template is cloned.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Module path of the template (rewritten in imports and `go.mod`).
    #[serde(default = "default_template_module")]
    pub module: String,
    /// Token replaced with the application name in non-Go files.
    #[serde(default = "default_template_slug")]
    pub slug: String,
    /// Version passed to `go mod download`.
    #[serde(default = "default_template_version")]
    pub version: String,
    /// Local template checkout (can use ~). Used instead of downloading.
    #[serde(default)]
    pub directory: Option<String>,
}

/// How the new module path is formed.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfig {
    /// Prefix joined with the application name: `<prefix>/<app>`.
    #[serde(default = "default_module_prefix")]
    pub module_prefix: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            module: default_template_module(),
            slug: default_template_slug(),
            version: default_template_version(),
            directory: None,
        }
    }
}

impl Default for DestinationConfig {
    fn default() -> Self {
        Self {
            module_prefix: default_module_prefix(),
        }
    }
}

fn default_template_module() -> String {
    "github.com/HardDie/harddie_go_template".to_string()
}
fn default_template_slug() -> String {
    "harddie_go_template".to_string()
}
fn default_template_version() -> String {
    "latest".to_string()
}
fn default_module_prefix() -> String {
    "github.com/HardDie".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".applicator.toml";

/// Environment variables consulted by `apply_env_overrides`.
pub const ENV_SOURCE_MODULE: &str = "APPLICATOR_SOURCE_MODULE";
pub const ENV_TEMPLATE_SLUG: &str = "APPLICATOR_TEMPLATE_SLUG";
pub const ENV_TEMPLATE_VERSION: &str = "APPLICATOR_TEMPLATE_VERSION";
pub const ENV_MODULE_PREFIX: &str = "APPLICATOR_MODULE_PREFIX";
pub const ENV_TEMPLATE_DIR: &str = "APPLICATOR_TEMPLATE_DIR";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    apply_env_overrides(&mut merged_config, |key| env::var(key).ok());
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "HardDie", "applicator") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.applicator.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.applicator.toml`, stopping at the
/// first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win whenever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let pick = |project: String, user: String, default: String| {
        if project != default {
            project
        } else {
            user
        }
    };
    Config {
        template: TemplateConfig {
            module: pick(
                project_cfg.template.module,
                user.template.module,
                default_template_module(),
            ),
            slug: pick(
                project_cfg.template.slug,
                user.template.slug,
                default_template_slug(),
            ),
            version: pick(
                project_cfg.template.version,
                user.template.version,
                default_template_version(),
            ),
            directory: project_cfg.template.directory.or(user.template.directory),
        },
        destination: DestinationConfig {
            module_prefix: pick(
                project_cfg.destination.module_prefix,
                user.destination.module_prefix,
                default_module_prefix(),
            ),
        },
    }
}

/// Applies `APPLICATOR_*` variables. Empty values are ignored.
fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    if let Some(v) = get(ENV_SOURCE_MODULE) {
        debug!("{} overrides template module: {}", ENV_SOURCE_MODULE, v);
        config.template.module = v;
    }
    if let Some(v) = get(ENV_TEMPLATE_SLUG) {
        debug!("{} overrides template slug: {}", ENV_TEMPLATE_SLUG, v);
        config.template.slug = v;
    }
    if let Some(v) = get(ENV_TEMPLATE_VERSION) {
        debug!("{} overrides template version: {}", ENV_TEMPLATE_VERSION, v);
        config.template.version = v;
    }
    if let Some(v) = get(ENV_MODULE_PREFIX) {
        debug!("{} overrides module prefix: {}", ENV_MODULE_PREFIX, v);
        config.destination.module_prefix = v;
    }
    if let Some(v) = get(ENV_TEMPLATE_DIR) {
        debug!("{} overrides template directory: {}", ENV_TEMPLATE_DIR, v);
        config.template.directory = Some(v);
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = config.template.directory.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded template directory: {}", dir);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.template.slug.is_empty() {
        return Err(anyhow!(ApplicatorError::Config(
            "Template slug cannot be empty.".to_string()
        )));
    }
    if config.template.version.trim().is_empty() {
        return Err(anyhow!(ApplicatorError::Config(
            "Template version cannot be empty.".to_string()
        )));
    }
    if config.destination.module_prefix.trim_end_matches('/').is_empty() {
        return Err(anyhow!(ApplicatorError::Config(
            "Destination module prefix cannot be empty.".to_string()
        )));
    }
    if let Some(dir) = &config.template.directory {
        let dir = PathBuf::from(dir);
        if !dir.exists() {
            warn!(
                "Configured template directory '{}' does not exist.",
                dir.display()
            );
        } else if !dir.is_dir() {
            return Err(anyhow!(ApplicatorError::Config(format!(
                "Configured template path '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}
