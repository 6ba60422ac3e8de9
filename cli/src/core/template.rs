//! # Applicator Template Source
//!
//! File: cli/src/core/template.rs
//!
//! ## Overview
//!
//! Locates the template tree a new project is cloned from. The template is
//! either a local directory (`--template-dir`, `[template] directory` or
//! `APPLICATOR_TEMPLATE_DIR`) or a module fetched into the Go module cache.
//!
//! ## Architecture
//!
//! Fetching shells out to the Go toolchain:
//!
//! ```bash
//! go mod download -json github.com/HardDie/harddie_go_template@latest
//! ```
//!
//! which prints a JSON object describing the downloaded module. Only its `Dir`
//! field (the extracted, read-only source tree) is used; a populated `Error`
//! field is reported as a failed command.
//!
use crate::common::process;
use crate::core::config::TemplateConfig;
use crate::core::error::{ApplicatorError, Result};
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the template tree comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// An existing directory on disk.
    Local(PathBuf),
    /// A module version downloaded through `go mod download`.
    ModuleCache { module: String, version: String },
}

/// Subset of the `go mod download -json` output.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct ModuleDownload {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl TemplateSource {
    /// Picks the source from configuration and command-line overrides.
    /// A local directory always wins over a download.
    pub fn from_config(
        cfg: &TemplateConfig,
        dir_override: Option<&Path>,
        version_override: Option<&str>,
    ) -> Self {
        if let Some(dir) = dir_override {
            return TemplateSource::Local(dir.to_path_buf());
        }
        if let Some(dir) = &cfg.directory {
            return TemplateSource::Local(PathBuf::from(dir));
        }
        TemplateSource::ModuleCache {
            module: cfg.module.clone(),
            version: version_override.unwrap_or(&cfg.version).to_string(),
        }
    }

    /// Returns the directory holding the template tree, downloading it first
    /// when needed.
    pub async fn resolve(&self) -> Result<PathBuf> {
        match self {
            TemplateSource::Local(dir) => {
                if !dir.is_dir() {
                    anyhow::bail!(ApplicatorError::FileSystem(format!(
                        "Template directory '{}' does not exist or is not a directory",
                        dir.display()
                    )));
                }
                debug!("Using local template at {}", dir.display());
                Ok(dir.clone())
            }
            TemplateSource::ModuleCache { module, version } => {
                let query = format!("{}@{}", module, version);
                info!("Downloading template {}", query);
                let output = process::run_command_capture("go", &["mod", "download", "-json", &query])
                    .await
                    .with_context(|| format!("Failed to download template module {}", query))?;
                let progress = String::from_utf8_lossy(&output.stderr);
                if !progress.trim().is_empty() {
                    debug!("go mod download: {}", progress.trim());
                }
                let dir = parse_download_output(&output.stdout)?;
                info!("Template {} available at {}", query, dir.display());
                Ok(dir)
            }
        }
    }
}

/// Extracts the module directory from `go mod download -json` output.
pub fn parse_download_output(stdout: &[u8]) -> Result<PathBuf> {
    let download: ModuleDownload = serde_json::from_slice(stdout).map_err(|e| {
        ApplicatorError::ExternalCommand {
            cmd: "go mod download -json".to_string(),
            status: "exit status: 0".to_string(),
            output: format!("unreadable JSON output: {}", e),
        }
    })?;
    debug!(
        "go mod download reported {:?}@{:?}",
        download.path, download.version
    );

    if let Some(error) = download.error.filter(|e| !e.is_empty()) {
        anyhow::bail!(ApplicatorError::ExternalCommand {
            cmd: "go mod download -json".to_string(),
            status: "exit status: 0".to_string(),
            output: error,
        });
    }
    match download.dir.filter(|d| !d.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => anyhow::bail!(ApplicatorError::ExternalCommand {
            cmd: "go mod download -json".to_string(),
            status: "exit status: 0".to_string(),
            output: "no module directory in output".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn template_config() -> TemplateConfig {
        TemplateConfig {
            module: "github.com/HardDie/harddie_go_template".to_string(),
            slug: "harddie_go_template".to_string(),
            version: "latest".to_string(),
            directory: None,
        }
    }

    #[test]
    fn test_from_config_prefers_local_directories() {
        let mut cfg = template_config();
        assert_eq!(
            TemplateSource::from_config(&cfg, None, Some("v1.2.0")),
            TemplateSource::ModuleCache {
                module: "github.com/HardDie/harddie_go_template".to_string(),
                version: "v1.2.0".to_string(),
            }
        );
        assert_eq!(
            TemplateSource::from_config(&cfg, None, None),
            TemplateSource::ModuleCache {
                module: "github.com/HardDie/harddie_go_template".to_string(),
                version: "latest".to_string(),
            }
        );

        cfg.directory = Some("/opt/template".to_string());
        assert_eq!(
            TemplateSource::from_config(&cfg, None, Some("v1.2.0")),
            TemplateSource::Local(PathBuf::from("/opt/template"))
        );
        assert_eq!(
            TemplateSource::from_config(&cfg, Some(Path::new("/tmp/other")), None),
            TemplateSource::Local(PathBuf::from("/tmp/other"))
        );
    }

    #[test]
    fn test_parse_download_output() -> Result<()> {
        let stdout = br#"{
            "Path": "github.com/HardDie/harddie_go_template",
            "Version": "v0.3.1",
            "Info": "/home/u/go/pkg/mod/cache/download/github.com/!hard!die/harddie_go_template/@v/v0.3.1.info",
            "Dir": "/home/u/go/pkg/mod/github.com/!hard!die/harddie_go_template@v0.3.1",
            "Sum": "h1:abc="
        }"#;
        assert_eq!(
            parse_download_output(stdout)?,
            PathBuf::from("/home/u/go/pkg/mod/github.com/!hard!die/harddie_go_template@v0.3.1")
        );
        Ok(())
    }

    #[test]
    fn test_parse_download_output_reports_errors() {
        let err = parse_download_output(
            br#"{"Path":"github.com/x/y","Version":"latest","Error":"module not found"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("module not found"));

        let err = parse_download_output(br#"{"Path":"github.com/x/y"}"#).unwrap_err();
        assert!(err.to_string().contains("no module directory"));

        let err = parse_download_output(b"go: not json").unwrap_err();
        assert!(err.to_string().contains("unreadable JSON output"));
    }

    #[tokio::test]
    async fn test_resolve_local() -> Result<()> {
        let dir = tempdir()?;
        let source = TemplateSource::Local(dir.path().to_path_buf());
        assert_eq!(source.resolve().await?, dir.path());

        let missing = TemplateSource::Local(dir.path().join("missing"));
        let err = missing.resolve().await.unwrap_err();
        assert!(err.to_string().contains("does not exist or is not a directory"));
        Ok(())
    }
}
