//! # Applicator Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Runs external commands (currently only the `go` toolchain) and captures
//! their output. A non-zero exit status is turned into
//! `ApplicatorError::ExternalCommand` carrying the command line, the status and
//! everything the process printed, so the user sees why `go` refused.
//!
//! ## Usage
//!
//! ```rust
//! let output = process::run_command_capture("go", &["mod", "download", "-json", "x@latest"]).await?;
//! let info: ModuleInfo = serde_json::from_slice(&output.stdout)?;
//! ```
//!
use crate::core::error::{ApplicatorError, Result};
use anyhow::Context;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished process.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs `program` with `args`, waiting for it to exit and capturing both
/// output streams.
///
/// # Errors
///
/// - The program cannot be started (e.g. not installed).
/// - The program exits with a non-zero status (`ApplicatorError::ExternalCommand`).
pub async fn run_command_capture(program: &str, args: &[&str]) -> Result<CommandOutput> {
    let cmd_line = format_command(program, args);
    debug!("Running external command: {}", cmd_line);

    let output = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed to start '{}'", cmd_line))?;

    if !output.status.success() {
        anyhow::bail!(ApplicatorError::ExternalCommand {
            cmd: cmd_line,
            status: output.status.to_string(),
            output: format!(
                "{}{}",
                String::from_utf8_lossy(&output.stderr),
                String::from_utf8_lossy(&output.stdout)
            ),
        });
    }

    Ok(CommandOutput {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

fn format_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_command() {
        assert_eq!(
            format_command("go", &["mod", "download", "-json", "example.com/x@latest"]),
            "go mod download -json example.com/x@latest"
        );
        assert_eq!(format_command("true", &[]), "true");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_command_capture_success() -> Result<()> {
        let output = run_command_capture("sh", &["-c", "printf out; printf err >&2"]).await?;
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_command_capture_failure_reports_output() {
        let err = run_command_capture("sh", &["-c", "echo boom >&2; exit 3"])
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sh -c echo boom >&2; exit 3"));
        assert!(message.contains("boom"));
        assert!(matches!(
            err.downcast_ref::<ApplicatorError>(),
            Some(ApplicatorError::ExternalCommand { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let result = run_command_capture("applicator-no-such-program", &[]).await;
        assert!(result.unwrap_err().to_string().contains("Failed to start"));
    }
}
