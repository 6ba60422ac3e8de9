//! # Applicator CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` to use them.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// Environment variables that would leak the developer's settings into tests.
const APPLICATOR_ENV_VARS: [&str; 5] = [
    "APPLICATOR_SOURCE_MODULE",
    "APPLICATOR_TEMPLATE_SLUG",
    "APPLICATOR_TEMPLATE_VERSION",
    "APPLICATOR_MODULE_PREFIX",
    "APPLICATOR_TEMPLATE_DIR",
];

/// # Get Applicator Command (`applicator_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `applicator` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn applicator_cmd() -> Command {
    Command::cargo_bin("applicator").expect("Failed to find applicator binary for testing")
}

/// Like `applicator_cmd`, but isolated from the user's configuration: runs in
/// `workdir` with `HOME` and `XDG_CONFIG_HOME` pointing inside it.
pub fn isolated_cmd(workdir: &Path) -> Command {
    let mut cmd = applicator_cmd();
    cmd.current_dir(workdir)
        .env("HOME", workdir.join("home"))
        .env("XDG_CONFIG_HOME", workdir.join("home/.config"))
        .env_remove("RUST_LOG");
    for var in APPLICATOR_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Writes `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("file path has a parent"))
        .expect("Failed to create parent directory");
    fs::write(&path, content).expect("Failed to write test file");
}

/// Reads `root/relative` as a string.
pub fn read_file(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", relative, e))
}

/// Populates `root` with a small Go template for
/// `github.com/HardDie/harddie_go_template`.
pub fn write_go_template(root: &Path) {
    write_file(
        root,
        "go.mod",
        "module github.com/HardDie/harddie_go_template\n\
         \n\
         go 1.22\n\
         \n\
         require github.com/joho/godotenv v1.5.1\n",
    );
    write_file(
        root,
        "harddie_go_template.go",
        "package harddie_go_template\n\
         \n\
         import (\n\
         \t\"fmt\"\n\
         \n\
         \t\"github.com/HardDie/harddie_go_template/internal/config\"\n\
         )\n\
         \n\
         func Run() { fmt.Println(config.Name) }\n",
    );
    write_file(
        root,
        "harddie_go_template_test.go",
        "package harddie_go_template_test\n\
         \n\
         import \"github.com/HardDie/harddie_go_template\"\n\
         \n\
         var _ = harddie_go_template.Run\n",
    );
    write_file(
        root,
        "cmd/server/main.go",
        "package main\n\
         \n\
         import \"github.com/HardDie/harddie_go_template\"\n\
         \n\
         func main() { harddie_go_template.Run() }\n",
    );
    write_file(
        root,
        "internal/config/config.go",
        "package config\n\
         \n\
         const Name = \"harddie_go_template\"\n",
    );
    write_file(root, ".env", "APP_NAME=harddie_go_template\n");
    write_file(
        root,
        "README.md",
        "# harddie_go_template\n\ndocker run my_harddie_go_template_extra\n",
    );
    write_file(root, ".git/HEAD", "ref: refs/heads/master\n");
}
