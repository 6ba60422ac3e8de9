//! # Applicator Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the Applicator CLI and
//! makes them accessible to the main entry point (`main.rs`). Each command
//! defines its own arguments structure and an async handler function.
//!
//! ## Commands
//!
//! - `create`: Clone the template into a new project
//!

/// Clones the template under a new module identity.
pub mod create;
