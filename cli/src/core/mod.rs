//! # Applicator Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational components used by the command handlers:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and the application `Result` alias
//! - `template`: Locating (and downloading) the template tree
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{ApplicatorError, Result}; // For error handling
//! use crate::core::template::TemplateSource; // For finding the template
//! ```
//!
pub mod config;
pub mod error;
pub mod template;
