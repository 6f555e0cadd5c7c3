//! Command-line interface for the harness.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations and the resource fallback
//! - [`initialize`] - Builds the process-wide logger before any command runs

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, CreateClusterArgs, CreateResource, DeleteClusterArgs, DeleteResource,
};
pub use commands::{Command, CommandDispatcher, CommandResult};

use crate::config::{load_config, LoggerConfig};
use crate::error::Result;
use crate::harness::Harness;

/// Resolve logging configuration and build the harness.
///
/// Runs once per process, before dispatch, so every command and every job
/// shares the same logger.
pub fn initialize(cli: &Cli) -> Result<(LoggerConfig, Harness)> {
    let settings = load_config(cli.config.as_deref())?;
    let config = LoggerConfig::resolve(&cli.logging_flags(), &settings.logging)?;
    let harness = Harness::new(&config);
    Ok((config, harness))
}
