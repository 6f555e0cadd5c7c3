//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::io::Write;

use clap::CommandFactory;

use super::cluster::{ClusterAction, ClusterCommand};
use super::fallback::resource_fallback;
use crate::cli::args::{Cli, Commands, CreateResource, DeleteResource};
use crate::error::Result;
use crate::harness::Harness;

/// Trait for command implementations.
///
/// Each resource a verb can act on implements this trait to provide its
/// execution logic.
pub trait Command {
    /// Execute the command, running any jobs through `harness`.
    fn execute(&self, harness: &Harness) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    harness: Harness,
}

impl CommandDispatcher {
    pub fn new(harness: Harness) -> Self {
        Self { harness }
    }

    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    /// Dispatch and execute a command.
    ///
    /// Verbs without a recognised resource go through the shared resource
    /// fallback, which writes the error and the verb's help to `out`.
    pub fn dispatch(&self, cli: &Cli, out: &mut dyn Write) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Create {
                resource: Some(CreateResource::Cluster(args)),
            }) => ClusterCommand::new(ClusterAction::Create, args.spec()).execute(&self.harness),
            Some(Commands::Create { resource }) => {
                let rest: &[String] = match resource {
                    Some(CreateResource::Unknown(rest)) => rest.as_slice(),
                    _ => &[],
                };
                Err(resource_fallback("create", rest, out))
            }
            Some(Commands::Delete {
                resource: Some(DeleteResource::Cluster(args)),
            }) => ClusterCommand::new(ClusterAction::Delete, args.spec()).execute(&self.harness),
            Some(Commands::Delete { resource }) => {
                let rest: &[String] = match resource {
                    Some(DeleteResource::Unknown(rest)) => rest.as_slice(),
                    _ => &[],
                };
                Err(resource_fallback("delete", rest, out))
            }
            None => {
                write!(out, "{}", Cli::command().render_help())?;
                Ok(CommandResult::success())
            }
        }
    }
}
