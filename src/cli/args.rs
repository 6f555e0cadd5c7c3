//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::LoggingFlags;
use crate::jobs::{ClusterSpec, DEFAULT_KUBECONFIG, DEFAULT_TOOL};

/// e2e-harness - Provision, validate and tear down end-to-end test infrastructure.
#[derive(Debug, Parser)]
#[command(name = "e2e-harness")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: 0 announcements only, 1 +critical, 2 +warning, 3 +info, 4 +debug [default: 3]
    #[arg(short, long, global = true, value_name = "LEVEL")]
    pub verbose: Option<u8>,

    /// Log coloring: true, false or fabulous [default: true]
    #[arg(short = 'C', long, global = true, value_name = "MODE")]
    pub color: Option<String>,

    /// Capture logs and write them to disk if a job fails
    #[arg(
        short = 'd',
        long = "dumpLogs",
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub dump_logs: Option<bool>,

    /// Path to a YAML settings file
    #[arg(long, global = true, env = "E2E_HARNESS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// The logging values given on the command line.
    pub fn logging_flags(&self) -> LoggingFlags {
        LoggingFlags {
            verbose: self.verbose,
            color: self.color.clone(),
            dump_logs: self.dump_logs,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a resource
    Create {
        #[command(subcommand)]
        resource: Option<CreateResource>,
    },

    /// Delete a resource
    Delete {
        #[command(subcommand)]
        resource: Option<DeleteResource>,
    },
}

/// Resources `create` knows about.
#[derive(Debug, Subcommand)]
pub enum CreateResource {
    /// Create a cluster with the wrapped cluster tool
    Cluster(CreateClusterArgs),

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

/// Resources `delete` knows about.
#[derive(Debug, Subcommand)]
pub enum DeleteResource {
    /// Delete a cluster with the wrapped cluster tool
    Cluster(DeleteClusterArgs),

    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

/// Arguments for `create cluster`.
#[derive(Debug, Clone, Args)]
pub struct CreateClusterArgs {
    /// Cluster name
    #[arg(long)]
    pub name: String,

    /// Cloud region
    #[arg(long)]
    pub region: String,

    /// Where the cluster tool writes the kubeconfig
    #[arg(long, default_value = DEFAULT_KUBECONFIG)]
    pub kubeconfig: PathBuf,

    /// Cluster management program to invoke
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,
}

impl CreateClusterArgs {
    pub fn spec(&self) -> ClusterSpec {
        ClusterSpec::new(&self.name, &self.region)
            .with_kubeconfig(&self.kubeconfig)
            .with_tool(&self.tool)
    }
}

/// Arguments for `delete cluster`.
#[derive(Debug, Clone, Args)]
pub struct DeleteClusterArgs {
    /// Cluster name
    #[arg(long)]
    pub name: String,

    /// Cloud region
    #[arg(long)]
    pub region: String,

    /// Cluster management program to invoke
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,
}

impl DeleteClusterArgs {
    pub fn spec(&self) -> ClusterSpec {
        ClusterSpec::new(&self.name, &self.region).with_tool(&self.tool)
    }
}
