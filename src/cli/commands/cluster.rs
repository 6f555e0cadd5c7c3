//! The `create cluster` and `delete cluster` commands.

use tracing::debug;

use super::dispatcher::{Command, CommandResult};
use crate::error::Result;
use crate::harness::Harness;
use crate::jobs::{create_cluster, delete_cluster, ClusterSpec};

/// Which cluster lifecycle job to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterAction {
    Create,
    Delete,
}

/// Runs a cluster job through the harness.
#[derive(Debug, Clone)]
pub struct ClusterCommand {
    action: ClusterAction,
    spec: ClusterSpec,
}

impl ClusterCommand {
    pub fn new(action: ClusterAction, spec: ClusterSpec) -> Self {
        Self { action, spec }
    }

    pub fn action(&self) -> ClusterAction {
        self.action
    }

    pub fn spec(&self) -> &ClusterSpec {
        &self.spec
    }
}

impl Command for ClusterCommand {
    fn execute(&self, harness: &Harness) -> Result<CommandResult> {
        let job = match self.action {
            ClusterAction::Create => create_cluster(&self.spec),
            ClusterAction::Delete => delete_cluster(&self.spec),
        };
        debug!(job = %job.name(), cluster = %self.spec.name, "Dispatching cluster job");

        harness.run(job).into_result()?;
        Ok(CommandResult::success())
    }
}
