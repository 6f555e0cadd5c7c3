//! Cluster infrastructure jobs built on the wrapped cluster tool.

use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::runner::Job;
use crate::steps::{CommandStep, Outputs, Step, StepContext};

/// Cluster tool used when none is given.
pub const DEFAULT_TOOL: &str = "eksctl";

/// Kubeconfig path used when none is given.
pub const DEFAULT_KUBECONFIG: &str = "./kubeconfig";

/// Parameters shared by the create and delete cluster jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSpec {
    pub name: String,
    pub region: String,
    pub kubeconfig: PathBuf,
    /// Program invoked for cluster lifecycle operations.
    pub tool: String,
}

impl ClusterSpec {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            kubeconfig: PathBuf::from(DEFAULT_KUBECONFIG),
            tool: DEFAULT_TOOL.to_string(),
        }
    }

    pub fn with_kubeconfig(mut self, path: impl Into<PathBuf>) -> Self {
        self.kubeconfig = path.into();
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = tool.into();
        self
    }
}

/// Provision a cluster and check that its kubeconfig was written.
///
/// Publishes `cluster_name`, `region` and `kubeconfig` for later steps.
pub fn create_cluster(spec: &ClusterSpec) -> Job {
    let kubeconfig = spec.kubeconfig.display().to_string();
    let mut job = Job::new("Create e2e test infrastructure");

    job.add_step(
        CommandStep::new("create-cluster", spec.tool.clone())
            .args(["create", "cluster"])
            .args(["--name", spec.name.as_str()])
            .args(["--region", spec.region.as_str()])
            .args(["--kubeconfig", kubeconfig.as_str()])
            .export("cluster_name", spec.name.clone())
            .export("region", spec.region.clone())
            .export("kubeconfig", kubeconfig.clone()),
        None,
    );

    job.add_wired_step(VerifyKubeConfig::default(), |step, ctx| {
        step.path = Some(PathBuf::from(ctx.get_str("kubeconfig")?));
        Ok(())
    });

    job
}

/// Tear down a cluster created by [`create_cluster`].
pub fn delete_cluster(spec: &ClusterSpec) -> Job {
    let mut job = Job::new("Delete e2e test infrastructure");

    job.add_step(
        CommandStep::new("delete-cluster", spec.tool.clone())
            .args(["delete", "cluster"])
            .args(["--name", spec.name.as_str()])
            .args(["--region", spec.region.as_str()]),
        None,
    );

    job
}

/// Checks that a kubeconfig file exists and is not empty.
#[derive(Debug, Default)]
pub struct VerifyKubeConfig {
    pub path: Option<PathBuf>,
}

impl Step for VerifyKubeConfig {
    fn name(&self) -> &str {
        "verify-kubeconfig"
    }

    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs> {
        let Some(path) = &self.path else {
            bail!("no kubeconfig path was wired");
        };

        let metadata = std::fs::metadata(path)
            .with_context(|| format!("kubeconfig not found at {}", path.display()))?;
        if metadata.len() == 0 {
            bail!("kubeconfig at {} is empty", path.display());
        }

        ctx.logger()
            .info(format!("kubeconfig ready at {}", path.display()));
        Ok(Outputs::new())
    }
}
