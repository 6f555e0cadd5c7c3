//! Running jobs with the process-wide logger.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info};

use crate::config::LoggerConfig;
use crate::diagnostics::Logger;
use crate::runner::{Cancellation, Job, JobReport};

/// Owns the shared logger and runs jobs with it.
///
/// When a job fails and log capture is enabled, the captured lines are
/// written to the dump directory. Successful runs never write a dump.
#[derive(Debug, Clone)]
pub struct Harness {
    logger: Arc<Logger>,
    dump_dir: PathBuf,
}

impl Harness {
    /// Build the logger from `config` and wrap it.
    pub fn new(config: &LoggerConfig) -> Self {
        Self::with_logger(Arc::new(Logger::new(config)), config.dump_dir.clone())
    }

    pub fn with_logger(logger: Arc<Logger>, dump_dir: impl Into<PathBuf>) -> Self {
        Self {
            logger,
            dump_dir: dump_dir.into(),
        }
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn dump_dir(&self) -> &Path {
        &self.dump_dir
    }

    /// Run `job` to completion.
    pub fn run(&self, job: Job) -> JobReport {
        self.run_with_cancel(job, &Cancellation::new())
    }

    /// Run `job`, stopping before the next step once `cancel` trips.
    pub fn run_with_cancel(&self, job: Job, cancel: &Cancellation) -> JobReport {
        let report = job.run(&self.logger, cancel);
        if !report.success() {
            self.dump_on_failure(&report);
        }
        report
    }

    fn dump_on_failure(&self, report: &JobReport) {
        match self.logger.dump(&self.dump_dir) {
            Ok(Some(path)) => {
                info!(job = %report.job, path = %path.display(), "Wrote failure log dump");
                self.logger
                    .always(format!("logs dumped to {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                error!(job = %report.job, "Failed to write log dump: {}", e);
                self.logger
                    .critical(format!("could not write log dump: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorMode;
    use crate::diagnostics::LogBuffer;
    use crate::steps::{FnStep, Outputs, StepContext};
    use tempfile::TempDir;

    fn dumping_harness(dir: &Path) -> Harness {
        let config = LoggerConfig {
            verbosity: 3,
            color: ColorMode::Plain,
            dump_logs: true,
            dump_dir: dir.to_path_buf(),
        };
        let logger = Logger::with_sink(&config, Box::new(LogBuffer::new()));
        Harness::with_logger(Arc::new(logger), dir)
    }

    fn job(fail: bool) -> Job {
        let mut job = Job::new("dump-check");
        job.add_step(
            FnStep::new("maybe-fail", move |ctx: &StepContext<'_>| {
                ctx.logger().info("probing endpoint");
                if fail {
                    anyhow::bail!("endpoint unreachable");
                }
                Ok(Outputs::new())
            }),
            None,
        );
        job
    }

    fn dump_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "log"))
            .collect()
    }

    #[test]
    fn failure_writes_dump() {
        let temp = TempDir::new().unwrap();
        let harness = dumping_harness(temp.path());

        let report = harness.run(job(true));
        assert!(!report.success());

        let files = dump_files(temp.path());
        assert_eq!(files.len(), 1);
        let contents = std::fs::read_to_string(&files[0]).unwrap();
        assert!(contents.contains("probing endpoint"));
        assert!(contents.contains("endpoint unreachable"));
    }

    #[test]
    fn success_writes_no_dump() {
        let temp = TempDir::new().unwrap();
        let harness = dumping_harness(temp.path());

        let report = harness.run(job(false));
        assert!(report.success());
        assert!(dump_files(temp.path()).is_empty());
    }

    #[test]
    fn cancelled_run_counts_as_failure() {
        let temp = TempDir::new().unwrap();
        let harness = dumping_harness(temp.path());
        let cancel = Cancellation::new();
        cancel.cancel();

        let report = harness.run_with_cancel(job(false), &cancel);
        assert!(!report.success());
        assert_eq!(dump_files(temp.path()).len(), 1);
    }
}
