//! Sequential, fail-fast job execution.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::cancel::Cancellation;
use super::context::ExecutionContext;
use super::entry::Entry;
use super::job::Job;
use crate::diagnostics::Logger;
use crate::error::{HarnessError, Result};
use crate::steps::{format_duration, StepContext, StepReport, StepStatus};

/// Lifecycle of a job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    NotStarted,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    /// Once a job leaves `Running` it never changes again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::NotStarted => "not started",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Progress events emitted during a job run.
#[derive(Debug)]
pub enum JobEvent<'a> {
    /// The job moved to a new state.
    StateChanged { job: &'a str, state: JobState },
    /// A step is about to be wired and run.
    StepStarting {
        name: &'a str,
        index: usize,
        total: usize,
    },
    /// A step finished, successfully or not.
    StepFinished { report: &'a StepReport },
    /// A step was never started.
    StepSkipped { report: &'a StepReport },
}

/// Result of running a job.
#[derive(Debug)]
pub struct JobReport {
    /// Job name.
    pub job: String,
    /// Final state: `Succeeded` or `Failed`.
    pub state: JobState,
    /// One report per step, in execution order.
    pub steps: Vec<StepReport>,
    /// The error that ended the run, if it failed.
    pub error: Option<HarnessError>,
    /// Values committed by the steps that succeeded.
    pub context: ExecutionContext,
    /// Total duration.
    pub duration: Duration,
}

impl JobReport {
    pub fn success(&self) -> bool {
        self.state == JobState::Succeeded
    }

    /// The step whose failure ended the run.
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// Number of steps that ended in `status`.
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }

    /// The committed context on success, the run's error otherwise.
    pub fn into_result(self) -> Result<ExecutionContext> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.context),
        }
    }
}

impl Job {
    /// Run every step in order, stopping at the first failure.
    pub fn run(self, logger: &Logger, cancel: &Cancellation) -> JobReport {
        self.run_with_progress(logger, cancel, |_| {})
    }

    /// Run the job, reporting progress through `on_event`.
    ///
    /// For each step, in order: check `cancel`; run the step's wiring; run
    /// the step; commit its outputs. The first failure at any of these
    /// points marks the step `Failed` (or `Skipped` when cancelled) and every
    /// later step `Skipped` without invoking it.
    pub fn run_with_progress<F>(
        self,
        logger: &Logger,
        cancel: &Cancellation,
        mut on_event: F,
    ) -> JobReport
    where
        F: FnMut(JobEvent<'_>),
    {
        let start = Instant::now();
        let (job, mut entries) = self.into_parts();
        let total = entries.len();

        let mut steps: Vec<StepReport> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| StepReport::pending(i, e.name(), e.scenario.as_deref()))
            .collect();
        let mut context = ExecutionContext::new();
        let mut error: Option<HarnessError> = None;

        info!(job = %job, steps = total, "Job starting");
        logger.always(format!("starting job \"{}\" ({} steps)", job, total));
        on_event(JobEvent::StateChanged {
            job: &job,
            state: JobState::Running,
        });

        for (index, entry) in entries.iter_mut().enumerate() {
            if error.is_some() {
                steps[index].status = StepStatus::Skipped;
                on_event(JobEvent::StepSkipped {
                    report: &steps[index],
                });
                continue;
            }

            if cancel.is_cancelled() {
                let err = HarnessError::Cancelled {
                    index,
                    name: entry.name().to_string(),
                };
                warn!(job = %job, step = index, "Job cancelled");
                logger.critical(&err);
                steps[index].status = StepStatus::Skipped;
                steps[index].error = Some("cancelled".to_string());
                on_event(JobEvent::StepSkipped {
                    report: &steps[index],
                });
                error = Some(err);
                continue;
            }

            on_event(JobEvent::StepStarting {
                name: &steps[index].name,
                index,
                total,
            });
            steps[index].status = StepStatus::Running;
            debug!(job = %job, step = index, name = %steps[index].name, "Step starting");
            logger.always(format!(
                "[{}/{}] {}",
                index + 1,
                total,
                steps[index].qualified_name()
            ));

            let step_start = Instant::now();
            let outcome = run_entry(entry, &mut context, logger, cancel, index, &job);
            steps[index].duration = step_start.elapsed();

            match outcome {
                Ok(()) => {
                    steps[index].status = StepStatus::Succeeded;
                    debug!(job = %job, step = index, "Step succeeded");
                    logger.success(format!(
                        "{} ({})",
                        steps[index].qualified_name(),
                        format_duration(steps[index].duration)
                    ));
                }
                Err(source) => {
                    steps[index].status = StepStatus::Failed;
                    steps[index].error = Some(format!("{:#}", source));
                    let err = HarnessError::StepExecution {
                        index,
                        name: steps[index].name.clone(),
                        source,
                    };
                    warn!(job = %job, step = index, "Step failed");
                    logger.critical(&err);
                    error = Some(err);
                }
            }

            on_event(JobEvent::StepFinished {
                report: &steps[index],
            });
        }

        let state = if error.is_none() {
            JobState::Succeeded
        } else {
            JobState::Failed
        };
        let duration = start.elapsed();

        for report in &steps {
            logger.info(report.summary_line());
        }
        match &error {
            None => logger.success(format!(
                "job \"{}\" succeeded ({})",
                job,
                format_duration(duration)
            )),
            Some(_) => logger.critical(format!("job \"{}\" failed", job)),
        }
        info!(job = %job, state = %state, "Job finished");
        on_event(JobEvent::StateChanged { job: &job, state });

        JobReport {
            job,
            state,
            steps,
            error,
            context,
            duration,
        }
    }
}

/// Wire, run and commit one entry.
fn run_entry(
    entry: &mut Entry,
    context: &mut ExecutionContext,
    logger: &Logger,
    cancel: &Cancellation,
    index: usize,
    job: &str,
) -> anyhow::Result<()> {
    entry.stage.wire(context)?;

    let outputs = {
        let ctx = StepContext::new(context, logger, cancel, index, job);
        entry.stage.run(&ctx)?
    };

    let name = entry.name().to_string();
    context.merge(outputs, &name)?;
    Ok(())
}
