//! Step entries shared by scenarios and jobs.

use super::context::ExecutionContext;
use crate::steps::{Outputs, Step, StepContext};

/// Copies values from the context into a step's inputs right before it runs.
///
/// Called at most once, with the context as committed by every earlier step.
/// Returning an error fails the step without running it.
pub type WiringFn<S> = Box<dyn FnOnce(&mut S, &ExecutionContext) -> anyhow::Result<()> + Send>;

/// A step with its wiring, erased to a common type.
pub(crate) trait Stage: Send {
    fn name(&self) -> &str;
    fn wire(&mut self, ctx: &ExecutionContext) -> anyhow::Result<()>;
    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs>;
}

pub(crate) struct Wired<S> {
    step: S,
    wiring: Option<WiringFn<S>>,
}

impl<S: Step> Wired<S> {
    pub(crate) fn new(step: S, wiring: Option<WiringFn<S>>) -> Self {
        Self { step, wiring }
    }
}

impl<S: Step> Stage for Wired<S> {
    fn name(&self) -> &str {
        self.step.name()
    }

    fn wire(&mut self, ctx: &ExecutionContext) -> anyhow::Result<()> {
        match self.wiring.take() {
            Some(wiring) => wiring(&mut self.step, ctx),
            None => Ok(()),
        }
    }

    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs> {
        self.step.run(ctx)
    }
}

/// One position in a scenario or job.
pub(crate) struct Entry {
    pub(crate) stage: Box<dyn Stage>,
    pub(crate) scenario: Option<String>,
}

impl Entry {
    pub(crate) fn new<S: Step + 'static>(step: S, wiring: Option<WiringFn<S>>) -> Self {
        Self {
            stage: Box::new(Wired::new(step, wiring)),
            scenario: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        self.stage.name()
    }
}
