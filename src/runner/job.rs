//! Job construction.

use std::fmt;

use super::context::ExecutionContext;
use super::entry::{Entry, WiringFn};
use super::scenario::Scenario;
use crate::steps::Step;

/// A named, ordered sequence of steps run as one unit.
///
/// Steps run strictly in the order they were added; a scenario's steps run
/// where the scenario was added. Running a job consumes it, so a job value
/// is never executed twice.
pub struct Job {
    name: String,
    entries: Vec<Entry>,
}

impl Job {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Step names in execution order.
    pub fn step_names(&self) -> Vec<&str> {
        self.entries.iter().map(Entry::name).collect()
    }

    /// Append a step with optional wiring.
    pub fn add_step<S: Step + 'static>(
        &mut self,
        step: S,
        wiring: Option<WiringFn<S>>,
    ) -> &mut Self {
        self.entries.push(Entry::new(step, wiring));
        self
    }

    /// Append a step whose inputs are filled from the context right before it runs.
    pub fn add_wired_step<S, W>(&mut self, step: S, wiring: W) -> &mut Self
    where
        S: Step + 'static,
        W: FnOnce(&mut S, &ExecutionContext) -> anyhow::Result<()> + Send + 'static,
    {
        self.add_step(step, Some(Box::new(wiring)))
    }

    /// Splice every step of `scenario`, in order, after the current steps.
    pub fn add_scenario(&mut self, scenario: Scenario) -> &mut Self {
        let tag = scenario.name().to_string();
        self.entries
            .extend(scenario.into_entries().into_iter().map(|mut entry| {
                entry.scenario = Some(tag.clone());
                entry
            }));
        self
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Entry>) {
        (self.name, self.entries)
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}
