//! Reusable, named sequences of steps.

use std::fmt;

use super::context::ExecutionContext;
use super::entry::{Entry, WiringFn};
use crate::steps::Step;

/// A named, ordered list of steps that can be spliced into a job.
///
/// Scenarios are plain values: collaborators build them from bound
/// parameters (a backend, a target address) and hand them to
/// [`Job::add_scenario`](super::Job::add_scenario). To run the same
/// validation against another backend, build another scenario.
pub struct Scenario {
    name: String,
    entries: Vec<Entry>,
}

impl Scenario {
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

    pub(crate) fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("steps", &self.step_names())
            .finish()
    }
}
