//! The step capability and the values steps hand back to the executor.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::diagnostics::Logger;
use crate::error::Result;
use crate::runner::{Cancellation, ExecutionContext};

/// One unit of work in a job.
///
/// Provisioning, installation and validation collaborators all implement
/// this. A step may spawn its own threads, but must join them before
/// `run` returns; the executor treats the return as the step's completion.
pub trait Step: Send {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// Perform the step. On success, return the values later steps may read.
    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs>;
}

impl<S: Step + ?Sized> Step for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs> {
        (**self).run(ctx)
    }
}

/// What a running step can see.
pub struct StepContext<'a> {
    values: &'a ExecutionContext,
    logger: &'a Logger,
    cancel: &'a Cancellation,
    index: usize,
    job: &'a str,
}

impl<'a> StepContext<'a> {
    pub fn new(
        values: &'a ExecutionContext,
        logger: &'a Logger,
        cancel: &'a Cancellation,
        index: usize,
        job: &'a str,
    ) -> Self {
        Self {
            values,
            logger,
            cancel,
            index,
            job,
        }
    }

    /// Values committed by earlier steps.
    pub fn values(&self) -> &'a ExecutionContext {
        self.values
    }

    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    pub fn cancellation(&self) -> &'a Cancellation {
        self.cancel
    }

    /// Zero-based position of this step in its job.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn job_name(&self) -> &'a str {
        self.job
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Shorthand for `values().get(key)`.
    pub fn get(&self, key: &str) -> Result<&'a Value> {
        self.values.get(key)
    }
}

impl fmt::Debug for StepContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("job", &self.job)
            .field("index", &self.index)
            .field("keys", &self.values.len())
            .finish()
    }
}

/// Values produced by one step, ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outputs(BTreeMap<String, Value>);

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.insert(key, value);
        self
    }

    /// Add a value. Values that cannot be represented as JSON become `null`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Serialize) {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl IntoIterator for Outputs {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Outputs {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// A step backed by a closure.
pub struct FnStep<F> {
    name: String,
    body: F,
}

impl<F> FnStep<F>
where
    F: FnMut(&StepContext<'_>) -> anyhow::Result<Outputs> + Send,
{
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

impl<F> Step for FnStep<F>
where
    F: FnMut(&StepContext<'_>) -> anyhow::Result<Outputs> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, ctx: &StepContext<'_>) -> anyhow::Result<Outputs> {
        (self.body)(ctx)
    }
}

impl<F> fmt::Debug for FnStep<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep").field("name", &self.name).finish()
    }
}
