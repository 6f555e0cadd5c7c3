//! Steps: the units of work a job runs.
//!
//! - [`Step`] - the capability every collaborator implements
//! - [`StepContext`] - read access to earlier outputs, the logger and cancellation
//! - [`Outputs`] - values a step publishes for later steps
//! - [`FnStep`] / [`CommandStep`] - closure-backed and program-backed steps
//! - [`StepReport`] / [`StepStatus`] - per-step outcome records

pub mod command;
pub mod result;
pub mod step;

pub use command::CommandStep;
pub use result::{format_duration, StepReport, StepStatus};
pub use step::{FnStep, Outputs, Step, StepContext};
