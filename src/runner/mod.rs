//! Job orchestration.
//!
//! A [`Job`] is an ordered list of steps, some of them spliced in from
//! [`Scenario`]s. Running it threads an [`ExecutionContext`] from step to
//! step, stops at the first failure and returns a [`JobReport`].
//!
//! # Example
//!
//! ```
//! use e2e_harness::diagnostics::Logger;
//! use e2e_harness::runner::{Cancellation, Job, Scenario};
//! use e2e_harness::steps::{FnStep, Outputs, StepContext};
//!
//! let mut checks = Scenario::new("dns");
//! checks.add_wired_step(
//!     FnStep::new("resolve", |_: &StepContext<'_>| Ok(Outputs::new())),
//!     |_, ctx| {
//!         ctx.get("ingress_ip")?;
//!         Ok(())
//!     },
//! );
//!
//! let mut job = Job::new("validate");
//! job.add_step(
//!     FnStep::new("deploy", |_: &StepContext<'_>| {
//!         Ok(Outputs::new().with("ingress_ip", "10.0.0.4"))
//!     }),
//!     None,
//! )
//! .add_scenario(checks);
//!
//! let report = job.run(&Logger::silent(), &Cancellation::new());
//! assert!(report.success());
//! assert_eq!(report.context.get_str("ingress_ip").unwrap(), "10.0.0.4");
//! ```

pub mod cancel;
pub mod context;
mod entry;
pub mod executor;
pub mod job;
pub mod scenario;

pub use cancel::Cancellation;
pub use context::ExecutionContext;
pub use entry::WiringFn;
pub use executor::{JobEvent, JobReport, JobState};
pub use job::Job;
pub use scenario::Scenario;
